// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use crate::common::PumpConfig;
use aws_config::profile::ProfileFileRegionProvider;
use aws_config::{BehaviorVersion, ConfigLoader, SdkConfig};
use serde::Deserialize;

/// Create an AWS config loader with profile, region and endpoint URL.
pub fn create_aws_config_loader(pump_config: &PumpConfig) -> ConfigLoader {
    #[derive(Deserialize)]
    struct AwsConfig {
        profile: Option<String>,
        endpoint_url: Option<String>,
    }
    #[derive(Deserialize)]
    struct ConfigToml {
        aws: AwsConfig,
    }
    let mut config_loader = aws_config::defaults(BehaviorVersion::v2023_11_09());
    if let Ok(ConfigToml {
        aws: AwsConfig {
            profile,
            endpoint_url,
        },
    }) = pump_config.get()
    {
        if let Some(profile_name) = profile {
            if pump_config.debug() {
                tracing::debug!("AWS using profile name {profile_name}");
            }
            let region = ProfileFileRegionProvider::builder()
                .profile_name(&profile_name)
                .build();
            config_loader = config_loader.profile_name(&profile_name).region(region)
        }
        // e.g. a local SQS emulator
        if let Some(endpoint_url) = endpoint_url {
            if pump_config.debug() {
                tracing::debug!("AWS using endpoint URL {endpoint_url}");
            }
            config_loader = config_loader.endpoint_url(endpoint_url);
        }
    };
    config_loader
}

/// Load AWS configuration with profile, region and endpoint URL.
pub async fn load_aws_config(pump_config: &PumpConfig) -> SdkConfig {
    create_aws_config_loader(pump_config).load().await
}
