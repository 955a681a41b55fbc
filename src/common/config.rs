// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

use super::Error;
use serde::de::DeserializeOwned;
use serde::Deserialize;
#[allow(deprecated)]
use std::env::home_dir;
use std::fs::read_to_string;

/// Messages per batch when `[pump] max_batch_size` is not configured.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 10;

/// Configuration parameters for the pump and its AWS clients.
///
/// ```toml
/// [aws]
/// profile = "my_profile"
/// endpoint_url = "http://localhost:4566"
///
/// [pump]
/// max_batch_size = 10
/// ```
#[derive(Debug)]
pub struct PumpConfig {
    debug_enabled: bool,
    toml: String,
}

impl PumpConfig {
    /// Creates a configuration builder.
    pub fn builder() -> PumpConfigBuilder {
        PumpConfigBuilder {
            pump_config: None,
            debug_enabled: false,
            error: None,
        }
    }

    /// Returns `true` if debug is enabled.
    pub fn debug(&self) -> bool {
        self.debug_enabled
    }

    /// Returns configuration parameters.
    pub fn get<T: DeserializeOwned>(&self) -> Result<T, Error> {
        toml::from_str(&self.toml).map_err(|e: toml::de::Error| Error::String(format!("toml: {e}")))
    }

    /// Returns `[pump] max_batch_size`, or the default if the section or key is absent.
    pub fn max_batch_size(&self) -> Result<usize, Error> {
        #[derive(Deserialize)]
        struct PumpSection {
            max_batch_size: Option<usize>,
        }
        #[derive(Deserialize)]
        struct ConfigToml {
            pump: Option<PumpSection>,
        }
        let ConfigToml { pump } = self.get()?;
        Ok(pump
            .and_then(|section| section.max_batch_size)
            .unwrap_or(DEFAULT_MAX_BATCH_SIZE))
    }
}

/// Builds a `PumpConfig` from a TOML file or string.
pub struct PumpConfigBuilder {
    pump_config: Option<PumpConfig>,
    debug_enabled: bool,
    error: Option<Error>,
}

impl PumpConfigBuilder {
    /// Returns the configuration, or the error encountered while reading it.
    pub fn build(self) -> Result<PumpConfig, Error> {
        if let Some(error) = self.error {
            Err(error)
        } else if let Some(pump_config) = self.pump_config {
            Ok(pump_config)
        } else {
            Err(Error::String("config not set".to_string()))
        }
    }

    /// Enables or disables debug output.  Call this before loading TOML.
    pub fn debug(self, debug_enabled: bool) -> Self {
        Self {
            pump_config: self.pump_config.map(|pump_config| PumpConfig {
                debug_enabled,
                ..pump_config
            }),
            debug_enabled,
            error: self.error,
        }
    }

    /// Reads TOML from `~/{file_name}`, falling back to `./{file_name}`.
    pub fn toml_file(self, file_name: &str) -> Self {
        let debug_enabled = self.debug_enabled;
        #[allow(deprecated)]
        let home_path = home_dir().and_then(|pathbuf| {
            pathbuf
                .to_str()
                .map(|path| format!("{path}/{file_name}"))
        });
        let local_path = format!("./{file_name}");
        let from_home = home_path.and_then(|path| read_to_string(path).ok());
        match from_home.map(Ok).unwrap_or_else(|| {
            read_to_string(&local_path)
                .map_err(|_| Error::String(format!("{local_path}: cannot read")))
        }) {
            Ok(toml) => Self {
                pump_config: Some(PumpConfig {
                    debug_enabled,
                    toml,
                }),
                debug_enabled,
                error: None,
            },
            Err(e) => Self {
                pump_config: None,
                debug_enabled,
                error: Some(e),
            },
        }
    }

    /// Uses the TOML in `toml`.
    pub fn toml_str(self, toml: &str) -> Self {
        self.toml_string(toml.to_string())
    }

    /// Uses the TOML in `toml`.
    pub fn toml_string(self, toml: String) -> Self {
        Self {
            pump_config: Some(PumpConfig {
                debug_enabled: self.debug_enabled,
                toml,
            }),
            debug_enabled: self.debug_enabled,
            error: None,
        }
    }
}
