// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: LGPL-3.0-or-later

#[cfg(test)]
mod aws_tests {
    use crate::aws::sqs::{to_batch_result, to_request_entry};
    use crate::aws::{SqsClient, SqsSender, MAX_SQS_BATCH_SIZE};
    use crate::common::{Error, PumpConfig};
    use crate::pump::{
        enrich, Attributes, MessagePump, PendingMessage, Sender, CONTENT_LENGTH, CONTENT_TYPE, ID,
        MESSAGE_DEDUPLICATION_ID, MESSAGE_GROUP_ID, MIME_CONTENT_TYPE, TIMESTAMP,
    };
    use crate::time_id::UnixMillis;
    use aws_sdk_sqs::config::{BehaviorVersion, Credentials, Region};
    use aws_sdk_sqs::operation::send_message_batch::SendMessageBatchOutput;
    use aws_sdk_sqs::types::{BatchResultErrorEntry, SendMessageBatchResultEntry};
    use serde_json::json;

    /// A client which is never expected to reach the network.
    fn offline_client() -> SqsClient {
        let config = aws_sdk_sqs::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("test", "test", None, None, "static"))
            .endpoint_url("http://127.0.0.1:9")
            .build();
        SqsClient::from_conf(config)
    }

    fn fifo_attributes(deduplication_id: &str, group_id: &str) -> Attributes {
        [
            (MESSAGE_DEDUPLICATION_ID.to_string(), json!(deduplication_id)),
            (MESSAGE_GROUP_ID.to_string(), json!(group_id)),
            ("retries".to_string(), json!(2)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn request_entry_tests() {
        let message = PendingMessage::new(
            json!({"sku": "A-1"}),
            Some(fifo_attributes("dedup-1", "group-1")),
        );
        let enriched = enrich("orders.fifo", &message, UnixMillis(1_700_000_000_000)).unwrap();
        let entry = to_request_entry(3, enriched).unwrap();
        assert_eq!(entry.id(), "3");
        assert_eq!(entry.message_body(), r#"{"sku":"A-1"}"#);
        assert_eq!(entry.message_deduplication_id(), Some("dedup-1"));
        assert_eq!(entry.message_group_id(), Some("group-1"));

        let attributes = entry.message_attributes().expect("attributes");
        assert_eq!(attributes.len(), 6);
        assert!(!attributes.contains_key(MESSAGE_DEDUPLICATION_ID));
        assert!(!attributes.contains_key(MESSAGE_GROUP_ID));
        for key in [ID, CONTENT_TYPE, MIME_CONTENT_TYPE] {
            assert_eq!(attributes[key].data_type(), "String", "{key}");
        }
        for key in [TIMESTAMP, CONTENT_LENGTH, "retries"] {
            assert_eq!(attributes[key].data_type(), "Number", "{key}");
        }
        assert_eq!(
            attributes[TIMESTAMP].string_value(),
            Some("1700000000000")
        );
        assert_eq!(attributes[CONTENT_LENGTH].string_value(), Some("13"));

        let standard = enrich("orders", &PendingMessage::new(json!(1), None), UnixMillis(1)).unwrap();
        let entry = to_request_entry(0, standard).unwrap();
        assert_eq!(entry.message_deduplication_id(), None);
        assert_eq!(entry.message_group_id(), None);
    }

    #[test]
    fn batch_result_tests() {
        let output = SendMessageBatchOutput::builder()
            .successful(
                SendMessageBatchResultEntry::builder()
                    .id("0")
                    .message_id("m-0")
                    .md5_of_message_body("d41d8cd98f00b204e9800998ecf8427e")
                    .build()
                    .unwrap(),
            )
            .failed(
                BatchResultErrorEntry::builder()
                    .id("1")
                    .sender_fault(true)
                    .code("InvalidParameterValue")
                    .message("Message too long")
                    .build()
                    .unwrap(),
            )
            .failed(
                BatchResultErrorEntry::builder()
                    .id("2")
                    .sender_fault(false)
                    .code("InternalError")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        let result = to_batch_result(&output).unwrap();
        assert!(!result.is_success());
        assert_eq!(result.successful.len(), 1);
        assert_eq!(result.successful[0].index, 0);
        assert_eq!(result.successful[0].message_id, "m-0");
        assert_eq!(result.failed.len(), 2);
        assert_eq!(result.failed[0].index, 1);
        assert!(result.failed[0].sender_fault);
        assert_eq!(result.failed[0].code, "InvalidParameterValue");
        assert_eq!(result.failed[0].message, "Message too long");
        assert_eq!(result.failed[1].index, 2);
        assert!(!result.failed[1].sender_fault);
        assert_eq!(result.failed[1].message, "");

        let foreign = SendMessageBatchOutput::builder()
            .set_successful(Some(Vec::new()))
            .failed(
                BatchResultErrorEntry::builder()
                    .id("not-an-index")
                    .sender_fault(true)
                    .code("InvalidParameterValue")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        assert!(matches!(to_batch_result(&foreign), Err(Error::String(_))));
    }

    #[tokio::test]
    async fn fifo_validation_precedes_network() {
        let sender = SqsSender::new(offline_client());
        let valid = PendingMessage::new(json!(1), Some(fifo_attributes("d", "g")));
        let invalid = PendingMessage::new(json!(2), None);
        match sender
            .send_batch("https://sqs.us-east-1.amazonaws.com/123456789012/orders.fifo", &[valid, invalid])
            .await
        {
            Err(Error::Validation(s)) => {
                assert!(s.contains(MESSAGE_DEDUPLICATION_ID), "{s}");
                assert!(s.contains(MESSAGE_GROUP_ID), "{s}");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn batch_limits() {
        let sender = SqsSender::new(offline_client());
        let empty = sender.send_batch("orders", &[]).await.unwrap();
        assert!(empty.is_success());
        assert!(empty.successful.is_empty());

        let messages: Vec<PendingMessage> = (0..MAX_SQS_BATCH_SIZE + 1)
            .map(|i| PendingMessage::new(json!(i), None))
            .collect();
        assert!(matches!(
            sender.send_batch("orders", &messages).await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn pump_batch_size_is_bounded_by_sqs() {
        assert_eq!(SqsSender::new(offline_client()).max_batch_size(), MAX_SQS_BATCH_SIZE);
        let config = PumpConfig::builder()
            .toml_str("[pump]\nmax_batch_size = 20")
            .build()
            .unwrap();
        match MessagePump::from_config(SqsSender::new(offline_client()), &config) {
            Err(Error::Validation(s)) => assert!(s.contains("20"), "{s}"),
            Err(e) => panic!("expected validation error, got {e}"),
            Ok(_) => panic!("expected validation error"),
        }
        let config = PumpConfig::builder()
            .toml_str("[pump]\nmax_batch_size = 10")
            .build()
            .unwrap();
        let pump = MessagePump::from_config(SqsSender::new(offline_client()), &config).unwrap();
        assert_eq!(pump.max_batch_size(), MAX_SQS_BATCH_SIZE);
    }

    #[tokio::test]
    async fn queue_urls_are_used_verbatim() {
        let sender = SqsSender::new(offline_client());
        let url = "http://localhost:4566/000000000000/orders";
        assert_eq!(sender.queue_url(url).await.unwrap(), url);
    }

    #[tokio::test]
    async fn pump_surfaces_validation_at_flush() {
        let pump = MessagePump::new(SqsSender::new(offline_client()), MAX_SQS_BATCH_SIZE).unwrap();
        let destination = "http://localhost:4566/000000000000/orders.fifo";
        pump.send(destination, "no group id", None).await.unwrap();
        assert!(matches!(
            pump.flush(destination).await,
            Err(Error::Validation(_))
        ));
        // Nothing was sent, so nothing was lost.
        assert_eq!(pump.pending(destination), 1);
    }
}
