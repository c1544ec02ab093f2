use serde::{Deserialize, Serialize};

/// A batch of records as delivered by the Kinesis trigger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamBatch {
    #[serde(rename = "Records", default)]
    pub records: Vec<StreamRecord>,
}

/// One record of the batch; only `kinesis.data` is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamRecord {
    #[serde(rename = "eventID", default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    pub kinesis: KinesisData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KinesisData {
    /// Base64 text, undecoded
    pub data: String,
    #[serde(rename = "partitionKey", default, skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<String>,
    #[serde(rename = "sequenceNumber", default, skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
}

impl StreamBatch {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

impl StreamRecord {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            event_id: None,
            kinesis: KinesisData {
                data: data.into(),
                partition_key: None,
                sequence_number: None,
            },
        }
    }

    /// Stream-assigned identity: the event id, else the sequence number.
    pub fn stream_id(&self) -> Option<&str> {
        self.event_id
            .as_deref()
            .or(self.kinesis.sequence_number.as_deref())
    }

    /// Identifier to use in logs.
    pub fn log_id(&self) -> &str {
        self.stream_id().unwrap_or("-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_kinesis_event() {
        let raw = r#"{
            "Records": [{
                "kinesis": {
                    "kinesisSchemaVersion": "1.0",
                    "partitionKey": "1",
                    "sequenceNumber": "49590338271490256608559692538361571095921575989136588898",
                    "data": "SGVsbG8sIHRoaXMgaXMgYSB0ZXN0Lg==",
                    "approximateArrivalTimestamp": 1545084650.987
                },
                "eventSource": "aws:kinesis",
                "eventID": "shardId-000000000006:49590338271490256608559692538361571095921575989136588898",
                "awsRegion": "us-east-2"
            }]
        }"#;

        let batch: StreamBatch = serde_json::from_str(raw).unwrap();
        assert_eq!(batch.len(), 1);
        let record = &batch.records[0];
        assert_eq!(record.kinesis.data, "SGVsbG8sIHRoaXMgaXMgYSB0ZXN0Lg==");
        assert_eq!(record.kinesis.partition_key.as_deref(), Some("1"));
        assert!(record.log_id().starts_with("shardId-000000000006"));
    }

    #[test]
    fn test_missing_records_is_empty_batch() {
        let batch: StreamBatch = serde_json::from_str("{}").unwrap();
        assert!(batch.is_empty());
    }
}
