//! Batch document
//!
//! Field names and nesting follow the batch-execution tool's import format.

use serde::{Deserialize, Serialize};

use quorum_core::{Address, QuorumError, QuorumResult};

use crate::TransactionDescriptor;

/// Batch format version
pub const BATCH_VERSION: &str = "1.0";

/// Batch metadata
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchMeta {
    pub name: String,
    pub description: String,
    pub tx_builder_version: String,
    pub created_from_safe_address: String,
    /// Proposer address, empty when unknown
    pub created_from_owner_address: String,
    pub checksum: String,
}

/// Proposal batch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub version: String,
    pub chain_id: String,
    /// Epoch milliseconds
    pub created_at: i64,
    pub meta: BatchMeta,
    pub transactions: Vec<TransactionDescriptor>,
}

impl Batch {
    pub fn to_json_pretty(&self) -> QuorumResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| QuorumError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> QuorumResult<Self> {
        serde_json::from_str(json).map_err(|e| QuorumError::MalformedBatch(e.to_string()))
    }

    /// Multisig the batch targets
    pub fn safe_address(&self) -> QuorumResult<Address> {
        Address::parse(&self.meta.created_from_safe_address)
    }
}

/// Incremental batch construction
#[derive(Clone, Debug)]
pub struct BatchBuilder {
    chain_id: String,
    created_at: i64,
    safe: Address,
    name: String,
    description: String,
    tx_builder_version: String,
    proposer: Option<Address>,
    transactions: Vec<TransactionDescriptor>,
}

impl BatchBuilder {
    pub fn new(chain_id: impl Into<String>, safe: Address, created_at: i64) -> Self {
        BatchBuilder {
            chain_id: chain_id.into(),
            created_at,
            safe,
            name: String::new(),
            description: String::new(),
            tx_builder_version: String::new(),
            proposer: None,
            transactions: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn tx_builder_version(mut self, version: impl Into<String>) -> Self {
        self.tx_builder_version = version.into();
        self
    }

    pub fn proposer(mut self, proposer: Option<Address>) -> Self {
        self.proposer = proposer;
        self
    }

    pub fn transactions(mut self, transactions: Vec<TransactionDescriptor>) -> Self {
        self.transactions.extend(transactions);
        self
    }

    /// Finish the batch and stamp its checksum
    pub fn build(self) -> QuorumResult<Batch> {
        let mut batch = Batch {
            version: BATCH_VERSION.into(),
            chain_id: self.chain_id,
            created_at: self.created_at,
            meta: BatchMeta {
                name: self.name,
                description: self.description,
                tx_builder_version: self.tx_builder_version,
                created_from_safe_address: self.safe.to_checksum(),
                created_from_owner_address: self
                    .proposer
                    .map(|p| p.to_checksum())
                    .unwrap_or_default(),
                checksum: String::new(),
            },
            transactions: self.transactions,
        };
        crate::stamp_checksum(&mut batch)?;
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SafeCall;
    use quorum_core::Threshold;

    fn safe() -> Address {
        Address::from_low_u64(0xabcdef)
    }

    fn sample() -> Batch {
        BatchBuilder::new("1", safe(), 1_700_000_000_000)
            .name("Owner reconciliation")
            .description("0 swap, 0 add, 0 remove; threshold 1 -> 2")
            .tx_builder_version("1.16.5")
            .transactions(vec![SafeCall::ChangeThreshold {
                threshold: Threshold::new(2),
            }
            .to_descriptor(safe())])
            .build()
            .unwrap()
    }

    #[test]
    fn test_document_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["chainId"], "1");
        assert_eq!(json["createdAt"], 1_700_000_000_000i64);
        assert_eq!(json["meta"]["txBuilderVersion"], "1.16.5");
        assert_eq!(json["meta"]["createdFromSafeAddress"], safe().to_checksum());
        assert_eq!(json["meta"]["createdFromOwnerAddress"], "");
        assert!(json["meta"]["checksum"].as_str().unwrap().starts_with("0x"));
        assert_eq!(json["transactions"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_json_parse_back() {
        let batch = sample();
        let parsed = Batch::from_json(&batch.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, batch);
        assert_eq!(parsed.safe_address().unwrap(), safe());
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            Batch::from_json("{\"version\": 1}"),
            Err(QuorumError::MalformedBatch(_))
        ));
    }
}
