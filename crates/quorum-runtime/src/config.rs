//! Reconciliation configuration

use serde::Deserialize;

use quorum_core::{Address, QuorumError, QuorumResult};

pub const DEFAULT_TX_BUILDER_VERSION: &str = "1.16.5";
pub const DEFAULT_BATCH_NAME: &str = "Owner reconciliation";

/// Reconciliation configuration
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Chain identifier written into the batch
    pub chain_id: String,
    pub tx_builder_version: String,
    pub batch_name: String,
    /// Overrides the generated plan description
    pub batch_description: Option<String>,
    /// Address proposing the batch, if known
    pub proposer: Option<Address>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        ReconcileConfig {
            chain_id: String::new(),
            tx_builder_version: DEFAULT_TX_BUILDER_VERSION.into(),
            batch_name: DEFAULT_BATCH_NAME.into(),
            batch_description: None,
            proposer: None,
        }
    }
}

impl ReconcileConfig {
    pub fn new(chain_id: impl Into<String>) -> Self {
        ReconcileConfig {
            chain_id: chain_id.into(),
            ..ReconcileConfig::default()
        }
    }

    /// Parse from a JSON document; omitted fields keep their defaults
    pub fn from_json(json: &str) -> QuorumResult<Self> {
        let config: ReconcileConfig =
            serde_json::from_str(json).map_err(|e| QuorumError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> QuorumResult<()> {
        if self.chain_id.trim().is_empty() {
            return Err(QuorumError::MissingInput("chain_id"));
        }
        Ok(())
    }
}
