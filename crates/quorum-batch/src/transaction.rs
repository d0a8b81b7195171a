//! Contract-call descriptors for the owner manager

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use quorum_core::{Address, QuorumError, QuorumResult, Threshold};

pub const METHOD_SWAP_OWNER: &str = "swapOwner";
pub const METHOD_REMOVE_OWNER: &str = "removeOwner";
pub const METHOD_ADD_OWNER: &str = "addOwnerWithThreshold";
pub const METHOD_CHANGE_THRESHOLD: &str = "changeThreshold";

const ARG_PREV_OWNER: &str = "prevOwner";
const ARG_OLD_OWNER: &str = "oldOwner";
const ARG_NEW_OWNER: &str = "newOwner";
const ARG_OWNER: &str = "owner";
const ARG_THRESHOLD: &str = "_threshold";

/// One typed ABI input
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInput {
    pub internal_type: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl ContractInput {
    fn address(name: &str) -> Self {
        ContractInput {
            internal_type: "address".into(),
            name: name.into(),
            kind: "address".into(),
        }
    }

    fn uint256(name: &str) -> Self {
        ContractInput {
            internal_type: "uint256".into(),
            name: name.into(),
            kind: "uint256".into(),
        }
    }
}

/// Method signature as the batch tool expects it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractMethod {
    pub inputs: Vec<ContractInput>,
    pub name: String,
    pub payable: bool,
}

/// One proposed contract call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDescriptor {
    pub to: Address,
    pub value: String,
    pub data: Option<String>,
    pub contract_method: ContractMethod,
    pub contract_inputs_values: BTreeMap<String, String>,
}

/// Owner-manager call, decoded
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SafeCall {
    SwapOwner {
        prev_owner: Address,
        old_owner: Address,
        new_owner: Address,
    },
    RemoveOwner {
        prev_owner: Address,
        owner: Address,
        threshold: Threshold,
    },
    AddOwnerWithThreshold {
        owner: Address,
        threshold: Threshold,
    },
    ChangeThreshold {
        threshold: Threshold,
    },
}

impl SafeCall {
    pub fn method_name(&self) -> &'static str {
        match self {
            SafeCall::SwapOwner { .. } => METHOD_SWAP_OWNER,
            SafeCall::RemoveOwner { .. } => METHOD_REMOVE_OWNER,
            SafeCall::AddOwnerWithThreshold { .. } => METHOD_ADD_OWNER,
            SafeCall::ChangeThreshold { .. } => METHOD_CHANGE_THRESHOLD,
        }
    }

    fn inputs(&self) -> Vec<(ContractInput, String)> {
        match *self {
            SafeCall::SwapOwner {
                prev_owner,
                old_owner,
                new_owner,
            } => vec![
                (ContractInput::address(ARG_PREV_OWNER), prev_owner.to_checksum()),
                (ContractInput::address(ARG_OLD_OWNER), old_owner.to_checksum()),
                (ContractInput::address(ARG_NEW_OWNER), new_owner.to_checksum()),
            ],
            SafeCall::RemoveOwner {
                prev_owner,
                owner,
                threshold,
            } => vec![
                (ContractInput::address(ARG_PREV_OWNER), prev_owner.to_checksum()),
                (ContractInput::address(ARG_OWNER), owner.to_checksum()),
                (ContractInput::uint256(ARG_THRESHOLD), threshold.to_string()),
            ],
            SafeCall::AddOwnerWithThreshold { owner, threshold } => vec![
                (ContractInput::address(ARG_OWNER), owner.to_checksum()),
                (ContractInput::uint256(ARG_THRESHOLD), threshold.to_string()),
            ],
            SafeCall::ChangeThreshold { threshold } => {
                vec![(ContractInput::uint256(ARG_THRESHOLD), threshold.to_string())]
            }
        }
    }

    /// Build the descriptor targeting the multisig at `safe`
    pub fn to_descriptor(&self, safe: Address) -> TransactionDescriptor {
        let (inputs, values): (Vec<_>, Vec<_>) = self
            .inputs()
            .into_iter()
            .map(|(input, value)| {
                let name = input.name.clone();
                (input, (name, value))
            })
            .unzip();

        TransactionDescriptor {
            to: safe,
            value: "0".into(),
            data: None,
            contract_method: ContractMethod {
                inputs,
                name: self.method_name().into(),
                payable: false,
            },
            contract_inputs_values: values.into_iter().collect(),
        }
    }

    /// Decode a descriptor back into a call
    pub fn from_descriptor(tx: &TransactionDescriptor) -> QuorumResult<Self> {
        let values = &tx.contract_inputs_values;
        let method = tx.contract_method.name.as_str();

        let call = match method {
            METHOD_SWAP_OWNER => SafeCall::SwapOwner {
                prev_owner: address_arg(values, ARG_PREV_OWNER)?,
                old_owner: address_arg(values, ARG_OLD_OWNER)?,
                new_owner: address_arg(values, ARG_NEW_OWNER)?,
            },
            METHOD_REMOVE_OWNER => SafeCall::RemoveOwner {
                prev_owner: address_arg(values, ARG_PREV_OWNER)?,
                owner: address_arg(values, ARG_OWNER)?,
                threshold: threshold_arg(values)?,
            },
            METHOD_ADD_OWNER => SafeCall::AddOwnerWithThreshold {
                owner: address_arg(values, ARG_OWNER)?,
                threshold: threshold_arg(values)?,
            },
            METHOD_CHANGE_THRESHOLD => SafeCall::ChangeThreshold {
                threshold: threshold_arg(values)?,
            },
            other => {
                return Err(QuorumError::MalformedBatch(format!(
                    "unknown method {other}"
                )))
            }
        };

        if call.to_descriptor(tx.to) != *tx {
            return Err(QuorumError::MalformedBatch(format!(
                "{method} descriptor does not match its canonical form"
            )));
        }
        Ok(call)
    }
}

fn raw_arg<'a>(values: &'a BTreeMap<String, String>, name: &str) -> QuorumResult<&'a str> {
    values
        .get(name)
        .map(String::as_str)
        .ok_or_else(|| QuorumError::MalformedBatch(format!("missing argument {name}")))
}

fn address_arg(values: &BTreeMap<String, String>, name: &str) -> QuorumResult<Address> {
    Address::parse(raw_arg(values, name)?)
}

fn threshold_arg(values: &BTreeMap<String, String>) -> QuorumResult<Threshold> {
    let raw = raw_arg(values, ARG_THRESHOLD)?;
    raw.parse::<u64>()
        .map(Threshold::new)
        .map_err(|_| QuorumError::MalformedBatch(format!("bad threshold {raw}")))
}
