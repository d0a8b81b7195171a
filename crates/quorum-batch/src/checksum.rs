//! Tamper-evident batch checksum
//!
//! The batch is rendered as compact JSON with the keys of every object sorted
//! at every depth and `meta.checksum` blanked, then hashed with SHA-256.

use serde_json::Value;
use sha2::{Digest, Sha256};

use quorum_core::{QuorumError, QuorumResult};

use crate::Batch;

/// Canonical byte form of a batch, checksum excluded
pub fn canonical_bytes(batch: &Batch) -> QuorumResult<Vec<u8>> {
    let mut value =
        serde_json::to_value(batch).map_err(|e| QuorumError::Serialization(e.to_string()))?;
    if let Some(meta) = value.get_mut("meta").and_then(Value::as_object_mut) {
        meta.insert("checksum".into(), Value::String(String::new()));
    }

    let mut out = String::new();
    write_canonical(&value, &mut out)?;
    Ok(out.into_bytes())
}

fn write_canonical(value: &Value, out: &mut String) -> QuorumResult<()> {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_scalar(&Value::String(key.clone()), out)?;
                out.push(':');
                write_canonical(&map[key], out)?;
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out)?;
            }
            out.push(']');
        }
        scalar => write_scalar(scalar, out)?,
    }
    Ok(())
}

fn write_scalar(value: &Value, out: &mut String) -> QuorumResult<()> {
    let rendered =
        serde_json::to_string(value).map_err(|e| QuorumError::Serialization(e.to_string()))?;
    out.push_str(&rendered);
    Ok(())
}

/// Compute the `0x`-prefixed checksum of a batch
pub fn compute_checksum(batch: &Batch) -> QuorumResult<String> {
    let bytes = canonical_bytes(batch)?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("0x{}", hex::encode(digest)))
}

/// Compute and store the checksum in `meta.checksum`
pub fn stamp_checksum(batch: &mut Batch) -> QuorumResult<()> {
    batch.meta.checksum = compute_checksum(batch)?;
    Ok(())
}

/// Recompute the checksum and compare it to the stored one
pub fn verify_checksum(batch: &Batch) -> QuorumResult<()> {
    let expected = compute_checksum(batch)?;
    if expected != batch.meta.checksum {
        tracing::warn!(
            expected = %expected,
            actual = %batch.meta.checksum,
            "batch checksum mismatch"
        );
        return Err(QuorumError::ChecksumMismatch {
            expected,
            actual: batch.meta.checksum.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BatchBuilder, SafeCall};
    use quorum_core::{Address, Threshold};

    fn safe() -> Address {
        Address::from_low_u64(0xabcdef)
    }

    fn sample() -> Batch {
        BatchBuilder::new("100", safe(), 42)
            .name("n")
            .transactions(vec![SafeCall::AddOwnerWithThreshold {
                owner: Address::from_low_u64(0x77),
                threshold: Threshold::new(1),
            }
            .to_descriptor(safe())])
            .build()
            .unwrap()
    }

    #[test]
    fn test_nested_keys_sorted() {
        let value = serde_json::json!({"b": {"z": 1, "a": [ {"y": true, "x": null} ]}, "a": "s"});
        let mut out = String::new();
        write_canonical(&value, &mut out).unwrap();
        assert_eq!(out, r#"{"a":"s","b":{"a":[{"x":null,"y":true}],"z":1}}"#);
    }

    #[test]
    fn test_checksum_excludes_itself() {
        let batch = sample();
        let mut blanked = batch.clone();
        blanked.meta.checksum = "0xdeadbeef".into();
        assert_eq!(
            canonical_bytes(&batch).unwrap(),
            canonical_bytes(&blanked).unwrap()
        );
        assert_eq!(compute_checksum(&blanked).unwrap(), batch.meta.checksum);
    }

    #[test]
    fn test_checksum_format() {
        let checksum = sample().meta.checksum;
        assert_eq!(checksum.len(), 2 + 64);
        assert!(checksum[2..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_verify_detects_tampering() {
        let batch = sample();
        verify_checksum(&batch).unwrap();

        let mut tampered = batch.clone();
        tampered
            .transactions[0]
            .contract_inputs_values
            .insert("_threshold".into(), "2".into());
        assert!(matches!(
            verify_checksum(&tampered),
            Err(QuorumError::ChecksumMismatch { .. })
        ));

        let mut tampered = batch;
        tampered.created_at += 1;
        assert!(verify_checksum(&tampered).is_err());
    }
}
