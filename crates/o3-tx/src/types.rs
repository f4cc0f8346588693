//! Transaction structures and their wire serialization.

use crate::attribute::{encode_attributes, TransactionAttribute};
use crate::TxError;
use o3_types::codec::{write_var_bytes, write_var_int};
use o3_types::constants::{tx_type, FIXED8_DECIMALS, TX_VERSION};
use o3_types::{Amount, AssetKind, ScriptHash, SpendableOutput, UInt256};
use std::collections::{HashMap, HashSet};

/// Reference to a previous output: spent as an input, or claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionInput {
    pub prev_hash: UInt256,
    pub prev_index: u16,
}

impl TransactionInput {
    pub fn new(prev_hash: UInt256, prev_index: u16) -> Self {
        Self {
            prev_hash,
            prev_index,
        }
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.prev_hash.to_wire());
        buf.extend_from_slice(&self.prev_index.to_le_bytes());
    }
}

impl From<&SpendableOutput> for TransactionInput {
    fn from(output: &SpendableOutput) -> Self {
        Self::new(output.txid, output.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutput {
    pub asset_id: UInt256,
    pub value: Amount,
    pub script_hash: ScriptHash,
}

impl TransactionOutput {
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.asset_id.to_wire());
        buf.extend_from_slice(&self.value.units().to_le_bytes());
        buf.extend_from_slice(self.script_hash.as_bytes());
    }
}

/// Transaction type together with its type-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionKind {
    /// Plain asset transfer.
    Contract,
    /// GAS claim over previously spent NEO outputs.
    Claim { claims: Vec<TransactionInput> },
    /// Contract invocation carrying a VM script.
    Invocation { script: Vec<u8> },
}

impl TransactionKind {
    pub fn type_byte(&self) -> u8 {
        match self {
            TransactionKind::Contract => tx_type::CONTRACT,
            TransactionKind::Claim { .. } => tx_type::CLAIM,
            TransactionKind::Invocation { .. } => tx_type::INVOCATION,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransactionKind::Contract => "ContractTransaction",
            TransactionKind::Claim { .. } => "ClaimTransaction",
            TransactionKind::Invocation { .. } => "InvocationTransaction",
        }
    }
}

/// An assembled transaction before its witness is attached.
///
/// Built once by the assembler and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    pub kind: TransactionKind,
    pub attributes: Vec<TransactionAttribute>,
    pub inputs: Vec<TransactionInput>,
    pub outputs: Vec<TransactionOutput>,
}

impl UnsignedTransaction {
    /// Check the structural invariants the wire format relies on.
    pub fn validate(&self) -> Result<(), TxError> {
        match &self.kind {
            TransactionKind::Claim { claims } if claims.is_empty() => {
                return Err(TxError::precondition("claim transaction without claims"));
            }
            TransactionKind::Invocation { script } if script.is_empty() => {
                return Err(TxError::precondition("invocation transaction without script"));
            }
            _ => {}
        }

        let mut seen = HashSet::new();
        for input in &self.inputs {
            if !seen.insert(input) {
                return Err(TxError::precondition(format!(
                    "input {}:{} spent twice",
                    input.prev_hash, input.prev_index
                )));
            }
        }

        let mut per_asset: HashMap<UInt256, usize> = HashMap::new();
        for output in &self.outputs {
            if output.value.decimals() != FIXED8_DECIMALS {
                return Err(TxError::precondition(format!(
                    "output value {} is not fixed-8",
                    output.value
                )));
            }
            let count = per_asset.entry(output.asset_id).or_default();
            *count += 1;
            if *count > 2 {
                let symbol = AssetKind::from_asset_id(&output.asset_id)
                    .map(|a| a.symbol().to_string())
                    .unwrap_or_else(|| output.asset_id.to_hex());
                return Err(TxError::precondition(format!(
                    "more than two {} outputs",
                    symbol
                )));
            }
        }
        Ok(())
    }

    /// Serialize to the bytes that are signed and hashed.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TxError> {
        self.validate()?;

        let mut buf = Vec::with_capacity(
            64 + self.inputs.len() * 34 + self.outputs.len() * 60,
        );
        buf.push(self.kind.type_byte());
        buf.push(TX_VERSION);

        match &self.kind {
            TransactionKind::Contract => {}
            TransactionKind::Claim { claims } => {
                write_var_int(&mut buf, claims.len() as u64);
                for claim in claims {
                    claim.encode(&mut buf);
                }
            }
            TransactionKind::Invocation { script } => write_var_bytes(&mut buf, script),
        }

        buf.extend_from_slice(&encode_attributes(&self.attributes));

        write_var_int(&mut buf, self.inputs.len() as u64);
        for input in &self.inputs {
            input.encode(&mut buf);
        }

        write_var_int(&mut buf, self.outputs.len() as u64);
        for output in &self.outputs {
            output.encode(&mut buf);
        }

        log::debug!(
            "{}: {} attributes, {} inputs, {} outputs, {} bytes",
            self.kind.name(),
            self.attributes.len(),
            self.inputs.len(),
            self.outputs.len(),
            buf.len()
        );
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use o3_types::constants::GAS_ASSET_ID;

    fn make_output(units: u64) -> TransactionOutput {
        TransactionOutput {
            asset_id: UInt256::from_hex(GAS_ASSET_ID).unwrap(),
            value: Amount::from_units(units, 8),
            script_hash: ScriptHash::from_bytes([0x33; 20]),
        }
    }

    fn make_input(n: u8) -> TransactionInput {
        TransactionInput::new(UInt256::from_display_bytes([n; 32]), n as u16)
    }

    #[test]
    fn test_contract_prefix_and_empty_blocks() {
        let tx = UnsignedTransaction {
            kind: TransactionKind::Contract,
            attributes: vec![],
            inputs: vec![],
            outputs: vec![],
        };
        assert_eq!(tx.to_bytes().unwrap(), vec![0x80, 0x00, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_output_encoding() {
        let mut buf = Vec::new();
        make_output(100_000_000).encode(&mut buf);
        assert_eq!(buf.len(), 60);
        assert_eq!(buf[0], 0xe7);
        assert_eq!(&buf[32..40], &[0x00, 0xe1, 0xf5, 0x05, 0, 0, 0, 0]);
        assert_eq!(&buf[40..], &[0x33; 20]);
    }

    #[test]
    fn test_claim_block_precedes_attributes() {
        let tx = UnsignedTransaction {
            kind: TransactionKind::Claim {
                claims: vec![make_input(1)],
            },
            attributes: vec![TransactionAttribute::claim_remark()],
            inputs: vec![],
            outputs: vec![make_output(5)],
        };
        let bytes = tx.to_bytes().unwrap();
        assert_eq!(&bytes[..3], &[0x02, 0x00, 0x01]);
        assert_eq!(&bytes[35..37], &[0x01, 0x00]);
        // attribute count then remark tag
        assert_eq!(&bytes[37..39], &[0x01, 0xf0]);
    }

    #[test]
    fn test_invocation_script_precedes_attributes() {
        let tx = UnsignedTransaction {
            kind: TransactionKind::Invocation {
                script: vec![0x51, 0x52],
            },
            attributes: vec![],
            inputs: vec![],
            outputs: vec![],
        };
        assert_eq!(
            tx.to_bytes().unwrap(),
            vec![0xd1, 0x00, 0x02, 0x51, 0x52, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn test_validate_rejects_duplicates_and_excess_outputs() {
        let dup = UnsignedTransaction {
            kind: TransactionKind::Contract,
            attributes: vec![],
            inputs: vec![make_input(1), make_input(1)],
            outputs: vec![],
        };
        assert!(matches!(dup.to_bytes(), Err(TxError::PreconditionViolation(_))));

        let many = UnsignedTransaction {
            kind: TransactionKind::Contract,
            attributes: vec![],
            inputs: vec![make_input(1)],
            outputs: vec![make_output(1), make_output(2), make_output(3)],
        };
        assert!(matches!(many.validate(), Err(TxError::PreconditionViolation(_))));
    }

    #[test]
    fn test_validate_rejects_empty_claim_and_script() {
        let claim = UnsignedTransaction {
            kind: TransactionKind::Claim { claims: vec![] },
            attributes: vec![],
            inputs: vec![],
            outputs: vec![],
        };
        assert!(claim.validate().is_err());

        let invoke = UnsignedTransaction {
            kind: TransactionKind::Invocation { script: vec![] },
            attributes: vec![],
            inputs: vec![],
            outputs: vec![],
        };
        assert!(invoke.validate().is_err());
    }
}
