//! Raw transaction decoder for the transaction kinds built by this crate.

use crate::attribute::TransactionAttribute;
use crate::sign::compute_transaction_id;
use crate::types::{TransactionInput, TransactionKind, TransactionOutput, UnsignedTransaction};
use crate::TxError;
use o3_crypto::hash160;
use o3_types::codec::ByteReader;
use o3_types::constants::{tx_type, FIXED8_DECIMALS, PUBLIC_KEY_SIZE};
use o3_types::{Amount, ScriptHash, UInt256};

/// Upper bound on any decoded count; keeps garbage input from reserving
/// huge allocations.
const MAX_ITEMS: u64 = 0x10000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    pub invocation: Vec<u8>,
    pub verification: Vec<u8>,
}

impl Witness {
    /// Script hash of the account this witness unlocks.
    pub fn script_hash(&self) -> ScriptHash {
        ScriptHash::from_bytes(hash160(&self.verification))
    }

    /// Signature and public key when this is a single-signature witness.
    pub fn single_signature(&self) -> Option<(&[u8], &[u8])> {
        let sig = match self.invocation.as_slice() {
            [0x40, sig @ ..] if sig.len() == 64 => sig,
            _ => return None,
        };
        let key = match self.verification.as_slice() {
            [0x21, key @ .., 0xac] if key.len() == PUBLIC_KEY_SIZE => key,
            _ => return None,
        };
        Some((sig, key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTransaction {
    pub txid: UInt256,
    pub version: u8,
    pub transaction: UnsignedTransaction,
    /// System fee carried by version-1 invocations.
    pub invocation_gas: Option<Amount>,
    pub witnesses: Vec<Witness>,
    /// The signed portion of the payload.
    pub unsigned: Vec<u8>,
}

impl DecodedTransaction {
    /// Verify every single-signature witness against the unsigned bytes.
    ///
    /// Returns `false` if any witness has another shape or does not verify.
    pub fn verify_witnesses(&self) -> Result<bool, TxError> {
        for witness in &self.witnesses {
            let Some((sig, key)) = witness.single_signature() else {
                return Ok(false);
            };
            let valid = o3_crypto::verify(key, &self.unsigned, sig)
                .map_err(|e| TxError::Decode(e.to_string()))?;
            if !valid {
                return Ok(false);
            }
        }
        Ok(!self.witnesses.is_empty())
    }
}

fn read_count(reader: &mut ByteReader<'_>, what: &str) -> Result<usize, TxError> {
    let n = reader.read_var_int()?;
    if n > MAX_ITEMS {
        return Err(TxError::Decode(format!("{} count {} too large", what, n)));
    }
    Ok(n as usize)
}

fn read_input(reader: &mut ByteReader<'_>) -> Result<TransactionInput, TxError> {
    let prev_hash = UInt256::from_wire(reader.read_array()?);
    let prev_index = reader.read_u16_le()?;
    Ok(TransactionInput::new(prev_hash, prev_index))
}

fn read_output(reader: &mut ByteReader<'_>) -> Result<TransactionOutput, TxError> {
    let asset_id = UInt256::from_wire(reader.read_array()?);
    let value = Amount::from_units(reader.read_u64_le()?, FIXED8_DECIMALS);
    let script_hash = ScriptHash::from_bytes(reader.read_array()?);
    Ok(TransactionOutput {
        asset_id,
        value,
        script_hash,
    })
}

/// Parse a contract, claim or invocation transaction, signed or not.
pub fn decode_transaction(bytes: &[u8]) -> Result<DecodedTransaction, TxError> {
    let mut reader = ByteReader::new(bytes);
    let type_byte = reader.read_u8()?;
    let version = reader.read_u8()?;

    let mut invocation_gas = None;
    let kind = match type_byte {
        tx_type::CONTRACT => TransactionKind::Contract,
        tx_type::CLAIM => {
            let n = read_count(&mut reader, "claim")?;
            let claims = (0..n)
                .map(|_| read_input(&mut reader))
                .collect::<Result<Vec<_>, _>>()?;
            TransactionKind::Claim { claims }
        }
        tx_type::INVOCATION => {
            let script = reader.read_var_bytes()?.to_vec();
            if version >= 1 {
                invocation_gas = Some(Amount::from_units(reader.read_u64_le()?, FIXED8_DECIMALS));
            }
            TransactionKind::Invocation { script }
        }
        other => {
            return Err(TxError::Decode(format!(
                "unsupported transaction type 0x{:02x}",
                other
            )))
        }
    };

    let n = read_count(&mut reader, "attribute")?;
    let attributes = (0..n)
        .map(|_| TransactionAttribute::read(&mut reader))
        .collect::<Result<Vec<_>, _>>()?;

    let n = read_count(&mut reader, "input")?;
    let inputs = (0..n)
        .map(|_| read_input(&mut reader))
        .collect::<Result<Vec<_>, _>>()?;

    let n = read_count(&mut reader, "output")?;
    let outputs = (0..n)
        .map(|_| read_output(&mut reader))
        .collect::<Result<Vec<_>, _>>()?;

    let unsigned = bytes[..reader.position()].to_vec();

    let mut witnesses = Vec::new();
    if !reader.is_empty() {
        let n = read_count(&mut reader, "witness")?;
        for _ in 0..n {
            let invocation = reader.read_var_bytes()?.to_vec();
            let verification = reader.read_var_bytes()?.to_vec();
            witnesses.push(Witness {
                invocation,
                verification,
            });
        }
    }
    if !reader.is_empty() {
        return Err(TxError::Decode(format!(
            "{} trailing bytes",
            reader.remaining()
        )));
    }

    Ok(DecodedTransaction {
        txid: compute_transaction_id(&unsigned),
        version,
        transaction: UnsignedTransaction {
            kind,
            attributes,
            inputs,
            outputs,
        },
        invocation_gas,
        witnesses,
        unsigned,
    })
}
