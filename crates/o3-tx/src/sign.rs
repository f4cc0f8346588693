//! Signing, witness attachment and transaction ids.
//!
//! The witness for a single-signature account is laid out as:
//!
//! ```text
//! 0x01            witness count
//! 0x41            invocation script length
//! 0x40 sig[64]    PUSHBYTES64 signature
//! 0x23            verification script length
//! 0x21 key[33]    PUSHBYTES33 compressed public key
//! 0xac            CHECKSIG
//! ```

use crate::builder::TransferContext;
use crate::types::UnsignedTransaction;
use crate::TxError;
use o3_crypto::hash256;
use o3_crypto::keys::{public_key_to_script_hash, verification_script};
use o3_crypto::TransactionSigner;
use o3_types::codec::to_hex;
use o3_types::constants::{PUBLIC_KEY_SIZE, SIGNATURE_SIZE};
use o3_types::UInt256;

pub const WITNESS_COUNT: u8 = 0x01;
pub const INVOCATION_SCRIPT_LEN: u8 = 0x41;
pub const PUSH_SIGNATURE: u8 = 0x40;
pub const VERIFICATION_SCRIPT_LEN: u8 = 0x23;

/// Size of the single-signature witness block.
pub const WITNESS_SIZE: usize = 3 + SIGNATURE_SIZE + 2 + PUBLIC_KEY_SIZE + 1;

/// A network-ready transaction. Ownership passes to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub txid: UInt256,
    pub payload: Vec<u8>,
}

impl SignedTransaction {
    pub fn to_hex(&self) -> String {
        to_hex(&self.payload)
    }
}

/// Sign the unsigned payload through the signing capability.
pub fn sign(unsigned: &[u8], signer: &dyn TransactionSigner) -> Result<[u8; SIGNATURE_SIZE], TxError> {
    Ok(signer.sign(unsigned)?)
}

/// Append the witness to `unsigned`.
pub fn finalize(
    unsigned: &[u8],
    signature: &[u8; SIGNATURE_SIZE],
    public_key: &[u8; PUBLIC_KEY_SIZE],
) -> SignedTransaction {
    let mut payload = Vec::with_capacity(unsigned.len() + WITNESS_SIZE);
    payload.extend_from_slice(unsigned);
    payload.push(WITNESS_COUNT);
    payload.push(INVOCATION_SCRIPT_LEN);
    payload.push(PUSH_SIGNATURE);
    payload.extend_from_slice(signature);
    payload.push(VERIFICATION_SCRIPT_LEN);
    payload.extend_from_slice(&verification_script(public_key));
    SignedTransaction {
        txid: compute_transaction_id(unsigned),
        payload,
    }
}

/// `reverse(sha256(sha256(unsigned)))`, i.e. the hash in display order.
pub fn compute_transaction_id(unsigned: &[u8]) -> UInt256 {
    UInt256::from_wire(hash256(unsigned))
}

/// Serialize, sign and finalize `tx` for the context's sender.
pub fn sign_transaction(
    ctx: &TransferContext,
    tx: &UnsignedTransaction,
    signer: &dyn TransactionSigner,
) -> Result<SignedTransaction, TxError> {
    let public_key = signer.public_key();
    if public_key_to_script_hash(&public_key) != ctx.sender {
        return Err(TxError::precondition(format!(
            "signer key does not belong to sender {}",
            ctx.sender.to_address()
        )));
    }
    let unsigned = tx.to_bytes()?;
    let signature = sign(&unsigned, signer)?;
    let signed = finalize(&unsigned, &signature, &public_key);
    log::debug!("signed {} ({} bytes)", signed.txid, signed.payload.len());
    Ok(signed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use o3_crypto::{KeyMaterial, SigningError};

    struct FixedSigner {
        public_key: [u8; PUBLIC_KEY_SIZE],
    }

    impl TransactionSigner for FixedSigner {
        fn public_key(&self) -> [u8; PUBLIC_KEY_SIZE] {
            self.public_key
        }

        fn sign(&self, _message: &[u8]) -> Result<[u8; SIGNATURE_SIZE], SigningError> {
            Ok([0x5a; SIGNATURE_SIZE])
        }
    }

    struct FailingSigner;

    impl TransactionSigner for FailingSigner {
        fn public_key(&self) -> [u8; PUBLIC_KEY_SIZE] {
            [0x02; PUBLIC_KEY_SIZE]
        }

        fn sign(&self, _message: &[u8]) -> Result<[u8; SIGNATURE_SIZE], SigningError> {
            Err(SigningError::KeyUnavailable("locked".into()))
        }
    }

    #[test]
    fn test_witness_layout() {
        let signature = [0x5a; SIGNATURE_SIZE];
        let mut public_key = [0x77; PUBLIC_KEY_SIZE];
        public_key[0] = 0x02;
        let signed = finalize(&[0x80, 0x00, 0x00, 0x00, 0x00], &signature, &public_key);

        let witness = &signed.payload[5..];
        assert_eq!(witness.len(), WITNESS_SIZE);
        assert_eq!(&witness[..3], &[0x01, 0x41, 0x40]);
        assert_eq!(&witness[3..67], &signature[..]);
        assert_eq!(&witness[67..69], &[0x23, 0x21]);
        assert_eq!(&witness[69..102], &public_key[..]);
        assert_eq!(witness[102], 0xac);
    }

    #[test]
    fn test_transaction_id_is_reversed_double_sha() {
        let unsigned = [0x80, 0x00, 0x00, 0x00, 0x00];
        let id = compute_transaction_id(&unsigned);
        let mut expected = hash256(&unsigned);
        expected.reverse();
        assert_eq!(id.as_bytes(), &expected);
    }

    #[test]
    fn test_txid_ignores_witness() {
        let unsigned = [0x80, 0x00, 0x00, 0x00, 0x00];
        let a = finalize(&unsigned, &[1; 64], &[2; 33]);
        let b = finalize(&unsigned, &[3; 64], &[2; 33]);
        assert_eq!(a.txid, b.txid);
        assert_ne!(a.payload, b.payload);
    }

    #[test]
    fn test_signing_error_propagates() {
        let ctx = TransferContext::new(public_key_to_script_hash(&[0x02; PUBLIC_KEY_SIZE]));
        let tx = UnsignedTransaction {
            kind: crate::types::TransactionKind::Contract,
            attributes: vec![],
            inputs: vec![],
            outputs: vec![],
        };
        assert!(matches!(
            sign_transaction(&ctx, &tx, &FailingSigner),
            Err(TxError::Signing(SigningError::KeyUnavailable(_)))
        ));
    }

    #[test]
    fn test_signer_must_match_sender() {
        let key = KeyMaterial::generate();
        let ctx = TransferContext::new(public_key_to_script_hash(&[0x03; PUBLIC_KEY_SIZE]));
        let tx = UnsignedTransaction {
            kind: crate::types::TransactionKind::Contract,
            attributes: vec![],
            inputs: vec![],
            outputs: vec![],
        };
        assert!(matches!(
            sign_transaction(&ctx, &tx, &key),
            Err(TxError::PreconditionViolation(_))
        ));

        let signer = FixedSigner {
            public_key: *key.public_key(),
        };
        let ctx = TransferContext::new(key.script_hash());
        let signed = sign_transaction(&ctx, &tx, &signer).unwrap();
        assert_eq!(signed.payload.len(), 5 + WITNESS_SIZE);
    }
}
