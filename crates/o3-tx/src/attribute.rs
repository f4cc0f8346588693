//! Transaction attributes.
//!
//! Each attribute is a usage tag followed by either a fixed-size payload or
//! a length-prefixed one, depending on the tag.

use crate::TxError;
use o3_types::codec::{write_var_bytes, write_var_int, ByteReader};
use o3_types::constants::{HASH_SIZE, SCRIPT_HASH_SIZE};
use o3_types::ScriptHash;

/// Remark attached to every GAS claim.
pub const CLAIM_REMARK: &str = "O3XCLAIM";

/// Prefix of the per-transaction uniqueness remark.
pub const REMARK_PREFIX: &str = "O3X";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeUsage {
    ContractHash,
    Ecdh02,
    Ecdh03,
    Script,
    Vote,
    DescriptionUrl,
    Description,
    /// `Hash1` ..= `Hash15`.
    Hash(u8),
    /// `Remark` (0) ..= `Remark15`.
    Remark(u8),
}

impl AttributeUsage {
    pub fn tag(self) -> u8 {
        match self {
            AttributeUsage::ContractHash => 0x00,
            AttributeUsage::Ecdh02 => 0x02,
            AttributeUsage::Ecdh03 => 0x03,
            AttributeUsage::Script => 0x20,
            AttributeUsage::Vote => 0x30,
            AttributeUsage::DescriptionUrl => 0x81,
            AttributeUsage::Description => 0x90,
            AttributeUsage::Hash(n) => 0xa0u8.wrapping_add(n),
            AttributeUsage::Remark(n) => 0xf0u8.wrapping_add(n),
        }
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        let usage = match tag {
            0x00 => AttributeUsage::ContractHash,
            0x02 => AttributeUsage::Ecdh02,
            0x03 => AttributeUsage::Ecdh03,
            0x20 => AttributeUsage::Script,
            0x30 => AttributeUsage::Vote,
            0x81 => AttributeUsage::DescriptionUrl,
            0x90 => AttributeUsage::Description,
            0xa1..=0xaf => AttributeUsage::Hash(tag - 0xa0),
            0xf0..=0xff => AttributeUsage::Remark(tag - 0xf0),
            _ => return None,
        };
        Some(usage)
    }

    /// Payload size for fixed-size usages; `None` when length-prefixed.
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            AttributeUsage::Script => Some(SCRIPT_HASH_SIZE),
            AttributeUsage::ContractHash
            | AttributeUsage::Ecdh02
            | AttributeUsage::Ecdh03
            | AttributeUsage::Vote
            | AttributeUsage::Hash(_) => Some(HASH_SIZE),
            AttributeUsage::DescriptionUrl
            | AttributeUsage::Description
            | AttributeUsage::Remark(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionAttribute {
    usage: AttributeUsage,
    data: Vec<u8>,
}

impl TransactionAttribute {
    /// Validates the payload size against the usage.
    pub fn new(usage: AttributeUsage, data: Vec<u8>) -> Result<Self, TxError> {
        if AttributeUsage::from_tag(usage.tag()) != Some(usage) {
            return Err(TxError::precondition(format!(
                "attribute usage {:?} has no tag",
                usage
            )));
        }
        match usage.fixed_size() {
            Some(size) if data.len() != size => {
                return Err(TxError::precondition(format!(
                    "{:?} attribute needs {} bytes, got {}",
                    usage,
                    size,
                    data.len()
                )))
            }
            None if usage == AttributeUsage::DescriptionUrl && data.len() > 0xff => {
                return Err(TxError::precondition(
                    "description URL longer than 255 bytes",
                ))
            }
            _ => {}
        }
        Ok(Self { usage, data })
    }

    /// The sender's script hash, so the invoked contract can identify it.
    pub fn script(hash: &ScriptHash) -> Self {
        Self {
            usage: AttributeUsage::Script,
            data: hash.as_bytes().to_vec(),
        }
    }

    pub fn remark(text: impl AsRef<[u8]>) -> Self {
        Self {
            usage: AttributeUsage::Remark(0),
            data: text.as_ref().to_vec(),
        }
    }

    /// `O3X<timestamp>`; keeps otherwise identical payloads from sharing
    /// a transaction id.
    pub fn uniqueness_remark(timestamp: &str) -> Self {
        Self::remark(format!("{}{}", REMARK_PREFIX, timestamp))
    }

    pub fn claim_remark() -> Self {
        Self::remark(CLAIM_REMARK)
    }

    pub fn description(data: impl AsRef<[u8]>) -> Self {
        Self {
            usage: AttributeUsage::Description,
            data: data.as_ref().to_vec(),
        }
    }

    pub fn usage(&self) -> AttributeUsage {
        self.usage
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.push(self.usage.tag());
        match self.usage.fixed_size() {
            Some(_) => buf.extend_from_slice(&self.data),
            None if self.usage == AttributeUsage::DescriptionUrl => {
                buf.push(self.data.len() as u8);
                buf.extend_from_slice(&self.data);
            }
            None => write_var_bytes(buf, &self.data),
        }
    }

    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self, TxError> {
        let tag = reader.read_u8()?;
        let usage = AttributeUsage::from_tag(tag)
            .ok_or_else(|| TxError::Decode(format!("unknown attribute usage 0x{:02x}", tag)))?;
        let data = match usage.fixed_size() {
            Some(size) => reader.read_bytes(size)?.to_vec(),
            None if usage == AttributeUsage::DescriptionUrl => {
                let len = reader.read_u8()? as usize;
                reader.read_bytes(len)?.to_vec()
            }
            None => reader.read_var_bytes()?.to_vec(),
        };
        Ok(Self { usage, data })
    }
}

/// `{count, attribute*}`.
pub fn encode_attributes(attributes: &[TransactionAttribute]) -> Vec<u8> {
    let mut buf = Vec::new();
    write_var_int(&mut buf, attributes.len() as u64);
    for attribute in attributes {
        attribute.encode(&mut buf);
    }
    buf
}
