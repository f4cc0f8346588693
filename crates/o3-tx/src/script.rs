//! NEO VM invocation script builder.
//!
//! Arguments are pushed last-to-first so the invoked contract pops them in
//! the order the caller supplied. Integers use the small-int opcodes when
//! possible and minimal two's-complement little-endian bytes otherwise.

use crate::TxError;
use o3_types::codec::{from_hex, write_var_bytes};
use o3_types::{parse_address, ScriptHash, UInt256};
use serde::{Deserialize, Serialize};

pub mod opcode {
    pub const PUSH0: u8 = 0x00;
    pub const PUSHBYTES75: u8 = 0x4b;
    pub const PUSHDATA1: u8 = 0x4c;
    pub const PUSHDATA2: u8 = 0x4d;
    pub const PUSHDATA4: u8 = 0x4e;
    pub const PUSHM1: u8 = 0x4f;
    pub const PUSH1: u8 = 0x51;
    pub const PUSH16: u8 = 0x60;
    pub const APPCALL: u8 = 0x67;
    pub const TAILCALL: u8 = 0x69;
    pub const PACK: u8 = 0xc1;
    pub const CHECKSIG: u8 = 0xac;
}

/// A typed contract argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractArg {
    Integer(i128),
    Boolean(bool),
    String(String),
    ByteArray(Vec<u8>),
    /// Contract or account hash, pushed in wire order.
    Hash160(ScriptHash),
    Hash256(UInt256),
    /// Account given as an address; pushed as its script hash.
    Address(ScriptHash),
    Array(Vec<ContractArg>),
}

/// dApp-style `{ "type": ..., "value": ... }` argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedArg {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: serde_json::Value,
}

impl ContractArg {
    /// Interpret a typed argument. Type names are case-insensitive.
    pub fn from_typed(kind: &str, value: &serde_json::Value) -> Result<ContractArg, TxError> {
        use serde_json::Value;

        let shape_error = || TxError::UnsupportedArgumentType(format!("{} value {}", kind, value));

        let arg = match kind.to_ascii_lowercase().as_str() {
            "string" => ContractArg::String(value.as_str().ok_or_else(shape_error)?.to_string()),
            "boolean" | "bool" => match value {
                Value::Bool(b) => ContractArg::Boolean(*b),
                Value::String(s) if s.eq_ignore_ascii_case("true") => ContractArg::Boolean(true),
                Value::String(s) if s.eq_ignore_ascii_case("false") => ContractArg::Boolean(false),
                _ => return Err(shape_error()),
            },
            "integer" => {
                let parsed = match value {
                    Value::Number(n) => n
                        .as_i64()
                        .map(i128::from)
                        .or_else(|| n.as_u64().map(i128::from)),
                    Value::String(s) => s.trim().parse::<i128>().ok(),
                    _ => None,
                };
                ContractArg::Integer(parsed.ok_or_else(shape_error)?)
            }
            "bytearray" => ContractArg::ByteArray(from_hex(value.as_str().ok_or_else(shape_error)?)?),
            "hash160" => ContractArg::Hash160(ScriptHash::from_display_hex(
                value.as_str().ok_or_else(shape_error)?,
            )?),
            "hash256" => {
                ContractArg::Hash256(UInt256::from_hex(value.as_str().ok_or_else(shape_error)?)?)
            }
            "address" => ContractArg::Address(parse_address(value.as_str().ok_or_else(shape_error)?)?),
            "array" => {
                let items: Vec<TypedArg> =
                    serde_json::from_value(value.clone()).map_err(|_| shape_error())?;
                ContractArg::Array(
                    items
                        .iter()
                        .map(ContractArg::try_from)
                        .collect::<Result<_, _>>()?,
                )
            }
            _ => return Err(TxError::UnsupportedArgumentType(kind.to_string())),
        };
        Ok(arg)
    }

    /// Parse a JSON array of typed arguments.
    pub fn parse_typed_list(json: &str) -> Result<Vec<ContractArg>, TxError> {
        let items: Vec<TypedArg> = serde_json::from_str(json)
            .map_err(|e| TxError::UnsupportedArgumentType(format!("argument list: {}", e)))?;
        items.iter().map(ContractArg::try_from).collect()
    }
}

impl TryFrom<&TypedArg> for ContractArg {
    type Error = TxError;

    fn try_from(arg: &TypedArg) -> Result<Self, Self::Error> {
        ContractArg::from_typed(&arg.kind, &arg.value)
    }
}

/// Minimal two's-complement little-endian encoding of `n`.
pub fn integer_bytes(n: i128) -> Vec<u8> {
    if n == 0 {
        return Vec::new();
    }
    let mut bytes = n.to_le_bytes().to_vec();
    while bytes.len() > 1 {
        let last = bytes[bytes.len() - 1];
        let sign_bit = bytes[bytes.len() - 2] & 0x80;
        if (last == 0x00 && sign_bit == 0) || (last == 0xff && sign_bit != 0) {
            bytes.pop();
        } else {
            break;
        }
    }
    bytes
}

#[derive(Debug, Default, Clone)]
pub struct ScriptBuilder {
    script: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, op: u8) -> &mut Self {
        self.script.push(op);
        self
    }

    pub fn push_int(&mut self, n: i128) -> &mut Self {
        match n {
            -1 => self.emit(opcode::PUSHM1),
            0 => self.emit(opcode::PUSH0),
            1..=16 => self.emit(opcode::PUSH1 - 1 + n as u8),
            _ => self.push_data(&integer_bytes(n)),
        }
    }

    pub fn push_bool(&mut self, value: bool) -> &mut Self {
        self.emit(if value { opcode::PUSH1 } else { opcode::PUSH0 })
    }

    /// Push raw bytes with the shortest length prefix for their size.
    pub fn push_data(&mut self, data: &[u8]) -> &mut Self {
        let len = data.len();
        if len <= opcode::PUSHBYTES75 as usize {
            self.script.push(len as u8);
        } else if len <= 0xff {
            self.script.push(opcode::PUSHDATA1);
            self.script.push(len as u8);
        } else if len <= 0xffff {
            self.script.push(opcode::PUSHDATA2);
            self.script.extend_from_slice(&(len as u16).to_le_bytes());
        } else {
            self.script.push(opcode::PUSHDATA4);
            self.script.extend_from_slice(&(len as u32).to_le_bytes());
        }
        self.script.extend_from_slice(data);
        self
    }

    pub fn push_argument(&mut self, arg: &ContractArg) -> &mut Self {
        match arg {
            ContractArg::Integer(n) => self.push_int(*n),
            ContractArg::Boolean(b) => self.push_bool(*b),
            ContractArg::String(s) => self.push_data(s.as_bytes()),
            ContractArg::ByteArray(bytes) => self.push_data(bytes),
            ContractArg::Hash160(hash) | ContractArg::Address(hash) => self.push_script_hash(hash),
            ContractArg::Hash256(hash) => self.push_data(&hash.to_wire()),
            ContractArg::Array(items) => {
                for item in items.iter().rev() {
                    self.push_argument(item);
                }
                self.push_int(items.len() as i128);
                self.emit(opcode::PACK)
            }
        }
    }

    pub fn push_operation_name(&mut self, operation: &str) -> &mut Self {
        self.push_data(operation.as_bytes())
    }

    pub fn push_script_hash(&mut self, hash: &ScriptHash) -> &mut Self {
        self.push_data(hash.as_bytes())
    }

    /// `APPCALL` followed by the contract hash in wire order.
    pub fn invoke(&mut self, contract: &ScriptHash) -> &mut Self {
        self.emit(opcode::APPCALL);
        self.script.extend_from_slice(contract.as_bytes());
        self
    }

    pub fn tail_call(&mut self, contract: &ScriptHash) -> &mut Self {
        self.emit(opcode::TAILCALL);
        self.script.extend_from_slice(contract.as_bytes());
        self
    }

    /// Push `args` as a packed array, then `operation`, then call `contract`.
    pub fn contract_invoke(
        &mut self,
        contract: &ScriptHash,
        operation: &str,
        args: &[ContractArg],
    ) -> &mut Self {
        self.push_argument(&ContractArg::Array(args.to_vec()));
        self.push_operation_name(operation);
        self.invoke(contract)
    }

    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.script.clone()
    }

    /// Script prefixed with its var-int length, as embedded in an
    /// invocation transaction.
    pub fn to_embedded(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.script.len() + 3);
        write_var_bytes(&mut out, &self.script);
        out
    }
}
