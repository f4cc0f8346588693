//! Byte codec for the NEO wire format.
//!
//! Fixed-width integers are little-endian. Counts and lengths use the NEO
//! variable-length integer. Hash fields travel in reversed byte order
//! relative to their displayed hex form, so the reversal helper lives here
//! alongside the hex conversions.

use crate::error::FormatError;

// ─── Encoding ───────────────────────────────────────────────────────────────

/// Encode `value` as a fixed-width little-endian integer.
///
/// `width` must be 1, 2, 4 or 8 and `value` must fit in it.
pub fn to_le_bytes(value: u64, width: usize) -> Result<Vec<u8>, FormatError> {
    if !matches!(width, 1 | 2 | 4 | 8) {
        return Err(FormatError::UnsupportedWidth(width));
    }
    if width < 8 && value >> (width * 8) != 0 {
        return Err(FormatError::ValueTooWide { value, width });
    }
    Ok(value.to_le_bytes()[..width].to_vec())
}

/// Append a variable-length integer.
///
/// `< 0xfd` is a single byte; larger values get a `0xfd`/`0xfe`/`0xff`
/// marker followed by a u16/u32/u64.
pub fn write_var_int(buf: &mut Vec<u8>, n: u64) {
    if n < 0xfd {
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(0xfd);
        buf.extend_from_slice(&(n as u16).to_le_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(0xfe);
        buf.extend_from_slice(&(n as u32).to_le_bytes());
    } else {
        buf.push(0xff);
        buf.extend_from_slice(&n.to_le_bytes());
    }
}

pub fn var_int_bytes(n: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(9);
    write_var_int(&mut buf, n);
    buf
}

/// Encoded size of a variable-length integer.
pub fn var_int_size(n: u64) -> usize {
    match n {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

/// Append `data` prefixed with its var-int length.
pub fn write_var_bytes(buf: &mut Vec<u8>, data: &[u8]) {
    write_var_int(buf, data.len() as u64);
    buf.extend_from_slice(data);
}

// ─── Hex ────────────────────────────────────────────────────────────────────

/// Decode hex, accepting an optional `0x` prefix and either case.
pub fn from_hex(s: &str) -> Result<Vec<u8>, FormatError> {
    let s = s.trim();
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex::decode(s).map_err(|e| FormatError::InvalidHex(format!("{}: {}", e, s)))
}

/// Decode hex into a fixed-size array.
pub fn from_hex_array<const N: usize>(s: &str) -> Result<[u8; N], FormatError> {
    let bytes = from_hex(s)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| FormatError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        })
}

/// Lowercase hex rendering.
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

pub fn reversed(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().rev().copied().collect()
}

// ─── Decoding ───────────────────────────────────────────────────────────────

/// Forward-only cursor over a byte slice.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrow the next `n` bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], FormatError> {
        if n > self.remaining() {
            return Err(FormatError::UnexpectedEof {
                need: n,
                remaining: self.remaining(),
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], FormatError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, FormatError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, FormatError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, FormatError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    pub fn read_var_int(&mut self) -> Result<u64, FormatError> {
        match self.read_u8()? {
            0xfd => Ok(self.read_u16_le()? as u64),
            0xfe => Ok(self.read_u32_le()? as u64),
            0xff => self.read_u64_le(),
            n => Ok(n as u64),
        }
    }

    pub fn read_var_bytes(&mut self) -> Result<&'a [u8], FormatError> {
        let len = self.read_var_int()?;
        let len = usize::try_from(len).map_err(|_| FormatError::UnexpectedEof {
            need: usize::MAX,
            remaining: self.remaining(),
        })?;
        self.read_bytes(len)
    }

    /// Everything not yet consumed.
    pub fn rest(&mut self) -> &'a [u8] {
        let out = &self.data[self.pos..];
        self.pos = self.data.len();
        out
    }
}
