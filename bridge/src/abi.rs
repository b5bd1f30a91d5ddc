//! Solidity ABI head/tail encoding for the subset of types the bridge
//! payloads use: `uint256`, `bytes32`, `bytes`, dynamic arrays and tuples.
//!
//! Decoding is schema-driven: the caller describes the expected layout with
//! [`AbiKind`] and every offset and length is bounds-checked, so malformed
//! input surfaces as `MalformedPayload` instead of a panic.

use cosmwasm_std::Uint256;

use crate::error::ContractError;

pub const WORD: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    Uint(Uint256),
    FixedBytes([u8; 32]),
    Bytes(Vec<u8>),
    Array(Vec<AbiValue>),
    Tuple(Vec<AbiValue>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiKind {
    Uint,
    FixedBytes,
    Bytes,
    Array(Box<AbiKind>),
    Tuple(Vec<AbiKind>),
}

impl AbiKind {
    fn is_dynamic(&self) -> bool {
        match self {
            AbiKind::Bytes | AbiKind::Array(_) => true,
            AbiKind::Tuple(kinds) => kinds.iter().any(AbiKind::is_dynamic),
            AbiKind::Uint | AbiKind::FixedBytes => false,
        }
    }

    /// Bytes this kind occupies in the head of its enclosing sequence
    fn head_size(&self) -> usize {
        match self {
            AbiKind::Tuple(kinds) if !self.is_dynamic() => {
                kinds.iter().map(AbiKind::head_size).sum()
            }
            _ => WORD,
        }
    }
}

impl AbiValue {
    fn is_dynamic(&self) -> bool {
        match self {
            AbiValue::Bytes(_) | AbiValue::Array(_) => true,
            AbiValue::Tuple(values) => values.iter().any(AbiValue::is_dynamic),
            AbiValue::Uint(_) | AbiValue::FixedBytes(_) => false,
        }
    }

    fn head_size(&self) -> usize {
        match self {
            AbiValue::Tuple(values) if !self.is_dynamic() => {
                values.iter().map(AbiValue::head_size).sum()
            }
            _ => WORD,
        }
    }

    pub fn into_uint(self) -> Result<Uint256, ContractError> {
        match self {
            AbiValue::Uint(value) => Ok(value),
            other => Err(unexpected("uint256", &other)),
        }
    }

    pub fn into_fixed_bytes(self) -> Result<[u8; 32], ContractError> {
        match self {
            AbiValue::FixedBytes(value) => Ok(value),
            other => Err(unexpected("bytes32", &other)),
        }
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, ContractError> {
        match self {
            AbiValue::Bytes(value) => Ok(value),
            other => Err(unexpected("bytes", &other)),
        }
    }

    pub fn into_array(self) -> Result<Vec<AbiValue>, ContractError> {
        match self {
            AbiValue::Array(values) => Ok(values),
            other => Err(unexpected("array", &other)),
        }
    }

    pub fn into_tuple(self) -> Result<Vec<AbiValue>, ContractError> {
        match self {
            AbiValue::Tuple(values) => Ok(values),
            other => Err(unexpected("tuple", &other)),
        }
    }
}

fn unexpected(expected: &str, got: &AbiValue) -> ContractError {
    ContractError::malformed(format!("expected {}, got {:?}", expected, got))
}

// ============================================================================
// Encoding
// ============================================================================

/// `abi.encode(values...)`
pub fn encode(values: &[AbiValue]) -> Vec<u8> {
    encode_sequence(values)
}

fn encode_sequence(values: &[AbiValue]) -> Vec<u8> {
    let head_len: usize = values.iter().map(AbiValue::head_size).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for value in values {
        if value.is_dynamic() {
            head.extend_from_slice(&usize_word(head_len + tail.len()));
            tail.extend(encode_value(value));
        } else {
            head.extend(encode_value(value));
        }
    }

    head.extend(tail);
    head
}

fn encode_value(value: &AbiValue) -> Vec<u8> {
    match value {
        AbiValue::Uint(v) => v.to_be_bytes().to_vec(),
        AbiValue::FixedBytes(b) => b.to_vec(),
        AbiValue::Bytes(b) => {
            let mut out = usize_word(b.len()).to_vec();
            out.extend_from_slice(b);
            out.resize(WORD + padded_len(b.len()), 0);
            out
        }
        AbiValue::Array(items) => {
            let mut out = usize_word(items.len()).to_vec();
            out.extend(encode_sequence(items));
            out
        }
        AbiValue::Tuple(items) => encode_sequence(items),
    }
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(WORD) * WORD
}

/// Left-padded big-endian word holding `value`
pub fn u64_word(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

fn usize_word(value: usize) -> [u8; 32] {
    u64_word(value as u64)
}

// ============================================================================
// Decoding
// ============================================================================

/// `abi.decode(data, (kinds...))`
pub fn decode(data: &[u8], kinds: &[AbiKind]) -> Result<Vec<AbiValue>, ContractError> {
    decode_sequence(data, 0, kinds)
}

fn decode_sequence(
    data: &[u8],
    base: usize,
    kinds: &[AbiKind],
) -> Result<Vec<AbiValue>, ContractError> {
    let mut values = Vec::with_capacity(kinds.len());
    let mut cursor = base;

    for kind in kinds {
        let value = if kind.is_dynamic() {
            let offset = read_usize(data, cursor)?;
            let start = base
                .checked_add(offset)
                .ok_or_else(|| ContractError::malformed("offset overflows"))?;
            decode_value(data, start, kind)?
        } else {
            decode_value(data, cursor, kind)?
        };
        values.push(value);
        cursor += kind.head_size();
    }

    Ok(values)
}

fn decode_value(data: &[u8], at: usize, kind: &AbiKind) -> Result<AbiValue, ContractError> {
    match kind {
        AbiKind::Uint => Ok(AbiValue::Uint(Uint256::from_be_bytes(read_word(data, at)?))),
        AbiKind::FixedBytes => Ok(AbiValue::FixedBytes(read_word(data, at)?)),
        AbiKind::Bytes => {
            let len = read_usize(data, at)?;
            let start = at + WORD;
            let bytes = slice(data, start, len)?;
            Ok(AbiValue::Bytes(bytes.to_vec()))
        }
        AbiKind::Array(inner) => {
            let len = read_usize(data, at)?;
            // Every element needs at least one head word
            if len > data.len().saturating_sub(at + WORD) / WORD {
                return Err(ContractError::malformed(format!(
                    "array length {} exceeds payload",
                    len
                )));
            }
            let kinds = vec![(**inner).clone(); len];
            decode_sequence(data, at + WORD, &kinds).map(AbiValue::Array)
        }
        AbiKind::Tuple(kinds) => decode_sequence(data, at, kinds).map(AbiValue::Tuple),
    }
}

/// Bounds-checked `data[start..start + len]`
pub fn slice(data: &[u8], start: usize, len: usize) -> Result<&[u8], ContractError> {
    let end = start
        .checked_add(len)
        .ok_or_else(|| ContractError::malformed("length overflows"))?;
    data.get(start..end).ok_or_else(|| {
        ContractError::malformed(format!(
            "need {} bytes at offset {}, payload has {}",
            len,
            start,
            data.len()
        ))
    })
}

pub fn read_word(data: &[u8], at: usize) -> Result<[u8; 32], ContractError> {
    let mut word = [0u8; 32];
    word.copy_from_slice(slice(data, at, WORD)?);
    Ok(word)
}

/// Word that must hold a small integer (offsets, lengths, gas)
pub fn read_u64(data: &[u8], at: usize) -> Result<u64, ContractError> {
    let word = read_word(data, at)?;
    if word[..24].iter().any(|b| *b != 0) {
        return Err(ContractError::malformed(format!(
            "word at offset {} does not fit in 64 bits",
            at
        )));
    }
    let mut low = [0u8; 8];
    low.copy_from_slice(&word[24..]);
    Ok(u64::from_be_bytes(low))
}

pub fn read_usize(data: &[u8], at: usize) -> Result<usize, ContractError> {
    let value = read_u64(data, at)?;
    usize::try_from(value).map_err(|_| ContractError::malformed("length does not fit usize"))
}
