//! Binary payload layouts carried in deposit data and proposals
//!
//! Fungible and native transfers, non-fungible transfers and generic calls
//! use hand-packed layouts of 32-byte words and length-prefixed fields; the
//! multi-token payload and the executor message are plain ABI encodings.
//! Addresses travel as the UTF-8 bytes of their bech32 string.

use bridge_common::{Action, Message};
use cosmwasm_std::{Api, Binary, Uint128, Uint256};

use crate::abi::{self, read_u64, read_usize, read_word, slice, AbiKind, AbiValue, WORD};
use crate::error::ContractError;

// ============================================================================
// Fungible / Native Transfers
// ============================================================================

/// Gas-bounded message forwarded to the recipient executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCall {
    pub gas: u64,
    /// ABI-encoded [`Message`]
    pub message: Vec<u8>,
}

/// `amount (32) | len(recipient) (32) | recipient | [gas (32) | message]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPayload {
    pub amount: Uint256,
    pub recipient: Vec<u8>,
    pub message: Option<MessageCall>,
}

impl TransferPayload {
    pub fn decode(data: &[u8]) -> Result<Self, ContractError> {
        let amount = Uint256::from_be_bytes(read_word(data, 0)?);
        let recipient_len = read_usize(data, WORD)?;
        let recipient = slice(data, 2 * WORD, recipient_len)?.to_vec();

        let rest = &data[2 * WORD + recipient_len..];
        let message = if rest.is_empty() {
            None
        } else {
            let gas = read_u64(rest, 0)?;
            let message = rest[WORD..].to_vec();
            if message.is_empty() {
                return Err(ContractError::malformed("gas supplied without a message"));
            }
            decode_message(&message)?;
            Some(MessageCall { gas, message })
        };

        Ok(Self {
            amount,
            recipient,
            message,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = self.amount.to_be_bytes().to_vec();
        out.extend_from_slice(&abi::u64_word(self.recipient.len() as u64));
        out.extend_from_slice(&self.recipient);
        if let Some(call) = &self.message {
            out.extend_from_slice(&abi::u64_word(call.gas));
            out.extend_from_slice(&call.message);
        }
        out
    }
}

// ============================================================================
// Non-Fungible Transfers
// ============================================================================

/// `token_id (32) | len(recipient) (32) | recipient | [len(metadata) (32) | metadata]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftPayload {
    pub token_id: Uint256,
    pub recipient: Vec<u8>,
    pub metadata: Vec<u8>,
}

impl NftPayload {
    pub fn decode(data: &[u8]) -> Result<Self, ContractError> {
        let token_id = Uint256::from_be_bytes(read_word(data, 0)?);
        let recipient_len = read_usize(data, WORD)?;
        let recipient = slice(data, 2 * WORD, recipient_len)?.to_vec();

        let metadata_at = 2 * WORD + recipient_len;
        let metadata = if data.len() == metadata_at {
            vec![]
        } else {
            let metadata_len = read_usize(data, metadata_at)?;
            slice(data, metadata_at + WORD, metadata_len)?.to_vec()
        };

        Ok(Self {
            token_id,
            recipient,
            metadata,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = self.token_id.to_be_bytes().to_vec();
        out.extend_from_slice(&abi::u64_word(self.recipient.len() as u64));
        out.extend_from_slice(&self.recipient);
        out.extend_from_slice(&abi::u64_word(self.metadata.len() as u64));
        out.extend_from_slice(&self.metadata);
        out
    }
}

// ============================================================================
// Multi-Token Transfers
// ============================================================================

/// `abi.encode(uint256[] ids, uint256[] amounts, bytes recipient, bytes transfer_data)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiTokenPayload {
    pub token_ids: Vec<Uint256>,
    pub amounts: Vec<Uint256>,
    pub recipient: Vec<u8>,
    pub transfer_data: Vec<u8>,
}

impl MultiTokenPayload {
    pub fn decode(data: &[u8]) -> Result<Self, ContractError> {
        let uint_array = AbiKind::Array(Box::new(AbiKind::Uint));
        let mut values = abi::decode(
            data,
            &[uint_array.clone(), uint_array, AbiKind::Bytes, AbiKind::Bytes],
        )?
        .into_iter();

        let mut next = || {
            values
                .next()
                .ok_or_else(|| ContractError::malformed("missing multi-token field"))
        };
        let token_ids = uints(next()?.into_array()?)?;
        let amounts = uints(next()?.into_array()?)?;
        let recipient = next()?.into_bytes()?;
        let transfer_data = next()?.into_bytes()?;

        if token_ids.len() != amounts.len() {
            return Err(ContractError::malformed(format!(
                "{} token ids but {} amounts",
                token_ids.len(),
                amounts.len()
            )));
        }
        if token_ids.is_empty() {
            return Err(ContractError::malformed("empty token batch"));
        }

        Ok(Self {
            token_ids,
            amounts,
            recipient,
            transfer_data,
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let uint_array =
            |values: &[Uint256]| AbiValue::Array(values.iter().copied().map(AbiValue::Uint).collect());
        abi::encode(&[
            uint_array(&self.token_ids),
            uint_array(&self.amounts),
            AbiValue::Bytes(self.recipient.clone()),
            AbiValue::Bytes(self.transfer_data.clone()),
        ])
    }
}

fn uints(values: Vec<AbiValue>) -> Result<Vec<Uint256>, ContractError> {
    values.into_iter().map(AbiValue::into_uint).collect()
}

// ============================================================================
// Generic Calls
// ============================================================================

/// `max_fee (32) | len(function) (2) | function | len(target) (1) | target |
/// len(depositor) (1) | depositor | execution_data`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericPayload {
    pub max_fee: Uint256,
    pub function: Vec<u8>,
    pub target: Vec<u8>,
    pub depositor: Vec<u8>,
    pub execution_data: Vec<u8>,
}

impl GenericPayload {
    pub fn decode(data: &[u8]) -> Result<Self, ContractError> {
        let max_fee = Uint256::from_be_bytes(read_word(data, 0)?);
        let mut cursor = WORD;

        let function_len = slice(data, cursor, 2)?;
        let function_len = u16::from_be_bytes([function_len[0], function_len[1]]) as usize;
        cursor += 2;
        let function = slice(data, cursor, function_len)?.to_vec();
        cursor += function_len;

        let target_len = slice(data, cursor, 1)?[0] as usize;
        cursor += 1;
        let target = slice(data, cursor, target_len)?.to_vec();
        cursor += target_len;

        let depositor_len = slice(data, cursor, 1)?[0] as usize;
        cursor += 1;
        let depositor = slice(data, cursor, depositor_len)?.to_vec();
        cursor += depositor_len;

        Ok(Self {
            max_fee,
            function,
            target,
            depositor,
            execution_data: data[cursor..].to_vec(),
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>, ContractError> {
        let function_len = u16::try_from(self.function.len())
            .map_err(|_| ContractError::malformed("function name too long"))?;
        let target_len = u8::try_from(self.target.len())
            .map_err(|_| ContractError::malformed("target address too long"))?;
        let depositor_len = u8::try_from(self.depositor.len())
            .map_err(|_| ContractError::malformed("depositor address too long"))?;

        let mut out = self.max_fee.to_be_bytes().to_vec();
        out.extend_from_slice(&function_len.to_be_bytes());
        out.extend_from_slice(&self.function);
        out.push(target_len);
        out.extend_from_slice(&self.target);
        out.push(depositor_len);
        out.extend_from_slice(&self.depositor);
        out.extend_from_slice(&self.execution_data);
        Ok(out)
    }
}

// ============================================================================
// Executor Messages
// ============================================================================

fn action_kind() -> AbiKind {
    AbiKind::Tuple(vec![
        AbiKind::Uint,
        AbiKind::Bytes,
        AbiKind::Bytes,
        AbiKind::Bytes,
        AbiKind::Bytes,
        AbiKind::Bytes,
    ])
}

/// `abi.encode(bytes32 transaction_id, (uint256, bytes, bytes, bytes, bytes, bytes)[] actions, bytes recipient)`
pub fn encode_message(message: &Message) -> Result<Vec<u8>, ContractError> {
    let transaction_id: [u8; 32] = message
        .transaction_id
        .as_slice()
        .try_into()
        .map_err(|_| ContractError::malformed("transaction id must be 32 bytes"))?;

    let actions = message
        .actions
        .iter()
        .map(|action| {
            AbiValue::Tuple(vec![
                AbiValue::Uint(Uint256::from(action.native_value)),
                AbiValue::Bytes(action.call_to.as_bytes().to_vec()),
                AbiValue::Bytes(action.approve_to.as_bytes().to_vec()),
                AbiValue::Bytes(action.token_send.as_bytes().to_vec()),
                AbiValue::Bytes(action.token_receive.as_bytes().to_vec()),
                AbiValue::Bytes(action.data.to_vec()),
            ])
        })
        .collect();

    Ok(abi::encode(&[
        AbiValue::FixedBytes(transaction_id),
        AbiValue::Array(actions),
        AbiValue::Bytes(message.recipient.as_bytes().to_vec()),
    ]))
}

pub fn decode_message(data: &[u8]) -> Result<Message, ContractError> {
    let mut values = abi::decode(
        data,
        &[
            AbiKind::FixedBytes,
            AbiKind::Array(Box::new(action_kind())),
            AbiKind::Bytes,
        ],
    )?
    .into_iter();
    let missing = || ContractError::malformed("missing message field");

    let transaction_id = values.next().ok_or_else(missing)?.into_fixed_bytes()?;
    let actions = values
        .next()
        .ok_or_else(missing)?
        .into_array()?
        .into_iter()
        .map(decode_action)
        .collect::<Result<Vec<_>, _>>()?;
    let recipient = utf8(values.next().ok_or_else(missing)?.into_bytes()?, "recipient")?;

    Ok(Message {
        transaction_id: Binary::from(transaction_id.to_vec()),
        actions,
        recipient,
    })
}

fn decode_action(value: AbiValue) -> Result<Action, ContractError> {
    let mut fields = value.into_tuple()?.into_iter();
    let mut next = || {
        fields
            .next()
            .ok_or_else(|| ContractError::malformed("missing action field"))
    };

    let native_value = Uint128::try_from(next()?.into_uint()?)
        .map_err(|_| ContractError::malformed("native value does not fit 128 bits"))?;
    let call_to = utf8(next()?.into_bytes()?, "call_to")?;
    let approve_to = utf8(next()?.into_bytes()?, "approve_to")?;
    let token_send = utf8(next()?.into_bytes()?, "token_send")?;
    let token_receive = utf8(next()?.into_bytes()?, "token_receive")?;
    let data = Binary::from(next()?.into_bytes()?);

    Ok(Action {
        native_value,
        call_to,
        approve_to,
        token_send,
        token_receive,
        data,
    })
}

// ============================================================================
// Addresses
// ============================================================================

pub fn utf8(bytes: Vec<u8>, field: &str) -> Result<String, ContractError> {
    String::from_utf8(bytes).map_err(|_| ContractError::malformed(format!("{} is not UTF-8", field)))
}

/// Decode a recipient carried in a payload into a validated local address
pub fn decode_address(api: &dyn Api, bytes: &[u8]) -> Result<String, ContractError> {
    let address = std::str::from_utf8(bytes).map_err(|_| ContractError::InvalidRecipient {
        reason: "address is not UTF-8".to_string(),
    })?;
    api.addr_validate(address)
        .map(|addr| addr.into_string())
        .map_err(|err| ContractError::InvalidRecipient {
            reason: err.to_string(),
        })
}
