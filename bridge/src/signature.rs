//! Proposal batch signatures
//!
//! The MPC signer signs an EIP-712 style digest over the whole batch:
//!
//! ```text
//! proposal_hash  = keccak256(abi.encode(PROPOSAL_TYPEHASH, originDomainID,
//!                                       depositNonce, resourceID, keccak256(data)))
//! batch_hash     = keccak256(abi.encode(PROPOSALS_TYPEHASH,
//!                                       keccak256(proposal_hash_0 | proposal_hash_1 | ...)))
//! digest         = keccak256(0x1901 | domain_separator | batch_hash)
//! ```
//!
//! The domain separator binds the chain id and this bridge's address, so a
//! batch signed for one deployment cannot be replayed against another.

use cosmwasm_std::{Api, Binary};

use crate::abi::u64_word;
use crate::error::ContractError;
use crate::hash::keccak256;
use crate::msg::Proposal;
use crate::resource::parse_resource_id;

pub const DOMAIN_NAME: &str = "Bridge";
pub const DOMAIN_VERSION: &str = "3.1.0";

const EIP712_DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,string verifyingContract)";
const PROPOSAL_TYPE: &[u8] =
    b"Proposal(uint8 originDomainID,uint64 depositNonce,bytes32 resourceID,bytes data)";
const PROPOSALS_TYPE: &[u8] = b"Proposals(Proposal[] proposals)Proposal(uint8 originDomainID,uint64 depositNonce,bytes32 resourceID,bytes data)";

/// Length of an `r | s | v` signature
pub const SIGNATURE_LENGTH: usize = 65;

fn hash_words(words: &[[u8; 32]]) -> [u8; 32] {
    let mut data = Vec::with_capacity(words.len() * 32);
    for word in words {
        data.extend_from_slice(word);
    }
    keccak256(&data)
}

pub fn domain_separator(chain_id: u64, verifying_contract: &str) -> [u8; 32] {
    hash_words(&[
        keccak256(EIP712_DOMAIN_TYPE),
        keccak256(DOMAIN_NAME.as_bytes()),
        keccak256(DOMAIN_VERSION.as_bytes()),
        u64_word(chain_id),
        keccak256(verifying_contract.as_bytes()),
    ])
}

pub fn proposal_hash(proposal: &Proposal) -> Result<[u8; 32], ContractError> {
    Ok(hash_words(&[
        keccak256(PROPOSAL_TYPE),
        u64_word(proposal.origin_domain_id as u64),
        u64_word(proposal.deposit_nonce),
        parse_resource_id(&proposal.resource_id)?,
        keccak256(&proposal.data),
    ]))
}

/// Digest the MPC signer signs for `proposals` on the given deployment
pub fn proposals_digest(
    chain_id: u64,
    verifying_contract: &str,
    proposals: &[Proposal],
) -> Result<[u8; 32], ContractError> {
    let mut concatenated = Vec::with_capacity(proposals.len() * 32);
    for proposal in proposals {
        concatenated.extend_from_slice(&proposal_hash(proposal)?);
    }
    let batch_hash = hash_words(&[keccak256(PROPOSALS_TYPE), keccak256(&concatenated)]);

    let mut data = Vec::with_capacity(66);
    data.extend_from_slice(&[0x19, 0x01]);
    data.extend_from_slice(&domain_separator(chain_id, verifying_contract));
    data.extend_from_slice(&batch_hash);
    Ok(keccak256(&data))
}

/// Ethereum-style address of an uncompressed secp256k1 public key
pub fn eth_address(pubkey: &[u8]) -> Result<[u8; 20], ContractError> {
    if pubkey.len() != 65 || pubkey[0] != 0x04 {
        return Err(ContractError::InvalidProposalSigner);
    }
    let hash = keccak256(&pubkey[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    Ok(address)
}

/// Recover the address that produced `signature` over `digest`
pub fn recover_signer(
    api: &dyn Api,
    digest: &[u8; 32],
    signature: &Binary,
) -> Result<[u8; 20], ContractError> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(ContractError::InvalidSignatureLength {
            got: signature.len(),
        });
    }
    let recovery_param = match signature[64] {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(ContractError::InvalidProposalSigner),
    };
    let pubkey = api
        .secp256k1_recover_pubkey(digest, &signature[..64], recovery_param)
        .map_err(|_| ContractError::InvalidProposalSigner)?;
    eth_address(&pubkey)
}

/// Fails with `InvalidProposalSigner` unless the batch was signed by `mpc_address`
pub fn verify_proposals(
    api: &dyn Api,
    chain_id: u64,
    verifying_contract: &str,
    mpc_address: &[u8],
    proposals: &[Proposal],
    signature: &Binary,
) -> Result<(), ContractError> {
    let digest = proposals_digest(chain_id, verifying_contract, proposals)?;
    let signer = recover_signer(api, &digest, signature)?;
    if signer.as_slice() != mpc_address {
        return Err(ContractError::InvalidProposalSigner);
    }
    Ok(())
}
