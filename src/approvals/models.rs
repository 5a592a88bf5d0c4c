use alloy_primitives::Bytes;
use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};

use crate::approvals::{errors::ApprovalError, serde_primitives::biguint_string};

/// Item types as numbered by the marketplace protocol.
///
/// The criteria variants describe a set of token ids (a merkle root, or zero for "any id") rather
/// than a single id. For approvals they behave exactly like their base standard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ItemType {
    Native = 0,
    Erc20 = 1,
    Erc721 = 2,
    Erc1155 = 3,
    Erc721WithCriteria = 4,
    Erc1155WithCriteria = 5,
}

/// Token standard an item belongs to. Decides which contract methods grant and report approval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenStandard {
    Native,
    Fungible,
    NonFungible,
    SemiFungible,
}

impl ItemType {
    pub fn token_standard(&self) -> TokenStandard {
        match self {
            ItemType::Native => TokenStandard::Native,
            ItemType::Erc20 => TokenStandard::Fungible,
            ItemType::Erc721 | ItemType::Erc721WithCriteria => TokenStandard::NonFungible,
            ItemType::Erc1155 | ItemType::Erc1155WithCriteria => TokenStandard::SemiFungible,
        }
    }
}

impl TryFrom<u8> for ItemType {
    type Error = ApprovalError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ItemType::Native),
            1 => Ok(ItemType::Erc20),
            2 => Ok(ItemType::Erc721),
            3 => Ok(ItemType::Erc1155),
            4 => Ok(ItemType::Erc721WithCriteria),
            5 => Ok(ItemType::Erc1155WithCriteria),
            other => Err(ApprovalError::InvalidInput(format!("Unknown item type: {}", other))),
        }
    }
}

impl From<ItemType> for u8 {
    fn from(item_type: ItemType) -> Self {
        item_type as u8
    }
}

/// A token reference taken from an order's offer or consideration.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Item {
    pub item_type: ItemType,
    /// Address of the token contract. Ignored for native items.
    pub token: Bytes,
    /// Token id, or criteria root for the criteria item types. Zero for fungible and native items.
    #[serde(default, with = "biguint_string")]
    pub identifier_or_criteria: BigUint,
}

impl Item {
    pub fn new(item_type: ItemType, token: Bytes, identifier_or_criteria: BigUint) -> Self {
        Self { item_type, token, identifier_or_criteria }
    }

    pub fn native() -> Self {
        Self::new(ItemType::Native, Bytes::new(), BigUint::zero())
    }
}

/// An approval the owner still has to grant before `operator` can move `token` on their behalf.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct InsufficientApproval {
    pub token: Bytes,
    /// Address of the spender that needs the approval.
    pub operator: Bytes,
    pub item_type: ItemType,
    #[serde(default, with = "biguint_string")]
    pub identifier_or_criteria: BigUint,
}
