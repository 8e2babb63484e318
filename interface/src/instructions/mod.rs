use crate::error::PriceDbError;

pub mod initialize;
pub mod remove_prices;
pub mod set_validator;
pub mod transfer_ownership;
pub mod upsert_prices;
pub mod verify_and_set_price;

pub use initialize::Initialize;
pub use remove_prices::{RemovePrices, RemovePricesData};
pub use set_validator::SetValidator;
pub use transfer_ownership::TransferOwnership;
pub use upsert_prices::{UpsertPrices, UpsertPricesData};
pub use verify_and_set_price::VerifyAndSetPrice;

/// Tags of the keeper instruction family. The numbering is the program's wire
/// format; variants are never renumbered.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(test, derive(strum_macros::FromRepr, strum_macros::EnumIter))]
pub enum KeeperInstructionTag {
    Initialize,
    TransferOwnership,
    UpsertPrices,
    RemovePrices,
}

impl TryFrom<u8> for KeeperInstructionTag {
    type Error = PriceDbError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            // SAFETY: A valid enum variant is guaranteed with the match pattern.
            // All variants are checked in the exhaustive instruction tag test.
            0..4 => Ok(unsafe { core::mem::transmute::<u8, Self>(value) }),
            _ => Err(PriceDbError::InvalidInstructionTag),
        }
    }
}

/// Tags of the validator instruction family. These share the program with the
/// keeper family but carry non-contiguous discriminants; `SetValidator`
/// deliberately reuses `2`, disambiguated by the accounts it is sent with.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(test, derive(strum_macros::FromRepr, strum_macros::EnumIter))]
pub enum ValidatorInstructionTag {
    SetValidator = 2,
    VerifyAndSetPrice = 0x68,
}

impl TryFrom<u8> for ValidatorInstructionTag {
    type Error = PriceDbError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(ValidatorInstructionTag::SetValidator),
            0x68 => Ok(ValidatorInstructionTag::VerifyAndSetPrice),
            _ => Err(PriceDbError::InvalidInstructionTag),
        }
    }
}
