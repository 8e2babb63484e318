use solana_pubkey::Pubkey;
use static_assertions::const_assert_eq;

use crate::{
    error::{PriceDbError, PriceDbResult},
    state::{
        transmutable::{load, Transmutable},
        LeU32,
        PUBKEY_SIZE,
        U32_SIZE,
    },
};

pub const VALIDATOR_KEEPER_HEADER_SIZE: usize = PUBKEY_SIZE + U32_SIZE;

/// The fixed prefix of a validator keeper account's data.
#[repr(C)]
#[derive(Clone, Debug)]
pub struct ValidatorKeeperHeader {
    /// The public key authorized to mutate the validator set.
    pub owner: Pubkey,
    /// The u32 number of populated validator slots as LE bytes.
    count: LeU32,
}

// Safety:
//
// - Stable layout with `#[repr(C)]`.
// - `size_of` and `align_of` are checked below.
// - All bit patterns are valid.
unsafe impl Transmutable for ValidatorKeeperHeader {
    const LEN: usize = VALIDATOR_KEEPER_HEADER_SIZE;
}

const_assert_eq!(size_of::<ValidatorKeeperHeader>(), VALIDATOR_KEEPER_HEADER_SIZE);
const_assert_eq!(align_of::<ValidatorKeeperHeader>(), 1);

impl ValidatorKeeperHeader {
    #[inline(always)]
    pub fn count(&self) -> u32 {
        u32::from_le_bytes(self.count)
    }
}

/// An owned snapshot of a validator keeper account: the set of public keys
/// permitted to attest price updates.
///
/// Span is `VALIDATOR_KEEPER_HEADER_SIZE + capacity * 32`, fixed at account
/// creation; the declared count always matches the populated key prefix and
/// unused slots stay zero-filled.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidatorKeeper {
    pub owner: Pubkey,
    capacity: u8,
    validators: Vec<Pubkey>,
}

impl ValidatorKeeper {
    /// Byte span of a validator keeper account created with the given capacity.
    pub const fn span(capacity: u8) -> usize {
        VALIDATOR_KEEPER_HEADER_SIZE + capacity as usize * PUBKEY_SIZE
    }

    pub fn new(owner: Pubkey, capacity: u8) -> Self {
        ValidatorKeeper {
            owner,
            capacity,
            validators: Vec::new(),
        }
    }

    pub fn with_validators(
        owner: Pubkey,
        capacity: u8,
        validators: Vec<Pubkey>,
    ) -> PriceDbResult<Self> {
        if validators.len() > capacity as usize {
            return Err(PriceDbError::CapacityExceeded);
        }
        Ok(ValidatorKeeper {
            owner,
            capacity,
            validators,
        })
    }

    #[inline(always)]
    pub fn capacity(&self) -> u8 {
        self.capacity
    }

    #[inline(always)]
    pub fn validators(&self) -> &[Pubkey] {
        &self.validators
    }

    /// Encodes into exactly [`Self::span`] bytes, zero-filling unused slots.
    pub fn encode(&self) -> PriceDbResult<Vec<u8>> {
        if self.validators.len() > self.capacity as usize {
            return Err(PriceDbError::CapacityExceeded);
        }
        let mut out = Vec::with_capacity(Self::span(self.capacity));
        out.extend_from_slice(self.owner.as_ref());
        out.extend_from_slice(&(self.validators.len() as u32).to_le_bytes());
        for validator in &self.validators {
            out.extend_from_slice(validator.as_ref());
        }
        out.resize(Self::span(self.capacity), 0);
        Ok(out)
    }

    /// Decodes a full account buffer; no partial decoding.
    pub fn decode(bytes: &[u8]) -> PriceDbResult<Self> {
        if bytes.len() < VALIDATOR_KEEPER_HEADER_SIZE {
            return Err(PriceDbError::LayoutMismatch);
        }
        let (header_bytes, slot_bytes) = bytes.split_at(VALIDATOR_KEEPER_HEADER_SIZE);
        if slot_bytes.len() % PUBKEY_SIZE != 0 {
            return Err(PriceDbError::LayoutMismatch);
        }
        let capacity = slot_bytes.len() / PUBKEY_SIZE;
        if capacity > u8::MAX as usize {
            return Err(PriceDbError::LayoutMismatch);
        }

        // Safety: the length was checked by the split above and all bit
        // patterns of the header are valid.
        let header = unsafe { load::<ValidatorKeeperHeader>(header_bytes)? };
        let count = header.count() as usize;
        if count > capacity {
            return Err(PriceDbError::CapacityExceeded);
        }

        let validators = slot_bytes
            .chunks_exact(PUBKEY_SIZE)
            .take(count)
            .map(|chunk| Pubkey::new_from_array(chunk.try_into().expect("Chunk is key-sized")))
            .collect();

        Ok(ValidatorKeeper {
            owner: header.owner,
            capacity: capacity as u8,
            validators,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_round_trip() {
        let original = ValidatorKeeper::with_validators(
            Pubkey::new_unique(),
            4,
            vec![Pubkey::new_from_array([1; 32]), Pubkey::new_from_array([2; 32])],
        )
        .unwrap();
        let bytes = original.encode().unwrap();
        assert_eq!(bytes.len(), ValidatorKeeper::span(4));
        assert_eq!(ValidatorKeeper::decode(&bytes).unwrap(), original);
    }

    #[test]
    fn test_count_past_capacity_rejected() {
        let mut bytes = ValidatorKeeper::new(Pubkey::new_unique(), 2).encode().unwrap();
        bytes[PUBKEY_SIZE..VALIDATOR_KEEPER_HEADER_SIZE].copy_from_slice(&3u32.to_le_bytes());
        assert_eq!(
            ValidatorKeeper::decode(&bytes).unwrap_err(),
            PriceDbError::CapacityExceeded
        );
    }

    #[test]
    fn test_over_capacity_construction_rejected() {
        assert_eq!(
            ValidatorKeeper::with_validators(
                Pubkey::new_unique(),
                1,
                vec![Pubkey::new_unique(), Pubkey::new_unique()],
            )
            .unwrap_err(),
            PriceDbError::CapacityExceeded
        );
    }
}
