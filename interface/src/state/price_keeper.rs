use solana_pubkey::Pubkey;
use static_assertions::const_assert_eq;

use crate::{
    error::{PriceDbError, PriceDbResult},
    state::{
        price_record::{PriceRecord, PRICE_RECORD_SIZE},
        transmutable::{load, Transmutable},
        LeU32,
        PUBKEY_SIZE,
        U32_SIZE,
    },
};

pub const PRICE_KEEPER_HEADER_SIZE: usize = PUBKEY_SIZE + U32_SIZE;

/// The fixed prefix of a price keeper account's data.
#[repr(C)]
#[derive(Clone, Debug)]
pub struct PriceKeeperHeader {
    /// The public key authorized to mutate the keeper.
    pub owner: Pubkey,
    /// The u32 number of populated record slots as LE bytes.
    size: LeU32,
}

// Safety:
//
// - Stable layout with `#[repr(C)]`.
// - `size_of` and `align_of` are checked below.
// - All bit patterns are valid.
unsafe impl Transmutable for PriceKeeperHeader {
    const LEN: usize = PRICE_KEEPER_HEADER_SIZE;
}

const_assert_eq!(size_of::<PriceKeeperHeader>(), PRICE_KEEPER_HEADER_SIZE);
const_assert_eq!(align_of::<PriceKeeperHeader>(), 1);

impl PriceKeeperHeader {
    #[inline(always)]
    pub fn size(&self) -> u32 {
        u32::from_le_bytes(self.size)
    }
}

/// An owned snapshot of a price keeper account.
///
/// The account's byte span is fixed when the account is created:
/// `PRICE_KEEPER_HEADER_SIZE + capacity * PRICE_RECORD_SIZE`. The capacity is
/// never stored in the account data; it is recovered from the buffer length
/// on decode. Populated records occupy a stable prefix of the slot array and
/// their order is the authoritative symbol ordering; unused slots stay
/// zero-filled.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceKeeper {
    pub owner: Pubkey,
    capacity: u8,
    records: Vec<PriceRecord>,
}

impl PriceKeeper {
    /// Byte span of a keeper account created with the given slot capacity.
    pub const fn span(capacity: u8) -> usize {
        PRICE_KEEPER_HEADER_SIZE + capacity as usize * PRICE_RECORD_SIZE
    }

    pub fn new(owner: Pubkey, capacity: u8) -> Self {
        PriceKeeper {
            owner,
            capacity,
            records: Vec::new(),
        }
    }

    pub fn with_records(
        owner: Pubkey,
        capacity: u8,
        records: Vec<PriceRecord>,
    ) -> PriceDbResult<Self> {
        if records.len() > capacity as usize {
            return Err(PriceDbError::CapacityExceeded);
        }
        Ok(PriceKeeper {
            owner,
            capacity,
            records,
        })
    }

    #[inline(always)]
    pub fn capacity(&self) -> u8 {
        self.capacity
    }

    #[inline(always)]
    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    /// Encodes into exactly [`Self::span`] bytes, zero-filling unused slots.
    pub fn encode(&self) -> PriceDbResult<Vec<u8>> {
        if self.records.len() > self.capacity as usize {
            return Err(PriceDbError::CapacityExceeded);
        }
        let mut out = Vec::with_capacity(Self::span(self.capacity));
        out.extend_from_slice(self.owner.as_ref());
        out.extend_from_slice(&(self.records.len() as u32).to_le_bytes());
        for record in &self.records {
            record.write_to(&mut out);
        }
        out.resize(Self::span(self.capacity), 0);
        Ok(out)
    }

    /// Decodes a full account buffer. The buffer length must be a valid span,
    /// i.e. the header size plus a whole number of record slots; there is no
    /// partial decoding.
    pub fn decode(bytes: &[u8]) -> PriceDbResult<Self> {
        if bytes.len() < PRICE_KEEPER_HEADER_SIZE {
            return Err(PriceDbError::LayoutMismatch);
        }
        let (header_bytes, slot_bytes) = bytes.split_at(PRICE_KEEPER_HEADER_SIZE);
        if slot_bytes.len() % PRICE_RECORD_SIZE != 0 {
            return Err(PriceDbError::LayoutMismatch);
        }
        let capacity = slot_bytes.len() / PRICE_RECORD_SIZE;
        if capacity > u8::MAX as usize {
            return Err(PriceDbError::LayoutMismatch);
        }

        // Safety: the length was checked by the split above and all bit
        // patterns of the header are valid.
        let header = unsafe { load::<PriceKeeperHeader>(header_bytes)? };
        let size = header.size() as usize;
        if size > capacity {
            return Err(PriceDbError::CapacityExceeded);
        }

        let records = slot_bytes
            .chunks_exact(PRICE_RECORD_SIZE)
            .take(size)
            .map(|chunk| {
                // chunks_exact guarantees the slice length.
                PriceRecord::read_from(chunk.try_into().expect("Chunk is record-sized"))
            })
            .collect();

        Ok(PriceKeeper {
            owner: header.owner,
            capacity: capacity as u8,
            records,
        })
    }
}
