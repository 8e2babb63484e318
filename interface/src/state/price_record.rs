use static_assertions::const_assert_eq;

use crate::state::{
    symbol::Symbol,
    transmutable::Transmutable,
    LeU64,
    U64_SIZE,
};

pub const PRICE_RECORD_SIZE: usize = 32;

/// Number of decimal places carried by the fixed-point `px` field.
///
/// A stored value of `4_000_000_000` therefore reads as 4.0. The field is
/// unsigned; the program has no notion of a negative quote.
pub const PX_DECIMALS: u32 = 9;

/// One quoted symbol's state inside a [`PriceKeeper`](crate::state::PriceKeeper) slot.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PriceRecord {
    /// The quoted asset identifier.
    pub symbol: Symbol,
    /// The u64 fixed-point price as LE bytes; see [`PX_DECIMALS`].
    px: LeU64,
    /// The u64 timestamp (or sequence number) of the last update as LE bytes.
    last_updated: LeU64,
    /// The u64 relayer correlation id as LE bytes.
    request_id: LeU64,
}

// Safety:
//
// - Stable layout with `#[repr(C)]`.
// - `size_of` and `align_of` are checked below.
// - All bit patterns are valid.
unsafe impl Transmutable for PriceRecord {
    const LEN: usize = PRICE_RECORD_SIZE;
}

const_assert_eq!(size_of::<PriceRecord>(), PRICE_RECORD_SIZE);
const_assert_eq!(align_of::<PriceRecord>(), 1);

impl PriceRecord {
    pub fn new(symbol: Symbol, px: u64, last_updated: u64, request_id: u64) -> Self {
        PriceRecord {
            symbol,
            px: px.to_le_bytes(),
            last_updated: last_updated.to_le_bytes(),
            request_id: request_id.to_le_bytes(),
        }
    }

    #[inline(always)]
    pub fn px(&self) -> u64 {
        u64::from_le_bytes(self.px)
    }

    #[inline(always)]
    pub fn last_updated(&self) -> u64 {
        u64::from_le_bytes(self.last_updated)
    }

    #[inline(always)]
    pub fn request_id(&self) -> u64 {
        u64::from_le_bytes(self.request_id)
    }

    /// An all-zero record, the content of every unpopulated keeper slot.
    pub fn empty() -> Self {
        PriceRecord::default()
    }

    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.symbol.as_bytes());
        out.extend_from_slice(&self.px);
        out.extend_from_slice(&self.last_updated);
        out.extend_from_slice(&self.request_id);
    }

    pub fn read_from(bytes: &[u8; PRICE_RECORD_SIZE]) -> Self {
        let mut symbol = [0u8; 8];
        symbol.copy_from_slice(&bytes[..8]);
        let word = |at: usize| -> LeU64 {
            let mut le = [0u8; U64_SIZE];
            le.copy_from_slice(&bytes[at..at + U64_SIZE]);
            le
        };
        PriceRecord {
            symbol: Symbol::from_bytes(symbol),
            px: word(8),
            last_updated: word(16),
            request_id: word(24),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_write_read_round_trip() {
        let record = PriceRecord::new(Symbol::try_from("ETH").unwrap(), 4, 5, 6);
        let mut bytes = Vec::new();
        record.write_to(&mut bytes);
        assert_eq!(bytes.len(), PRICE_RECORD_SIZE);
        let read = PriceRecord::read_from(bytes.as_slice().try_into().unwrap());
        assert_eq!(read, record);
        assert_eq!(read.px(), 4);
        assert_eq!(read.last_updated(), 5);
        assert_eq!(read.request_id(), 6);
    }

    #[test]
    fn test_empty_record_is_all_zero() {
        let mut bytes = Vec::new();
        PriceRecord::empty().write_to(&mut bytes);
        assert_eq!(bytes, vec![0u8; PRICE_RECORD_SIZE]);
    }
}
