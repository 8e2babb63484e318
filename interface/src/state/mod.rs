pub mod price_keeper;
pub mod price_record;
pub mod symbol;
pub mod transmutable;
pub mod validator_keeper;

pub use price_keeper::PriceKeeper;
pub use price_record::PriceRecord;
pub use symbol::Symbol;
pub use validator_keeper::ValidatorKeeper;

pub const U32_SIZE: usize = core::mem::size_of::<u32>();
pub const U64_SIZE: usize = core::mem::size_of::<u64>();

/// A u32 stored as little-endian bytes.
pub type LeU32 = [u8; U32_SIZE];
/// A u64 stored as little-endian bytes.
pub type LeU64 = [u8; U64_SIZE];

pub const PUBKEY_SIZE: usize = 32;
