use static_assertions::const_assert_eq;

use crate::{
    error::{PriceDbError, PriceDbResult},
    state::transmutable::Transmutable,
};

pub const SYMBOL_SIZE: usize = 8;

/// A fixed-width ASCII asset identifier, zero-padded on the right.
///
/// The wire format never carries a length; trailing zero bytes are not part
/// of the identifier and are stripped when reading the symbol back out.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Symbol([u8; SYMBOL_SIZE]);

// Safety:
//
// - Stable layout with `#[repr(transparent)]`.
// - `size_of` and `align_of` are checked below.
// - All bit patterns are valid.
unsafe impl Transmutable for Symbol {
    const LEN: usize = SYMBOL_SIZE;
}

const_assert_eq!(size_of::<Symbol>(), SYMBOL_SIZE);
const_assert_eq!(align_of::<Symbol>(), 1);

impl Symbol {
    pub const fn from_bytes(bytes: [u8; SYMBOL_SIZE]) -> Self {
        Symbol(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; SYMBOL_SIZE] {
        &self.0
    }

    /// The identifier with its zero padding stripped.
    pub fn as_str(&self) -> &str {
        let end = self
            .0
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |last| last + 1);
        // Construction only ever admits ASCII, so this can't fail on a value
        // built through `try_from`; a decoded foreign buffer falls back to
        // the empty string rather than panicking.
        core::str::from_utf8(&self.0[..end]).unwrap_or("")
    }

    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; SYMBOL_SIZE]
    }
}

impl TryFrom<&str> for Symbol {
    type Error = PriceDbError;

    fn try_from(value: &str) -> PriceDbResult<Self> {
        let raw = value.as_bytes();
        if raw.len() > SYMBOL_SIZE {
            return Err(PriceDbError::FieldTooLong);
        }
        let mut bytes = [0u8; SYMBOL_SIZE];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Symbol(bytes))
    }
}

impl core::fmt::Display for Symbol {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_pads_with_zero_bytes() {
        let symbol = Symbol::try_from("A").unwrap();
        assert_eq!(symbol.as_bytes(), &[0x41, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(symbol.as_str(), "A");
    }

    #[test]
    fn test_symbol_full_width() {
        let symbol = Symbol::try_from("ABCDEFGH").unwrap();
        assert_eq!(symbol.as_str(), "ABCDEFGH");
    }

    #[test]
    fn test_symbol_too_long() {
        assert_eq!(
            Symbol::try_from("ABCDEFGHI").unwrap_err(),
            PriceDbError::FieldTooLong
        );
    }

    #[test]
    fn test_empty_symbol() {
        let symbol = Symbol::try_from("").unwrap();
        assert!(symbol.is_empty());
        assert_eq!(symbol.as_str(), "");
    }
}
