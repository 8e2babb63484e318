#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum PriceDbError {
    InvalidInstructionTag,
    LayoutMismatch,
    FieldTooLong,
    CapacityExceeded,
    InvalidOperand,
}

impl From<PriceDbError> for &'static str {
    fn from(value: PriceDbError) -> Self {
        match value {
            PriceDbError::InvalidInstructionTag => "Invalid instruction tag",
            PriceDbError::LayoutMismatch => "Byte length doesn't match the layout span",
            PriceDbError::FieldTooLong => "Value doesn't fit in its fixed-width field",
            PriceDbError::CapacityExceeded => "Collection exceeds the account's fixed capacity",
            PriceDbError::InvalidOperand => "Operand disagrees with its declared count",
        }
    }
}

impl core::fmt::Display for PriceDbError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = (*self).into();
        write!(f, "{msg}")
    }
}

impl std::error::Error for PriceDbError {}

pub type PriceDbResult<T> = Result<T, PriceDbError>;
