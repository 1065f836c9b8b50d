use thiserror::Error;

/// Errors reported at the boundary of a symbol table operation.
///
/// Absent keys are not errors; lookups return `Ok(None)` for them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("symbol {symbol:#04x} at position {position} is outside the alphabet")]
    SymbolOutOfRange { symbol: u8, position: usize },

    #[error("key of length {len} exceeds the configured maximum of {max}")]
    KeyTooLong { len: usize, max: usize },

    #[error("invalid alphabet: {radix} symbols starting at {first:#04x}")]
    InvalidAlphabet { first: u8, radix: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
