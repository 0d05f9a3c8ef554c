use std::io;
use thiserror::Error;

/// Result type alias using [`HuffmanError`]
pub type Result<T> = std::result::Result<T, HuffmanError>;

#[derive(Error, Debug)]
pub enum HuffmanError {
    /// Source or sink could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Encoder met a symbol that has no code in the table
    #[error("symbol {0:?} has no code in the table")]
    UnknownSymbol(char),

    /// Bit sequence does not resolve to a leaf of the tree
    #[error("malformed stream at bit {bit}")]
    MalformedStream { bit: u64 },

    /// Persisted frequency table could not be parsed
    #[error("invalid frequency table: {0}")]
    InvalidTable(String),
}
