//! Crate-wide error types.
//!
//! One enum per external boundary the spec names in §7: opening the input
//! file, and the decoder reaching a word no matcher accepts or a chain
//! re-entering a non-head visited address.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HexError {
    #[error("could not open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no matcher accepted word 0x{word:04x} at address 0x{addr:04x}")]
    NoMatch { addr: u16, word: u16 },

    #[error("chain re-entered non-head visited address 0x{addr:04x}")]
    ReenteredVisited { addr: u16 },
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Hex(#[from] HexError),

    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("could not write listing to {path}: {source}")]
    Emit {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
