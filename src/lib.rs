//! # simple_huffman
//!
//! Huffman coding of character streams: count symbols, build a code tree,
//! derive a prefix-free code table, and pack text into a bitstream and back.
//!
//! ## Quick Start
//!
//! ```rust
//! use simple_huffman::HuffmanCodec;
//!
//! let text = "abracadabra";
//! let codec = HuffmanCodec::from_text(text);
//!
//! let compressed = codec.compress(text)?;
//! assert_eq!(codec.decompress(&compressed)?, text);
//! # Ok::<(), simple_huffman::HuffmanError>(())
//! ```
//!
//! The compressed stream carries no tree. Keep the [`FrequencyTable`] (see
//! [`metadata`]) or the codec itself to decompress later.

pub mod bit_io;
pub mod code_table;
pub mod error;
pub mod frequency;
pub mod huffman_codec;
pub mod hufftree;
pub mod metadata;

mod min_heap;

pub use code_table::{Code, CodeTable};
pub use error::{HuffmanError, Result};
pub use frequency::{count_frequencies, FrequencyTable};
pub use huffman_codec::{decode, encode, CompressionStats, HuffmanCodec};
pub use hufftree::{HuffNode, HuffmanTree};
