use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use crate::bit_io::{BitReader, BitWriter};
use crate::code_table::CodeTable;
use crate::error::{HuffmanError, Result};
use crate::frequency::{count_frequencies, FrequencyTable};
use crate::hufftree::HuffmanTree;

/// What [`encode`] hands back once the sink has been finished.
#[derive(Debug)]
pub struct Encoded<W> {
    pub sink: W,
    pub symbols: u64,
    pub bits: u64,
}

/// Writes the code of every symbol, in order, to `sink` and finishes it.
///
/// Fails with [`HuffmanError::UnknownSymbol`] on the first symbol missing
/// from `table`. The sink is released on every path; on failure whatever
/// was written so far is flushed as a truncated stream.
pub fn encode<I, W>(symbols: I, table: &CodeTable, mut sink: BitWriter<W>) -> Result<Encoded<W>>
where
    I: IntoIterator<Item = char>,
    W: Write,
{
    let mut count = 0u64;
    for symbol in symbols {
        let code = table.get(symbol).ok_or(HuffmanError::UnknownSymbol(symbol))?;
        sink.write_bits(code.bits())?;
        count += 1;
    }
    let bits = sink.bit_count();
    let sink = sink.finish()?;
    Ok(Encoded { sink, symbols: count, bits })
}

/// Walks `tree` bit by bit, writing each decoded symbol to `output` as
/// UTF-8. Returns the number of symbols decoded.
///
/// An absent tree decodes to nothing. A bit leading to a missing child, or
/// a stream ending partway through a code, is a
/// [`HuffmanError::MalformedStream`].
pub fn decode<R, O>(mut source: BitReader<R>, tree: Option<&HuffmanTree>, output: &mut O) -> Result<u64>
where
    R: Read,
    O: Write,
{
    let Some(tree) = tree else {
        return Ok(0);
    };
    let root = tree.root();
    let mut node = root;
    let mut decoded = 0u64;
    let mut utf8 = [0u8; 4];

    while source.has_next()? {
        let bit = source.read_bit()?;
        node = node.child(bit).ok_or(HuffmanError::MalformedStream {
            bit: source.bits_read() - 1,
        })?;
        if let Some(symbol) = node.symbol() {
            output.write_all(symbol.encode_utf8(&mut utf8).as_bytes())?;
            decoded += 1;
            node = root;
        }
    }

    if !std::ptr::eq(node, root) {
        return Err(HuffmanError::MalformedStream {
            bit: source.bits_read(),
        });
    }
    output.flush()?;
    Ok(decoded)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    pub symbols: u64,
    pub bits: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl CompressionStats {
    /// Compressed size over original size, 0 for an empty input.
    pub fn ratio(&self) -> f64 {
        if self.bytes_in == 0 {
            return 0.0;
        }
        self.bytes_out as f64 / self.bytes_in as f64
    }
}

/// A code tree and its table, built once and shared by any number of
/// compress and decompress calls.
#[derive(Debug, Clone)]
pub struct HuffmanCodec {
    tree: Option<HuffmanTree>,
    table: CodeTable,
}

impl HuffmanCodec {
    pub fn new(frequencies: &FrequencyTable) -> Self {
        let tree = HuffmanTree::build(frequencies);
        let table = CodeTable::from_tree(tree.as_ref());
        HuffmanCodec { tree, table }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(&FrequencyTable::from_text(text))
    }

    /// Builds a codec from the character counts of the file at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let frequencies = count_frequencies(path)?;
        Ok(Self::new(&frequencies))
    }

    pub fn tree(&self) -> Option<&HuffmanTree> {
        self.tree.as_ref()
    }

    pub fn table(&self) -> &CodeTable {
        &self.table
    }

    pub fn compress(&self, text: &str) -> Result<Vec<u8>> {
        let encoded = encode(text.chars(), &self.table, BitWriter::new(Vec::new()))?;
        Ok(encoded.sink)
    }

    pub fn decompress(&self, data: &[u8]) -> Result<String> {
        let mut out = Vec::new();
        decode(BitReader::new(data), self.tree.as_ref(), &mut out)?;
        String::from_utf8(out)
            .map_err(|e| HuffmanError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    pub fn compress_file<P, Q>(&self, input: P, output: Q) -> Result<CompressionStats>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let (input, output) = (input.as_ref(), output.as_ref());
        let mut text = String::new();
        File::open(input)?.read_to_string(&mut text)?;

        let sink = BitWriter::new(File::create(output)?);
        let encoded = encode(text.chars(), &self.table, sink)?;
        let stats = CompressionStats {
            symbols: encoded.symbols,
            bits: encoded.bits,
            bytes_in: text.len() as u64,
            bytes_out: encoded.bits.div_ceil(8) + 1,
        };
        log::info!(
            "compressed {} -> {} ({} symbols, {} bytes -> {} bytes)",
            input.display(),
            output.display(),
            stats.symbols,
            stats.bytes_in,
            stats.bytes_out
        );
        Ok(stats)
    }

    /// Decodes `compressed` into `output`, returning the number of symbols.
    pub fn decompress_file<P, Q>(&self, compressed: P, output: Q) -> Result<u64>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let (compressed, output) = (compressed.as_ref(), output.as_ref());
        let source = BitReader::new(File::open(compressed)?);
        let mut sink = BufWriter::new(File::create(output)?);
        let decoded = decode(source, self.tree.as_ref(), &mut sink)?;
        log::info!(
            "decompressed {} -> {} ({} symbols)",
            compressed.display(),
            output.display(),
            decoded
        );
        Ok(decoded)
    }
}
