//! Frequency table sidecar.
//!
//! Compressed streams carry no tree, so the counts are persisted next to
//! them and the tree is rebuilt on decompression. Entries are written in
//! table order, which keeps the rebuilt tree identical.
//!
//! Layout (little-endian): `u32` entry count, then per entry a `u32` char
//! scalar value and a `u64` count.

use std::io::{self, Read, Write};

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;

pub fn write_frequency_table<W: Write>(writer: &mut W, table: &FrequencyTable) -> Result<()> {
    let count = u32::try_from(table.len())
        .map_err(|_| HuffmanError::InvalidTable(format!("too many entries: {}", table.len())))?;
    writer.write_all(&count.to_le_bytes())?;

    for (symbol, freq) in table.iter() {
        writer.write_all(&u32::from(symbol).to_le_bytes())?;
        writer.write_all(&freq.to_le_bytes())?;
    }
    Ok(())
}

pub fn read_frequency_table<R: Read>(reader: &mut R) -> Result<FrequencyTable> {
    let mut count_bytes = [0u8; 4];
    read_field(reader, &mut count_bytes, "entry count")?;
    let count = u32::from_le_bytes(count_bytes);

    let mut table = FrequencyTable::new();
    let mut total = 0u64;
    for i in 0..count {
        let mut symbol_bytes = [0u8; 4];
        read_field(reader, &mut symbol_bytes, "symbol")?;
        let scalar = u32::from_le_bytes(symbol_bytes);
        let symbol = char::from_u32(scalar).ok_or_else(|| {
            HuffmanError::InvalidTable(format!("entry {i}: {scalar:#x} is not a char"))
        })?;

        let mut freq_bytes = [0u8; 8];
        read_field(reader, &mut freq_bytes, "count")?;
        let freq = u64::from_le_bytes(freq_bytes);

        if freq == 0 {
            return Err(HuffmanError::InvalidTable(format!("entry {i}: {symbol:?} has count 0")));
        }
        total = total.checked_add(freq).ok_or_else(|| {
            HuffmanError::InvalidTable(format!("entry {i}: counts overflow u64"))
        })?;
        if table.contains(symbol) {
            return Err(HuffmanError::InvalidTable(format!("entry {i}: duplicate symbol {symbol:?}")));
        }
        table.add(symbol, freq);
    }
    Ok(table)
}

fn read_field<R: Read>(reader: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    reader.read_exact(buf).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => HuffmanError::InvalidTable(format!("truncated {what}")),
        _ => HuffmanError::Io(e),
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_table_survives_and_keeps_order() {
        let table = FrequencyTable::from_text("zebra ünïcode");
        let mut bytes = Vec::new();
        write_frequency_table(&mut bytes, &table).unwrap();
        assert_eq!(bytes.len(), 4 + table.len() * 12);

        let read = read_frequency_table(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(read, table);
        assert_eq!(read.iter().next(), Some(('z', 1)));
    }

    #[test]
    fn test_truncated_table() {
        let bytes = [2u8, 0, 0, 0, b'a', 0, 0, 0];
        let err = read_frequency_table(&mut &bytes[..]).unwrap_err();
        assert!(matches!(err, HuffmanError::InvalidTable(_)));
    }

    #[test]
    fn test_rejects_zero_count_and_duplicates() {
        let mut zero = Vec::new();
        zero.extend_from_slice(&1u32.to_le_bytes());
        zero.extend_from_slice(&u32::from('a').to_le_bytes());
        zero.extend_from_slice(&0u64.to_le_bytes());
        assert!(matches!(
            read_frequency_table(&mut &zero[..]),
            Err(HuffmanError::InvalidTable(_))
        ));

        let mut dup = Vec::new();
        dup.extend_from_slice(&2u32.to_le_bytes());
        for _ in 0..2 {
            dup.extend_from_slice(&u32::from('a').to_le_bytes());
            dup.extend_from_slice(&3u64.to_le_bytes());
        }
        assert!(matches!(
            read_frequency_table(&mut &dup[..]),
            Err(HuffmanError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_rejects_counts_overflowing_total() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2u32.to_le_bytes());
        for symbol in ['a', 'b'] {
            bytes.extend_from_slice(&u32::from(symbol).to_le_bytes());
            bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        }
        let err = read_frequency_table(&mut &bytes[..]).unwrap_err();
        assert!(matches!(&err, HuffmanError::InvalidTable(msg) if msg.contains("overflow")));
    }

    #[test]
    fn test_largest_total_still_builds() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&2u32.to_le_bytes());
        for (symbol, freq) in [('a', u64::MAX - 1), ('b', 1)] {
            bytes.extend_from_slice(&u32::from(symbol).to_le_bytes());
            bytes.extend_from_slice(&freq.to_le_bytes());
        }
        let table = read_frequency_table(&mut &bytes[..]).unwrap();
        let tree = crate::hufftree::HuffmanTree::build(&table).unwrap();
        assert_eq!(tree.weight(), u64::MAX);
    }

    #[test]
    fn test_rejects_surrogate() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes.extend_from_slice(&0xD800u32.to_le_bytes());
        bytes.extend_from_slice(&1u64.to_le_bytes());
        assert!(matches!(
            read_frequency_table(&mut &bytes[..]),
            Err(HuffmanError::InvalidTable(_))
        ));
    }
}
