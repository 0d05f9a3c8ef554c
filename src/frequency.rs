use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::Result;

/// Symbol counts, remembering the order in which symbols were first seen.
///
/// Iteration follows first-insertion order, which is what the tree builder
/// uses to break ties between equal frequencies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<(char, u64)>,
    index: HashMap<char, usize>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        let mut table = FrequencyTable::new();
        for symbol in text.chars() {
            table.add(symbol, 1);
        }
        table
    }

    /// Adds `count` occurrences of `symbol`, saturating at `u64::MAX`. Zero
    /// counts are ignored so a symbol never appears with frequency 0.
    pub fn add(&mut self, symbol: char, count: u64) {
        if count == 0 {
            return;
        }
        match self.index.get(&symbol) {
            Some(&i) => self.entries[i].1 = self.entries[i].1.saturating_add(count),
            None => {
                self.index.insert(symbol, self.entries.len());
                self.entries.push((symbol, count));
            }
        }
    }

    pub fn get(&self, symbol: char) -> Option<u64> {
        self.index.get(&symbol).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.index.contains_key(&symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts, i.e. the number of symbols in the counted source.
    /// Saturates at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.entries
            .iter()
            .fold(0u64, |acc, (_, count)| acc.saturating_add(*count))
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        self.entries.iter().copied()
    }
}

impl FromIterator<(char, u64)> for FrequencyTable {
    fn from_iter<I: IntoIterator<Item = (char, u64)>>(iter: I) -> Self {
        let mut table = FrequencyTable::new();
        for (symbol, count) in iter {
            table.add(symbol, count);
        }
        table
    }
}

pub fn count_frequencies_from_reader<R: Read>(mut reader: R) -> Result<FrequencyTable> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    Ok(FrequencyTable::from_text(&text))
}

/// Counts every character of the file at `path`.
pub fn count_frequencies<P: AsRef<Path>>(path: P) -> Result<FrequencyTable> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let table = count_frequencies_from_reader(BufReader::new(file))?;
    log::debug!(
        "counted {} distinct symbols ({} total) in {}",
        table.len(),
        table.total(),
        path.display()
    );
    Ok(table)
}
