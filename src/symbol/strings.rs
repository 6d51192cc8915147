// Tue Jan 13 2026 - Alex

use crate::memory::{Address, MemoryImage, MemoryRegion};
use std::collections::HashMap;

pub const DEFAULT_MIN_STRING_LENGTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringEntry {
    pub address: Address,
    pub content: String,
}

/// NUL-terminated printable strings found in the data and const regions.
#[derive(Debug, Clone, Default)]
pub struct StringTable {
    entries: Vec<StringEntry>,
    first_by_content: HashMap<String, usize>,
}

impl StringTable {
    pub fn scan(image: &dyn MemoryImage, min_length: usize) -> Self {
        let mut table = Self::default();
        for region in image.scan_regions() {
            table.scan_region(region, min_length);
        }
        table
    }

    fn scan_region(&mut self, region: &MemoryRegion, min_length: usize) {
        let data = region.data();
        let mut start = 0usize;

        while start < data.len() {
            let run = data[start..]
                .iter()
                .take_while(|&&b| is_printable(b))
                .count();
            let end = start + run;

            if run >= min_length && data.get(end) == Some(&0) {
                if let Ok(content) = std::str::from_utf8(&data[start..end]) {
                    self.push(region.start() + start as u64, content.to_string());
                }
            }

            start = end + 1;
        }
    }

    fn push(&mut self, address: Address, content: String) {
        self.first_by_content
            .entry(content.clone())
            .or_insert(self.entries.len());
        self.entries.push(StringEntry { address, content });
    }

    /// Address of the first string equal to `text`.
    pub fn find(&self, text: &str) -> Option<Address> {
        self.first_by_content
            .get(text)
            .map(|&index| self.entries[index].address)
    }

    pub fn entries(&self) -> &[StringEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn is_printable(byte: u8) -> bool {
    byte.is_ascii_graphic() || byte == b' ' || byte == b'\t'
}
