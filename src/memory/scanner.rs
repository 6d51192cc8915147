// Tue Jan 13 2026 - Alex

use crate::memory::{Address, Endianness, MemoryImage, MemoryRegion, PointerWidth};

/// Pointer-aligned word scans over captured regions.
///
/// Alignment is relative to the region start, which matches how segments are
/// laid out by the linker.
#[derive(Debug, Clone, Copy)]
pub struct WordScanner {
    width: PointerWidth,
    endian: Endianness,
}

impl WordScanner {
    pub fn new(width: PointerWidth, endian: Endianness) -> Self {
        Self { width, endian }
    }

    pub fn for_image(image: &dyn MemoryImage) -> Self {
        Self::new(image.pointer_width(), image.endianness())
    }

    pub fn width(&self) -> PointerWidth {
        self.width
    }

    /// Every aligned word in the region with its address.
    pub fn words<'r>(&self, region: &'r MemoryRegion) -> impl Iterator<Item = (Address, u64)> + 'r {
        let width = self.width;
        let endian = self.endian;
        let start = region.start();
        region
            .data()
            .chunks_exact(width.bytes())
            .enumerate()
            .filter_map(move |(index, chunk)| {
                let value = endian.read_word(chunk, width)?;
                Some((start + (index * width.bytes()) as u64, value))
            })
    }

    /// Adjacent aligned words `(address of first, first, second)`.
    pub fn word_pairs<'r>(
        &self,
        region: &'r MemoryRegion,
    ) -> impl Iterator<Item = (Address, u64, u64)> + 'r {
        self.words(region)
            .zip(self.words(region).skip(1))
            .map(|((addr, first), (_, second))| (addr, first, second))
    }

    pub fn find_word(&self, region: &MemoryRegion, value: u64) -> Vec<Address> {
        self.words(region)
            .filter(|&(_, word)| word == value)
            .map(|(addr, _)| addr)
            .collect()
    }

    /// Addresses of the second word wherever `(first, second)` appear back to back.
    pub fn find_word_pair(&self, region: &MemoryRegion, first: u64, second: u64) -> Vec<Address> {
        let step = self.width.bytes_u64();
        self.word_pairs(region)
            .filter(|&(_, a, b)| a == first && b == second)
            .map(|(addr, _, _)| addr + step)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryRange, RegionKind};

    fn region(words: &[u64]) -> MemoryRegion {
        let data: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
        let range = MemoryRange::from_start_size(Address::new(0x1000), data.len() as u64).unwrap();
        MemoryRegion::new(range, RegionKind::Data, ".data".to_string(), data)
    }

    #[test]
    fn test_find_word() {
        let scanner = WordScanner::new(PointerWidth::Bits64, Endianness::Little);
        let region = region(&[1, 0x4000, 2, 0x4000]);
        assert_eq!(
            scanner.find_word(&region, 0x4000),
            vec![Address::new(0x1008), Address::new(0x1018)]
        );
    }

    #[test]
    fn test_find_word_pair_returns_second_slot() {
        let scanner = WordScanner::new(PointerWidth::Bits64, Endianness::Little);
        let region = region(&[0, 0x4000, 5, 0x4000, 0, 0x4000]);
        assert_eq!(
            scanner.find_word_pair(&region, 0, 0x4000),
            vec![Address::new(0x1008), Address::new(0x1028)]
        );
    }

    #[test]
    fn test_word_pairs_stop_before_last_word() {
        let scanner = WordScanner::new(PointerWidth::Bits64, Endianness::Little);
        let region = region(&[7, 8, 9]);
        let pairs: Vec<_> = scanner.word_pairs(&region).collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[1], (Address::new(0x1008), 8, 9));
    }
}
