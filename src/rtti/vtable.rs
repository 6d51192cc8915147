// Fri Jan 16 2026 - Alex

use crate::memory::{Address, MemoryImage, WordScanner};
use log::debug;

/// Finds the vtable that refers to a type_info record.
///
/// A primary vtable without virtual bases starts with a zero offset-to-top
/// followed by the type_info pointer, so the locator looks for the word pair
/// `(0, type_info)`. The pair can also occur by accident in unrelated data;
/// when several candidates exist the last one scanned is taken.
pub struct VTableLocator<'a> {
    image: &'a dyn MemoryImage,
    scanner: WordScanner,
}

impl<'a> VTableLocator<'a> {
    pub fn new(image: &'a dyn MemoryImage) -> Self {
        Self {
            image,
            scanner: WordScanner::for_image(image),
        }
    }

    /// Address of the type_info slot of the matching vtable.
    pub fn locate(&self, type_info: Address) -> Option<Address> {
        let candidates = self.candidates(type_info);
        if candidates.len() > 1 {
            debug!(
                "{} vtable candidates for {}, using {}",
                candidates.len(),
                type_info,
                candidates[candidates.len() - 1]
            );
        }
        candidates.last().copied()
    }

    pub fn candidates(&self, type_info: Address) -> Vec<Address> {
        self.image
            .scan_regions()
            .into_iter()
            .flat_map(|region| self.scanner.find_word_pair(region, 0, type_info.as_u64()))
            .collect()
    }
}
