// Wed Jan 15 2026 - Alex

use crate::memory::{Address, Endianness, MemoryError, MemoryRegion, PointerWidth};

/// Read-only view of a loaded program image.
pub trait MemoryImage {
    fn pointer_width(&self) -> PointerWidth;
    fn endianness(&self) -> Endianness;
    fn regions(&self) -> &[MemoryRegion];

    fn read_pointer(&self, addr: Address) -> Result<Address, MemoryError>;
    fn read_u32(&self, addr: Address) -> Result<u32, MemoryError>;

    /// Bytes up to the first NUL or `max_len`, empty when unreadable.
    fn read_bounded_string(&self, addr: Address, max_len: usize) -> Vec<u8>;

    fn is_code(&self, addr: Address) -> bool;
    fn is_loaded(&self, addr: Address) -> bool;
    fn is_special(&self, addr: Address) -> bool;

    /// Data and const regions, the only ones the RTTI scans walk.
    fn scan_regions(&self) -> Vec<&MemoryRegion> {
        self.regions()
            .iter()
            .filter(|region| region.kind().is_scanned())
            .collect()
    }

    fn region_containing(&self, addr: Address) -> Option<&MemoryRegion> {
        self.regions().iter().find(|region| region.contains(addr))
    }

    fn pointer_size(&self) -> u64 {
        self.pointer_width().bytes_u64()
    }

    fn is_bad_address(&self, addr: Address) -> bool {
        addr.is_null()
            || addr.is_bad()
            || addr.as_u64() == self.pointer_width().sentinel()
            || self.is_special(addr)
            || !self.is_loaded(addr)
    }
}
