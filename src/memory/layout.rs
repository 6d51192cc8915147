// Wed Jan 14 2026 - Alex

use std::fmt;

/// Native pointer size of the analysed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerWidth {
    Bits32,
    Bits64,
}

impl PointerWidth {
    pub fn bytes(&self) -> usize {
        match self {
            PointerWidth::Bits32 => 4,
            PointerWidth::Bits64 => 8,
        }
    }

    pub fn bytes_u64(&self) -> u64 {
        self.bytes() as u64
    }

    /// All-ones pointer value, treated as a bad address.
    pub fn sentinel(&self) -> u64 {
        match self {
            PointerWidth::Bits32 => u32::MAX as u64,
            PointerWidth::Bits64 => u64::MAX,
        }
    }
}

impl fmt::Display for PointerWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerWidth::Bits32 => write!(f, "32-bit"),
            PointerWidth::Bits64 => write!(f, "64-bit"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endianness {
    Little,
    Big,
}

impl Endianness {
    pub fn read_u32(&self, bytes: &[u8]) -> Option<u32> {
        let raw: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
        Some(match self {
            Endianness::Little => u32::from_le_bytes(raw),
            Endianness::Big => u32::from_be_bytes(raw),
        })
    }

    pub fn read_u64(&self, bytes: &[u8]) -> Option<u64> {
        let raw: [u8; 8] = bytes.get(..8)?.try_into().ok()?;
        Some(match self {
            Endianness::Little => u64::from_le_bytes(raw),
            Endianness::Big => u64::from_be_bytes(raw),
        })
    }

    /// Decodes one pointer-sized word from the front of `bytes`.
    pub fn read_word(&self, bytes: &[u8], width: PointerWidth) -> Option<u64> {
        match width {
            PointerWidth::Bits32 => self.read_u32(bytes).map(u64::from),
            PointerWidth::Bits64 => self.read_u64(bytes),
        }
    }

    pub fn encode_word(&self, value: u64, width: PointerWidth) -> Vec<u8> {
        match (width, self) {
            (PointerWidth::Bits32, Endianness::Little) => (value as u32).to_le_bytes().to_vec(),
            (PointerWidth::Bits32, Endianness::Big) => (value as u32).to_be_bytes().to_vec(),
            (PointerWidth::Bits64, Endianness::Little) => value.to_le_bytes().to_vec(),
            (PointerWidth::Bits64, Endianness::Big) => value.to_be_bytes().to_vec(),
        }
    }
}
