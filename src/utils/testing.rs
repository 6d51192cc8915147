// Tue Jan 13 2026 - Alex

use crate::memory::{Address, Endianness, MemoryImage, MemorySnapshot, PointerWidth, RegionKind};
use crate::rtti::TypeInfoKind;
use crate::symbol::SymbolTable;

pub const DATA_BASE: u64 = 0x10000;
pub const RODATA_BASE: u64 = 0x40000;
pub const TEXT_BASE: u64 = 0x80000;
pub const EXTERN_BASE: u64 = 0x90000;

const TEXT_SIZE: usize = 0x100;

/// Runtime type_info classes laid out as libstdc++ does, without symbols.
pub struct AbiRuntime {
    pub class_vtable: Address,
    pub si_vtable: Address,
    pub vmi_vtable: Address,
    pub type_info: Address,
    pub class_type_info: Address,
    pub si_class_type_info: Address,
    pub vmi_class_type_info: Address,
}

/// Lays out type_info records, vtables and names the way GCC emits them,
/// into a snapshot with one data, one rodata and one text section.
pub struct ImageBuilder {
    width: PointerWidth,
    endian: Endianness,
    data: Vec<u8>,
    rodata: Vec<u8>,
    externs: usize,
    symbols: Vec<(String, Address)>,
}

impl ImageBuilder {
    pub fn new() -> Self {
        Self::with_width(PointerWidth::Bits64)
    }

    pub fn with_width(width: PointerWidth) -> Self {
        Self {
            width,
            endian: Endianness::Little,
            data: Vec::new(),
            rodata: Vec::new(),
            externs: 0,
            symbols: Vec::new(),
        }
    }

    pub fn pointer_size(&self) -> u64 {
        self.width.bytes_u64()
    }

    /// Address of the first virtual function slot of a vtable group.
    pub fn entry(&self, vtable: Address) -> u64 {
        vtable.as_u64() + 2 * self.pointer_size()
    }

    pub fn function(&self) -> u64 {
        TEXT_BASE
    }

    pub fn string(&mut self, text: &str) -> Address {
        let mut bytes = text.as_bytes().to_vec();
        bytes.push(0);
        self.bytes(&bytes)
    }

    pub fn bytes(&mut self, bytes: &[u8]) -> Address {
        let address = Address::new(RODATA_BASE + self.rodata.len() as u64);
        self.rodata.extend_from_slice(bytes);
        address
    }

    pub fn words(&mut self, words: &[u64]) -> Address {
        let bytes: Vec<u8> = words
            .iter()
            .flat_map(|&w| self.endian.encode_word(w, self.width))
            .collect();
        self.raw(&bytes)
    }

    pub fn set_word(&mut self, address: Address, value: u64) {
        let offset = (address.as_u64() - DATA_BASE) as usize;
        let bytes = self.endian.encode_word(value, self.width);
        self.data[offset..offset + bytes.len()].copy_from_slice(&bytes);
    }

    pub fn symbol(&mut self, name: &str, address: Address) {
        self.symbols.push((name.to_string(), address));
    }

    /// Reserves an import slot and binds `name` to it.
    pub fn extern_symbol(&mut self, name: &str) -> Address {
        let address = Address::new(EXTERN_BASE + self.externs as u64 * self.pointer_size());
        self.externs += 1;
        self.symbol(name, address);
        address
    }

    /// `{0, 0, f, f}`; the type_info slot can be patched later.
    pub fn vtable_group(&mut self) -> Address {
        let f = self.function();
        self.words(&[0, 0, f, f])
    }

    pub fn kind_vtable(&mut self, kind: TypeInfoKind) -> Address {
        let vtable = self.vtable_group();
        let name = kind.vtable_symbol();
        self.symbol(&name[1..], vtable);
        vtable
    }

    /// Primary vtable `{0, record, f}` pointing back at a type_info record.
    pub fn vtable_for(&mut self, record: Address) -> Address {
        let f = self.function();
        self.words(&[0, record.as_u64(), f])
    }

    pub fn class_record(&mut self, kind_vtable: Address, name: &str) -> Address {
        let name = self.string(name);
        let entry = self.entry(kind_vtable);
        self.words(&[entry, name.as_u64()])
    }

    pub fn si_record(&mut self, kind_vtable: Address, name: &str, base: Address) -> Address {
        let name = self.string(name);
        let entry = self.entry(kind_vtable);
        self.words(&[entry, name.as_u64(), base.as_u64()])
    }

    /// Each base is `(type_info, offset_flags)`.
    pub fn vmi_record(
        &mut self,
        kind_vtable: Address,
        name: &str,
        flags: u32,
        bases: &[(Address, u64)],
    ) -> Address {
        let name = self.string(name);
        let entry = self.entry(kind_vtable);
        let mut bytes = Vec::new();
        bytes.extend(self.endian.encode_word(entry, self.width));
        bytes.extend(self.endian.encode_word(name.as_u64(), self.width));
        bytes.extend(self.dword(flags));
        bytes.extend(self.dword(bases.len() as u32));
        for &(base, offset_flags) in bases {
            bytes.extend(self.endian.encode_word(base.as_u64(), self.width));
            bytes.extend(self.endian.encode_word(offset_flags, self.width));
        }
        self.raw(&bytes)
    }

    pub fn class(&mut self, kind_vtable: Address, name: &str) -> Address {
        let record = self.class_record(kind_vtable, name);
        self.vtable_for(record);
        record
    }

    pub fn si_class(&mut self, kind_vtable: Address, name: &str, base: Address) -> Address {
        let record = self.si_record(kind_vtable, name, base);
        self.vtable_for(record);
        record
    }

    pub fn vmi_class(&mut self, kind_vtable: Address, name: &str, bases: &[(Address, u64)]) -> Address {
        let record = self.vmi_record(kind_vtable, name, 0, bases);
        self.vtable_for(record);
        record
    }

    /// `std::type_info` and the three `__cxxabiv1` record classes, each
    /// reachable only through its name string.
    pub fn abi_runtime(&mut self) -> AbiRuntime {
        let class_vtable = self.vtable_group();
        let si_vtable = self.vtable_group();
        let vmi_vtable = self.vtable_group();

        let type_info = self.class(class_vtable, TypeInfoKind::TypeInfo.mangled_name());
        let class_type_info =
            self.si_record(si_vtable, TypeInfoKind::Class.mangled_name(), type_info);
        let si_class_type_info =
            self.si_record(si_vtable, TypeInfoKind::SiClass.mangled_name(), class_type_info);
        let vmi_class_type_info =
            self.si_record(si_vtable, TypeInfoKind::VmiClass.mangled_name(), class_type_info);

        let ptr = self.pointer_size();
        self.set_word(class_vtable + ptr, class_type_info.as_u64());
        self.set_word(si_vtable + ptr, si_class_type_info.as_u64());
        self.set_word(vmi_vtable + ptr, vmi_class_type_info.as_u64());

        AbiRuntime {
            class_vtable,
            si_vtable,
            vmi_vtable,
            type_info,
            class_type_info,
            si_class_type_info,
            vmi_class_type_info,
        }
    }

    pub fn build(&self) -> (MemorySnapshot, SymbolTable) {
        let mut builder = MemorySnapshot::builder(self.width, self.endian);
        let mut data = self.data.clone();
        if data.is_empty() {
            data.resize(self.width.bytes(), 0);
        }
        let mut rodata = self.rodata.clone();
        if rodata.is_empty() {
            rodata.push(0);
        }
        builder
            .add_region(".data.rel.ro", RegionKind::Data, Address::new(DATA_BASE), data.len() as u64, data)
            .and_then(|b| {
                b.add_region(".rodata", RegionKind::Const, Address::new(RODATA_BASE), rodata.len() as u64, rodata)
            })
            .and_then(|b| {
                b.add_region(".text", RegionKind::Code, Address::new(TEXT_BASE), TEXT_SIZE as u64, vec![0xC3; TEXT_SIZE])
            })
            .expect("fixture regions are disjoint");
        if self.externs > 0 {
            let size = self.externs as u64 * self.pointer_size();
            builder
                .add_region("extern", RegionKind::Extern, Address::new(EXTERN_BASE), size, Vec::new())
                .expect("extern region is disjoint");
        }
        let snapshot = builder.build();

        let mut table = SymbolTable::new();
        for (name, address) in &self.symbols {
            table.insert_numbered(*address, name);
        }
        (snapshot, table)
    }

    fn raw(&mut self, bytes: &[u8]) -> Address {
        let align = self.width.bytes();
        while self.data.len() % align != 0 {
            self.data.push(0);
        }
        let address = Address::new(DATA_BASE + self.data.len() as u64);
        self.data.extend_from_slice(bytes);
        address
    }

    fn dword(&self, value: u32) -> [u8; 4] {
        match self.endian {
            Endianness::Little => value.to_le_bytes(),
            Endianness::Big => value.to_be_bytes(),
        }
    }
}

impl Default for ImageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads a word back out of a built image.
pub fn word_at(image: &dyn MemoryImage, address: Address) -> u64 {
    image
        .read_pointer(address)
        .map(|a| a.as_u64())
        .unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_record_layout() {
        let mut builder = ImageBuilder::new();
        let kind = builder.kind_vtable(TypeInfoKind::Class);
        let record = builder.class(kind, "1A");
        let (snapshot, table) = builder.build();

        assert_eq!(word_at(&snapshot, record), kind.as_u64() + 16);
        let name = Address::new(word_at(&snapshot, record + 8));
        assert_eq!(snapshot.read_bounded_string(name, 16), b"1A".to_vec());
        assert_eq!(word_at(&snapshot, record + 24), record.as_u64());
        assert_eq!(
            table.resolve("_ZTVN10__cxxabiv117__class_type_infoE"),
            Some(kind)
        );
    }

    #[test]
    fn test_vmi_record_layout_32bit() {
        let mut builder = ImageBuilder::with_width(PointerWidth::Bits32);
        let kind = builder.kind_vtable(TypeInfoKind::VmiClass);
        let record = builder.vmi_record(kind, "1C", 2, &[(Address::new(0x10), 0x401)]);
        let (snapshot, _) = builder.build();

        assert_eq!(snapshot.read_u32(record + 8).unwrap(), 2);
        assert_eq!(snapshot.read_u32(record + 12).unwrap(), 1);
        assert_eq!(word_at(&snapshot, record + 16), 0x10);
        assert_eq!(word_at(&snapshot, record + 20), 0x401);
    }
}
