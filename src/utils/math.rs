// Tue Jan 13 2026 - Alex

pub struct MathUtils;

impl MathUtils {
    /// Interprets the low `from_bits` bits of `value` as two's complement.
    pub fn sign_extend(value: u64, from_bits: u32) -> i64 {
        if from_bits == 0 {
            return 0;
        }
        if from_bits >= 64 {
            return value as i64;
        }
        let value = Self::zero_extend(value, from_bits);
        let sign_bit = 1u64 << (from_bits - 1);
        if value & sign_bit != 0 {
            (value | !((1u64 << from_bits) - 1)) as i64
        } else {
            value as i64
        }
    }

    pub fn zero_extend(value: u64, from_bits: u32) -> u64 {
        if from_bits >= 64 {
            return value;
        }
        value & ((1u64 << from_bits) - 1)
    }
}

pub fn sign_extend(value: u64, from_bits: u32) -> i64 {
    MathUtils::sign_extend(value, from_bits)
}

/// Base-subobject offsets in `__vmi_class_type_info` are 24-bit two's complement.
pub fn sign_extend_24(value: u64) -> i64 {
    MathUtils::sign_extend(value, 24)
}
