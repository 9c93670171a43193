/// AArch64 instruction generation
/// Every instruction is one 32-bit little-endian word
use crate::codegen::Encoded;

/// Condition codes used by `csel`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cond {
    Ge = 0b1010,
}

impl Cond {
    fn name(self) -> &'static str {
        match self {
            Cond::Ge => "ge",
        }
    }
}

/// movz xd, #imm16, lsl #(16 * hw)
pub fn movz(rd: u8, imm16: u16, hw: u8) -> Encoded {
    let word = 0xd280_0000 | (u32::from(hw & 0x3) << 21) | (u32::from(imm16) << 5) | u32::from(rd & 0x1f);
    let mnemonic = if hw == 0 {
        format!("mov x{}, #{}", rd, imm16)
    } else {
        format!("movz x{}, #{:#x}, lsl #{}", rd, imm16, 16 * u32::from(hw))
    };
    Encoded::word(word, mnemonic)
}

/// movk xd, #imm16, lsl #(16 * hw)
pub fn movk(rd: u8, imm16: u16, hw: u8) -> Encoded {
    let word = 0xf280_0000 | (u32::from(hw & 0x3) << 21) | (u32::from(imm16) << 5) | u32::from(rd & 0x1f);
    Encoded::word(word, format!("movk x{}, #{:#x}, lsl #{}", rd, imm16, 16 * u32::from(hw)))
}

/// Full 64-bit immediate load: movz + three movk, always 16 bytes
pub fn mov_imm64(rd: u8, value: u64) -> [Encoded; 4] {
    let half = |hw: u8| (value >> (16 * u32::from(hw))) as u16;
    [movz(rd, half(0), 0), movk(rd, half(1), 1), movk(rd, half(2), 2), movk(rd, half(3), 3)]
}

pub fn svc(imm16: u16) -> Encoded {
    Encoded::word(0xd400_0001 | (u32::from(imm16) << 5), format!("svc #{}", imm16))
}

pub fn ret() -> Encoded {
    Encoded::word(0xd65f_03c0, "ret")
}

/// bl from `site` to `target`; both must be 4-byte aligned and within +-128MiB
pub fn bl(site: u64, target: u64) -> Encoded {
    let offset = (target as i64 - site as i64) >> 2;
    Encoded::word(0x9400_0000 | (offset as u32 & 0x03ff_ffff), format!("bl {:#x}", target))
}

/// cmp xn, #imm12 (subs xzr, xn, #imm12)
pub fn cmp_imm(rn: u8, imm12: u16) -> Encoded {
    let word = 0xf100_001f | (u32::from(imm12 & 0xfff) << 10) | (u32::from(rn & 0x1f) << 5);
    Encoded::word(word, format!("cmp x{}, #{}", rn, imm12))
}

/// csel xd, xn, xm, cond
pub fn csel(rd: u8, rn: u8, rm: u8, cond: Cond) -> Encoded {
    let word = 0x9a80_0000 | (u32::from(rm & 0x1f) << 16) | ((cond as u32) << 12) | (u32::from(rn & 0x1f) << 5) | u32::from(rd & 0x1f);
    Encoded::word(word, format!("csel x{}, x{}, x{}, {}", rd, rn, rm, cond.name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movz_syscall_numbers() {
        assert_eq!(movz(8, 93, 0).bytes, vec![0xa8, 0x0b, 0x80, 0xd2]);
        assert_eq!(movz(8, 64, 0).bytes, vec![0x08, 0x08, 0x80, 0xd2]);
        assert_eq!(movz(8, 93, 0).mnemonic, "mov x8, #93");
    }

    #[test]
    fn svc_zero() {
        assert_eq!(svc(0).bytes, vec![0x01, 0x00, 0x00, 0xd4]);
    }

    #[test]
    fn ret_x30() {
        assert_eq!(ret().bytes, vec![0xc0, 0x03, 0x5f, 0xd6]);
    }

    #[test]
    fn mov_imm64_splits_halfwords() {
        let words: Vec<u32> = mov_imm64(1, 0x0000_0000_0040_00cc)
            .iter()
            .map(|inst| u32::from_le_bytes([inst.bytes[0], inst.bytes[1], inst.bytes[2], inst.bytes[3]]))
            .collect();
        assert_eq!(words, vec![0xd280_1981, 0xf2a0_0801, 0xf2c0_0001, 0xf2e0_0001]);
    }

    #[test]
    fn bl_encodes_word_offsets() {
        assert_eq!(bl(0x1000, 0x1008).bytes, vec![0x02, 0x00, 0x00, 0x94]);
        assert_eq!(bl(0x1008, 0x1000).bytes, vec![0xfe, 0xff, 0xff, 0x97]);
    }

    #[test]
    fn compare_and_select() {
        assert_eq!(cmp_imm(0, 0).bytes, 0xf100_001fu32.to_le_bytes().to_vec());
        assert_eq!(csel(0, 9, 10, Cond::Ge).bytes, 0x9a8a_a120u32.to_le_bytes().to_vec());
    }
}
