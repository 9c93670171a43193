/// x86-64 instruction generation
/// Each function encodes one instruction used by the trampolines or the entry stub
use crate::codegen::Encoded;

/// General-purpose registers the trampolines touch, by ModRM register number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reg {
    Rax = 0,
    Rdx = 2,
    Rsi = 6,
    Rdi = 7,
}

impl Reg {
    pub fn name(self) -> &'static str {
        match self {
            Reg::Rax => "rax",
            Reg::Rdx => "rdx",
            Reg::Rsi => "rsi",
            Reg::Rdi => "rdi",
        }
    }
}

/// mov r64, imm32 (sign-extended)
pub fn mov_imm32(reg: Reg, value: i32) -> Encoded {
    let mut code = vec![0x48, 0xc7, 0xc0 | reg as u8]; // REX.W C7 /0
    code.extend_from_slice(&value.to_le_bytes());
    Encoded::new(code, format!("mov {}, {}", reg.name(), value))
}

/// movabs r64, imm64 (always 10 bytes)
pub fn movabs(reg: Reg, value: u64) -> Encoded {
    let mut code = vec![0x48, 0xb8 + reg as u8]; // REX.W B8+r
    code.extend_from_slice(&value.to_le_bytes());
    Encoded::new(code, format!("movabs {}, {:#x}", reg.name(), value))
}

/// mov edi, imm32 (zero-extends into rdi)
pub fn mov_edi_imm32(value: u32) -> Encoded {
    let mut code = vec![0xbf];
    code.extend_from_slice(&value.to_le_bytes());
    Encoded::new(code, format!("mov edi, {}", value))
}

pub fn syscall() -> Encoded {
    Encoded::new(vec![0x0f, 0x05], "syscall")
}

pub fn ret() -> Encoded {
    Encoded::new(vec![0xc3], "ret")
}

pub fn test_rax_rax() -> Encoded {
    Encoded::new(vec![0x48, 0x85, 0xc0], "test rax, rax")
}

/// jns rel8, relative to the end of this 2-byte instruction
pub fn jns_rel8(offset: i8) -> Encoded {
    Encoded::new(vec![0x79, offset as u8], format!("jns {:+}", offset))
}

/// call rel32 from `site` (address of the call) to `target`
pub fn call(site: u64, target: u64) -> Encoded {
    let rel = (target as i64 - (site as i64 + 5)) as i32;
    let mut code = vec![0xe8];
    code.extend_from_slice(&rel.to_le_bytes());
    Encoded::new(code, format!("call {:#x}", target))
}
