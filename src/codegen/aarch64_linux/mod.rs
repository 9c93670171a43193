/// ARM64 Linux trampoline encoder
///
/// Syscall number in x8, arguments in x0/x1/x2, trap with `svc #0`.
/// AAPCS64 passes the first three arguments in x0-x2 and treats x8 as a
/// scratch register, so the trampolines only have to load x8.
mod instructions;

use crate::codegen::backend::StubBuilder;
use crate::codegen::{EntryCall, Encoded, ProgramLayout, Target, TrampolineBackend};
use instructions::Cond;

const SYS_WRITE: u16 = 64;
const SYS_EXIT: u16 = 93;

/// EM_AARCH64
const ELF_MACHINE: u16 = 183;

const NUMBER_REG: u8 = 8;
// x9/x10 are caller-saved temporaries
const STATUS_REG: u8 = 9;
const FALLBACK_REG: u8 = 10;

pub struct Aarch64Linux;

impl TrampolineBackend for Aarch64Linux {
    fn target(&self) -> Target {
        Target::Aarch64Linux
    }

    fn elf_machine(&self) -> u16 {
        ELF_MACHINE
    }

    fn exit_with_sequence(&self) -> Vec<Encoded> {
        vec![instructions::movz(NUMBER_REG, SYS_EXIT, 0), instructions::svc(0)]
    }

    fn write_sequence(&self) -> Vec<Encoded> {
        vec![instructions::movz(NUMBER_REG, SYS_WRITE, 0), instructions::svc(0), instructions::ret()]
    }

    fn entry_stub(&self, call: &EntryCall, layout: &ProgramLayout) -> Vec<Encoded> {
        let mut stub = StubBuilder::new(layout.stub);

        stub.extend(instructions::mov_imm64(0, call.fd));
        stub.extend(instructions::mov_imm64(1, layout.message));
        stub.extend(instructions::mov_imm64(2, call.count));
        let site = stub.here();
        stub.push(instructions::bl(site, layout.write));

        stub.extend(instructions::mov_imm64(STATUS_REG, call.status as u64));
        stub.push(instructions::movz(FALLBACK_REG, 1, 0));
        stub.push(instructions::cmp_imm(0, 0));
        stub.push(instructions::csel(0, STATUS_REG, FALLBACK_REG, Cond::Ge));

        let site = stub.here();
        stub.push(instructions::bl(site, layout.exit_with));

        stub.finish()
    }
}
