/// x86-64 Linux trampoline encoder
///
/// Syscall number in rax, arguments in rdi/rsi/rdx, trap with `syscall`.
/// The System V C convention passes the first three arguments in the same
/// registers, so the trampolines only have to load rax.
mod instructions;

use crate::codegen::backend::StubBuilder;
use crate::codegen::{EntryCall, Encoded, ProgramLayout, Target, TrampolineBackend};
use instructions::Reg;

const SYS_WRITE: i32 = 1;
const SYS_EXIT: i32 = 60;

/// EM_X86_64
const ELF_MACHINE: u16 = 62;

pub struct X86_64Linux;

impl TrampolineBackend for X86_64Linux {
    fn target(&self) -> Target {
        Target::X86_64Linux
    }

    fn elf_machine(&self) -> u16 {
        ELF_MACHINE
    }

    fn exit_with_sequence(&self) -> Vec<Encoded> {
        vec![instructions::mov_imm32(Reg::Rax, SYS_EXIT), instructions::syscall()]
    }

    fn write_sequence(&self) -> Vec<Encoded> {
        vec![instructions::mov_imm32(Reg::Rax, SYS_WRITE), instructions::syscall(), instructions::ret()]
    }

    fn entry_stub(&self, call: &EntryCall, layout: &ProgramLayout) -> Vec<Encoded> {
        let mut stub = StubBuilder::new(layout.stub);

        stub.push(instructions::movabs(Reg::Rdi, call.fd));
        stub.push(instructions::movabs(Reg::Rsi, layout.message));
        stub.push(instructions::movabs(Reg::Rdx, call.count));
        let site = stub.here();
        stub.push(instructions::call(site, layout.write));

        // movabs leaves flags alone, so the test still sees write's result
        stub.push(instructions::movabs(Reg::Rdi, call.status as u64));
        stub.push(instructions::test_rax_rax());
        let fallback = instructions::mov_edi_imm32(1);
        stub.push(instructions::jns_rel8(fallback.bytes.len() as i8));
        stub.push(fallback);

        let site = stub.here();
        stub.push(instructions::call(site, layout.exit_with));

        stub.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::flatten;

    #[test]
    fn exit_with_golden_sequence() {
        assert_eq!(X86_64Linux.exit_with(), vec![0x48, 0xc7, 0xc0, 0x3c, 0x00, 0x00, 0x00, 0x0f, 0x05]);
    }

    #[test]
    fn write_golden_sequence() {
        assert_eq!(X86_64Linux.write(), vec![0x48, 0xc7, 0xc0, 0x01, 0x00, 0x00, 0x00, 0x0f, 0x05, 0xc3]);
    }

    #[test]
    fn trampolines_follow_the_abi_table() {
        let abi = Target::X86_64Linux.abi();
        let exit = X86_64Linux.exit_with_sequence();
        assert_eq!(exit[0].mnemonic, format!("mov {}, {}", abi.number_register, abi.exit_number));
        assert_eq!(exit.last().unwrap().mnemonic, abi.trap);

        let write = X86_64Linux.write_sequence();
        assert_eq!(write[0].mnemonic, format!("mov {}, {}", abi.number_register, abi.write_number));
        assert_eq!(write[1].mnemonic, abi.trap);
    }

    #[test]
    fn entry_stub_loads_arguments_in_order() {
        let call = EntryCall { fd: 1, count: 5, status: 0 };
        let layout = ProgramLayout { stub: 0x400078, write: 0x4000b4, exit_with: 0x4000c0, message: 0x4000cc };
        let stub = X86_64Linux.entry_stub(&call, &layout);

        let mnemonics: Vec<&str> = stub.iter().map(|inst| inst.mnemonic.as_str()).collect();
        assert_eq!(
            mnemonics,
            vec![
                "movabs rdi, 0x1",
                "movabs rsi, 0x4000cc",
                "movabs rdx, 0x5",
                "call 0x4000b4",
                "movabs rdi, 0x0",
                "test rax, rax",
                "jns +5",
                "mov edi, 1",
                "call 0x4000c0",
            ]
        );
        assert_eq!(flatten(&stub).len(), 60);
    }

    #[test]
    fn entry_stub_size_is_independent_of_arguments() {
        let call = EntryCall { fd: u64::MAX, count: 1 << 40, status: -1 };
        let layout = ProgramLayout { stub: 0x400078, write: 0x7fff_0000, exit_with: 0x400000, message: u64::MAX };
        assert_eq!(flatten(&X86_64Linux.entry_stub(&call, &layout)).len(), X86_64Linux.entry_stub_size());
    }
}
