/*!
branch.rs - JMP/Jcc/CALL/Ccc/RET/Rcc/RST/PCHL.

Every handler here either sets `regs.pc` directly and reports a width of
0 (so the dispatcher's "advance PC by width" step is a no-op), or leaves
`regs.pc` alone and reports the instruction's real width for the
dispatcher to add. Conditional forms that don't take the branch still
fall through the opcode's own length (spec §4.2/§9's "control-transfer
handlers return 0" design note).
*/

use crate::cpu::operand::{condition, imm16};
use crate::cpu::stack::{pop_u16, push_u16};
use crate::cpu::state::Registers;
use crate::memory::Memory;

pub(crate) fn handle(opcode: u8, regs: &mut Registers, mem: &mut Memory) -> Option<u16> {
    match opcode {
        0xC3 => {
            // JMP addr
            regs.pc = imm16(mem, regs.pc);
            Some(0)
        }
        0xCD => {
            // CALL addr
            let ret = regs.pc.wrapping_add(3);
            push_u16(regs, mem, ret);
            regs.pc = imm16(mem, regs.pc);
            Some(0)
        }
        0xC9 => {
            // RET
            regs.pc = pop_u16(regs, mem);
            Some(0)
        }
        0xE9 => {
            // PCHL
            regs.pc = regs.hl();
            Some(0)
        }
        opcode if opcode & 0xC7 == 0xC7 => {
            // RST n
            let n = (opcode >> 3) & 0x07;
            let ret = regs.pc.wrapping_add(1);
            push_u16(regs, mem, ret);
            regs.pc = (n as u16) * 8;
            Some(0)
        }
        opcode if opcode & 0xC7 == 0xC2 => {
            // Jcc addr
            if condition(&regs.flags, (opcode >> 3) & 0x07) {
                regs.pc = imm16(mem, regs.pc);
                Some(0)
            } else {
                Some(3)
            }
        }
        opcode if opcode & 0xC7 == 0xC4 => {
            // Ccc addr
            if condition(&regs.flags, (opcode >> 3) & 0x07) {
                let ret = regs.pc.wrapping_add(3);
                push_u16(regs, mem, ret);
                regs.pc = imm16(mem, regs.pc);
                Some(0)
            } else {
                Some(3)
            }
        }
        opcode if opcode & 0xC7 == 0xC0 => {
            // Rcc
            if condition(&regs.flags, (opcode >> 3) & 0x07) {
                regs.pc = pop_u16(regs, mem);
                Some(0)
            } else {
                Some(1)
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jmp_sets_pc_directly() {
        let mut regs = Registers::new();
        let mut mem = Memory::new();
        mem.write(0x0100, 0xC3);
        mem.write(0x0101, 0x00);
        mem.write(0x0102, 0x04);
        regs.pc = 0x0100;
        let width = handle(0xC3, &mut regs, &mut mem).unwrap();
        assert_eq!(width, 0);
        assert_eq!(regs.pc, 0x0400);
    }

    #[test]
    fn call_pushes_return_address_after_the_instruction() {
        let mut regs = Registers::new();
        let mut mem = Memory::new();
        mem.write(0x0100, 0xCD);
        mem.write(0x0101, 0x00);
        mem.write(0x0102, 0x04);
        regs.pc = 0x0100;
        regs.sp = 0x3000;
        handle(0xCD, &mut regs, &mut mem);
        assert_eq!(regs.pc, 0x0400);
        assert_eq!(pop_u16(&mut regs, &mem), 0x0103);
    }

    #[test]
    fn conditional_jump_falls_through_when_not_taken() {
        let mut regs = Registers::new();
        let mut mem = Memory::new();
        regs.pc = 0x0100;
        regs.flags.z = false;
        // JZ, condition field 1 -> not taken since Z is clear.
        let width = handle(0xCA, &mut regs, &mut mem).unwrap();
        assert_eq!(width, 3);
        assert_eq!(regs.pc, 0x0100);
    }

    #[test]
    fn rst_vector_is_n_times_eight() {
        let mut regs = Registers::new();
        let mut mem = Memory::new();
        regs.pc = 0x0050;
        regs.sp = 0x3000;
        handle(0xCF, &mut regs, &mut mem); // RST 1
        assert_eq!(regs.pc, 0x0008);
        assert_eq!(pop_u16(&mut regs, &mem), 0x0051);
    }

    #[test]
    fn pchl_jumps_to_hl() {
        let mut regs = Registers::new();
        let mut mem = Memory::new();
        regs.set_hl(0x9000);
        handle(0xE9, &mut regs, &mut mem);
        assert_eq!(regs.pc, 0x9000);
    }
}
