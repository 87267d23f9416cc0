/*!
logical.rs - ANA/XRA/ORA/CMP (register and immediate forms), the four
single-bit rotates, and the three one-byte flag-only opcodes CMA/STC/CMC.
*/

use crate::cpu::alu;
use crate::cpu::operand::{imm8, read_reg};
use crate::cpu::state::Registers;
use crate::memory::Memory;

pub(crate) fn handle(opcode: u8, regs: &mut Registers, mem: &mut Memory) -> Option<u16> {
    match opcode {
        0xA0..=0xA7 => {
            let value = read_reg(regs, mem, opcode & 0x07);
            apply_and(regs, value);
            Some(1)
        }
        0xA8..=0xAF => {
            let value = read_reg(regs, mem, opcode & 0x07);
            apply_xor(regs, value);
            Some(1)
        }
        0xB0..=0xB7 => {
            let value = read_reg(regs, mem, opcode & 0x07);
            apply_or(regs, value);
            Some(1)
        }
        0xB8..=0xBF => {
            let value = read_reg(regs, mem, opcode & 0x07);
            apply_cmp(regs, value);
            Some(1)
        }
        0xE6 => {
            let value = imm8(mem, regs.pc);
            apply_and(regs, value);
            Some(2)
        }
        0xEE => {
            let value = imm8(mem, regs.pc);
            apply_xor(regs, value);
            Some(2)
        }
        0xF6 => {
            let value = imm8(mem, regs.pc);
            apply_or(regs, value);
            Some(2)
        }
        0xFE => {
            let value = imm8(mem, regs.pc);
            apply_cmp(regs, value);
            Some(2)
        }
        0x07 => {
            let (result, cy) = alu::rlc(regs.a);
            regs.a = result;
            regs.flags.cy = cy;
            Some(1)
        }
        0x0F => {
            let (result, cy) = alu::rrc(regs.a);
            regs.a = result;
            regs.flags.cy = cy;
            Some(1)
        }
        0x17 => {
            let (result, cy) = alu::ral(regs.a, regs.flags.cy);
            regs.a = result;
            regs.flags.cy = cy;
            Some(1)
        }
        0x1F => {
            let (result, cy) = alu::rar(regs.a, regs.flags.cy);
            regs.a = result;
            regs.flags.cy = cy;
            Some(1)
        }
        0x2F => {
            // CMA: one's complement A, flags untouched.
            regs.a = !regs.a;
            Some(1)
        }
        0x37 => {
            // STC
            regs.flags.cy = true;
            Some(1)
        }
        0x3F => {
            // CMC
            regs.flags.cy = !regs.flags.cy;
            Some(1)
        }
        _ => None,
    }
}

fn apply_and(regs: &mut Registers, value: u8) {
    let (result, ac) = alu::and(regs.a, value);
    regs.a = result;
    regs.flags.ac = ac;
    regs.flags.cy = false;
    let (z, s, p) = alu::zsp(result);
    regs.flags.z = z;
    regs.flags.s = s;
    regs.flags.p = p;
}

fn apply_xor(regs: &mut Registers, value: u8) {
    let result = alu::xor(regs.a, value);
    regs.a = result;
    regs.flags.ac = false;
    regs.flags.cy = false;
    let (z, s, p) = alu::zsp(result);
    regs.flags.z = z;
    regs.flags.s = s;
    regs.flags.p = p;
}

fn apply_or(regs: &mut Registers, value: u8) {
    let result = alu::or(regs.a, value);
    regs.a = result;
    regs.flags.ac = false;
    regs.flags.cy = false;
    let (z, s, p) = alu::zsp(result);
    regs.flags.z = z;
    regs.flags.s = s;
    regs.flags.p = p;
}

fn apply_cmp(regs: &mut Registers, value: u8) {
    let (result, cy) = alu::cmp(regs.a, value);
    regs.flags.cy = cy;
    regs.flags.ac = false;
    let (z, s, p) = alu::zsp(result);
    regs.flags.z = z;
    regs.flags.s = s;
    regs.flags.p = p;
    // A itself is unchanged by CMP/CPI.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cmp_leaves_accumulator_untouched() {
        let mut regs = Registers::new();
        let mut mem = Memory::new();
        regs.a = 0x42;
        regs.b = 0x42;
        handle(0xB8, &mut regs, &mut mem); // CMP B
        assert_eq!(regs.a, 0x42);
        assert!(regs.flags.z);
        assert!(!regs.flags.cy);
    }

    #[test]
    fn ana_sets_ac_from_or_of_bit3() {
        let mut regs = Registers::new();
        let mut mem = Memory::new();
        regs.a = 0x08;
        regs.b = 0x00;
        handle(0xA0, &mut regs, &mut mem); // ANA B
        assert_eq!(regs.a, 0x00);
        assert!(regs.flags.ac);
        assert!(!regs.flags.cy);
    }

    #[test]
    fn cma_does_not_touch_flags() {
        let mut regs = Registers::new();
        let mut mem = Memory::new();
        regs.flags.z = true;
        regs.a = 0x0F;
        handle(0x2F, &mut regs, &mut mem);
        assert_eq!(regs.a, 0xF0);
        assert!(regs.flags.z);
    }

    #[test]
    fn stc_cmc_toggle_carry_only() {
        let mut regs = Registers::new();
        let mut mem = Memory::new();
        handle(0x37, &mut regs, &mut mem);
        assert!(regs.flags.cy);
        handle(0x3F, &mut regs, &mut mem);
        assert!(!regs.flags.cy);
        handle(0x3F, &mut regs, &mut mem);
        assert!(regs.flags.cy);
    }

    #[test]
    fn rar_rotates_through_carry_not_bit7() {
        let mut regs = Registers::new();
        let mut mem = Memory::new();
        regs.a = 0x01;
        regs.flags.cy = true;
        handle(0x1F, &mut regs, &mut mem); // RAR
        assert_eq!(regs.a, 0x80);
        assert!(regs.flags.cy); // old bit0 of A
    }
}
