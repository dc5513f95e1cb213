//! Unconditional jumps, calls and returns (spec §6): RJMP, RCALL, JMP,
//! CALL, IJMP, RET.
//!
//! Spec §9's open questions flag two inconsistencies in
//! `original_source/instructions.py` here: `JMP` carries `pc_post_inc=2`
//! alongside an operation that already does an absolute `SetPC`, and
//! `IJMP` omits a `pc_post_inc` override entirely (defaulting to 1) despite
//! also setting PC absolutely. Both would double-advance PC past the
//! intended target. This table (`table.rs`) gives both `pc_post_inc = 0`,
//! matching `CALL`/`RET`, which the source already gets right. `RJMP` and
//! `RCALL` are *not* bugged -- their relative-to-next-instruction semantics
//! genuinely need the default `pc_post_inc = 1` added on top of the operand
//! offset, and that is what real AVR silicon does.

use crate::bits;
use crate::engine::{ExecOutput, Operands};
use crate::error::Error;
use crate::machine::Machine;

pub fn rjmp(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let delta = bits::to_signed(ops.k, 12);
    m.set_pc((m.get_pc() as i32 + delta) as u32);
    Ok(ExecOutput::default())
}

pub fn rcall(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let return_addr = m.get_pc().wrapping_add(1) & m.pc_mask();
    m.push_stack16(return_addr)?;
    let delta = bits::to_signed(ops.k, 12);
    m.set_pc((m.get_pc() as i32 + delta) as u32);
    Ok(ExecOutput::default())
}

pub fn jmp(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    m.set_pc(ops.k);
    Ok(ExecOutput::default())
}

pub fn call(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let return_addr = m.get_pc().wrapping_add(2) & m.pc_mask();
    m.push_stack16(return_addr)?;
    m.set_pc(ops.k);
    Ok(ExecOutput::default())
}

pub fn ijmp(m: &mut Machine, _ops: &Operands) -> Result<ExecOutput, Error> {
    m.set_pc(m.get_z() as u32);
    Ok(ExecOutput::default())
}

pub fn ret(m: &mut Machine, _ops: &Operands) -> Result<ExecOutput, Error> {
    let addr = m.pop_stack16()?;
    m.set_pc(addr as u32);
    Ok(ExecOutput::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jmp_sets_pc_without_double_advance() {
        let mut m = Machine::new();
        let ops = Operands { k: 0x0100, ..Default::default() };
        jmp(&mut m, &ops).unwrap();
        assert_eq!(m.get_pc(), 0x0100);
    }

    #[test]
    fn ijmp_sets_pc_from_z_without_double_advance() {
        let mut m = Machine::new();
        m.set_z(0x0042);
        ijmp(&mut m, &Operands::default()).unwrap();
        assert_eq!(m.get_pc(), 0x0042);
    }

    #[test]
    fn call_then_ret_restores_pc_and_stack() {
        let mut m = Machine::new();
        m.set_pc(0x0010);
        let sp0 = m.sp;
        let ops = Operands { k: 0x0200, ..Default::default() };
        call(&mut m, &ops).unwrap();
        assert_eq!(m.get_pc(), 0x0200);
        ret(&mut m, &Operands::default()).unwrap();
        assert_eq!(m.get_pc(), 0x0012);
        assert_eq!(m.sp, sp0);
    }

    #[test]
    fn rjmp_relative_to_next_instruction() {
        let mut m = Machine::new();
        m.set_pc(10);
        let ops = Operands { k: bits::to_signed(0, 12) as u32 & 0xFFF, ..Default::default() };
        rjmp(&mut m, &ops).unwrap();
        // k=0 -> exec leaves PC at 10; engine's default pc_post_inc=1 (not
        // exercised directly by this unit test) brings it to 11.
        assert_eq!(m.get_pc(), 10);
    }
}
