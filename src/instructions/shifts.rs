//! Shift/rotate instructions (spec §6): ASR, LSR, LSL, ROL, ROR, SWAP.
//!
//! `LSL`/`ROL` share their opcode with `ADD`/`ADC` respectively and are
//! table-disambiguated by the `r == d` precondition (spec §9 "Precondition
//! tie-breaks").

use crate::engine::{ExecOutput, Operands};
use crate::error::Error;
use crate::machine::{self, Machine};

pub fn asr(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let rd = m.r[d];
    let result = (rd >> 1) | (rd & 0x80);
    m.r[d] = result;
    Ok(ExecOutput { result: Some((result as u32, 8)), rd: Some((rd as u32, 8)), rr: None, imm: None })
}

pub fn lsr(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let rd = m.r[d];
    let result = rd >> 1;
    m.r[d] = result;
    Ok(ExecOutput { result: Some((result as u32, 8)), rd: Some((rd as u32, 8)), rr: None, imm: None })
}

/// `ADD Rd, Rd` under the hood; selected instead of `ADD` when `r == d`.
pub fn lsl(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let rd = m.r[d];
    let result = rd << 1;
    m.r[d] = result;
    Ok(ExecOutput { result: Some((result as u32, 8)), rd: Some((rd as u32, 8)), rr: None, imm: None })
}

/// `ADC Rd, Rd` under the hood; selected instead of `ADC` when `r == d`.
pub fn rol(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let rd = m.r[d];
    let carry_in = m.get_status_flag(machine::FLAG_C) as u8;
    let result = (rd << 1) | carry_in;
    m.r[d] = result;
    Ok(ExecOutput { result: Some((result as u32, 8)), rd: Some((rd as u32, 8)), rr: None, imm: None })
}

pub fn ror(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let rd = m.r[d];
    let carry_in = m.get_status_flag(machine::FLAG_C) as u8;
    let result = (rd >> 1) | (carry_in << 7);
    m.r[d] = result;
    Ok(ExecOutput { result: Some((result as u32, 8)), rd: Some((rd as u32, 8)), rr: None, imm: None })
}

pub fn swap(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let rd = m.r[d];
    m.r[d] = ((rd << 4) & 0xF0) | ((rd >> 4) & 0x0F);
    Ok(ExecOutput::default())
}

pub fn lsl_precondition(ops: &Operands) -> bool {
    ops.r == ops.d
}

pub fn rol_precondition(ops: &Operands) -> bool {
    ops.r == ops.d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asr_preserves_sign_bit() {
        let mut m = Machine::new();
        m.r[0] = 0x80;
        let ops = Operands { d: 0, ..Default::default() };
        let out = asr(&mut m, &ops).unwrap();
        assert_eq!(m.r[0], 0xC0);
        assert_eq!(out.result, Some((0xC0, 8)));
    }

    #[test]
    fn swap_swap_is_identity() {
        let mut m = Machine::new();
        m.r[0] = 0x4A;
        let ops = Operands { d: 0, ..Default::default() };
        swap(&mut m, &ops).unwrap();
        assert_eq!(m.r[0], 0xA4);
        swap(&mut m, &ops).unwrap();
        assert_eq!(m.r[0], 0x4A);
    }

    #[test]
    fn rol_shifts_in_carry() {
        let mut m = Machine::new();
        m.r[2] = 0b0000_0001;
        m.set_status_flag(machine::FLAG_C);
        let ops = Operands { d: 2, r: 2, ..Default::default() };
        let out = rol(&mut m, &ops).unwrap();
        assert_eq!(m.r[2], 0b0000_0011);
        assert_eq!(out.result, Some((0b0000_0011, 8)));
    }
}
