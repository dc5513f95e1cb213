//! Arithmetic instructions (spec §6): ADC, ADD, ADIW, SBIW, SUB, SUBI, SBC,
//! SBCI, CP, CPC, CPI, NEG, INC, DEC, COM, MUL.
//!
//! Grounded on `original_source/instructions.py`'s per-instruction
//! `operation`/`reads`/`writeback` strings, reworked from C-emission
//! snippets into direct register-file reads/writes, matching the teacher's
//! `instruction_adc`-style one-function-per-opcode bodies.

use crate::bits;
use crate::engine::{ExecOutput, Operands};
use crate::error::Error;
use crate::machine::{self, Machine};

pub fn adc(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let (d, r) = (ops.d as usize, ops.r as usize);
    let rd = m.r[d];
    let rr = m.r[r];
    let carry_in = m.get_status_flag(machine::FLAG_C) as u8;
    let result = rd.wrapping_add(rr).wrapping_add(carry_in);
    m.r[d] = result;
    Ok(ExecOutput {
        result: Some((result as u32, 8)),
        rd: Some((rd as u32, 8)),
        rr: Some(rr),
        imm: None,
    })
}

pub fn add(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let (d, r) = (ops.d as usize, ops.r as usize);
    let rd = m.r[d];
    let rr = m.r[r];
    let result = rd.wrapping_add(rr);
    m.r[d] = result;
    Ok(ExecOutput {
        result: Some((result as u32, 8)),
        rd: Some((rd as u32, 8)),
        rr: Some(rr),
        imm: None,
    })
}

pub fn adiw(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let rd = bits::get16(m.r[d + 1], m.r[d]);
    let result = rd.wrapping_add(ops.k as u16);
    bits::set16(&mut m.r[d + 1], &mut m.r[d], result);
    Ok(ExecOutput {
        result: Some((result as u32, 16)),
        rd: Some((rd as u32, 16)),
        rr: None,
        imm: None,
    })
}

pub fn sbiw(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let rd = bits::get16(m.r[d + 1], m.r[d]);
    let result = rd.wrapping_sub(ops.k as u16);
    bits::set16(&mut m.r[d + 1], &mut m.r[d], result);
    Ok(ExecOutput {
        result: Some((result as u32, 16)),
        rd: Some((rd as u32, 16)),
        rr: None,
        imm: None,
    })
}

pub fn sub(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let (d, r) = (ops.d as usize, ops.r as usize);
    let rd = m.r[d];
    let rr = m.r[r];
    let result = rd.wrapping_sub(rr);
    m.r[d] = result;
    Ok(ExecOutput {
        result: Some((result as u32, 8)),
        rd: Some((rd as u32, 8)),
        rr: Some(rr),
        imm: None,
    })
}

pub fn subi(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let rd = m.r[d];
    let k = ops.k as u8;
    let result = rd.wrapping_sub(k);
    m.r[d] = result;
    Ok(ExecOutput {
        result: Some((result as u32, 8)),
        rd: Some((rd as u32, 8)),
        rr: None,
        imm: Some(k),
    })
}

pub fn sbc(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let (d, r) = (ops.d as usize, ops.r as usize);
    let rd = m.r[d];
    let rr = m.r[r];
    let carry_in = m.get_status_flag(machine::FLAG_C) as u8;
    let result = rd.wrapping_sub(rr).wrapping_sub(carry_in);
    m.r[d] = result;
    Ok(ExecOutput {
        result: Some((result as u32, 8)),
        rd: Some((rd as u32, 8)),
        rr: Some(rr),
        imm: None,
    })
}

pub fn sbci(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let rd = m.r[d];
    let k = ops.k as u8;
    let carry_in = m.get_status_flag(machine::FLAG_C) as u8;
    let result = rd.wrapping_sub(k).wrapping_sub(carry_in);
    m.r[d] = result;
    Ok(ExecOutput {
        result: Some((result as u32, 8)),
        rd: Some((rd as u32, 8)),
        rr: None,
        imm: Some(k),
    })
}

pub fn cp(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let (d, r) = (ops.d as usize, ops.r as usize);
    let rd = m.r[d];
    let rr = m.r[r];
    let result = rd.wrapping_sub(rr);
    Ok(ExecOutput {
        result: Some((result as u32, 8)),
        rd: Some((rd as u32, 8)),
        rr: Some(rr),
        imm: None,
    })
}

pub fn cpc(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let (d, r) = (ops.d as usize, ops.r as usize);
    let rd = m.r[d];
    let rr = m.r[r];
    let carry_in = m.get_status_flag(machine::FLAG_C) as u8;
    let result = rd.wrapping_sub(rr).wrapping_sub(carry_in);
    Ok(ExecOutput {
        result: Some((result as u32, 8)),
        rd: Some((rd as u32, 8)),
        rr: Some(rr),
        imm: None,
    })
}

pub fn cpi(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let rd = m.r[d];
    let k = ops.k as u8;
    let result = rd.wrapping_sub(k);
    Ok(ExecOutput {
        result: Some((result as u32, 8)),
        rd: Some((rd as u32, 8)),
        rr: None,
        imm: Some(k),
    })
}

/// Two's complement negation. `flag_c` in `original_source/instructions.py`
/// is the non-boolean literal `"R ^ 0x00"`; the table (`table.rs`) encodes
/// the canonical AVR semantics `C = (R != 0)` directly as an OR of every bit
/// of `R` rather than special-casing this one instruction's evaluator.
pub fn neg(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let rd = m.r[d];
    let result = 0u8.wrapping_sub(rd);
    m.r[d] = result;
    Ok(ExecOutput {
        result: Some((result as u32, 8)),
        rd: Some((rd as u32, 8)),
        rr: None,
        imm: None,
    })
}

pub fn inc(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let rd = m.r[d];
    let result = rd.wrapping_add(1);
    m.r[d] = result;
    Ok(ExecOutput { result: Some((result as u32, 8)), rd: Some((rd as u32, 8)), rr: None, imm: None })
}

pub fn dec(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let rd = m.r[d];
    let result = rd.wrapping_sub(1);
    m.r[d] = result;
    Ok(ExecOutput { result: Some((result as u32, 8)), rd: Some((rd as u32, 8)), rr: None, imm: None })
}

pub fn com(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let rd = m.r[d];
    let result = 0xFFu8 - rd;
    m.r[d] = result;
    Ok(ExecOutput { result: Some((result as u32, 8)), rd: Some((rd as u32, 8)), rr: None, imm: None })
}

/// Unsigned multiply. The product always lands in the fixed `R1:R0` pair,
/// independent of the `d`/`r` operand registers being multiplied.
pub fn mul(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let (d, r) = (ops.d as usize, ops.r as usize);
    let rd = m.r[d];
    let rr = m.r[r];
    let result = rd as u16 * rr as u16;
    bits::set16(&mut m.r[1], &mut m.r[0], result);
    Ok(ExecOutput {
        result: Some((result as u32, 16)),
        rd: Some((rd as u32, 8)),
        rr: Some(rr),
        imm: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adiw_adds_to_16_bit_pair() {
        let mut m = Machine::new();
        m.r[24] = 0xFF;
        m.r[25] = 0x00;
        let ops = Operands { d: 24, k: 1, ..Default::default() };
        let out = adiw(&mut m, &ops).unwrap();
        assert_eq!(bits::get16(m.r[25], m.r[24]), 0x0100);
        assert_eq!(out.result, Some((0x0100, 16)));
    }

    #[test]
    fn mul_writes_fixed_r1_r0_pair() {
        let mut m = Machine::new();
        m.r[5] = 10;
        m.r[6] = 20;
        let ops = Operands { d: 5, r: 6, ..Default::default() };
        mul(&mut m, &ops).unwrap();
        assert_eq!(bits::get16(m.r[1], m.r[0]), 200);
    }

    #[test]
    fn neg_of_0x80_wraps_to_itself() {
        let mut m = Machine::new();
        m.r[0] = 0x80;
        let ops = Operands { d: 0, ..Default::default() };
        let out = neg(&mut m, &ops).unwrap();
        assert_eq!(m.r[0], 0x80);
        assert_eq!(out.result, Some((0x80, 8)));
    }
}
