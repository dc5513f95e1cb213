//! Bitwise instructions (spec §6): AND, ANDI, OR, ORI, EOR.

use crate::engine::{ExecOutput, Operands};
use crate::error::Error;
use crate::machine::Machine;

pub fn and(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let (d, r) = (ops.d as usize, ops.r as usize);
    let rd = m.r[d];
    let rr = m.r[r];
    let result = rd & rr;
    m.r[d] = result;
    Ok(ExecOutput { result: Some((result as u32, 8)), rd: Some((rd as u32, 8)), rr: Some(rr), imm: None })
}

pub fn andi(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let rd = m.r[d];
    let k = ops.k as u8;
    let result = rd & k;
    m.r[d] = result;
    Ok(ExecOutput { result: Some((result as u32, 8)), rd: Some((rd as u32, 8)), rr: None, imm: Some(k) })
}

pub fn or(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let (d, r) = (ops.d as usize, ops.r as usize);
    let rd = m.r[d];
    let rr = m.r[r];
    let result = rd | rr;
    m.r[d] = result;
    Ok(ExecOutput { result: Some((result as u32, 8)), rd: Some((rd as u32, 8)), rr: Some(rr), imm: None })
}

pub fn ori(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let rd = m.r[d];
    let k = ops.k as u8;
    let result = rd | k;
    m.r[d] = result;
    Ok(ExecOutput { result: Some((result as u32, 8)), rd: Some((rd as u32, 8)), rr: None, imm: Some(k) })
}

pub fn eor(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let (d, r) = (ops.d as usize, ops.r as usize);
    let rd = m.r[d];
    let rr = m.r[r];
    let result = rd ^ rr;
    m.r[d] = result;
    Ok(ExecOutput { result: Some((result as u32, 8)), rd: Some((rd as u32, 8)), rr: Some(rr), imm: None })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn andi_masks_immediate() {
        let mut m = Machine::new();
        m.r[16] = 0b1111_0000;
        let ops = Operands { d: 16, k: 0b0101_0101, ..Default::default() };
        let out = andi(&mut m, &ops).unwrap();
        assert_eq!(m.r[16], 0b0101_0000);
        assert_eq!(out.result, Some((0b0101_0000, 8)));
    }

    #[test]
    fn eor_of_register_with_itself_is_zero() {
        let mut m = Machine::new();
        m.r[3] = 0x5A;
        let ops = Operands { d: 3, r: 3, ..Default::default() };
        let out = eor(&mut m, &ops).unwrap();
        assert_eq!(m.r[3], 0);
        assert_eq!(out.result, Some((0, 8)));
    }
}
