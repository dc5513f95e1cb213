//! I/O-space instructions (spec §6): IN, OUT, CBI, SBI.
//!
//! `in` is a reserved word in Rust, hence `in_`/`out_` below.

use crate::bits;
use crate::engine::{ExecOutput, Operands};
use crate::error::Error;
use crate::machine::Machine;

pub fn in_(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let a = ops.a as usize;
    m.r[d] = m.io[a];
    Ok(ExecOutput::default())
}

pub fn out_(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let r = ops.r as usize;
    let a = ops.a as usize;
    m.io[a] = m.r[r];
    Ok(ExecOutput::default())
}

pub fn cbi(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let a = ops.a as usize;
    m.io[a] = bits::clear_bit(m.io[a], ops.b as u8);
    Ok(ExecOutput::default())
}

pub fn sbi(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let a = ops.a as usize;
    m.io[a] = bits::set_bit(m.io[a], ops.b as u8);
    Ok(ExecOutput::default())
}
