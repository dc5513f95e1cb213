//! Direct status-register and bit-transfer instructions (spec §6): BCLR,
//! BSET, BLD, BST.

use crate::bits;
use crate::engine::{ExecOutput, Operands};
use crate::error::Error;
use crate::machine::{self, Machine};

pub fn bset(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    m.set_status_flag(ops.s as u8);
    Ok(ExecOutput::default())
}

pub fn bclr(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    m.clear_status_flag(ops.s as u8);
    Ok(ExecOutput::default())
}

/// Copies the T flag into bit `b` of `Rd`.
pub fn bld(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let t = m.get_status_flag(machine::FLAG_T);
    m.r[d] = if t {
        bits::set_bit(m.r[d], ops.b as u8)
    } else {
        bits::clear_bit(m.r[d], ops.b as u8)
    };
    Ok(ExecOutput::default())
}

/// Copies bit `b` of `Rd` into the T flag.
pub fn bst(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let bit = bits::test_bit(m.r[d], ops.b as u8);
    m.set_status_flag_to(machine::FLAG_T, bit);
    Ok(ExecOutput::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bset_sets_named_flag() {
        let mut m = Machine::new();
        let ops = Operands { s: machine::FLAG_T as u32, ..Default::default() };
        bset(&mut m, &ops).unwrap();
        assert!(m.get_status_flag(machine::FLAG_T));
    }

    #[test]
    fn bst_then_bld_round_trips_bit() {
        let mut m = Machine::new();
        m.r[3] = 0b0000_0100;
        bst(&mut m, &Operands { d: 3, b: 2, ..Default::default() }).unwrap();
        assert!(m.get_status_flag(machine::FLAG_T));
        m.r[7] = 0;
        bld(&mut m, &Operands { d: 7, b: 2, ..Default::default() }).unwrap();
        assert_eq!(m.r[7], 0b0000_0100);
    }
}
