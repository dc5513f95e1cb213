//! Stack instructions (spec §6): PUSH, POP.
//!
//! `PUSH` names its operand field `d` (not `r`), per `original_source/
//! instructions.py` -- it pushes `Rd`, not `Rr`.

use crate::engine::{ExecOutput, Operands};
use crate::error::Error;
use crate::machine::Machine;

pub fn push(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    m.push_stack8(m.r[d])?;
    Ok(ExecOutput::default())
}

pub fn pop(m: &mut Machine, ops: &Operands) -> Result<ExecOutput, Error> {
    let d = ops.d as usize;
    let value = m.pop_stack8()?;
    m.r[d] = value;
    Ok(ExecOutput::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_pop_round_trips() {
        let mut m = Machine::new();
        m.r[5] = 0x3C;
        let sp0 = m.sp;
        push(&mut m, &Operands { d: 5, ..Default::default() }).unwrap();
        assert_eq!(m.sp, sp0 - 1);
        pop(&mut m, &Operands { d: 9, ..Default::default() }).unwrap();
        assert_eq!(m.r[9], 0x3C);
        assert_eq!(m.sp, sp0);
    }
}
