//! Execution engine (spec §4.F) and the instruction-table data shapes it
//! walks (spec §4.D).
//!
//! Grounded on the teacher's per-mnemonic `instruction_*` methods
//! (`fekie-nes6502/src/instruction/execution/*.rs`) for the shape of one
//! exec function per instruction, generalized to AVR's operand/flag model.
//! The declarative parts of spec §4.D -- opcode pattern and flag
//! expressions -- are genuinely data-driven ([`Pattern`], [`flags::Expr`]);
//! `operation`/`writeback` are folded into a single Rust `exec` function per
//! instruction, since spec §4.D itself only describes them "behaviorally
//! per instruction" rather than as a second boolean DSL. Folding writeback
//! into `exec` (rather than a separate generic step) preserves the exact
//! ordering spec §4.F demands -- flag expressions observe values captured
//! before mutation -- while matching the teacher's direct, single-pass
//! instruction bodies.

use std::collections::HashMap;

use crate::decoder::Decoder;
use crate::error::Error;
use crate::flags::{Context, Expr};
use crate::machine::{self, Machine};
use crate::pattern::Pattern;

/// Operand fields extracted from an opcode, after `var_offsets` (spec §4.D
/// point 9) have been applied by [`Pattern::extract`].
///
/// A single `u32`-typed field per letter is enough for every instruction in
/// this table: `k`/`K` never coexist in one pattern, so they share a slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct Operands {
    pub d: u32,
    pub r: u32,
    pub k: u32,
    pub q: u32,
    pub b: u32,
    pub s: u32,
    pub a: u32,
}

impl Operands {
    pub fn from_fields(fields: &HashMap<char, u32>) -> Operands {
        Operands {
            d: *fields.get(&'d').unwrap_or(&0),
            r: *fields.get(&'r').unwrap_or(&0),
            k: *fields.get(&'k').or_else(|| fields.get(&'K')).unwrap_or(&0),
            q: *fields.get(&'q').unwrap_or(&0),
            b: *fields.get(&'b').unwrap_or(&0),
            s: *fields.get(&'s').unwrap_or(&0),
            a: *fields.get(&'A').unwrap_or(&0),
        }
    }
}

/// What an instruction's `exec` function reports back to the engine so it
/// can build the flag-expression context (spec §4.F steps 4-6). Only the
/// fields a given instruction's flag expressions actually reference need to
/// be populated; the rest default to `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecOutput {
    /// The instruction's computed result `R` and its width (8 or 16).
    pub result: Option<(u32, u8)>,
    /// `Rd`'s value as read before the operation, and its width.
    pub rd: Option<(u32, u8)>,
    /// `Rr`'s value as read before the operation (always 8 bits wide).
    pub rr: Option<u8>,
    /// The immediate `K`/`k` operand, when a flag expression inspects its
    /// bits directly (e.g. `CPI`'s half-carry).
    pub imm: Option<u8>,
}

pub type Precondition = fn(&Operands) -> bool;
pub type ExecFn = fn(&mut Machine, &Operands) -> Result<ExecOutput, Error>;

/// Precompiled `flag_*` expressions for one instruction (spec §4.D point 6),
/// evaluated in the fixed order N, Z, C, H, V, S (spec §4.F step 6).
#[derive(Debug, Clone, Default)]
pub struct FlagSet {
    pub n: Option<Expr>,
    pub z: Option<Expr>,
    pub c: Option<Expr>,
    pub h: Option<Expr>,
    pub v: Option<Expr>,
    pub s: Option<Expr>,
}

impl FlagSet {
    pub fn none() -> FlagSet {
        FlagSet::default()
    }
}

/// One row of the instruction table (spec §4.D).
pub struct InstrSpec {
    pub mnemonic: &'static str,
    pub pattern: Pattern,
    pub precondition: Option<Precondition>,
    pub pc_post_inc: i32,
    pub exec: ExecFn,
    pub flags: FlagSet,
}

/// Runs one fetch/decode/execute step at `m`'s current PC, given the
/// already-fetched first opcode word (spec §4.E, §4.F).
pub fn step(m: &mut Machine, first_word: u16) -> Result<(), Error> {
    let decoder = Decoder::global();

    let skip = m.skip;
    let bucket = decoder
        .find_bucket(first_word)
        .ok_or(Error::UndecodedInstruction { opcode: first_word, pc: m.get_pc() })?;

    if skip {
        m.skip = false;
        let words = decoder.bucket_word_count(bucket);
        m.set_pc(m.get_pc() as u32 + words as u32);
        return Ok(());
    }

    let instr = match decoder.select(bucket, first_word) {
        Some(instr) => instr,
        None => {
            // Spec §4.E step 5: every variant preconditioned and none held.
            // The table is designed so this cannot happen; defensively log
            // and skip rather than execute the wrong variant.
            log::warn!("ambiguous runtime dispatch for opcode {first_word:#06x}, skipping");
            m.set_pc(m.get_pc() as u32 + 1);
            return Ok(());
        }
    };

    let opcode32: u32 = if instr.pattern.word_count == 2 {
        let w2 = m.get_prog_mem(m.get_pc().wrapping_add(1) & m.pc_mask())?;
        ((first_word as u32) << 16) | w2 as u32
    } else {
        first_word as u32
    };

    let fields = instr.pattern.extract(opcode32);
    let operands = Operands::from_fields(&fields);

    let pre_flags = [
        (machine::FLAG_N, "N", m.get_status_flag(machine::FLAG_N)),
        (machine::FLAG_Z, "Z", m.get_status_flag(machine::FLAG_Z)),
        (machine::FLAG_C, "C", m.get_status_flag(machine::FLAG_C)),
        (machine::FLAG_H, "H", m.get_status_flag(machine::FLAG_H)),
        (machine::FLAG_V, "V", m.get_status_flag(machine::FLAG_V)),
        (machine::FLAG_S, "S", m.get_status_flag(machine::FLAG_S)),
        (machine::FLAG_T, "T", m.get_status_flag(machine::FLAG_T)),
    ];

    let output = (instr.exec)(m, &operands)?;

    let mut ctx: Context = Context::new();
    for (_, name, value) in pre_flags {
        ctx.insert(name.to_string(), value);
    }
    populate_bits(&mut ctx, "R", output.result);
    populate_bits(&mut ctx, "Rd", output.rd);
    if let Some(rr) = output.rr {
        populate_bits(&mut ctx, "Rr", Some((rr as u32, 8)));
    }
    if let Some(imm) = output.imm {
        populate_bits(&mut ctx, "K", Some((imm as u32, 8)));
    }
    let is_zero = match output.result {
        Some((value, width)) => {
            let mask = if width >= 32 { u32::MAX } else { (1u32 << width) - 1 };
            (value & mask) == 0
        }
        None => false,
    };
    ctx.insert("_".to_string(), is_zero);

    // Fixed evaluation order (spec §4.F step 6): each flag's own expression
    // is evaluated, and its locally-computed value is flushed to SREG,
    // before the next flag in the order runs -- so S's `N ^ V` and ASR's
    // `flag_v = N ^ C` correctly observe already-updated flags from earlier
    // in this same step, while e.g. CPC's `flag_z` bare `Z` atom correctly
    // still observes the pre-instruction Z (flag_z is evaluated, and only
    // then does Z get overwritten in `ctx`).
    write_flag(m, &instr.flags.n, &mut ctx, machine::FLAG_N, "N");
    write_flag(m, &instr.flags.z, &mut ctx, machine::FLAG_Z, "Z");
    write_flag(m, &instr.flags.c, &mut ctx, machine::FLAG_C, "C");
    write_flag(m, &instr.flags.h, &mut ctx, machine::FLAG_H, "H");
    write_flag(m, &instr.flags.v, &mut ctx, machine::FLAG_V, "V");
    write_flag(m, &instr.flags.s, &mut ctx, machine::FLAG_S, "S");

    if instr.pc_post_inc != 0 {
        m.set_pc(m.get_pc() as u32 + instr.pc_post_inc as u32);
    }

    Ok(())
}

fn write_flag(m: &mut Machine, expr: &Option<Expr>, ctx: &mut Context, idx: u8, name: &str) {
    if let Some(expr) = expr {
        let value = expr.eval(ctx);
        m.set_status_flag_to(idx, value);
        ctx.insert(name.to_string(), value);
    }
}

fn populate_bits(ctx: &mut Context, prefix: &str, value: Option<(u32, u8)>) {
    if let Some((value, width)) = value {
        for bit in 0..width {
            ctx.insert(format!("{prefix}{bit}"), (value >> bit) & 1 != 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table;

    fn run_opcode(m: &mut Machine, opcode: u16) {
        step(m, opcode).expect("instruction should decode and execute");
    }

    #[test]
    fn add_sets_carry_and_zero_on_wraparound() {
        // ADD R0, R1 where both hold 0x80 -> R=0x00, C=1, V=1, Z=1, H=0.
        let mut m = Machine::new();
        m.r[0] = 0x80;
        m.r[1] = 0x80;
        // 0000_11rd_dddd_rrrr, d=0, r=1
        run_opcode(&mut m, 0b0000_1100_0000_0001);
        assert_eq!(m.r[0], 0x00);
        assert!(m.get_status_flag(machine::FLAG_C));
        assert!(m.get_status_flag(machine::FLAG_V));
        assert!(m.get_status_flag(machine::FLAG_Z));
        assert!(!m.get_status_flag(machine::FLAG_N));
        assert!(!m.get_status_flag(machine::FLAG_H));
        assert_eq!(m.get_pc(), 1);
    }

    #[test]
    fn adc_with_incoming_carry_wraps_to_zero() {
        let mut m = Machine::new();
        m.r[0] = 0xFF;
        m.r[1] = 0x00;
        m.set_status_flag(machine::FLAG_C);
        // 0001_11rd_dddd_rrrr, d=0, r=1
        run_opcode(&mut m, 0b0001_1100_0000_0001);
        assert_eq!(m.r[0], 0x00);
        assert!(m.get_status_flag(machine::FLAG_C));
        assert!(m.get_status_flag(machine::FLAG_Z));
        assert!(m.get_status_flag(machine::FLAG_H));
    }

    #[test]
    fn lsl_takes_precedence_over_add_when_r_equals_d() {
        let mut m = Machine::new();
        m.r[2] = 0b1000_0001;
        // ADD/LSL share 0000_11rd_dddd_rrrr; d=r=2 selects LSL.
        run_opcode(&mut m, 0b0000_1100_0100_0010);
        assert_eq!(m.r[2], 0b0000_0010);
        assert!(m.get_status_flag(machine::FLAG_C));
    }

    #[test]
    fn cpse_skips_a_32_bit_instruction_entirely() {
        let mut m = Machine::new();
        m.r[16] = 0x05;
        m.r[17] = 0x05;
        m.prog[0] = 0b0001_0001_0000_0001; // CPSE R16, R17
        // JMP 0x1234 (won't execute, just needs valid word count fetch).
        m.prog[1] = 0b1001_0100_1000_1110;
        m.prog[2] = 0x1234;
        m.prog[3] = 0xCFFF; // halt
        m.run().unwrap();
        assert_eq!(m.get_pc(), 3);
    }

    #[test]
    fn cpc_preserves_prior_zero_flag_when_result_is_zero() {
        let mut m = Machine::new();
        m.set_status_flag(machine::FLAG_Z);
        m.r[0] = 5;
        m.r[1] = 5;
        m.set_status_flag(machine::FLAG_C);
        // CPC R0, R1 with incoming borrow cancels out: 5 - 5 - ... actually
        // use equal registers and clear carry so result is exactly zero.
        m.clear_status_flag(machine::FLAG_C);
        // 0000_01rd_dddd_rrrr, d=0, r=1
        run_opcode(&mut m, 0b0000_0100_0000_0001);
        assert!(m.get_status_flag(machine::FLAG_Z));
    }

    #[test]
    fn static_table_builds_without_ambiguity() {
        let decoder = table::build_instructions();
        assert!(Decoder::new(decoder).is_ok());
    }
}
