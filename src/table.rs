//! The static instruction table (spec §4.D/§6): one `InstrSpec` per AVR
//! mnemonic, built once and handed to `Decoder::global()`.
//!
//! Entries below are listed in the same relative order as
//! `original_source/instructions.py`'s `INSTRUCTIONS` tuple. That order
//! matters beyond readability: a handful of opcodes (the `LD`/`ST`
//! indirect-with-displacement forms, `q=0` in particular) have masks that
//! are a strict subset of another entry's mask over the same bit space --
//! `LD Rd,Z` and `LDD Rd,Z+0` are the literal same encoding on real
//! hardware. `decoder.rs` resolves overlaps by taking the first bucket
//! that matches, in table order, so the narrower/more specific form has to
//! be listed first.

use crate::engine::{ExecFn, ExecOutput, FlagSet, InstrSpec, Operands};
use crate::error::Error;
use crate::machine::Machine;
use crate::pattern::{Pattern, VarOffset};
use crate::instructions::{arithmetic, branches, io, jumps_calls, load_store, logical, shifts, stack, status_flags};

fn nop(_m: &mut Machine, _ops: &Operands) -> Result<ExecOutput, Error> {
    Ok(ExecOutput::default())
}

struct Entry {
    mnemonic: &'static str,
    template: &'static str,
    var_offsets: &'static [VarOffset],
    precondition: Option<fn(&Operands) -> bool>,
    pc_post_inc: i32,
    exec: ExecFn,
    flags: FlagSet,
}

const DEFAULT_PC_POST_INC: i32 = 1;

fn build(entries: Vec<Entry>) -> Vec<InstrSpec> {
    entries
        .into_iter()
        .map(|e| InstrSpec {
            mnemonic: e.mnemonic,
            pattern: Pattern::parse(e.template, e.var_offsets),
            precondition: e.precondition,
            pc_post_inc: e.pc_post_inc,
            exec: e.exec,
            flags: e.flags,
        })
        .collect()
}

/// Builds the full set of `InstrSpec`s covering spec §6's instruction list.
pub fn build_instructions() -> Vec<InstrSpec> {
    build(vec![
        Entry {
            mnemonic: "ADC",
            template: "0001_11rd_dddd_rrrr",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: arithmetic::adc,
            flags: FlagSet {
                h: Some(parse("Rd3 & Rr3 | Rr3 & !R3 | !R3 & Rd3")),
                z: Some(parse("_")),
                n: Some(parse("R7")),
                v: Some(parse("Rd7 & Rr7 & !R7 | !Rd7 & !Rr7 & R7")),
                c: Some(parse("Rd7 & Rr7 | Rr7 & !R7 | !R7 & Rd7")),
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "ADD",
            template: "0000_11rd_dddd_rrrr",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: arithmetic::add,
            flags: FlagSet {
                h: Some(parse("Rd3 & Rr3 | Rr3 & !R3 | !R3 & Rd3")),
                z: Some(parse("_")),
                n: Some(parse("R7")),
                v: Some(parse("Rd7 & Rr7 & !R7 | !Rd7 & !Rr7 & R7")),
                c: Some(parse("Rd7 & Rr7 | Rr7 & !R7 | !R7 & Rd7")),
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "ADIW",
            template: "1001_0110_KKdd_KKKK",
            var_offsets: &[VarOffset::scaled('d', 24, 2)],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: arithmetic::adiw,
            flags: FlagSet {
                h: None,
                z: Some(parse("_")),
                n: Some(parse("R15")),
                v: Some(parse("R15 & !Rd15")),
                c: Some(parse("!R15 & Rd15")),
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "AND",
            template: "0010_00rd_dddd_rrrr",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: logical::and,
            flags: FlagSet {
                h: None,
                z: Some(parse("_")),
                n: Some(parse("R7")),
                v: Some(parse("0")),
                c: None,
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "ANDI",
            template: "0111_KKKK_dddd_KKKK",
            var_offsets: &[VarOffset::new('d', 0x10)],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: logical::andi,
            flags: FlagSet {
                h: None,
                z: Some(parse("_")),
                n: Some(parse("R7")),
                v: Some(parse("0")),
                c: None,
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "ASR",
            template: "1001_010d_dddd_0101",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: shifts::asr,
            flags: FlagSet {
                h: None,
                z: Some(parse("_")),
                n: Some(parse("R7")),
                v: Some(parse("N ^ C")),
                c: Some(parse("Rd0")),
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "BCLR",
            template: "1001_0100_1sss_1000",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: status_flags::bclr,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "BSET",
            template: "1001_0100_0sss_1000",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: status_flags::bset,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "BLD",
            template: "1111_100d_dddd_0bbb",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: status_flags::bld,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "BST",
            template: "1111_101d_dddd_0bbb",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: status_flags::bst,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "BRBC",
            template: "1111_01kk_kkkk_ksss",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: branches::brbc,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "BRBS",
            template: "1111_00kk_kkkk_ksss",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: branches::brbs,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "CALL",
            template: "1001_010k_kkkk_111k kkkk_kkkk_kkkk_kkkk",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: 0,
            exec: jumps_calls::call,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "CBI",
            template: "1001_1000_AAAA_Abbb",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: io::cbi,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "COM",
            template: "1001_010d_dddd_0000",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: arithmetic::com,
            flags: FlagSet {
                h: None,
                z: Some(parse("_")),
                n: Some(parse("R7")),
                v: Some(parse("0")),
                c: Some(parse("1")),
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "CP",
            template: "0001_01rd_dddd_rrrr",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: arithmetic::cp,
            flags: FlagSet {
                h: Some(parse("!Rd3 & Rr3 | Rr3 & R3 | R3 & !Rd3")),
                z: Some(parse("_")),
                n: Some(parse("R7")),
                v: Some(parse("Rd7 & !Rr7 & !R7 | !Rd7 & Rr7 & R7")),
                c: Some(parse("!Rd7 & Rr7 | Rr7 & R7 | R7 & !Rd7")),
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "CPC",
            template: "0000_01rd_dddd_rrrr",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: arithmetic::cpc,
            flags: FlagSet {
                h: Some(parse("!Rd3 & Rr3 | Rr3 & R3 | R3 & !Rd3")),
                z: Some(parse("!R7 & !R6 & !R5 & !R4 & !R3 & !R2 & !R1 & !R0 & Z")),
                n: Some(parse("R7")),
                v: Some(parse("Rd7 & !Rr7 & !R7 | !Rd7 & Rr7 & R7")),
                c: Some(parse("!Rd7 & Rr7 | Rr7 & R7 | R7 & !Rd7")),
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "CPI",
            template: "0011_KKKK_dddd_KKKK",
            var_offsets: &[VarOffset::new('d', 0x10)],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: arithmetic::cpi,
            flags: FlagSet {
                h: Some(parse("!Rd3 & K3 | K3 & R3 | R3 & !Rd3")),
                z: Some(parse("_")),
                n: Some(parse("R7")),
                v: Some(parse("Rd7 & !K7 & !R7 | !K7 & K7 & R7")),
                c: Some(parse("!Rd7 & K7 | K7 & R7 | R7 & !Rd7")),
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "CPSE",
            template: "0001_00rd_dddd_rrrr",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: branches::cpse,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "DEC",
            template: "1001_010d_dddd_1010",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: arithmetic::dec,
            flags: FlagSet {
                h: None,
                z: Some(parse("_")),
                n: Some(parse("R7")),
                v: Some(parse("!R7 & R6 & R5 & R4 & R3 & R2 & R1 & R0")),
                c: None,
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "EOR",
            template: "0010_01rd_dddd_rrrr",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: logical::eor,
            flags: FlagSet {
                h: None,
                z: Some(parse("_")),
                n: Some(parse("R7")),
                v: Some(parse("0")),
                c: None,
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "IJMP",
            template: "1001_0100_0000_1001",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: 0,
            exec: jumps_calls::ijmp,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "IN",
            template: "1011_0AAd_dddd_AAAA",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: io::in_,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "INC",
            template: "1001_010d_dddd_0011",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: arithmetic::inc,
            flags: FlagSet {
                h: None,
                z: Some(parse("_")),
                n: Some(parse("R7")),
                v: Some(parse("R7 & !R6 & !R5 & !R4 & !R3 & !R2 & !R1 & !R0")),
                c: None,
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "JMP",
            template: "1001_010k_kkkk_110k kkkk_kkkk_kkkk_kkkk",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: 0,
            exec: jumps_calls::jmp,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "LD_X_i",
            template: "1001_000d_dddd_1100",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::ld_x_i,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "LD_X_ii",
            template: "1001_000d_dddd_1101",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::ld_x_ii,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "LD_X_iii",
            template: "1001_000d_dddd_1110",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::ld_x_iii,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "LD_Y_i",
            template: "1000_000d_dddd_1000",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::ld_y_i,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "LD_Y_ii",
            template: "1001_000d_dddd_1001",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::ld_y_ii,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "LD_Y_iii",
            template: "1001_000d_dddd_1010",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::ld_y_iii,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "LD_Y_iv",
            template: "10q0_qq0d_dddd_1qqq",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::ld_y_iv,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "LD_Z_i",
            template: "1000_000d_dddd_0000",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::ld_z_i,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "LD_Z_ii",
            template: "1001_000d_dddd_0001",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::ld_z_ii,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "LD_Z_iii",
            template: "1001_000d_dddd_0010",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::ld_z_iii,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "LD_Z_iv",
            template: "10q0_qq0d_dddd_0qqq",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::ld_z_iv,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "LDS",
            template: "1001_000d_dddd_0000 kkkk_kkkk_kkkk_kkkk",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: 2,
            exec: load_store::lds,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "LDI",
            template: "1110_KKKK_dddd_KKKK",
            var_offsets: &[VarOffset::new('d', 0x10)],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::ldi,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "LPM_i",
            template: "1001_0101_1100_1000",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::lpm_i,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "LPM_ii",
            template: "1001_000d_dddd_0100",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::lpm_ii,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "LPM_iii",
            template: "1001_000d_dddd_0101",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::lpm_iii,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "LSL",
            template: "0000_11rd_dddd_rrrr",
            var_offsets: &[],
            precondition: Some(shifts::lsl_precondition),
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: shifts::lsl,
            flags: FlagSet {
                h: Some(parse("Rd3")),
                z: Some(parse("_")),
                n: Some(parse("R7")),
                v: Some(parse("N ^ C")),
                c: Some(parse("Rd7")),
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "LSR",
            template: "1001_010d_dddd_0110",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: shifts::lsr,
            flags: FlagSet {
                h: None,
                z: Some(parse("_")),
                n: Some(parse("0")),
                v: Some(parse("N ^ C")),
                c: Some(parse("Rd0")),
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "MOV",
            template: "0010_11rd_dddd_rrrr",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::mov,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "MOVW",
            template: "0000_0001_dddd_rrrr",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::movw,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "MUL",
            template: "1001_11rd_dddd_rrrr",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: arithmetic::mul,
            flags: FlagSet {
                h: None,
                z: Some(parse("_")),
                n: None,
                v: None,
                c: Some(parse("R15")),
                s: None,
            },
        },
        Entry {
            mnemonic: "NEG",
            template: "1001_010d_dddd_0001",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: arithmetic::neg,
            flags: FlagSet {
                h: Some(parse("R3 | Rd3")),
                z: Some(parse("_")),
                n: Some(parse("R7")),
                v: Some(parse("R7 & !R6 & !R5 & !R4 & !R3 & !R2 & !R1 & !R0")),
                c: Some(parse("R7 | R6 | R5 | R4 | R3 | R2 | R1 | R0")),
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "NOP",
            template: "0000_0000_0000_0000",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: nop,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "OR",
            template: "0010_10rd_dddd_rrrr",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: logical::or,
            flags: FlagSet {
                h: None,
                z: Some(parse("_")),
                n: Some(parse("R7")),
                v: Some(parse("0")),
                c: None,
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "ORI",
            template: "0110_KKKK_dddd_KKKK",
            var_offsets: &[VarOffset::new('d', 0x10)],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: logical::ori,
            flags: FlagSet {
                h: None,
                z: Some(parse("_")),
                n: Some(parse("R7")),
                v: Some(parse("0")),
                c: None,
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "OUT",
            template: "1011_1AAr_rrrr_AAAA",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: io::out_,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "POP",
            template: "1001_000d_dddd_1111",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: stack::pop,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "PUSH",
            template: "1001_001d_dddd_1111",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: stack::push,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "RCALL",
            template: "1101_kkkk_kkkk_kkkk",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: jumps_calls::rcall,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "RET",
            template: "1001_0101_0000_1000",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: 0,
            exec: jumps_calls::ret,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "RJMP",
            template: "1100_kkkk_kkkk_kkkk",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: jumps_calls::rjmp,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "ROL",
            template: "0001_11rd_dddd_rrrr",
            var_offsets: &[],
            precondition: Some(shifts::rol_precondition),
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: shifts::rol,
            flags: FlagSet {
                h: Some(parse("Rd3")),
                z: Some(parse("_")),
                n: Some(parse("R7")),
                v: Some(parse("N ^ C")),
                c: Some(parse("Rd7")),
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "ROR",
            template: "1001_010d_dddd_0111",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: shifts::ror,
            flags: FlagSet {
                h: None,
                z: Some(parse("_")),
                n: Some(parse("R7")),
                v: Some(parse("N ^ C")),
                c: Some(parse("Rd0")),
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "SBC",
            template: "0000_10rd_dddd_rrrr",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: arithmetic::sbc,
            flags: FlagSet {
                h: Some(parse("!Rd3 & Rr3 | Rr3 & R3 | R3 & !Rd3")),
                z: Some(parse("!R7 & !R6 & !R5 & !R4 & !R3 & !R2 & !R1 & !R0 & Z")),
                n: Some(parse("R7")),
                v: Some(parse("Rd7 & !Rr7 & !R7 | !Rd7 & Rr7 & R7")),
                c: Some(parse("!Rd7 & Rr7 | Rr7 & R7 | R7 & !Rd7")),
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "SBCI",
            template: "0100_KKKK_dddd_KKKK",
            var_offsets: &[VarOffset::new('d', 0x10)],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: arithmetic::sbci,
            flags: FlagSet {
                h: Some(parse("!Rd3 & K3 | K3 & R3 | R3 & !Rd3")),
                z: Some(parse("!R7 & !R6 & !R5 & !R4 & !R3 & !R2 & !R1 & !R0 & Z")),
                n: Some(parse("R7")),
                v: Some(parse("Rd7 & !K7 & !R7 | !Rd7 & K7 & R7")),
                c: Some(parse("!Rd7 & K7 | K7 & R7 | R7 & !Rd7")),
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "SBI",
            template: "1001_1010_AAAA_Abbb",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: io::sbi,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "SBIC",
            template: "1001_1001_AAAA_Abbb",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: branches::sbic,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "SBIS",
            template: "1001_1011_AAAA_Abbb",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: branches::sbis,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "SBIW",
            template: "1001_0111_KKdd_KKKK",
            var_offsets: &[VarOffset::scaled('d', 24, 2)],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: arithmetic::sbiw,
            flags: FlagSet {
                h: None,
                z: Some(parse("_")),
                n: Some(parse("R15")),
                v: Some(parse("!R15 & Rd15")),
                c: Some(parse("R15 & !Rd15")),
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "SBRC",
            template: "1111_110r_rrrr_0bbb",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: branches::sbrc,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "SBRS",
            template: "1111_111r_rrrr_0bbb",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: branches::sbrs,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "ST_X_i",
            template: "1001_001r_rrrr_1100",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::st_x_i,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "ST_X_ii",
            template: "1001_001r_rrrr_1101",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::st_x_ii,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "ST_X_iii",
            template: "1001_001r_rrrr_1110",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::st_x_iii,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "ST_Y_i",
            template: "1000_001r_rrrr_1000",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::st_y_i,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "ST_Y_ii",
            template: "1001_001r_rrrr_1001",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::st_y_ii,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "ST_Y_iii",
            template: "1001_001r_rrrr_1010",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::st_y_iii,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "ST_Y_iv",
            template: "10q0_qq1r_rrrr_1qqq",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::st_y_iv,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "ST_Z_i",
            template: "1000_001r_rrrr_0000",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::st_z_i,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "ST_Z_ii",
            template: "1001_001r_rrrr_0001",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::st_z_ii,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "ST_Z_iii",
            template: "1001_001r_rrrr_0010",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::st_z_iii,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "ST_Z_iv",
            template: "10q0_qq1r_rrrr_0qqq",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: load_store::st_z_iv,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "STS",
            template: "1001_001r_rrrr_0000 kkkk_kkkk_kkkk_kkkk",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: 2,
            exec: load_store::sts,
            flags: FlagSet::none(),
        },
        Entry {
            mnemonic: "SUB",
            template: "0001_10rd_dddd_rrrr",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: arithmetic::sub,
            flags: FlagSet {
                h: Some(parse("!Rd3 & Rr3 | Rr3 & R3 | R3 & !Rd3")),
                z: Some(parse("_")),
                n: Some(parse("R7")),
                v: Some(parse("Rd7 & !Rr7 & !R7 | !Rd7 & Rr7 & R7")),
                c: Some(parse("!Rd7 & Rr7 | Rr7 & R7 | R7 & !Rd7")),
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "SUBI",
            template: "0101_KKKK_dddd_KKKK",
            var_offsets: &[VarOffset::new('d', 0x10)],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: arithmetic::subi,
            flags: FlagSet {
                h: Some(parse("!Rd3 & K3 | K3 & R3 | R3 & !Rd3")),
                z: Some(parse("_")),
                n: Some(parse("R7")),
                v: Some(parse("Rd7 & !K7 & !R7 | !Rd7 & K7 & R7")),
                c: Some(parse("!Rd7 & K7 | K7 & R7 | R7 & !Rd7")),
                s: Some(parse("N ^ V")),
            },
        },
        Entry {
            mnemonic: "SWAP",
            template: "1001_010d_dddd_0010",
            var_offsets: &[],
            precondition: None,
            pc_post_inc: DEFAULT_PC_POST_INC,
            exec: shifts::swap,
            flags: FlagSet::none(),
        },
    ])
}

fn parse(src: &str) -> crate::flags::Expr {
    crate::flags::Expr::parse(src)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::Decoder;

    #[test]
    fn table_has_no_duplicate_mnemonics() {
        let instructions = build_instructions();
        let mut seen = std::collections::HashSet::new();
        for instr in &instructions {
            assert!(seen.insert(instr.mnemonic), "duplicate mnemonic {}", instr.mnemonic);
        }
    }

    #[test]
    fn table_builds_a_decoder_without_error() {
        let instructions = build_instructions();
        Decoder::new(instructions).expect("decoder should build from the static table");
    }

    #[test]
    fn ld_z_i_is_listed_before_ld_z_iv_for_overlapping_masks() {
        let instructions = build_instructions();
        let i = instructions.iter().position(|e| e.mnemonic == "LD_Z_i").unwrap();
        let iv = instructions.iter().position(|e| e.mnemonic == "LD_Z_iv").unwrap();
        assert!(i < iv);
    }
}
