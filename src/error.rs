//! Error taxonomy (spec §7). Hand-implemented `Display`/`Error`, matching
//! the retrieval pack's dominant style (e.g. `kromych-yamos6502`'s
//! `MemoryError`/`RunError`) rather than reaching for `thiserror`.

use std::fmt;

/// Errors raised by the decoder and execution engine. All are fatal to the
/// current run; the core performs no internal recovery (spec §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No instruction in the table matches this opcode word.
    UndecodedInstruction { opcode: u16, pc: u16 },
    /// A data or program memory access fell outside the device's address space.
    AddressOutOfRange { address: u32 },
    /// The stack pointer underflowed while popping.
    StackUnderflow,
    /// The stack pointer overflowed while pushing.
    StackOverflow,
    /// Two preconditionless instructions share an opcode mask/signature.
    ///
    /// This is a static defect in the instruction table, detected once at
    /// `Decoder::new` and never at instruction-dispatch time.
    AmbiguousDecode { opcode_mask: u16, opcode_signature: u16 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UndecodedInstruction { opcode, pc } => write!(
                f,
                "undecodable instruction {opcode:#06x} at PC={pc:#06x}"
            ),
            Error::AddressOutOfRange { address } => {
                write!(f, "address {address:#x} is out of range")
            }
            Error::StackUnderflow => write!(f, "stack underflow"),
            Error::StackOverflow => write!(f, "stack overflow"),
            Error::AmbiguousDecode { opcode_mask, opcode_signature } => write!(
                f,
                "ambiguous decode table entry: mask={opcode_mask:#06x} signature={opcode_signature:#06x}"
            ),
        }
    }
}

impl std::error::Error for Error {}
