//! Machine state and accessors (spec §3 "Machine", §4.A).
//!
//! Grounded on the teacher's `Cpu`/`CpuMemoryMapper` split in
//! `fekie-nes6502/src/lib.rs` -- a plain state struct plus narrow
//! get/set accessors -- generalized from the teacher's flat 64 KiB NES
//! address space to AVR's three-way aliased register/IO/SRAM data space
//! (spec §3 invariant 1).

use serde::{Deserialize, Serialize};

use crate::bits;
use crate::config::{DeviceConfig, IO_SPACE_SIZE, REGISTER_FILE_SIZE};
use crate::error::Error;

/// SREG bit indices (spec §3).
pub const FLAG_C: u8 = 0;
pub const FLAG_Z: u8 = 1;
pub const FLAG_N: u8 = 2;
pub const FLAG_V: u8 = 3;
pub const FLAG_S: u8 = 4;
pub const FLAG_H: u8 = 5;
pub const FLAG_T: u8 = 6;
pub const FLAG_I: u8 = 7;

/// Register-file indices of the X/Y/Z pointer pairs (spec §3).
pub const X_L: usize = 26;
pub const X_H: usize = 27;
pub const Y_L: usize = 28;
pub const Y_H: usize = 29;
pub const Z_L: usize = 30;
pub const Z_H: usize = 31;

/// The single mutable state container (spec §3).
#[derive(Debug, Clone)]
pub struct Machine {
    pub r: [u8; REGISTER_FILE_SIZE],
    pub io: [u8; IO_SPACE_SIZE],
    pub sram: Vec<u8>,
    pub prog: Vec<u16>,
    pc: u16,
    pub sp: u16,
    sreg: u8,
    pub skip: bool,
    config: DeviceConfig,
}

impl Machine {
    /// Builds a machine for the default (ATtiny85-class) device.
    pub fn new() -> Self {
        Self::with_config(DeviceConfig::default())
    }

    /// Builds a machine for an explicit device configuration (spec §A.3).
    pub fn with_config(config: DeviceConfig) -> Self {
        let sram = vec![0u8; config.sram_bytes as usize];
        let prog = vec![0u16; config.flash_words as usize];
        let stack_top = (config.data_space_size() - 1) as u16;
        Machine {
            r: [0; REGISTER_FILE_SIZE],
            io: [0; IO_SPACE_SIZE],
            sram,
            prog,
            pc: 0,
            sp: stack_top,
            sreg: 0,
            skip: false,
            config,
        }
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn pc_mask(&self) -> u16 {
        self.config.pc_mask()
    }

    // -- Program counter --------------------------------------------------

    pub fn get_pc(&self) -> u16 {
        self.pc
    }

    /// Sets PC, masking to the device's flash size (spec §3 invariant 2).
    /// Accepts a wider integer so callers doing signed arithmetic (branch
    /// offsets, `PC + 1`/`+2`) don't need to pre-mask.
    pub fn set_pc(&mut self, word_addr: u32) {
        self.pc = (word_addr & self.pc_mask() as u32) as u16;
    }

    // -- Data memory (register/IO/SRAM aliased) ---------------------------

    pub fn get_data_mem(&self, addr: u16) -> Result<u8, Error> {
        let addr = addr as usize;
        if addr < REGISTER_FILE_SIZE {
            Ok(self.r[addr])
        } else if addr < REGISTER_FILE_SIZE + IO_SPACE_SIZE {
            Ok(self.io[addr - REGISTER_FILE_SIZE])
        } else {
            let sram_index = addr - REGISTER_FILE_SIZE - IO_SPACE_SIZE;
            self.sram
                .get(sram_index)
                .copied()
                .ok_or(Error::AddressOutOfRange { address: addr as u32 })
        }
    }

    pub fn set_data_mem(&mut self, addr: u16, value: u8) -> Result<(), Error> {
        let addr = addr as usize;
        if addr < REGISTER_FILE_SIZE {
            self.r[addr] = value;
            Ok(())
        } else if addr < REGISTER_FILE_SIZE + IO_SPACE_SIZE {
            self.io[addr - REGISTER_FILE_SIZE] = value;
            Ok(())
        } else {
            let sram_index = addr - REGISTER_FILE_SIZE - IO_SPACE_SIZE;
            let slot = self
                .sram
                .get_mut(sram_index)
                .ok_or(Error::AddressOutOfRange { address: addr as u32 })?;
            *slot = value;
            Ok(())
        }
    }

    // -- Program memory -----------------------------------------------------

    pub fn get_prog_mem(&self, word_addr: u16) -> Result<u16, Error> {
        self.prog
            .get(word_addr as usize)
            .copied()
            .ok_or(Error::AddressOutOfRange { address: word_addr as u32 })
    }

    pub fn get_prog_mem_byte(&self, byte_addr: u32) -> Result<u8, Error> {
        let word = self.get_prog_mem((byte_addr / 2) as u16)?;
        Ok(if byte_addr % 2 == 0 {
            (word & 0xFF) as u8
        } else {
            (word >> 8) as u8
        })
    }

    // -- Stack (spec §3 "SP") ----------------------------------------------

    fn stack_top(&self) -> u16 {
        (self.config.data_space_size() - 1) as u16
    }

    pub fn push_stack8(&mut self, value: u8) -> Result<(), Error> {
        self.set_data_mem(self.sp, value)?;
        self.sp = self.sp.checked_sub(1).ok_or(Error::StackOverflow)?;
        Ok(())
    }

    pub fn pop_stack8(&mut self) -> Result<u8, Error> {
        if self.sp >= self.stack_top() {
            return Err(Error::StackUnderflow);
        }
        self.sp += 1;
        self.get_data_mem(self.sp)
    }

    /// High byte pushed first, per spec §3 ("equivalent to big-endian on a
    /// descending stack").
    pub fn push_stack16(&mut self, value: u16) -> Result<(), Error> {
        self.push_stack8((value >> 8) as u8)?;
        self.push_stack8((value & 0xFF) as u8)
    }

    pub fn pop_stack16(&mut self) -> Result<u16, Error> {
        let low = self.pop_stack8()?;
        let high = self.pop_stack8()?;
        Ok(bits::get16(high, low))
    }

    // -- Status flags --------------------------------------------------------

    pub fn get_status_flag(&self, idx: u8) -> bool {
        bits::test_bit(self.sreg, idx)
    }

    pub fn set_status_flag(&mut self, idx: u8) {
        self.sreg = bits::set_bit(self.sreg, idx);
    }

    pub fn clear_status_flag(&mut self, idx: u8) {
        self.sreg = bits::clear_bit(self.sreg, idx);
    }

    pub fn sreg(&self) -> u8 {
        self.sreg
    }

    pub fn set_status_flag_to(&mut self, idx: u8, value: bool) {
        if value {
            self.set_status_flag(idx);
        } else {
            self.clear_status_flag(idx);
        }
    }

    // -- X/Y/Z pointer pairs --------------------------------------------------

    pub fn get_x(&self) -> u16 {
        bits::get16(self.r[X_H], self.r[X_L])
    }

    pub fn set_x(&mut self, value: u16) {
        bits::set16(&mut self.r[X_H], &mut self.r[X_L], value);
    }

    pub fn get_y(&self) -> u16 {
        bits::get16(self.r[Y_H], self.r[Y_L])
    }

    pub fn set_y(&mut self, value: u16) {
        bits::set16(&mut self.r[Y_H], &mut self.r[Y_L], value);
    }

    pub fn get_z(&self) -> u16 {
        bits::get16(self.r[Z_H], self.r[Z_L])
    }

    pub fn set_z(&mut self, value: u16) {
        bits::set16(&mut self.r[Z_H], &mut self.r[Z_L], value);
    }

    // -- Run loop (spec §4.G) ------------------------------------------------

    /// Repeatedly fetches, decodes and executes until the canonical
    /// `rjmp .-0` halt loop is recognized at the current PC.
    pub fn run(&mut self) -> Result<(), Error> {
        loop {
            let opcode = self.get_prog_mem(self.pc)?;
            if is_halt_opcode(opcode) {
                log::trace!("halt loop detected at PC={:#06x}", self.pc);
                return Ok(());
            }
            crate::engine::step(self, opcode)?;
        }
    }

    pub fn snapshot(&self) -> MachineState {
        MachineState {
            r: self.r,
            io: self.io.to_vec(),
            sram: self.sram.clone(),
            pc: self.pc,
            sp: self.sp,
            sreg: self.sreg,
        }
    }

    pub fn restore(&mut self, state: &MachineState) {
        self.r = state.r;
        self.io.copy_from_slice(&state.io);
        self.sram = state.sram.clone();
        self.pc = state.pc;
        self.sp = state.sp;
        self.sreg = state.sreg;
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

/// Recognizes `RJMP -1` (spec §4.G): `1100 kkkk kkkk kkkk` with the 12-bit
/// signed displacement equal to -1, i.e. all-ones.
pub fn is_halt_opcode(opcode: u16) -> bool {
    (opcode & 0xF000) == 0xC000 && (opcode & 0x0FFF) == 0x0FFF
}

/// A serializable snapshot of machine state (spec §A.4), for host tooling
/// (golden-file tests, debugging) to load or dump -- mirrors the teacher's
/// `CpuState`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineState {
    pub r: [u8; REGISTER_FILE_SIZE],
    pub io: Vec<u8>,
    pub sram: Vec<u8>,
    pub pc: u16,
    pub sp: u16,
    pub sreg: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_mem_aliases_register_file() {
        let mut m = Machine::new();
        m.set_data_mem(5, 0x42).unwrap();
        assert_eq!(m.r[5], 0x42);
        assert_eq!(m.get_data_mem(5).unwrap(), 0x42);
    }

    #[test]
    fn data_mem_aliases_io_space() {
        let mut m = Machine::new();
        m.set_data_mem(32, 0x11).unwrap();
        assert_eq!(m.io[0], 0x11);
    }

    #[test]
    fn data_mem_out_of_range_past_sram() {
        let m = Machine::new();
        let past_end = (m.config().data_space_size()) as u16;
        assert!(matches!(m.get_data_mem(past_end), Err(Error::AddressOutOfRange { .. })));
    }

    #[test]
    fn stack_push_pop_round_trip_restores_sp() {
        let mut m = Machine::new();
        let sp0 = m.sp;
        m.push_stack8(0xAB).unwrap();
        assert_eq!(m.pop_stack8().unwrap(), 0xAB);
        assert_eq!(m.sp, sp0);
    }

    #[test]
    fn stack16_high_byte_pushed_first() {
        let mut m = Machine::new();
        m.push_stack16(0xBEEF).unwrap();
        // High byte (0xBE) was pushed first, so it sits one address above
        // the low byte (0xEF) in descending-stack order.
        let low_addr = m.sp + 1;
        let high_addr = m.sp + 2;
        assert_eq!(m.get_data_mem(low_addr).unwrap(), 0xEF);
        assert_eq!(m.get_data_mem(high_addr).unwrap(), 0xBE);
        assert_eq!(m.pop_stack16().unwrap(), 0xBEEF);
    }

    #[test]
    fn x_pair_reads_writes_register_aliases() {
        let mut m = Machine::new();
        m.set_x(0x0102);
        assert_eq!(m.r[X_H], 0x01);
        assert_eq!(m.r[X_L], 0x02);
        assert_eq!(m.get_x(), 0x0102);
    }

    #[test]
    fn halt_opcode_detection() {
        assert!(is_halt_opcode(0xCFFF));
        assert!(!is_halt_opcode(0xCFFE));
        assert!(!is_halt_opcode(0xC000));
    }

    #[test]
    fn pc_wraps_at_device_mask() {
        let mut m = Machine::new();
        m.set_pc(m.pc_mask() as u32 + 1);
        assert_eq!(m.get_pc(), 0);
    }
}
