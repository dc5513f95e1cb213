//! Device parameters (spec §3: "data address range device-dependent").
//!
//! The teacher crate hardcodes its NES 64 KiB address space directly into
//! `CpuMemoryMapper`. AVR parts vary in flash and SRAM size, so this core
//! keeps those two numbers in a small `DeviceConfig` rather than baking in
//! one part.

/// Size of the register-file + I/O-space window at the bottom of data
/// memory, common to every classic AVR part.
pub const REGISTER_FILE_SIZE: usize = 32;
pub const IO_SPACE_SIZE: usize = 64;

/// Device parameters needed to size a [`crate::machine::Machine`].
///
/// The default matches the ATtiny85-class target implied by
/// `original_source/test/instruction_tests.py`'s `MCU_ATTiny85` test
/// configuration: 4096 words (8 KiB) of flash and 224 bytes of SRAM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Flash size in 16-bit words. Must be a power of two; `PC` is masked
    /// by `flash_words - 1`.
    pub flash_words: u32,
    /// SRAM size in bytes, above the register/IO window.
    pub sram_bytes: u32,
}

impl DeviceConfig {
    /// Program-counter mask for this device (flash size minus one, in words).
    pub fn pc_mask(&self) -> u16 {
        debug_assert!(self.flash_words.is_power_of_two());
        (self.flash_words - 1) as u16
    }

    /// Total byte-addressable data memory size (register file + I/O + SRAM).
    pub fn data_space_size(&self) -> usize {
        REGISTER_FILE_SIZE + IO_SPACE_SIZE + self.sram_bytes as usize
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            flash_words: 4096,
            sram_bytes: 224,
        }
    }
}
