//! Program loader (spec §4.H, §6 "Program binary format").
//!
//! Interface-only per spec §1 (file I/O is a host concern); this module only
//! knows how to turn a byte slice already in memory into program words.
//! Grounded on the teacher's `CpuMemoryMapper` construction pattern,
//! generalized to little-endian word loading.

use crate::error::Error;
use crate::machine::Machine;

/// Loads a flat little-endian program image into `m.prog`, starting at word
/// address 0. Byte `2i` is the low byte of word `i`, byte `2i+1` the high
/// byte (spec §6). Fails if the image is larger than the device's flash, or
/// has an odd length.
pub fn load(m: &mut Machine, image: &[u8]) -> Result<(), Error> {
    if image.len() % 2 != 0 {
        return Err(Error::AddressOutOfRange { address: image.len() as u32 });
    }
    let word_count = image.len() / 2;
    if word_count > m.prog.len() {
        return Err(Error::AddressOutOfRange { address: word_count as u32 });
    }
    for (i, word) in image.chunks_exact(2).enumerate() {
        m.prog[i] = u16::from_le_bytes([word[0], word[1]]);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_words_little_endian_from_word_zero() {
        let mut m = Machine::new();
        load(&mut m, &[0xEF, 0xBE, 0x01, 0x02]).unwrap();
        assert_eq!(m.prog[0], 0xBEEF);
        assert_eq!(m.prog[1], 0x0201);
    }

    #[test]
    fn rejects_odd_length_image() {
        let mut m = Machine::new();
        assert!(load(&mut m, &[0x00]).is_err());
    }

    #[test]
    fn rejects_image_larger_than_flash() {
        let mut m = Machine::new();
        let too_big = vec![0u8; (m.prog.len() + 1) * 2];
        assert!(load(&mut m, &too_big).is_err());
    }
}
