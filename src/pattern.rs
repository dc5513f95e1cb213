//! Opcode bit-pattern templates (spec §4.D points 2 and 9, §4.D "Operand
//! extraction", §9 "Operand bit scrambling").
//!
//! Grounded on `original_source/instructions.py`'s `Variable.generate_decoder`
//! (grouping a field's bit positions into contiguous runs and emitting
//! shift/mask terms), reimplemented as a runtime extractor instead of a
//! Python-to-C code generator, per spec §9's "build-time code generation vs.
//! runtime interpretation" note.

use std::collections::HashMap;

/// A per-field offset applied after raw bits are assembled: `field = mul*raw
/// + add` (spec §4.D point 9). `mul` defaults to 1 when absent.
#[derive(Debug, Clone, Copy)]
pub struct VarOffset {
    pub field: char,
    pub add: i32,
    pub mul: i32,
}

impl VarOffset {
    pub const fn new(field: char, add: i32) -> Self {
        VarOffset { field, add, mul: 1 }
    }

    pub const fn scaled(field: char, add: i32, mul: i32) -> Self {
        VarOffset { field, add, mul }
    }
}

/// A parsed opcode template, e.g. `"0001_11rd_dddd_rrrr"` or the two-word
/// `"1001_010k_kkkk_111k kkkk_kkkk_kkkk_kkkk"`.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// 16 for a single-word instruction, 32 for a two-word one.
    pub width: u32,
    /// Fixed-bit mask over the full (possibly 32-bit) opcode.
    pub mask: u32,
    /// Fixed-bit signature over the full opcode; `(opcode & mask) ==
    /// signature` iff this pattern matches.
    pub signature: u32,
    /// Mask restricted to the first fetched word, used by the decoder to
    /// bucket two-word instructions before the extension word is fetched.
    pub decode_mask: u16,
    pub decode_signature: u16,
    /// 1 or 2, derived from `width`.
    pub word_count: u8,
    /// For each operand letter, the opcode bit positions that contribute to
    /// it, in order of first appearance in the pattern text (the first
    /// appearance becomes the most-significant bit of the extracted value).
    fields: Vec<(char, Vec<u32>)>,
    var_offsets: Vec<VarOffset>,
}

impl Pattern {
    /// Parses a template string. Words are separated by whitespace (for
    /// 32-bit instructions); nibbles within a word may be separated by `_`
    /// for readability. Characters are read left (MSB) to right (LSB).
    pub fn parse(template: &str, var_offsets: &[VarOffset]) -> Pattern {
        let cleaned: String = template.chars().filter(|c| *c != '_' && *c != ' ').collect();
        let width = cleaned.len() as u32;
        debug_assert!(width == 16 || width == 32, "opcode pattern must be 16 or 32 bits");

        let mut mask: u32 = 0;
        let mut signature: u32 = 0;
        let mut field_positions: Vec<(char, u32)> = Vec::new();

        for (text_pos, ch) in cleaned.chars().enumerate() {
            let bit = width - 1 - text_pos as u32;
            match ch {
                '0' => mask |= 1 << bit,
                '1' => {
                    mask |= 1 << bit;
                    signature |= 1 << bit;
                }
                letter => field_positions.push((letter, bit)),
            }
        }

        let mut fields: Vec<(char, Vec<u32>)> = Vec::new();
        for (letter, bit) in field_positions {
            if let Some(entry) = fields.iter_mut().find(|(c, _)| *c == letter) {
                entry.1.push(bit);
            } else {
                fields.push((letter, vec![bit]));
            }
        }

        let (decode_mask, decode_signature) = if width == 16 {
            (mask as u16, signature as u16)
        } else {
            ((mask >> 16) as u16, (signature >> 16) as u16)
        };

        Pattern {
            width,
            mask,
            signature,
            decode_mask,
            decode_signature,
            word_count: if width == 32 { 2 } else { 1 },
            fields,
            var_offsets: var_offsets.to_vec(),
        }
    }

    pub fn matches(&self, opcode: u32) -> bool {
        (opcode & self.mask) == self.signature
    }

    pub fn matches_first_word(&self, first_word: u16) -> bool {
        (first_word & self.decode_mask) == self.decode_signature
    }

    /// Extracts every operand field from `opcode` (the full, possibly
    /// extended, opcode), most-significant-first-appearance preserved, with
    /// `var_offsets` applied.
    pub fn extract(&self, opcode: u32) -> HashMap<char, u32> {
        let mut out = HashMap::with_capacity(self.fields.len());
        for (letter, positions) in &self.fields {
            let mut value: u32 = 0;
            for bit in positions {
                value = (value << 1) | ((opcode >> bit) & 1);
            }
            out.insert(*letter, value);
        }
        for offset in &self.var_offsets {
            if let Some(raw) = out.get_mut(&offset.field) {
                *raw = ((*raw as i32) * offset.mul + offset.add) as u32;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adc_mask_and_signature() {
        let p = Pattern::parse("0001_11rd_dddd_rrrr", &[]);
        assert_eq!(p.mask, 0b1111_1100_0000_0000);
        assert_eq!(p.signature, 0b0001_1100_0000_0000);
        assert_eq!(p.word_count, 1);
    }

    #[test]
    fn adc_operand_extraction_preserves_letter_order() {
        // 0001 11rd dddd rrrr, with r=0b10101 (5 bits: d bit + 4 r bits split
        // across the template) -- use a concrete opcode instead to pin down
        // extraction: d=5 (00101), r=9 (01001).
        // d occupies bit 9 (the 'd' right after "11r") plus bits 4..0? No:
        // template is 0001_11rd_dddd_rrrr -> positions (MSB..LSB) are fixed
        // bits 15..10, then 'r','d','d','d','d','d'? Let's just decode
        // ourselves with a known opcode and assert against hand computation.
        let p = Pattern::parse("0001_11rd_dddd_rrrr", &[]);
        // opcode = 0001_1101_0101_1001
        let opcode = 0b0001_1101_0101_1001u32;
        let fields = p.extract(opcode);
        // bit layout (MSB=15..LSB=0): 0,0,0,1,1,1,r,d,d,d,d,d,r,r,r,r
        // text: 0 0 0 1 1 1 r d d d d d r r r r
        let bits: Vec<char> = "0001_11rd_dddd_rrrr".chars().filter(|c| *c != '_').collect();
        let mut expected_d = 0u32;
        let mut expected_r = 0u32;
        for (i, c) in bits.iter().enumerate() {
            let bit_pos = 15 - i as u32;
            let bit_val = (opcode >> bit_pos) & 1;
            if *c == 'd' {
                expected_d = (expected_d << 1) | bit_val;
            } else if *c == 'r' {
                expected_r = (expected_r << 1) | bit_val;
            }
        }
        assert_eq!(fields[&'d'], expected_d);
        assert_eq!(fields[&'r'], expected_r);
    }

    #[test]
    fn var_offset_applies_after_extraction() {
        // LDI: 1110_KKKK_dddd_KKKK, d offset +0x10 (register 16-31 only).
        let p = Pattern::parse("1110_KKKK_dddd_KKKK", &[VarOffset::new('d', 0x10)]);
        // d field = 0b0101 = 5 -> expect 0x15
        let opcode = 0b1110_0000_0101_0000u32;
        let fields = p.extract(opcode);
        assert_eq!(fields[&'d'], 0x15);
    }

    #[test]
    fn adiw_scaled_offset() {
        // ADIW: 1001_0110_KKdd_KKKK, d offset (24, mul 2): d raw in {0,1,2,3} -> {24,26,28,30}.
        let p = Pattern::parse("1001_0110_KKdd_KKKK", &[VarOffset::scaled('d', 24, 2)]);
        let opcode = 0b1001_0110_0001_0000u32; // d raw = 0b01 = 1
        let fields = p.extract(opcode);
        assert_eq!(fields[&'d'], 26);
    }

    #[test]
    fn two_word_pattern_decode_bucket_uses_first_word_only() {
        let p = Pattern::parse("1001_010k_kkkk_110k kkkk_kkkk_kkkk_kkkk", &[]);
        assert_eq!(p.width, 32);
        assert_eq!(p.word_count, 2);
        // decode_mask/signature should equal the mask/signature of just the
        // first 16 bits, usable against a bare fetched first word.
        let first_word_pattern = Pattern::parse("1001_010k_kkkk_110k", &[]);
        assert_eq!(p.decode_mask, first_word_pattern.mask as u16);
        assert_eq!(p.decode_signature, first_word_pattern.signature as u16);
    }

    #[test]
    fn scrambled_q_field_preserves_value_bit_order() {
        // LD_Y_iv: 10q0_qq0d_dddd_1qqq -- q's bits appear (in text order)
        // at positions contributing value bits 5,4,3 then 0 (per spec §9
        // example bit positions 5,11,12,13 -> value bits 0,3,4,5, written
        // here using the Y-variant encoding actually used in the table).
        let p = Pattern::parse("10q0_qq0d_dddd_1qqq", &[]);
        // opcode with q bits set to 0b101101 across scattered positions and
        // d=0, and verify against a by-hand bit walk identical to extract's
        // algorithm (this test mainly pins down that first-appearance in
        // the pattern text becomes the MSB of the value, matching §9).
        let opcode = 0b1010_0100_0001_1011u32;
        let fields = p.extract(opcode);
        let bits: Vec<char> = "10q0_qq0d_dddd_1qqq".chars().filter(|c| *c != '_').collect();
        let mut expected_q = 0u32;
        for (i, c) in bits.iter().enumerate() {
            if *c == 'q' {
                let bit_pos = 15 - i as u32;
                let bit_val = (opcode >> bit_pos) & 1;
                expected_q = (expected_q << 1) | bit_val;
            }
        }
        assert_eq!(fields[&'q'], expected_q);
    }
}
