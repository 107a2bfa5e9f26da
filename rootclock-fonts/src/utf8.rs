//! Strict single-codepoint UTF-8 decoding.
//!
//! Unlike `std::str::from_utf8`, [`decode`] reports how many bytes of a broken
//! sequence it consumed, so a caller scanning arbitrary bytes can skip exactly
//! the bad run and keep going.

/// U+FFFD REPLACEMENT CHARACTER, returned for every invalid sequence.
pub const REPLACEMENT: u32 = 0xFFFD;

/// Expected sequence length indexed by `lead_byte >> 3`; 0 marks bytes that can
/// never start a sequence (continuation bytes and 0xF8..=0xFF).
const LENGTHS: [u8; 32] = [
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, // 0xxxx
    0, 0, 0, 0, 0, 0, 0, 0, // 10xxx
    2, 2, 2, 2, // 110xx
    3, 3, // 1110x
    4, // 11110
    0, // 11111
];

/// Payload bits of the lead byte for 1..=4 byte sequences.
const LEAD_MASK: [u8; 4] = [0x7F, 0x1F, 0x0F, 0x07];

/// Smallest value that needs a sequence of 1..=4 bytes.
const MIN_VALUE: [u32; 4] = [0x0, 0x80, 0x800, 0x10000];

/// One decoded codepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    /// The scalar value, or [`REPLACEMENT`] when `valid` is false.
    pub codepoint: u32,
    pub valid: bool,
    /// Bytes consumed, always in `1..=4`.
    pub len: usize,
}

impl Decoded {
    fn invalid(len: usize) -> Self {
        Self {
            codepoint: REPLACEMENT,
            valid: false,
            len,
        }
    }

    /// The decoded value as a `char`, `U+FFFD` for invalid input.
    pub fn as_char(&self) -> char {
        char::from_u32(self.codepoint).unwrap_or(char::REPLACEMENT_CHARACTER)
    }
}

/// Decode the codepoint at the start of `bytes`.
///
/// Input ends at the end of the slice or at the first NUL byte. An empty input
/// (or one starting with NUL) decodes as U+0000 with length 1.
pub fn decode(bytes: &[u8]) -> Decoded {
    let Some(&lead) = bytes.first() else {
        return Decoded {
            codepoint: 0,
            valid: true,
            len: 1,
        };
    };

    let len = LENGTHS[usize::from(lead >> 3)] as usize;
    if len == 0 {
        return Decoded::invalid(1);
    }

    let mut cp = u32::from(lead & LEAD_MASK[len - 1]);
    for i in 1..len {
        match bytes.get(i) {
            Some(&b) if b != 0 && b & 0xC0 == 0x80 => {
                cp = (cp << 6) | u32::from(b & 0x3F);
            }
            // Truncated: report the bytes examined so far as consumed.
            _ => return Decoded::invalid(i),
        }
    }

    // (cp >> 11) == 0x1B is exactly the surrogate block U+D800..=U+DFFF.
    if cp > 0x10FFFF || (cp >> 11) == 0x1B || cp < MIN_VALUE[len - 1] {
        return Decoded::invalid(len);
    }

    Decoded {
        codepoint: cp,
        valid: true,
        len,
    }
}

/// Iterate over `(byte_offset, Decoded)` pairs until the end or a NUL byte.
pub fn decode_all(bytes: &[u8]) -> impl Iterator<Item = (usize, Decoded)> + '_ {
    let mut pos = 0;
    std::iter::from_fn(move || {
        if pos >= bytes.len() || bytes[pos] == 0 {
            return None;
        }
        let d = decode(&bytes[pos..]);
        let at = pos;
        pos += d.len;
        Some((at, d))
    })
}
