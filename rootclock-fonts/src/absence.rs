//! Cache of codepoints known to be missing from every font in a chain.
//!
//! Resolving a missing codepoint means scanning the whole system font
//! database, which is far too slow to repeat for every frame. The cache is a
//! small direct-mapped table: two probe slots per codepoint, unconditional
//! overwrite on collision, no eviction bookkeeping. A hit is authoritative, a
//! miss only means "not known".

/// Number of slots. Small and cache-friendly; collisions merely cost a
/// redundant font match.
pub const SLOTS: usize = 128;

const MURMUR3_C1: u32 = 0x21F0_AAAD;
const MURMUR3_C2: u32 = 0xD35A_2D97;

#[derive(Debug, Clone)]
pub struct GlyphAbsenceCache {
    // 0 marks an empty slot; U+0000 is never recorded.
    slots: [u32; SLOTS],
}

impl Default for GlyphAbsenceCache {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphAbsenceCache {
    pub fn new() -> Self {
        Self { slots: [0; SLOTS] }
    }

    /// The two candidate slots for `codepoint`.
    ///
    /// Uses the tail rounds of the MurmurHash3 finalizer to spread adjacent
    /// codepoints across the table.
    pub fn probes(codepoint: u32) -> (usize, usize) {
        let mut hash = codepoint;
        hash = ((hash >> 16) ^ hash).wrapping_mul(MURMUR3_C1);
        hash = ((hash >> 15) ^ hash).wrapping_mul(MURMUR3_C2);
        let h0 = ((hash >> 15) ^ hash) as usize % SLOTS;
        let h1 = (hash >> 17) as usize % SLOTS;
        (h0, h1)
    }

    /// Whether `codepoint` was recorded absent.
    pub fn contains(&self, codepoint: u32) -> bool {
        if codepoint == 0 {
            return false;
        }
        let (h0, h1) = Self::probes(codepoint);
        self.slots[h0] == codepoint || self.slots[h1] == codepoint
    }

    /// Record `codepoint` as absent, overwriting whatever the chosen slot held.
    pub fn insert(&mut self, codepoint: u32) {
        if codepoint == 0 {
            return;
        }
        let (h0, h1) = Self::probes(codepoint);
        let slot = if self.slots[h0] != 0 { h1 } else { h0 };
        self.slots[slot] = codepoint;
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|&&s| s != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
