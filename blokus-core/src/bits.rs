//! Fixed-length bit vector backing the packed board and every piece mask.
//!
//! Bits are numbered from the least significant bit of word 0 upwards, so a
//! positive shift moves bits toward higher cell indices (right and down on the
//! board). Bits past `bit_len` are always kept at zero.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};

const WORD_BITS: usize = 64;

/// Multi-word bit set of a fixed length.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct BitBoard {
    len: usize,
    words: Vec<u64>,
}

impl BitBoard {
    /// Create an all-zero bit set holding `len` bits.
    pub fn zeros(len: usize) -> BitBoard {
        BitBoard {
            len,
            words: vec![0; len.div_ceil(WORD_BITS)],
        }
    }

    /// Create a bit set with all `len` bits set.
    pub fn ones(len: usize) -> BitBoard {
        let mut bits = BitBoard {
            len,
            words: vec![u64::MAX; len.div_ceil(WORD_BITS)],
        };
        bits.trim();
        bits
    }

    /// Number of addressable bits.
    #[inline]
    pub fn bit_len(&self) -> usize {
        self.len
    }

    /// Raw storage words, least significant first.
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Read one bit. Out-of-range bits read as zero.
    #[inline]
    pub fn get(&self, bit: usize) -> bool {
        bit < self.len && (self.words[bit / WORD_BITS] >> (bit % WORD_BITS)) & 1 == 1
    }

    /// Set one bit.
    #[inline]
    pub fn set(&mut self, bit: usize) {
        debug_assert!(bit < self.len, "bit {} out of range {}", bit, self.len);
        self.words[bit / WORD_BITS] |= 1 << (bit % WORD_BITS);
    }

    /// Clear one bit.
    #[inline]
    pub fn clear(&mut self, bit: usize) {
        debug_assert!(bit < self.len, "bit {} out of range {}", bit, self.len);
        self.words[bit / WORD_BITS] &= !(1 << (bit % WORD_BITS));
    }

    /// Read the 4-bit group starting at `bit` (which must be a multiple of 4).
    #[inline]
    pub fn nibble(&self, bit: usize) -> u8 {
        debug_assert!(bit % 4 == 0);
        ((self.words[bit / WORD_BITS] >> (bit % WORD_BITS)) & 0xF) as u8
    }

    /// True if no bit is set.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// True if any bit is set in both `self` and `other`.
    #[inline]
    pub fn intersects(&self, other: &BitBoard) -> bool {
        debug_assert_eq!(self.len, other.len);
        self.words
            .iter()
            .zip(&other.words)
            .any(|(a, b)| a & b != 0)
    }

    /// Shift every bit by `by` positions, positive toward higher indices.
    ///
    /// Bits shifted below zero or past `bit_len` are dropped.
    #[inline]
    pub fn shifted(&self, by: isize) -> BitBoard {
        self.shifted_to(by, self.len)
    }

    /// Shift into a bit set of `len` bits: bit `i` moves to `i + by`.
    ///
    /// Bits that land below zero or at `len` and above are dropped, so a mask
    /// taller than the board can be cut down to board size in one step.
    pub fn shifted_to(&self, by: isize, len: usize) -> BitBoard {
        let mut out = BitBoard::zeros(len);
        let n_in = self.words.len();
        let n_out = out.words.len();
        let amount = by.unsigned_abs();
        let word_shift = amount / WORD_BITS;
        let bit_shift = (amount % WORD_BITS) as u32;

        if by >= 0 {
            for i in word_shift..n_out {
                let src = i - word_shift;
                let mut word = match self.words.get(src) {
                    Some(&w) => w << bit_shift,
                    None => 0,
                };
                if bit_shift != 0 && src > 0 && src - 1 < n_in {
                    word |= self.words[src - 1] >> (WORD_BITS as u32 - bit_shift);
                }
                out.words[i] = word;
            }
        } else {
            for i in 0..n_out {
                let src = i + word_shift;
                if src >= n_in {
                    break;
                }
                let mut word = self.words[src] >> bit_shift;
                if bit_shift != 0 && src + 1 < n_in {
                    word |= self.words[src + 1] << (WORD_BITS as u32 - bit_shift);
                }
                out.words[i] = word;
            }
        }

        out.trim();
        out
    }

    /// Iterate over the indices of set bits in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &word)| {
            let mut rest = word;
            std::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(i * WORD_BITS + bit)
            })
        })
    }

    /// Zero the unused high bits of the last word.
    fn trim(&mut self) {
        let used = self.len % WORD_BITS;
        if used != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << used) - 1;
            }
        }
    }
}

impl fmt::Debug for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitBoard[{}](", self.len)?;
        for (i, word) in self.words.iter().enumerate().rev() {
            if i + 1 != self.words.len() {
                write!(f, "_")?;
            }
            write!(f, "{:016x}", word)?;
        }
        write!(f, ")")
    }
}

impl BitAnd for &BitBoard {
    type Output = BitBoard;

    fn bitand(self, rhs: &BitBoard) -> BitBoard {
        let mut out = self.clone();
        out &= rhs;
        out
    }
}

impl BitOr for &BitBoard {
    type Output = BitBoard;

    fn bitor(self, rhs: &BitBoard) -> BitBoard {
        let mut out = self.clone();
        out |= rhs;
        out
    }
}

impl BitAndAssign<&BitBoard> for BitBoard {
    fn bitand_assign(&mut self, rhs: &BitBoard) {
        debug_assert_eq!(self.len, rhs.len);
        for (a, b) in self.words.iter_mut().zip(&rhs.words) {
            *a &= b;
        }
    }
}

impl BitOrAssign<&BitBoard> for BitBoard {
    fn bitor_assign(&mut self, rhs: &BitBoard) {
        debug_assert_eq!(self.len, rhs.len);
        for (a, b) in self.words.iter_mut().zip(&rhs.words) {
            *a |= b;
        }
    }
}
