//! Symbol alphabets.
//!
//! An alphabet is a contiguous run of byte values. Its radix R fixes the
//! width of every R-way node, and the symbol-to-index mapping fixes the order
//! in which child slots are visited.

use crate::error::{Error, Result};

/// A contiguous range of `radix` byte symbols starting at `first`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphabet {
    first: u8,
    radix: usize,
}

impl Alphabet {
    /// All 256 byte values.
    pub const EXTENDED_ASCII: Alphabet = Alphabet {
        first: 0,
        radix: 256,
    };

    /// 7-bit ASCII.
    pub const ASCII: Alphabet = Alphabet {
        first: 0,
        radix: 128,
    };

    /// `a` through `z`.
    pub const LOWERCASE: Alphabet = Alphabet {
        first: b'a',
        radix: 26,
    };

    pub fn new(first: u8, radix: usize) -> Result<Self> {
        if radix == 0 || first as usize + radix > 256 {
            return Err(Error::InvalidAlphabet { first, radix });
        }
        Ok(Self { first, radix })
    }

    #[inline]
    pub fn radix(&self) -> usize {
        self.radix
    }

    /// Child slot index of `symbol`, or `None` if it is not in the alphabet.
    #[inline]
    pub fn index_of(&self, symbol: u8) -> Option<usize> {
        let idx = symbol.checked_sub(self.first)? as usize;
        (idx < self.radix).then_some(idx)
    }

    /// Symbol stored at child slot `index`. `index` must be below the radix.
    #[inline]
    pub fn symbol_at(&self, index: usize) -> u8 {
        debug_assert!(index < self.radix);
        self.first + index as u8
    }

    #[inline]
    pub fn contains(&self, symbol: u8) -> bool {
        self.index_of(symbol).is_some()
    }

    /// Fails on the first symbol of `key` that is outside the alphabet.
    pub fn check(&self, key: &[u8]) -> Result<()> {
        self.check_with(key, |_| false)
    }

    /// Like `check`, but symbols for which `allow` holds are accepted even
    /// outside the alphabet.
    pub fn check_with(&self, key: &[u8], allow: impl Fn(u8) -> bool) -> Result<()> {
        match key.iter().position(|&b| !self.contains(b) && !allow(b)) {
            Some(position) => Err(Error::SymbolOutOfRange {
                symbol: key[position],
                position,
            }),
            None => Ok(()),
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::EXTENDED_ASCII
    }
}
