use crate::core::distance;
use crate::core::error::{IncompatibleHashError, ParseHashError};
use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width in bits of one payload word.
pub const WORD_BITS: usize = u64::BITS as usize;

/// Algorithm that produced a [`HashValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum HashKind {
    Average,
    Difference,
    Perception,
    DoubleGradient,
}

impl HashKind {
    pub const ALL: [HashKind; 4] = [
        HashKind::Average,
        HashKind::Difference,
        HashKind::Perception,
        HashKind::DoubleGradient,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HashKind::Average => "average",
            HashKind::Difference => "difference",
            HashKind::Perception => "perception",
            HashKind::DoubleGradient => "double-gradient",
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The only place textual algorithm names are mapped onto [`HashKind`].
impl FromStr for HashKind {
    type Err = ParseHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "average" | "ahash" => Ok(HashKind::Average),
            "difference" | "dhash" => Ok(HashKind::Difference),
            "perception" | "phash" => Ok(HashKind::Perception),
            "double-gradient" | "dgrad" => Ok(HashKind::DoubleGradient),
            other => Err(ParseHashError::UnknownKind(other.to_string())),
        }
    }
}

/// Immutable bit-packed perceptual hash.
///
/// Bits are stored least-significant-bit first inside each `u64` word, and
/// words are kept in production order. Bits past `bits` in the final word
/// are always zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HashValue {
    words: Vec<u64>,
    kind: HashKind,
    bits: usize,
}

impl HashValue {
    /// Builds a hash from already packed words.
    ///
    /// Fails unless the words hold exactly enough storage for `bits`, with no
    /// trailing word left unused.
    pub fn from_words(
        mut words: Vec<u64>,
        kind: HashKind,
        bits: usize,
    ) -> Result<Self, ParseHashError> {
        if bits == 0 {
            return Err(ParseHashError::Empty);
        }
        if words.len() != bits.div_ceil(WORD_BITS) {
            return Err(ParseHashError::LengthMismatch {
                expected: bits.div_ceil(WORD_BITS),
                found: words.len(),
            });
        }
        if let Some(last) = words.last_mut() {
            *last &= last_word_mask(bits);
        }
        Ok(Self { words, kind, bits })
    }

    /// Packs a bit sequence, first bit into bit 0 of the first word.
    pub fn from_bools<I>(bits: I, kind: HashKind) -> Result<Self, ParseHashError>
    where
        I: IntoIterator<Item = bool>,
    {
        let mut words = Vec::new();
        let mut count = 0usize;
        for bit in bits {
            if count % WORD_BITS == 0 {
                words.push(0u64);
            }
            if bit {
                if let Some(word) = words.last_mut() {
                    *word |= 1u64 << (count % WORD_BITS);
                }
            }
            count += 1;
        }
        Self::from_words(words, kind, count)
    }

    /// Builds a hash from little-endian bytes, as produced by [`HashValue::to_bytes`].
    pub fn from_bytes(bytes: &[u8], kind: HashKind, bits: usize) -> Result<Self, ParseHashError> {
        let expected = bits.div_ceil(8);
        if bytes.len() != expected {
            return Err(ParseHashError::LengthMismatch {
                expected,
                found: bytes.len(),
            });
        }
        let words = bytes
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u64, |acc, (i, &b)| acc | (u64::from(b) << (i * 8)))
            })
            .collect();
        Self::from_words(words, kind, bits)
    }

    pub fn kind(&self) -> HashKind {
        self.kind
    }

    pub fn bits(&self) -> usize {
        self.bits
    }

    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// Value of the `index`-th emitted bit.
    pub fn bit(&self, index: usize) -> bool {
        index < self.bits && (self.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 == 1
    }

    /// Hamming distance to `other`; see [`distance::distance`].
    pub fn distance(&self, other: &HashValue) -> Result<u32, IncompatibleHashError> {
        distance::distance(self, other)
    }

    /// The `ceil(bits / 8)` meaningful bytes, little-endian.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = self.words.iter().flat_map(|w| w.to_le_bytes()).collect();
        bytes.truncate(self.bits.div_ceil(8));
        bytes
    }

    /// `bits` characters of `0`/`1`; the last character is bit 0.
    pub fn to_binary_string(&self) -> String {
        (0..self.bits)
            .rev()
            .map(|i| if self.bit(i) { '1' } else { '0' })
            .collect()
    }

    pub fn parse_binary_string(s: &str, kind: HashKind) -> Result<Self, ParseHashError> {
        if s.is_empty() {
            return Err(ParseHashError::Empty);
        }
        let mut bools = Vec::with_capacity(s.len());
        for (position, c) in s.chars().enumerate() {
            match c {
                '0' => bools.push(false),
                '1' => bools.push(true),
                found => return Err(ParseHashError::InvalidCharacter { found, position }),
            }
        }
        bools.reverse();
        Self::from_bools(bools, kind)
    }

    /// Big-endian hex of the hash read as one integer, `ceil(bits / 4)` digits.
    pub fn to_hex(&self) -> String {
        let digits = self.bits.div_ceil(4);
        (0..digits)
            .rev()
            .map(|d| {
                let nibble = (0..4).fold(0u32, |acc, i| acc | (u32::from(self.bit(d * 4 + i)) << i));
                char::from_digit(nibble, 16).unwrap_or('0')
            })
            .collect()
    }

    /// Inverse of [`HashValue::to_hex`]. `bits` must fit in the supplied digits.
    pub fn from_hex(s: &str, kind: HashKind, bits: usize) -> Result<Self, ParseHashError> {
        if s.is_empty() {
            return Err(ParseHashError::Empty);
        }
        let nibbles = s
            .chars()
            .enumerate()
            .map(|(position, c)| {
                c.to_digit(16)
                    .ok_or(ParseHashError::InvalidCharacter { found: c, position })
            })
            .collect::<Result<Vec<_>, _>>()?;
        if nibbles.len() != bits.div_ceil(4) {
            return Err(ParseHashError::LengthMismatch {
                expected: bits.div_ceil(4),
                found: nibbles.len(),
            });
        }
        let bools = nibbles
            .iter()
            .rev()
            .flat_map(|n| (0..4).map(move |i| (n >> i) & 1 == 1))
            .take(bits);
        Self::from_bools(bools, kind)
    }

    /// Standard base64 of [`HashValue::to_bytes`], no `=` padding.
    pub fn to_base64(&self) -> String {
        STANDARD_NO_PAD.encode(self.to_bytes())
    }

    pub fn from_base64(s: &str, kind: HashKind, bits: usize) -> Result<Self, ParseHashError> {
        let bytes = STANDARD_NO_PAD.decode(s.trim())?;
        Self::from_bytes(&bytes, kind, bits)
    }
}

/// Mask selecting the live bits of the final payload word.
pub(crate) fn last_word_mask(bits: usize) -> u64 {
    match bits % WORD_BITS {
        0 => u64::MAX,
        rem => (1u64 << rem) - 1,
    }
}
