use crate::core::error::IncompatibleHashError;
use crate::core::hash::{HashValue, last_word_mask};

/// Hamming distance between two hashes of the same kind and bit count.
///
/// Padding bits past `bits` in the final word are masked out before counting.
pub fn distance(a: &HashValue, b: &HashValue) -> Result<u32, IncompatibleHashError> {
    if a.kind() != b.kind() {
        return Err(IncompatibleHashError::KindMismatch {
            left: a.kind(),
            right: b.kind(),
        });
    }
    if a.bits() != b.bits() {
        return Err(IncompatibleHashError::BitCountMismatch {
            left: a.bits(),
            right: b.bits(),
        });
    }

    let last = a.words().len() - 1;
    let mask = last_word_mask(a.bits());
    Ok(a.words()
        .iter()
        .zip(b.words())
        .enumerate()
        .map(|(i, (x, y))| {
            let diff = x ^ y;
            if i == last { diff & mask } else { diff }
        })
        .map(u64::count_ones)
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hash::HashKind;

    fn hash(words: Vec<u64>, bits: usize) -> HashValue {
        HashValue::from_words(words, HashKind::DoubleGradient, bits).unwrap()
    }

    #[test]
    fn test_identity_is_zero() {
        let h = hash(vec![0xDEAD_BEEF_0BAD_F00D, 0x1F], 69);
        assert_eq!(distance(&h, &h).unwrap(), 0);
    }

    #[test]
    fn test_symmetric() {
        let a = hash(vec![0b1011_0110], 8);
        let b = hash(vec![0b0110_1100], 8);
        assert_eq!(distance(&a, &b).unwrap(), distance(&b, &a).unwrap());
        assert_eq!(distance(&a, &b).unwrap(), 5);
    }

    #[test]
    fn test_complement_reaches_bit_count() {
        for bits in [1usize, 40, 64, 100, 128] {
            let ones = vec![true; bits];
            let zeros = vec![false; bits];
            let a = HashValue::from_bools(ones, HashKind::Average).unwrap();
            let b = HashValue::from_bools(zeros, HashKind::Average).unwrap();
            assert_eq!(distance(&a, &b).unwrap(), bits as u32);
        }
    }

    #[test]
    fn test_padding_is_ignored() {
        let a = hash(vec![u64::MAX], 10);
        let b = hash(vec![0x3FF], 10);
        assert_eq!(distance(&a, &b).unwrap(), 0);
    }

    #[test]
    fn test_kind_mismatch_is_rejected() {
        let a = HashValue::from_words(vec![1], HashKind::Average, 64).unwrap();
        let b = HashValue::from_words(vec![1], HashKind::Perception, 64).unwrap();
        assert_eq!(
            distance(&a, &b).unwrap_err(),
            IncompatibleHashError::KindMismatch {
                left: HashKind::Average,
                right: HashKind::Perception
            }
        );
    }

    #[test]
    fn test_bit_count_mismatch_is_rejected() {
        let a = hash(vec![1], 40);
        let b = hash(vec![1], 64);
        assert!(matches!(
            a.distance(&b),
            Err(IncompatibleHashError::BitCountMismatch {
                left: 40,
                right: 64
            })
        ));
    }
}
