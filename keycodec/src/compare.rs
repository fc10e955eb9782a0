//! Unsigned lexicographic byte comparison.
//!
//! Every ordering decision in the crate bottoms out here: the storage engine
//! compares keys as unsigned bytes, so the encodings are built to make this
//! comparison agree with the semantic order of the decoded keys.

use std::cmp::Ordering;

/// Compare two byte strings as unsigned bytes.
///
/// The common prefix is compared byte by byte and the first mismatch decides.
/// If one input is a prefix of the other, the longer one is greater.
#[must_use]
pub fn byte_compare(a: &[u8], b: &[u8]) -> Ordering {
    let common = a.len().min(b.len());
    for (x, y) in a[..common].iter().zip(&b[..common]) {
        match x.cmp(y) {
            Ordering::Equal => {}
            unequal => return unequal,
        }
    }
    a.len().cmp(&b.len())
}

/// Convert an [`Ordering`] into the `-1 / 0 / 1` form storage comparators use.
#[must_use]
pub const fn compare_sign(ordering: Ordering) -> i32 {
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// Compare two key spans that each split into a leading and a trailing part.
///
/// The leading parts are compared first and the trailing parts only break ties,
/// which is the shape every two-field layout reduces to once its length header
/// has been read.
#[must_use]
pub fn compare_split(a: (&[u8], &[u8]), b: (&[u8], &[u8])) -> Ordering {
    byte_compare(a.0, b.0).then_with(|| byte_compare(a.1, b.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_inputs() {
        assert_eq!(byte_compare(b"abc", b"abc"), Ordering::Equal);
        assert_eq!(byte_compare(b"", b""), Ordering::Equal);
    }

    #[test]
    fn test_first_mismatch_decides() {
        assert_eq!(byte_compare(b"abd", b"abc"), Ordering::Greater);
        assert_eq!(byte_compare(b"abc", b"abd"), Ordering::Less);
        // The mismatch wins even when the other input is longer.
        assert_eq!(byte_compare(b"b", b"aaaa"), Ordering::Greater);
    }

    #[test]
    fn test_prefix_is_less() {
        assert_eq!(byte_compare(b"ab", b"abc"), Ordering::Less);
        assert_eq!(byte_compare(b"abc", b"ab"), Ordering::Greater);
        assert_eq!(byte_compare(b"", b"\x00"), Ordering::Less);
    }

    #[test]
    fn test_bytes_are_unsigned() {
        // 0x80 would be negative as i8.
        assert_eq!(byte_compare(&[0x80], &[0x7F]), Ordering::Greater);
        assert_eq!(byte_compare(&[0xFF, 0x00], &[0x01, 0xFF]), Ordering::Greater);
    }

    #[test]
    fn test_non_ascii_utf8_is_byte_order() {
        // U+00E9 encodes as C3 A9, U+FF21 as EF BC A1.
        let e_acute = "\u{e9}".as_bytes();
        let fullwidth_a = "\u{ff21}".as_bytes();
        assert_eq!(byte_compare(e_acute, fullwidth_a), Ordering::Less);
        assert_eq!(byte_compare(e_acute, b"z"), Ordering::Greater);
    }

    #[test]
    fn test_compare_sign() {
        assert_eq!(compare_sign(byte_compare(b"a", b"b")), -1);
        assert_eq!(compare_sign(byte_compare(b"a", b"a")), 0);
        assert_eq!(compare_sign(byte_compare(b"b", b"a")), 1);
    }

    #[test]
    fn test_compare_split_leading_part_first() {
        let ordering = compare_split((b"a", b"zzz"), (b"b", b""));
        assert_eq!(ordering, Ordering::Less);
        let ordering = compare_split((b"a", b"1"), (b"a", b"2"));
        assert_eq!(ordering, Ordering::Less);
        let ordering = compare_split((b"a", b""), (b"a", b""));
        assert_eq!(ordering, Ordering::Equal);
    }

    #[test]
    fn test_compare_split_differs_from_concatenation() {
        // Concatenated, "ab"+"" and "a"+"c" would compare "ab" vs "ac".
        let ordering = compare_split((b"ab", b""), (b"a", b"c"));
        assert_eq!(ordering, Ordering::Greater);
    }
}
