//! Cohort hash for pseudonymized identifiers.
//!
//! The hash groups records by an anonymized identity (email local part,
//! transaction id) without exposing the original value. It is the same
//! rolling 32-bit hash the existing exports were produced with, so its
//! exact wraparound behavior is load-bearing: digests in new exports must
//! match digests in old ones for cohort analysis to line up.

/// Digest an identifier into an 8-character-or-fewer lowercase hex string.
///
/// Rolling hash over the UTF-16 code units of the input: the accumulator
/// starts at 0 and each unit applies `h = (h << 5) - h + unit` on a signed
/// 32-bit integer with wraparound. The absolute value is taken in 64-bit
/// space (an accumulator of `i32::MIN` maps to `2147483648` rather than
/// overflowing), rendered as lowercase hex, and truncated (never padded)
/// to at most 8 characters. `hash8("")` is `"0"`.
///
/// Deliberately collision-prone and reversible by brute force. Do not use
/// it for anything security-sensitive, and do not swap in a stronger hash:
/// published exports depend on these exact digests.
pub fn hash8(input: &str) -> String {
    let mut hash: i32 = 0;
    for unit in input.encode_utf16() {
        hash = (hash << 5).wrapping_sub(hash).wrapping_add(i32::from(unit));
    }

    let mut hex = format!("{:x}", i64::from(hash).unsigned_abs());
    hex.truncate(8);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digests() {
        // Reference values from the exports already in production.
        assert_eq!(hash8("a"), "61");
        assert_eq!(hash8("hello"), "5e918d2");
        assert_eq!(hash8("jane.doe"), "302c2f86");
        assert_eq!(hash8("customer"), "24217fde");
        assert_eq!(hash8("txn_789012"), "29691eb2");
        assert_eq!(hash8("user_12345"), "6f920abf");
        assert_eq!(hash8("The quick brown fox"), "67ac295d");
    }

    #[test]
    fn test_empty_input_is_zero() {
        assert_eq!(hash8(""), "0");
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(hash8("support"), hash8("support"));
        assert_eq!(hash8("support"), "6e8d8031");
    }

    #[test]
    fn test_negative_accumulator_takes_absolute_value() {
        // "jane.doe" drives the signed accumulator negative (-808202118).
        assert_eq!(hash8("jane.doe"), "302c2f86");
        assert_eq!(hash8("alice.w"), "36820377");
    }

    #[test]
    fn test_i32_min_accumulator_does_not_panic() {
        // This input lands the accumulator on exactly i32::MIN, whose
        // absolute value does not fit in i32.
        assert_eq!(hash8("GydE1\u{51DE}"), "80000000");
    }

    #[test]
    fn test_utf16_code_unit_iteration() {
        // Non-ASCII BMP characters hash by their single code unit...
        assert_eq!(hash8("Gr\u{fc}\u{df}e"), "4202477");
        // ...while astral characters hash as their surrogate pair.
        assert_eq!(hash8("\u{1F680}"), "1b0de3");
    }

    #[test]
    fn test_output_shape() {
        for input in ["", "a", "hello", "jane.doe", &"x".repeat(40)] {
            let digest = hash8(input);
            assert!(!digest.is_empty());
            assert!(digest.len() <= 8, "digest too long for {input:?}");
            assert!(
                digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
                "digest not lowercase hex for {input:?}"
            );
        }
        assert_eq!(hash8(&"x".repeat(40)), "3280ac00");
    }
}
