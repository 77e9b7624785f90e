//! XOR checksum used by NMEA 0183 sentences.

/// XOR-folds every byte of `body`.
///
/// `body` is the sentence content between `$` and `*`, both excluded.
pub fn compute(body: &[u8]) -> u8 {
    body.iter().fold(0, |acc, b| acc ^ b)
}

/// Renders a checksum as two uppercase, zero padded hex digits.
pub fn to_hex(checksum: u8) -> String {
    format!("{:02X}", checksum)
}

/// Checks the trailing checksum of a full sentence.
///
/// Returns `false` when the `$` or `*` delimiters are missing or when the
/// suffix is not exactly two hex digits. Hex digits compare case-insensitively.
pub fn verify(sentence: &str) -> bool {
    let Some(rest) = sentence.strip_prefix('$') else {
        return false;
    };
    let Some((body, suffix)) = rest.split_once('*') else {
        return false;
    };
    if suffix.len() != 2 {
        return false;
    }

    match u8::from_str_radix(suffix, 16) {
        Ok(expected) => compute(body.as_bytes()) == expected,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "GPRMC,104512.00,A,3714.502715,N,7658.331842,W,0.0,0.0,011024,0.0,E,A";

    #[test]
    fn xor_of_empty_body_is_zero() {
        assert_eq!(compute(b""), 0);
    }

    #[test]
    fn known_body_checksum() {
        assert_eq!(compute(BODY.as_bytes()), 0x14);
        assert_eq!(compute(b"GNTXT,01,01,02,upcounting timer is at 1"), 0x0C);
    }

    #[test]
    fn hex_is_uppercase_and_padded() {
        assert_eq!(to_hex(0x05), "05");
        assert_eq!(to_hex(0xAB), "AB");
        assert_eq!(to_hex(0), "00");
    }

    #[test]
    fn verify_accepts_either_case() {
        let cs = compute(b"ab");
        assert!(verify(&format!("$ab*{:02x}", cs)));
        assert!(verify(&format!("$ab*{:02X}", cs)));
    }

    #[test]
    fn verify_rejects_missing_delimiters() {
        assert!(!verify(BODY));
        assert!(!verify(&format!("${}", BODY)));
        assert!(!verify(&format!("{}*14", BODY)));
    }

    #[test]
    fn verify_rejects_bad_suffix() {
        assert!(!verify(&format!("${}*1", BODY)));
        assert!(!verify(&format!("${}*140", BODY)));
        assert!(!verify(&format!("${}*ZZ", BODY)));
        assert!(!verify(&format!("${}*15", BODY)));
    }

    #[test]
    fn any_single_bit_flip_in_body_is_detected() {
        let sentence = format!("${}*{}", BODY, to_hex(compute(BODY.as_bytes())));
        assert!(verify(&sentence));

        for idx in 0..BODY.len() {
            for bit in 0..7 {
                let mut bytes = BODY.as_bytes().to_vec();
                bytes[idx] ^= 1 << bit;
                // Flips that produce a delimiter change the framing rather than the body.
                if bytes[idx] == b'*' || bytes[idx] == b'$' {
                    continue;
                }
                let body = String::from_utf8(bytes).unwrap();
                let tampered = format!("${}*{}", body, to_hex(compute(BODY.as_bytes())));
                assert!(!verify(&tampered), "flip of bit {bit} at {idx} went undetected");
            }
        }
    }
}
