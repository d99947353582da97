//! Base32 alphabet used to encode actions as short strings

/// Encoding alphabet, one character per 5-bit value
pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

const MASK_5: u32 = 0b1_1111;

fn char_value(c: char) -> Option<u32> {
    ALPHABET.find(c).map(|index| index as u32)
}

fn value_char(value: u32) -> char {
    // value is masked to 5 bits so the index is always in range
    ALPHABET.as_bytes()[(value & MASK_5) as usize] as char
}

/// Whether every character of the string belongs to the alphabet
pub fn is_valid(encoded: &str) -> bool {
    encoded.chars().all(|c| char_value(c).is_some())
}

/// Encode the 5 low bits of a value as one character
pub fn encode_bits5(value: u32) -> String {
    value_char(value).to_string()
}

/// Encode the 10 low bits of a value as two characters, high bits first
pub fn encode_bits10(value: u32) -> String {
    [value_char(value >> 5), value_char(value)].iter().collect()
}

/// Decode a string of up to two characters
pub fn decode(encoded: &str) -> Option<u32> {
    if encoded.is_empty() || encoded.chars().count() > 2 {
        return None;
    }
    encoded
        .chars()
        .try_fold(0, |acc, c| Some(acc << 5 | char_value(c)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid() {
        assert!(is_valid("AZ27"));
        assert!(is_valid(""));
        assert!(!is_valid("a"));
        assert!(!is_valid("A1"));
        assert!(!is_valid("A8"));
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode_bits5(0), "A");
        assert_eq!(encode_bits5(31), "7");
        assert_eq!(encode_bits5(32), "A");
        assert_eq!(encode_bits10(12), "AM");
        assert_eq!(encode_bits10(1023), "77");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode("AM"), Some(12));
        assert_eq!(decode("7"), Some(31));
        assert_eq!(decode("BA"), Some(32));
        assert_eq!(decode("77"), Some(1023));
        assert_eq!(decode(""), None);
        assert_eq!(decode("AAA"), None);
        assert_eq!(decode("a"), None);
    }
}
