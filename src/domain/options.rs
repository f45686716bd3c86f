//! Personality attribute enumerations
//!
//! Fixed option sets for the three attribute kinds a visitor can guess.
//! Membership checks are case-sensitive exact matches; a missing or empty
//! value always passes because every attribute is optional.

/// The 16 MBTI type codes.
pub const MBTI_OPTIONS: [&str; 16] = [
    "INFP", "INFJ", "ENFP", "ENFJ", "INTJ", "INTP", "ENTP", "ENTJ",
    "ISFP", "ISFJ", "ESFP", "ESFJ", "ISTP", "ISTJ", "ESTP", "ESTJ",
];

/// The 16 Enneagram wing codes.
pub const ENNEAGRAM_OPTIONS: [&str; 16] = [
    "1w2", "2w3", "3w2", "3w4", "4w3", "4w5", "5w4", "5w6",
    "6w5", "6w7", "7w6", "7w8", "8w7", "8w9", "9w8", "9w1",
];

/// The 12 zodiac sign names.
pub const ZODIAC_OPTIONS: [&str; 12] = [
    "Aries", "Taurus", "Gemini", "Cancer", "Leo", "Virgo",
    "Libra", "Scorpio", "Sagittarius", "Capricorn", "Aquarius", "Pisces",
];

fn is_valid_option(value: Option<&str>, options: &[&str]) -> bool {
    match value {
        None | Some("") => true,
        Some(v) => options.contains(&v),
    }
}

pub fn is_valid_mbti(value: Option<&str>) -> bool {
    is_valid_option(value, &MBTI_OPTIONS)
}

pub fn is_valid_enneagram(value: Option<&str>) -> bool {
    is_valid_option(value, &ENNEAGRAM_OPTIONS)
}

pub fn is_valid_zodiac(value: Option<&str>) -> bool {
    is_valid_option(value, &ZODIAC_OPTIONS)
}

/// Normalizes an optional text field before storage: trims surrounding
/// whitespace and collapses blank input to `None`, so NULL is the only
/// representation of "no value" in the database.
pub fn trim_or_null(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mbti_membership_is_exact() {
        assert!(is_valid_mbti(Some("INTP")));
        assert!(is_valid_mbti(Some("ESTJ")));
        assert!(!is_valid_mbti(Some("intp")));
        assert!(!is_valid_mbti(Some("INVALID")));
        assert!(!is_valid_mbti(Some(" INTP")));
    }

    #[test]
    fn missing_or_empty_value_is_valid() {
        assert!(is_valid_mbti(None));
        assert!(is_valid_mbti(Some("")));
        assert!(is_valid_enneagram(None));
        assert!(is_valid_zodiac(Some("")));
    }

    #[test]
    fn enneagram_and_zodiac_membership() {
        assert!(is_valid_enneagram(Some("5w4")));
        assert!(!is_valid_enneagram(Some("5w9")));
        assert!(is_valid_zodiac(Some("Cancer")));
        assert!(!is_valid_zodiac(Some("cancer")));
    }

    #[test]
    fn trim_or_null_canonicalizes_blanks() {
        assert_eq!(trim_or_null(None), None);
        assert_eq!(trim_or_null(Some("")), None);
        assert_eq!(trim_or_null(Some("   ")), None);
        assert_eq!(trim_or_null(Some("  INTP ")), Some("INTP".to_string()));
    }
}
