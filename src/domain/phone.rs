//! Phone numbers are stored in one canonical international form
//! (`+91XXXXXXXXXX`). Every lookup normalizes its input the same way.

const COUNTRY_CODE: &str = "91";

/// Normalize an operator-entered phone number.
///
/// Numbers with no evident country code are assumed to be Indian.
pub fn normalize_phone_number(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() == 12 && digits.starts_with(COUNTRY_CODE) {
        return format!("+{}", digits);
    }

    if digits.len() == 10 {
        return format!("+{}{}", COUNTRY_CODE, digits);
    }

    // Already carries the prefix: keep it, minus any formatting characters.
    if raw.trim_start().starts_with("+91") {
        return format!("+{}", digits);
    }

    format!("+{}{}", COUNTRY_CODE, digits)
}

#[cfg(test)]
mod tests {
    use super::normalize_phone_number;

    #[test]
    fn ten_digits_get_country_code() {
        for d in ["8118823650", "0000000000", "9999999999", "1234567890"] {
            assert_eq!(normalize_phone_number(d), format!("+91{}", d));
        }
    }

    #[test]
    fn formatting_characters_are_stripped() {
        assert_eq!(normalize_phone_number("81188 23650"), "+918118823650");
        assert_eq!(normalize_phone_number("(811) 882-3650"), "+918118823650");
        assert_eq!(normalize_phone_number("+91 81188-23650"), "+918118823650");
    }

    #[test]
    fn twelve_digits_with_country_code_get_plus() {
        assert_eq!(normalize_phone_number("918118823650"), "+918118823650");
    }

    #[test]
    fn canonical_numbers_are_fixed_points() {
        for x in ["+918118823650", "+910000000000", "+919999999999"] {
            let once = normalize_phone_number(x);
            assert_eq!(once, x);
            assert_eq!(normalize_phone_number(&once), once);
        }
    }

    #[test]
    fn prefixed_numbers_of_odd_length_keep_their_prefix() {
        assert_eq!(normalize_phone_number("+91 12345"), "+9112345");
    }

    #[test]
    fn other_lengths_fall_back_to_india() {
        assert_eq!(normalize_phone_number("12345"), "+9112345");
        // Known limitation: foreign numbers are forced into +91.
        assert_eq!(normalize_phone_number("+14155552671"), "+9114155552671");
        assert_eq!(normalize_phone_number(""), "+91");
    }
}
