//! Pure display-formatting helpers.
//!
//! These functions reproduce the input masks the booking forms apply while
//! the user types: values are stored and compared exactly as displayed, so
//! the formatters are part of the data contract, not just presentation.
//! None of them validate content (a date formatter that accepted only real
//! calendar dates would change which records count as duplicates).

use chrono::{DateTime, Utc};

/// Group free-text input into a `DD/MM/YYYY` reservation date.
///
/// Strips every non-digit character, regroups the first eight digits as
/// day/month/year, and truncates to ten output characters. Partial input
/// is kept partial (`"251"` becomes `"25/1"`); day and month ranges are
/// not validated.
///
/// Formatting is idempotent: feeding an already-formatted date back in
/// yields the same string.
#[must_use]
pub fn format_reservation_date(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    let day: String = digits.chars().take(2).collect();
    let month: String = digits.chars().skip(2).take(2).collect();
    let year: String = digits.chars().skip(4).take(4).collect();

    let mut formatted = String::new();
    if !day.is_empty() {
        formatted.push_str(&day);
    }
    if !month.is_empty() {
        formatted.push('/');
        formatted.push_str(&month);
    }
    if !year.is_empty() {
        formatted.push('/');
        formatted.push_str(&year);
    }

    formatted.truncate(10);
    formatted
}

/// Format free-text input as a `R$ D,DD` currency value.
///
/// The digits of the input are read as an integer number of centavos;
/// empty or digit-free input counts as zero. The output always carries
/// exactly two decimal digits with a comma separator.
#[must_use]
pub fn format_currency(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).collect();
    let cents = digits.parse::<u64>().unwrap_or(0);
    format!("R$ {},{:02}", cents / 100, cents % 100)
}

/// Group free-text input into a `(DD) DDDDD-DDDD` phone number.
///
/// Keeps at most eleven digits (two-digit area code plus a nine-digit
/// mobile number) and formats progressively as the user types. Empty
/// input stays empty.
#[must_use]
pub fn format_phone(input: &str) -> String {
    let digits: String = input.chars().filter(char::is_ascii_digit).take(11).collect();
    if digits.is_empty() {
        return String::new();
    }

    let count = digits.chars().count();
    let area: String = digits.chars().take(2).collect();
    let prefix: String = digits.chars().skip(2).take(5).collect();
    let line: String = digits.chars().skip(7).take(4).collect();

    let mut formatted = format!("({area}");
    if count > 2 {
        formatted.push_str(") ");
        formatted.push_str(&prefix);
    }
    if count > 7 {
        formatted.push('-');
        formatted.push_str(&line);
    }
    formatted
}

/// Extract a bare Instagram handle from user input.
///
/// Accepts a full profile URL (`https://instagram.com/handle`), an
/// `@`-prefixed handle, or a bare handle; returns `None` for blank input.
#[must_use]
pub fn normalize_instagram_handle(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(position) = trimmed.find("instagram.com/") {
        let rest = &trimmed[position + "instagram.com/".len()..];
        let handle: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '.')
            .collect();
        if !handle.is_empty() {
            return Some(handle);
        }
    }

    Some(trimmed.strip_prefix('@').unwrap_or(trimmed).to_string())
}

/// Stamp a registration date (`DD/MM/YYYY`) from a clock reading.
///
/// Used for the `DataRegistro` field written on every create and update.
#[must_use]
pub fn format_registration_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn date_groups_eight_digits() {
        assert_eq!(format_reservation_date("25122024"), "25/12/2024");
    }

    #[test]
    fn date_formatting_is_idempotent() {
        assert_eq!(format_reservation_date("25/12/2024"), "25/12/2024");
    }

    #[test]
    fn date_empty_input_stays_empty() {
        assert_eq!(format_reservation_date(""), "");
    }

    #[test]
    fn date_partial_input_stays_partial() {
        assert_eq!(format_reservation_date("2"), "2");
        assert_eq!(format_reservation_date("251"), "25/1");
        assert_eq!(format_reservation_date("2512"), "25/12");
        assert_eq!(format_reservation_date("25122"), "25/12/2");
    }

    #[test]
    fn date_ignores_excess_digits() {
        assert_eq!(format_reservation_date("251220249999"), "25/12/2024");
    }

    #[test]
    fn date_does_not_validate_calendar() {
        // 99/99 is accepted; only the grouping is enforced
        assert_eq!(format_reservation_date("99999999"), "99/99/9999");
    }

    #[test]
    fn currency_reads_digits_as_cents() {
        assert_eq!(format_currency("150075"), "R$ 1500,75");
        assert_eq!(format_currency("5"), "R$ 0,05");
        assert_eq!(format_currency("50"), "R$ 0,50");
    }

    #[test]
    fn currency_defaults_to_zero() {
        assert_eq!(format_currency(""), "R$ 0,00");
        assert_eq!(format_currency("abc"), "R$ 0,00");
    }

    #[test]
    fn currency_reformats_its_own_output() {
        assert_eq!(format_currency("R$ 1500,75"), "R$ 1500,75");
    }

    #[test]
    fn phone_groups_eleven_digits() {
        assert_eq!(format_phone("11912345678"), "(11) 91234-5678");
    }

    #[test]
    fn phone_formats_progressively() {
        assert_eq!(format_phone(""), "");
        assert_eq!(format_phone("1"), "(1");
        assert_eq!(format_phone("11"), "(11");
        assert_eq!(format_phone("119"), "(11) 9");
        assert_eq!(format_phone("1191234"), "(11) 91234");
        assert_eq!(format_phone("11912345"), "(11) 91234-5");
    }

    #[test]
    fn phone_drops_excess_digits() {
        assert_eq!(format_phone("119123456789999"), "(11) 91234-5678");
    }

    #[test]
    fn instagram_accepts_profile_urls() {
        assert_eq!(
            normalize_instagram_handle("https://www.instagram.com/quadra.oficial"),
            Some("quadra.oficial".to_string())
        );
        assert_eq!(
            normalize_instagram_handle("instagram.com/ana_luiza"),
            Some("ana_luiza".to_string())
        );
    }

    #[test]
    fn instagram_strips_at_prefix() {
        assert_eq!(
            normalize_instagram_handle("@ana_luiza"),
            Some("ana_luiza".to_string())
        );
        assert_eq!(
            normalize_instagram_handle("ana_luiza"),
            Some("ana_luiza".to_string())
        );
    }

    #[test]
    fn instagram_blank_is_none() {
        assert_eq!(normalize_instagram_handle(""), None);
        assert_eq!(normalize_instagram_handle("   "), None);
    }

    #[test]
    fn registration_date_uses_day_month_year() {
        let timestamp = Utc.with_ymd_and_hms(2025, 1, 15, 9, 30, 0).single();
        assert_eq!(
            format_registration_date(timestamp.unwrap_or_default()),
            "15/01/2025"
        );
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn date_formatting_idempotent(input in ".{0,24}") {
                let once = format_reservation_date(&input);
                prop_assert_eq!(format_reservation_date(&once), once);
            }

            #[test]
            fn date_output_never_exceeds_mask(input in ".{0,64}") {
                let formatted = format_reservation_date(&input);
                prop_assert!(formatted.chars().count() <= 10);
                prop_assert!(formatted.chars().all(|c| c.is_ascii_digit() || c == '/'));
            }

            #[test]
            fn currency_output_shape(input in ".{0,16}") {
                let formatted = format_currency(&input);
                prop_assert!(formatted.starts_with("R$ "));
                let decimals = formatted.rsplit(',').next().unwrap_or("");
                prop_assert_eq!(decimals.len(), 2);
            }

            #[test]
            fn phone_formatting_idempotent(input in "[0-9]{0,11}") {
                let once = format_phone(&input);
                prop_assert_eq!(format_phone(&once), once);
            }
        }
    }
}
