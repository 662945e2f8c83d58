//! Payment reference (OCR) generation.
//!
//! Swedish-style OCR numbers: a decimal reference with a trailing check
//! digit so the biller can match incoming payments to invoices. Two
//! flavours live here: the simple digit-sum check used for invoice OCR
//! strings, and a standard Luhn mod-10 reference builder that optionally
//! embeds a length digit before the check digit.

use serde::{Deserialize, Serialize};

/// How many extra digits `generate` appends to a reference.
///
/// `One` appends only the Luhn check digit. `Two` first appends a length
/// digit (reference length + 2) and then the Luhn check digit over the
/// lengthened reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckLength {
    One,
    Two,
}

impl CheckLength {
    /// Only 1 and 2 are meaningful check lengths.
    pub fn from_digits(n: u8) -> Option<Self> {
        match n {
            1 => Some(CheckLength::One),
            2 => Some(CheckLength::Two),
            _ => None,
        }
    }
}

/// Check digit over `n`: sum its decimal digits, multiply by 9, keep the
/// last decimal digit.
pub fn check_digit(n: i64) -> u32 {
    let digit_sum: i64 = n
        .unsigned_abs()
        .to_string()
        .bytes()
        .map(|b| i64::from(b - b'0'))
        .sum();
    ((digit_sum * 9) % 10) as u32
}

/// Invoice OCR string: the invoice number with its check digit appended.
pub fn invoice_ocr(invoice_number: i64) -> String {
    format!("{invoice_number}{}", check_digit(invoice_number))
}

/// Standard Luhn mod-10 check digit for a decimal reference, doubling
/// every second digit counted from the right.
pub fn luhn_check_digit(reference: &str) -> u32 {
    let sum: u32 = reference
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 0 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    (10 - sum % 10) % 10
}

/// Build a payment reference from a numeric base.
///
/// With `CheckLength::Two` the reference first gains a length digit
/// (len + 2, covering the two appended positions) so the receiving bank
/// can validate the total length as well as the checksum.
pub fn generate(reference: i64, check_length: CheckLength) -> String {
    let reference = reference.to_string();
    match check_length {
        CheckLength::One => {
            let check = luhn_check_digit(&reference);
            format!("{reference}{check}")
        }
        CheckLength::Two => {
            let long_reference = format!("{reference}{}", reference.len() + 2);
            let check = luhn_check_digit(&long_reference);
            format!("{long_reference}{check}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_digit_multiplies_digit_sum_by_nine() {
        // 1+0+0+0+0+5 = 6, 6 * 9 = 54
        assert_eq!(check_digit(100005), 4);
    }

    #[test]
    fn invoice_ocr_appends_check_digit() {
        assert_eq!(invoice_ocr(100005), "1000054");
    }

    #[test]
    fn luhn_digit_matches_known_values() {
        // 7992739871 is the classic Luhn example with check digit 3.
        assert_eq!(luhn_check_digit("7992739871"), 3);
        assert_eq!(luhn_check_digit("424"), 2);
    }

    #[test]
    fn generate_single_check_digit() {
        assert_eq!(generate(42, CheckLength::One), format!("42{}", luhn_check_digit("42")));
    }

    #[test]
    fn generate_two_stage_embeds_length_digit() {
        // "42" + (2 + 2) = "424", then the Luhn digit of "424".
        assert_eq!(generate(42, CheckLength::Two), "4242");
    }

    #[test]
    fn generate_is_deterministic() {
        assert_eq!(
            generate(123456, CheckLength::Two),
            generate(123456, CheckLength::Two)
        );
    }

    #[test]
    fn check_length_parses_only_one_and_two() {
        assert_eq!(CheckLength::from_digits(1), Some(CheckLength::One));
        assert_eq!(CheckLength::from_digits(2), Some(CheckLength::Two));
        assert_eq!(CheckLength::from_digits(0), None);
        assert_eq!(CheckLength::from_digits(3), None);
    }
}
