//! Amount normalization: institution-formatted amount strings to integer cents
//!
//! Amounts are scaled to cents with integer arithmetic only. Binary floats
//! would round values like 8697.66 the wrong way when multiplied by 100.

use crate::error::{Error, Result};
use crate::models::Direction;

/// How a statement format encodes the debit/credit direction of an amount token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignConvention {
    /// A trailing `CR` marker means credit; absence means debit
    /// (UOB credit card ledgers)
    TrailingCreditMarker,
    /// A parenthesized amount means credit (Citi PDF-extracted ledgers)
    ParenthesizedCredit,
    /// Every amount is a debit; direction comes from elsewhere, e.g. which
    /// column of a deposit-account row is populated
    AlwaysDebit,
}

/// Parse a decimal amount token into non-negative integer cents.
///
/// Accepts optional thousands separators and either no fraction or exactly
/// two fraction digits: `1,234.56` -> 123456, `50` -> 5000.
pub fn parse_cents(token: &str) -> Result<i64> {
    let cleaned: String = token
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != ' ')
        .collect();

    if cleaned.is_empty() {
        return Err(Error::MalformedAmount(token.to_string()));
    }

    let (whole, frac) = match cleaned.split_once('.') {
        Some((w, f)) => (w, f),
        None => (cleaned.as_str(), "00"),
    };

    if whole.is_empty()
        || frac.len() != 2
        || !whole.chars().all(|c| c.is_ascii_digit())
        || !frac.chars().all(|c| c.is_ascii_digit())
    {
        return Err(Error::MalformedAmount(token.to_string()));
    }

    let whole: i64 = whole
        .parse()
        .map_err(|_| Error::MalformedAmount(token.to_string()))?;
    let frac: i64 = frac
        .parse()
        .map_err(|_| Error::MalformedAmount(token.to_string()))?;

    Ok(whole * 100 + frac)
}

/// Normalize an amount token under a sign convention into `(cents, direction)`.
///
/// The returned amount is always non-negative; the sign is carried solely by
/// the direction.
pub fn normalize(token: &str, convention: SignConvention) -> Result<(i64, Direction)> {
    let token = token.trim();

    match convention {
        SignConvention::TrailingCreditMarker => {
            if let Some(stripped) = token.strip_suffix("CR") {
                Ok((parse_cents(stripped)?, Direction::Credit))
            } else {
                Ok((parse_cents(token)?, Direction::Debit))
            }
        }
        SignConvention::ParenthesizedCredit => {
            if let Some(inner) = token
                .strip_prefix('(')
                .and_then(|rest| rest.strip_suffix(')'))
            {
                Ok((parse_cents(inner)?, Direction::Credit))
            } else {
                Ok((parse_cents(token)?, Direction::Debit))
            }
        }
        SignConvention::AlwaysDebit => Ok((parse_cents(token)?, Direction::Debit)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cents() {
        assert_eq!(parse_cents("1,234.56").unwrap(), 123456);
        assert_eq!(parse_cents("50.00").unwrap(), 5000);
        assert_eq!(parse_cents("50").unwrap(), 5000);
        assert_eq!(parse_cents("0.05").unwrap(), 5);
        // no float rounding: 8697.66 * 100 truncates to 869765 under f64
        assert_eq!(parse_cents("8,697.66").unwrap(), 869766);
    }

    #[test]
    fn test_parse_cents_rejects_garbage() {
        assert!(matches!(
            parse_cents("12.3"),
            Err(Error::MalformedAmount(_))
        ));
        assert!(matches!(
            parse_cents("abc"),
            Err(Error::MalformedAmount(_))
        ));
        assert!(matches!(parse_cents(""), Err(Error::MalformedAmount(_))));
        assert!(matches!(
            parse_cents("12.345"),
            Err(Error::MalformedAmount(_))
        ));
        assert!(matches!(
            parse_cents("-5.00"),
            Err(Error::MalformedAmount(_))
        ));
    }

    #[test]
    fn test_trailing_credit_marker() {
        assert_eq!(
            normalize("1,234.56", SignConvention::TrailingCreditMarker).unwrap(),
            (123456, Direction::Debit)
        );
        assert_eq!(
            normalize("50.00CR", SignConvention::TrailingCreditMarker).unwrap(),
            (5000, Direction::Credit)
        );
        assert_eq!(
            normalize(" 50.00 CR ", SignConvention::TrailingCreditMarker).unwrap(),
            (5000, Direction::Credit)
        );
    }

    #[test]
    fn test_parenthesized_credit() {
        assert_eq!(
            normalize("(25.90)", SignConvention::ParenthesizedCredit).unwrap(),
            (2590, Direction::Credit)
        );
        assert_eq!(
            normalize("25.90", SignConvention::ParenthesizedCredit).unwrap(),
            (2590, Direction::Debit)
        );
    }

    #[test]
    fn test_always_debit() {
        assert_eq!(
            normalize("3.20", SignConvention::AlwaysDebit).unwrap(),
            (320, Direction::Debit)
        );
    }
}
