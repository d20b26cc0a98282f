//! Statement parsers for the supported bank export formats
//!
//! Each format implements the same contract: one CSV row in, zero or one
//! [`Draft`] out. Rows without a date or amount are running balances or
//! subtotals and are skipped silently; structural mismatches (e.g. both
//! amount columns of a deposit row populated) abort the file.
//!
//! The format is selected from the statement file name,
//! `<institution>_<label>_<year>[_<suffix>]`: the institution token picks the
//! bank, a fourth segment marks the deposit-account layout, and the year
//! token feeds date normalization.

use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

use csv::{ReaderBuilder, StringRecord};
use regex::Regex;
use tracing::debug;

use crate::amount::{self, SignConvention};
use crate::date::parse_statement_date;
use crate::error::{Error, Result};
use crate::models::{Bank, Direction, Draft};

/// The closed set of supported statement layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFormat {
    /// UOB credit card ledger: trailing `CR` marks credits
    UobCreditCard,
    /// UOB deposit account ledger: direction encoded by which of two
    /// mutually exclusive amount columns is populated
    UobDeposit,
    /// Citi credit card ledger extracted from PDF statements: parenthesized
    /// amounts mark credits
    CitiCreditCard,
}

impl StatementFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UobCreditCard => "uob_credit_card",
            Self::UobDeposit => "uob_deposit",
            Self::CitiCreditCard => "citi_credit_card",
        }
    }
}

impl std::fmt::Display for StatementFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the statement file name tells us about its contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementSource {
    pub bank: Bank,
    pub format: StatementFormat,
    /// Four-digit year segment, supplied to the date normalizer
    pub year: String,
    /// File name without extension, the base of every row's locator
    pub file_stem: String,
}

/// Derive bank, format and year from a statement file name.
pub fn detect_statement_source(path: &Path) -> Result<StatementSource> {
    let file_stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::BadStatementName(path.display().to_string()))?
        .to_string();

    let parts: Vec<&str> = file_stem.split('_').collect();
    if parts.len() < 3 {
        return Err(Error::BadStatementName(file_stem));
    }

    let bank: Bank = parts[0]
        .parse()
        .map_err(|_| Error::UnsupportedInstitution(parts[0].to_string()))?;

    let year = parts[2].to_string();
    if year.len() != 4 || !year.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::BadStatementName(file_stem));
    }

    // a fourth underscore-delimited segment marks the deposit-account layout
    let format = match (bank, parts.len() > 3) {
        (Bank::Uob, true) => StatementFormat::UobDeposit,
        (Bank::Uob, false) => StatementFormat::UobCreditCard,
        (Bank::Citi, _) => StatementFormat::CitiCreditCard,
    };

    Ok(StatementSource {
        bank,
        format,
        year,
        file_stem,
    })
}

/// Strip a trailing `Ref No <code>` suffix from a merchant description.
///
/// Reference codes are per-transaction noise; left in place they would defeat
/// both trie and manual-override matching.
fn strip_ref_no(merchant: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^(.*)\s*Ref\s*No\b").unwrap());

    match re.captures(merchant) {
        Some(caps) => caps[1].trim_end().to_string(),
        None => merchant.to_string(),
    }
}

fn field<'a>(record: &'a StringRecord, idx: usize) -> &'a str {
    record.get(idx).unwrap_or("").trim()
}

/// Parse statement rows into drafts, preserving row order.
///
/// The header row is skipped. Rows the format recognizes as
/// non-transactions yield no draft; malformed required fields and structural
/// mismatches fail the whole file.
pub fn parse_statement<R: Read>(reader: R, source: &StatementSource) -> Result<Vec<Draft>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut drafts = Vec::new();

    for result in rdr.records() {
        let record = result?;

        let draft = match source.format {
            StatementFormat::UobCreditCard => parse_uob_credit_card_row(&record, &source.year)?,
            StatementFormat::UobDeposit => parse_uob_deposit_row(&record, &source.year)?,
            StatementFormat::CitiCreditCard => parse_citi_credit_card_row(&record, &source.year)?,
        };

        if let Some(draft) = draft {
            if draft.merchant.is_empty() {
                continue;
            }
            drafts.push(draft);
        }
    }

    debug!(
        file = %source.file_stem,
        format = %source.format,
        drafts = drafts.len(),
        "parsed statement"
    );
    Ok(drafts)
}

/// UOB credit card row: date col 1, merchant col 2, amount col 3.
/// Credits carry a trailing `CR` on the amount token.
fn parse_uob_credit_card_row(record: &StringRecord, year: &str) -> Result<Option<Draft>> {
    let date_str = field(record, 1);
    let amount_str = field(record, 3);
    if date_str.is_empty() || amount_str.is_empty() {
        return Ok(None);
    }

    let date = parse_statement_date(date_str, year)?;
    let merchant = strip_ref_no(field(record, 2));
    let (amount_cents, direction) =
        amount::normalize(amount_str, SignConvention::TrailingCreditMarker)?;

    Ok(Some(Draft {
        date,
        direction,
        amount_cents,
        merchant,
    }))
}

/// UOB deposit account row: date col 0, merchant col 1, withdrawal col 2,
/// deposit col 3. Exactly one amount column may be populated; the populated
/// column encodes the direction (withdrawal = debit).
fn parse_uob_deposit_row(record: &StringRecord, year: &str) -> Result<Option<Draft>> {
    let date_str = field(record, 0);
    if date_str.is_empty() {
        return Ok(None);
    }

    let merchant = field(record, 1).to_string();
    let debit_str = field(record, 2);
    let credit_str = field(record, 3);

    if !debit_str.is_empty() && !credit_str.is_empty() {
        return Err(Error::UnexpectedRowShape(format!(
            "both amount columns populated in deposit row, merchant: {}",
            merchant
        )));
    }

    let (amount_str, direction) = if !debit_str.is_empty() {
        (debit_str, Direction::Debit)
    } else if !credit_str.is_empty() {
        (credit_str, Direction::Credit)
    } else {
        return Ok(None);
    };

    let date = parse_statement_date(date_str, year)?;
    let amount_cents = amount::parse_cents(amount_str)?;

    Ok(Some(Draft {
        date,
        direction,
        amount_cents,
        merchant,
    }))
}

/// Citi credit card row (PDF-extracted): date col 0, merchant col 1,
/// amount col 2. Credits are parenthesized.
fn parse_citi_credit_card_row(record: &StringRecord, year: &str) -> Result<Option<Draft>> {
    let date_str = field(record, 0);
    let amount_str = field(record, 2);
    if date_str.is_empty() || amount_str.is_empty() {
        return Ok(None);
    }

    let date = parse_statement_date(date_str, year)?;
    let merchant = field(record, 1).to_string();
    let (amount_cents, direction) =
        amount::normalize(amount_str, SignConvention::ParenthesizedCredit)?;

    Ok(Some(Draft {
        date,
        direction,
        amount_cents,
        merchant,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use chrono::Datelike;

    fn source(name: &str) -> StatementSource {
        detect_statement_source(Path::new(name)).unwrap()
    }

    #[test]
    fn test_detect_uob_credit_card() {
        let s = source("uob_jan_2025.csv");
        assert_eq!(s.bank, Bank::Uob);
        assert_eq!(s.format, StatementFormat::UobCreditCard);
        assert_eq!(s.year, "2025");
        assert_eq!(s.file_stem, "uob_jan_2025");
    }

    #[test]
    fn test_detect_uob_deposit() {
        let s = source("uob_jan_2025_deposit.csv");
        assert_eq!(s.format, StatementFormat::UobDeposit);
    }

    #[test]
    fn test_detect_citi() {
        let s = source("citi_feb_2024.csv");
        assert_eq!(s.bank, Bank::Citi);
        assert_eq!(s.format, StatementFormat::CitiCreditCard);
    }

    #[test]
    fn test_detect_rejects_unknown_institution() {
        assert!(matches!(
            detect_statement_source(Path::new("hsbc_jan_2025.csv")),
            Err(Error::UnsupportedInstitution(_))
        ));
    }

    #[test]
    fn test_detect_rejects_malformed_name() {
        assert!(matches!(
            detect_statement_source(Path::new("uob_jan.csv")),
            Err(Error::BadStatementName(_))
        ));
        assert!(matches!(
            detect_statement_source(Path::new("uob_jan_25.csv")),
            Err(Error::BadStatementName(_))
        ));
    }

    #[test]
    fn test_parse_uob_credit_card() {
        let csv = "\
Posting Date,Transaction Date,Description,Amount
06 DEC,05 DEC,KOI THE - NEX SINGAPORE Ref No 74123456789,6.60
,,Previous Balance,
08 DEC,07 DEC,PAYMENT RECEIVED,120.00 CR";

        let drafts = parse_statement(csv.as_bytes(), &source("uob_dec_2024.csv")).unwrap();
        assert_eq!(drafts.len(), 2);

        assert_eq!(drafts[0].merchant, "KOI THE - NEX SINGAPORE");
        assert_eq!(drafts[0].amount_cents, 660);
        assert_eq!(drafts[0].direction, Direction::Debit);
        assert_eq!(drafts[0].date.day(), 5);
        assert_eq!(drafts[0].date.month(), 12);

        assert_eq!(drafts[1].direction, Direction::Credit);
        assert_eq!(drafts[1].amount_cents, 12000);
    }

    #[test]
    fn test_parse_uob_deposit() {
        let csv = "\
Transaction Date,Description,Withdrawal,Deposit,Balance
03 JAN,NTUC FP-AMK HUB,42.15,,1000.00
,Balance B/F,,,1042.15
05 JAN,SALARY CREDIT,,5000.00,6000.00";

        let drafts =
            parse_statement(csv.as_bytes(), &source("uob_jan_2025_deposit.csv")).unwrap();
        assert_eq!(drafts.len(), 2);

        assert_eq!(drafts[0].merchant, "NTUC FP-AMK HUB");
        assert_eq!(drafts[0].direction, Direction::Debit);
        assert_eq!(drafts[0].amount_cents, 4215);

        assert_eq!(drafts[1].direction, Direction::Credit);
        assert_eq!(drafts[1].amount_cents, 500000);
    }

    #[test]
    fn test_uob_deposit_both_columns_is_error() {
        let csv = "\
Transaction Date,Description,Withdrawal,Deposit,Balance
03 JAN,WEIRD ROW,10.00,20.00,1000.00";

        let result = parse_statement(csv.as_bytes(), &source("uob_jan_2025_deposit.csv"));
        assert!(matches!(result, Err(Error::UnexpectedRowShape(_))));
    }

    #[test]
    fn test_parse_citi_credit_card() {
        let csv = "\
Date,Description,Amount
14 FEB,GRAB *TRIP A1B2C3,18.40
14 FEB,REBATE,(25.00)
,SUBTOTAL,";

        let drafts = parse_statement(csv.as_bytes(), &source("citi_feb_2024.csv")).unwrap();
        assert_eq!(drafts.len(), 2);

        assert_eq!(drafts[0].direction, Direction::Debit);
        assert_eq!(drafts[0].amount_cents, 1840);
        assert_eq!(drafts[1].direction, Direction::Credit);
        assert_eq!(drafts[1].amount_cents, 2500);
    }

    #[test]
    fn test_malformed_amount_fails_file() {
        let csv = "\
Date,Description,Amount
14 FEB,BAD ROW,not-a-number";

        let result = parse_statement(csv.as_bytes(), &source("citi_feb_2024.csv"));
        assert!(matches!(result, Err(Error::MalformedAmount(_))));
    }

    #[test]
    fn test_strip_ref_no() {
        assert_eq!(
            strip_ref_no("AIRBNB HMXYZ123 Ref No 74001234"),
            "AIRBNB HMXYZ123"
        );
        assert_eq!(strip_ref_no("NO CODE HERE"), "NO CODE HERE");
    }
}
