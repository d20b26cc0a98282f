//! Date normalization for statement rows
//!
//! Statements carry compact day+month tokens like `05DEC`; the year comes
//! from the statement file name. Dates are anchored to a fixed reference
//! timezone so day boundaries do not depend on where ingestion runs.

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use chrono_tz::Tz;

use crate::error::{Error, Result};

/// All statement dates are interpreted in this timezone
pub const REFERENCE_TZ: Tz = chrono_tz::Asia::Singapore;

/// Parse a compact `ddMMM` token plus a four-digit year into midnight of that
/// day in the reference timezone.
///
/// Internal whitespace is stripped and the month abbreviation is
/// case-insensitive, so ` 05 DEC ` and `05Dec` both parse. Callers must treat
/// an empty date field as "no transaction on this row" and skip it before
/// calling this.
pub fn parse_statement_date(dd_mmm: &str, year: &str) -> Result<DateTime<FixedOffset>> {
    let compact: String = dd_mmm.chars().filter(|c| !c.is_whitespace()).collect();
    let token = format!("{}{}", compact, year);

    let date = NaiveDate::parse_from_str(&token, "%d%b%Y")
        .map_err(|_| Error::MalformedDate(token.clone()))?;

    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::MalformedDate(token.clone()))?;

    REFERENCE_TZ
        .from_local_datetime(&midnight)
        .single()
        .map(|dt| dt.fixed_offset())
        .ok_or(Error::MalformedDate(token))
}
