//! Decoding of text-cast columns.
//!
//! Timestamps and decimals are selected as `CAST(... AS TEXT)` so both
//! backends hand back the same representation, then parsed here.

use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::error::{ReportError, Result};
use crate::model::parse_timestamp;

pub(super) fn timestamp(column: &'static str, value: String) -> Result<NaiveDateTime> {
    parse_timestamp(&value).ok_or(ReportError::InvalidTimestamp { column, value })
}

pub(super) fn opt_timestamp(
    column: &'static str,
    value: Option<String>,
) -> Result<Option<NaiveDateTime>> {
    value.map(|v| timestamp(column, v)).transpose()
}

pub(super) fn amount(column: &'static str, value: String) -> Result<Decimal> {
    Decimal::from_str(value.trim()).map_err(|_| ReportError::InvalidAmount { column, value })
}

pub(super) fn opt_amount(column: &'static str, value: Option<String>) -> Result<Option<Decimal>> {
    value.map(|v| amount(column, v)).transpose()
}
