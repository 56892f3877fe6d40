//! database entity models for sea-orm.
//!
//! these entities map to database tables and handle conversion of enum
//! columns, which are stored as their canonical strings.

pub mod bid;
pub mod bid_history;
pub mod employee;
pub mod organization;
pub mod organization_responsible;
pub mod review;
pub mod tender;
pub mod tender_history;

use std::str::FromStr;

use crate::Error;

/// parse a string column into a domain enum.
pub(crate) fn parse_column<T>(column: &str, value: &str) -> Result<T, Error>
where
    T: FromStr<Err = tenderhub_types::Error>,
{
    value
        .parse()
        .map_err(|e: tenderhub_types::Error| Error::InvalidData(format!("column {column}: {e}")))
}
