//! `SQLite` conversions for model types and lenient column readers.
//!
//! Files written by older app versions stored booleans as `'FALSE'` text
//! and timestamps as text, so readers accept every storage class a column
//! may legitimately hold.

use rust_decimal::Decimal;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};
use rusqlite::Row;

use super::schema::Column;
use crate::models::{Amount, RecordType, SyncBit, SyncEnvelope};

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Text(text) => std::str::from_utf8(text)
                .map_err(|error| FromSqlError::Other(Box::new(error)))?
                .parse()
                .map_err(|error| FromSqlError::Other(Box::new(error))),
            ValueRef::Integer(value) => Ok(Self::new(Decimal::from(value))),
            ValueRef::Real(value) => Decimal::try_from(value)
                .map(Self::new)
                .map_err(|error| FromSqlError::Other(Box::new(error))),
            ValueRef::Null | ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

impl ToSql for SyncBit {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_i64()))
    }
}

impl ToSql for RecordType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for RecordType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;
        text.parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// Owned SQL value for an optional text field
pub fn text_value(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |value| Value::Text(value.to_string()))
}

/// Owned SQL value for an optional amount
pub fn amount_value(value: Option<Amount>) -> Value {
    value.map_or(Value::Null, |amount| Value::Text(amount.to_string()))
}

pub fn flag_value(value: bool) -> Value {
    Value::Integer(i64::from(value))
}

/// Read a boolean flag stored as integer, NULL, or legacy text.
///
/// Text is read the way `SQLite` evaluates it in a predicate: numeric text
/// by its value, anything else (`'FALSE'`, `'true'`) as 0. This keeps a
/// decoded flag in line with [`LIVE`](super::schema::LIVE).
pub fn read_flag(row: &Row<'_>, column: Column) -> rusqlite::Result<bool> {
    Ok(match row.get_ref(column.name())? {
        ValueRef::Null | ValueRef::Blob(_) => false,
        ValueRef::Integer(value) => value != 0,
        #[allow(clippy::float_cmp)]
        ValueRef::Real(value) => value != 0.0,
        #[allow(clippy::float_cmp)]
        ValueRef::Text(text) => String::from_utf8_lossy(text)
            .trim()
            .parse::<f64>()
            .is_ok_and(|value| value.is_finite() && value != 0.0),
    })
}

/// Read optional text; empty strings read as `None`.
pub fn read_text(row: &Row<'_>, column: Column) -> rusqlite::Result<Option<String>> {
    let text = match row.get_ref(column.name())? {
        ValueRef::Null | ValueRef::Blob(_) => None,
        ValueRef::Integer(value) => Some(value.to_string()),
        ValueRef::Real(value) => Some(value.to_string()),
        ValueRef::Text(text) => Some(String::from_utf8_lossy(text).into_owned()),
    };
    Ok(text.filter(|text| !text.is_empty()))
}

/// Read an optional amount; NULL and blank text read as `None`.
pub fn read_amount(row: &Row<'_>, column: Column) -> rusqlite::Result<Option<Amount>> {
    match row.get_ref(column.name())? {
        ValueRef::Null => Ok(None),
        ValueRef::Text(text) if text.iter().all(u8::is_ascii_whitespace) => Ok(None),
        value => Amount::column_result(value).map(Some).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(0, value.data_type(), Box::new(error))
        }),
    }
}

/// Read an integer stored as integer or numeric text.
pub fn read_integer(row: &Row<'_>, column: Column) -> rusqlite::Result<Option<i64>> {
    match row.get_ref(column.name())? {
        ValueRef::Integer(value) => Ok(Some(value)),
        ValueRef::Text(text) => Ok(String::from_utf8_lossy(text).trim().parse().ok()),
        #[allow(clippy::cast_possible_truncation)]
        ValueRef::Real(value) => Ok(Some(value as i64)),
        ValueRef::Null | ValueRef::Blob(_) => Ok(None),
    }
}

/// Read the shared sync envelope columns of a record row.
pub fn read_envelope(row: &Row<'_>) -> rusqlite::Result<SyncEnvelope> {
    Ok(SyncEnvelope {
        id_from_server: read_integer(row, Column::IdFromServer)?,
        my_hash: read_text(row, Column::MyHash)?,
        updated_at: read_text(row, Column::UpdatedAt)?,
        sync_bit: read_integer(row, Column::SyncBit)?.map_or(SyncBit::NotSynced, SyncBit::from_i64),
        deleted: read_flag(row, Column::Deleted)?,
        file_uploaded: read_flag(row, Column::FileUploaded)?,
        file_to_download: read_flag(row, Column::FileToDownload)?,
        file_updated_at: read_text(row, Column::FileUpdatedAt)?,
    })
}
