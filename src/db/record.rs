//! Generic row-to-record conversion.

use anyhow::Result;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, Params, Row};
use serde_json::Value;

pub use crate::normalize::Record;

/// Run a query and collect every row as a record keyed by column name.
pub fn query_records<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<Record>> {
    let mut stmt = conn.prepare(sql)?;
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let records = stmt
        .query_map(params, |row| row_to_record(row, &names))?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(records)
}

/// Run a query expected to match at most one row.
pub fn query_record<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Option<Record>> {
    Ok(query_records(conn, sql, params)?.into_iter().next())
}

fn row_to_record(row: &Row, names: &[String]) -> rusqlite::Result<Record> {
    let mut record = Record::new();
    for (idx, name) in names.iter().enumerate() {
        let value = match row.get_ref(idx)? {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::from(i),
            ValueRef::Real(f) => Value::from(f),
            ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
            ValueRef::Blob(bytes) => Value::from(bytes.to_vec()),
        };
        record.insert(name.clone(), value);
    }
    Ok(record)
}
