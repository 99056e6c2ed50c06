//! Maps driver-specific type names onto standard SQL type codes.

use crate::domain::sql_type::types;

/// Type code, column size and decimal digits.
pub type TypeInfo = (i32, i32, i32);

/// Splits `DECIMAL(10, 2)` into `("DECIMAL", [10, 2])`. Unparsable
/// arguments are dropped.
fn split_declared(declared: &str) -> (String, Vec<i32>) {
    let declared = declared.trim();
    match declared.split_once('(') {
        Some((base, rest)) => {
            let args = rest
                .trim_end_matches(')')
                .split(',')
                .filter_map(|arg| arg.trim().parse().ok())
                .collect();
            (base.trim().to_ascii_uppercase(), args)
        }
        None => (declared.to_ascii_uppercase(), Vec::new()),
    }
}

/// SQLite column declarations are free text; exact names are matched
/// first, then SQLite's own affinity rules.
pub fn from_declared_type(declared: &str) -> TypeInfo {
    let (base, args) = split_declared(declared);
    let size = args.first().copied();
    let digits = args.get(1).copied().unwrap_or(0);

    match base.as_str() {
        "INTEGER" | "INT" | "MEDIUMINT" => (types::INTEGER, size.unwrap_or(10), 0),
        "BIGINT" | "INT8" | "UNSIGNED BIG INT" => (types::BIGINT, size.unwrap_or(19), 0),
        "SMALLINT" | "INT2" => (types::SMALLINT, size.unwrap_or(5), 0),
        "TINYINT" => (types::TINYINT, size.unwrap_or(3), 0),
        "VARCHAR" | "NVARCHAR" | "CHARACTER VARYING" | "VARYING CHARACTER" | "TEXT" => {
            (types::VARCHAR, size.unwrap_or(0), 0)
        }
        "CHAR" | "CHARACTER" | "NCHAR" | "NATIVE CHARACTER" => (types::CHAR, size.unwrap_or(1), 0),
        "CLOB" => (types::CLOB, size.unwrap_or(0), 0),
        "BLOB" => (types::BLOB, size.unwrap_or(0), 0),
        "REAL" => (types::REAL, size.unwrap_or(0), digits),
        "DOUBLE" | "DOUBLE PRECISION" => (types::DOUBLE, size.unwrap_or(0), digits),
        "FLOAT" => (types::FLOAT, size.unwrap_or(0), digits),
        "NUMERIC" => (types::NUMERIC, size.unwrap_or(0), digits),
        "DECIMAL" => (types::DECIMAL, size.unwrap_or(0), digits),
        "BOOLEAN" | "BOOL" => (types::BOOLEAN, 0, 0),
        "DATE" => (types::DATE, 0, 0),
        "TIME" => (types::TIME, 0, 0),
        "DATETIME" | "TIMESTAMP" => (types::TIMESTAMP, 0, 0),
        "" => (types::OTHER, 0, 0),
        other if other.contains("INT") => (types::INTEGER, size.unwrap_or(10), 0),
        other if ["CHAR", "CLOB", "TEXT"].iter().any(|k| other.contains(k)) => {
            (types::VARCHAR, size.unwrap_or(0), 0)
        }
        other if other.contains("BLOB") => (types::BLOB, size.unwrap_or(0), 0),
        other if ["REAL", "FLOA", "DOUB"].iter().any(|k| other.contains(k)) => {
            (types::DOUBLE, size.unwrap_or(0), digits)
        }
        _ => (types::NUMERIC, size.unwrap_or(0), digits),
    }
}

/// PostgreSQL columns as described by `information_schema.columns`.
pub fn from_postgres(
    data_type: &str,
    char_length: Option<i32>,
    numeric_precision: Option<i32>,
    numeric_scale: Option<i32>,
) -> TypeInfo {
    let precision = numeric_precision.unwrap_or(0);
    let scale = numeric_scale.unwrap_or(0);

    match data_type {
        "smallint" => (types::SMALLINT, 5, 0),
        "integer" => (types::INTEGER, 10, 0),
        "bigint" => (types::BIGINT, 19, 0),
        "real" => (types::REAL, precision, scale),
        "double precision" => (types::DOUBLE, precision, scale),
        "numeric" => (types::NUMERIC, precision, scale),
        "character varying" => (types::VARCHAR, char_length.unwrap_or(i32::MAX), 0),
        "character" => (types::CHAR, char_length.unwrap_or(1), 0),
        "text" => (types::VARCHAR, i32::MAX, 0),
        "boolean" => (types::BOOLEAN, 1, 0),
        "date" => (types::DATE, 13, 0),
        "bytea" => (types::BINARY, i32::MAX, 0),
        "ARRAY" => (types::ARRAY, 0, 0),
        other if other.starts_with("time ") || other == "time" => (types::TIME, 15, 0),
        other if other.starts_with("timestamp") => (types::TIMESTAMP, 29, 0),
        _ => (types::OTHER, 0, 0),
    }
}
