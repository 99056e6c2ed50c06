//! Standard SQL type codes as reported by relational metadata APIs, and the
//! human-readable rendering shown next to column names in the editor.
//!
//! The numeric values match `java.sql.Types` so that codes coming from any
//! driver (or persisted alongside schema files) keep their meaning.

pub mod types {
    pub const BIT: i32 = -7;
    pub const TINYINT: i32 = -6;
    pub const SMALLINT: i32 = 5;
    pub const INTEGER: i32 = 4;
    pub const BIGINT: i32 = -5;
    pub const FLOAT: i32 = 6;
    pub const REAL: i32 = 7;
    pub const DOUBLE: i32 = 8;
    pub const NUMERIC: i32 = 2;
    pub const DECIMAL: i32 = 3;
    pub const CHAR: i32 = 1;
    pub const VARCHAR: i32 = 12;
    pub const LONGVARCHAR: i32 = -1;
    pub const DATE: i32 = 91;
    pub const TIME: i32 = 92;
    pub const TIMESTAMP: i32 = 93;
    pub const BINARY: i32 = -2;
    pub const VARBINARY: i32 = -3;
    pub const LONGVARBINARY: i32 = -4;
    pub const NULL: i32 = 0;
    pub const OTHER: i32 = 1111;
    pub const JAVA_OBJECT: i32 = 2000;
    pub const DISTINCT: i32 = 2001;
    pub const STRUCT: i32 = 2002;
    pub const ARRAY: i32 = 2003;
    pub const BLOB: i32 = 2004;
    pub const CLOB: i32 = 2005;
    pub const REF: i32 = 2006;
    pub const DATALINK: i32 = 70;
    pub const BOOLEAN: i32 = 16;
}

enum Shape {
    Bare(&'static str),
    Sized(&'static str),
    Scaled(&'static str),
}

fn shape_of(data_type: i32) -> Option<Shape> {
    use types::*;

    let shape = match data_type {
        BIGINT => Shape::Bare("BIGINT"),
        BOOLEAN => Shape::Bare("BOOLEAN"),
        CHAR => Shape::Bare("CHAR"),
        DATE => Shape::Bare("DATE"),
        DISTINCT => Shape::Bare("DISTINCT"),
        NULL => Shape::Bare("NULL"),
        OTHER => Shape::Bare("OTHER"),
        REF => Shape::Bare("REF"),
        STRUCT => Shape::Bare("STRUCT"),
        TIME => Shape::Bare("TIME"),
        TIMESTAMP => Shape::Bare("TIMESTAMP"),

        ARRAY => Shape::Sized("ARRAY"),
        BINARY => Shape::Sized("BINARY"),
        BIT => Shape::Sized("BIT"),
        BLOB => Shape::Sized("BLOB"),
        CLOB => Shape::Sized("CLOB"),
        DATALINK => Shape::Sized("DATALINK"),
        INTEGER => Shape::Sized("INTEGER"),
        JAVA_OBJECT => Shape::Sized("JAVA_OBJECT"),
        LONGVARBINARY => Shape::Sized("LONGVARBINARY"),
        LONGVARCHAR => Shape::Sized("LONGVARCHAR"),
        SMALLINT => Shape::Sized("SMALLINT"),
        TINYINT => Shape::Sized("TINYINT"),
        VARBINARY => Shape::Sized("VARBINARY"),
        VARCHAR => Shape::Sized("VARCHAR"),

        DECIMAL => Shape::Scaled("DECIMAL"),
        DOUBLE => Shape::Scaled("DOUBLE"),
        FLOAT => Shape::Scaled("FLOAT"),
        NUMERIC => Shape::Scaled("NUMERIC"),
        REAL => Shape::Scaled("REAL"),

        _ => return None,
    };
    Some(shape)
}

/// Renders a type code with its size and precision, e.g. `DECIMAL(10, 2)`.
/// Unknown codes render as an empty string.
pub fn display_type(data_type: i32, column_size: i32, decimal_digits: i32) -> String {
    match shape_of(data_type) {
        Some(Shape::Bare(keyword)) => keyword.to_string(),
        Some(Shape::Sized(keyword)) => format!("{}({})", keyword, column_size),
        Some(Shape::Scaled(keyword)) => {
            format!("{}({}, {})", keyword, column_size, decimal_digits)
        }
        None => String::new(),
    }
}
