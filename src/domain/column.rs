use serde::{Deserialize, Serialize};

use super::sql_type::display_type;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    /// Standard SQL type code, see [`crate::sql_type::types`].
    pub data_type: i32,
    /// Type name as reported by the driver, e.g. `int4` or `VARCHAR2`.
    pub type_name: String,
    pub column_size: i32,
    pub decimal_digits: i32,
}

impl Column {
    pub fn new(
        name: impl Into<String>,
        data_type: i32,
        type_name: impl Into<String>,
        column_size: i32,
        decimal_digits: i32,
    ) -> Self {
        Self {
            name: name.into(),
            data_type,
            type_name: type_name.into(),
            column_size,
            decimal_digits,
        }
    }

    pub fn display_type(&self) -> String {
        display_type(self.data_type, self.column_size, self.decimal_digits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql_type::types;

    #[test]
    fn display_type_uses_size_and_digits() {
        let column = Column::new("amount", types::DECIMAL, "numeric", 10, 2);
        assert_eq!(column.display_type(), "DECIMAL(10, 2)");
    }

    #[test]
    fn serializes_with_snake_case_fields() {
        let column = Column::new("id", types::INTEGER, "int4", 10, 0);
        let json = serde_json::to_value(&column).unwrap();

        assert_eq!(json["name"], "id");
        assert_eq!(json["data_type"], 4);
        assert_eq!(json["type_name"], "int4");
        assert_eq!(json["column_size"], 10);
    }
}
