//! Transient records describing one schema's structure.
//!
//! Instances live only for the duration of a single export run; nothing here
//! outlives the output file.

/// Fixed header row written to every worksheet, columns A-F.
pub const COLUMN_HEADER: [&str; 6] = [
    "Column Name",
    "Column Default",
    "Is Nullable",
    "Data Type",
    "Column Type",
    "Column Key",
];

/// One table discovered in the target schema.
#[derive(Debug, Clone)]
pub struct Table {
    /// Table name, unique within the schema
    pub name: String,
    /// Columns in the order the catalog returned them
    pub columns: Vec<Column>,
}

impl Table {
    /// Creates a table record with an empty column sequence.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }
}

/// Column metadata scanned from one `INFORMATION_SCHEMA.COLUMNS` row.
///
/// All six attributes are kept as the strings the catalog produced;
/// no normalization is performed.
#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    /// Literal `"NULL"` when the catalog default is absent
    pub default: String,
    /// The catalog's `"YES"`/`"NO"` flag, passed through verbatim
    pub nullable: String,
    pub data_type: String,
    /// Full declared type, e.g. `varchar(255)`
    pub column_type: String,
    /// Key designation (`"PRI"`, `"UNI"`, `"MUL"`) or empty
    pub key: String,
}

impl Column {
    /// Field values in worksheet column order, aligned with [`COLUMN_HEADER`].
    pub fn as_row(&self) -> [&str; 6] {
        [
            &self.name,
            &self.default,
            &self.nullable,
            &self.data_type,
            &self.column_type,
            &self.key,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_table_has_no_columns() {
        let table = Table::new("users");
        assert_eq!(table.name, "users");
        assert!(table.columns.is_empty());
    }

    #[test]
    fn test_as_row_matches_header_order() {
        let column = Column {
            name: "id".to_string(),
            default: "NULL".to_string(),
            nullable: "NO".to_string(),
            data_type: "int".to_string(),
            column_type: "int".to_string(),
            key: "PRI".to_string(),
        };

        let row = column.as_row();
        assert_eq!(row, ["id", "NULL", "NO", "int", "int", "PRI"]);
        assert_eq!(row.len(), COLUMN_HEADER.len());
    }
}
