//! Destination table names of the form `"dataset.table"`.

use std::{fmt, str::FromStr};

use serde_derive::{Deserialize, Serialize};

use crate::common::*;

/// A destination table, addressed by dataset (or schema) and table name.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct TableDefinition {
    /// The dataset or schema.
    dataset: String,
    /// The table. May itself contain dots.
    table: String,
}

impl TableDefinition {
    /// Return the dataset (or schema) name.
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Return the bare table name, without the dataset.
    pub fn table(&self) -> &str {
        &self.table
    }
}

impl fmt::Display for TableDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.dataset, self.table)
    }
}

impl FromStr for TableDefinition {
    type Err = TableNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((dataset, table)) if !dataset.is_empty() && !table.is_empty() => {
                Ok(TableDefinition {
                    dataset: dataset.to_owned(),
                    table: table.to_owned(),
                })
            }
            _ => Err(TableNameError::InvalidFormat),
        }
    }
}

/// Split `table` on its first `.` into a dataset and a table name.
pub fn split(table: &str) -> Result<TableDefinition, TableNameError> {
    table.parse()
}

#[test]
fn splits_on_first_dot() {
    let def = split("schema.table").unwrap();
    assert_eq!(def.dataset(), "schema");
    assert_eq!(def.table(), "table");

    let def = split("schema.sub.table").unwrap();
    assert_eq!(def.dataset(), "schema");
    assert_eq!(def.table(), "sub.table");
    assert_eq!(def.to_string(), "schema.sub.table");
}

#[test]
fn rejects_malformed_names() {
    for bad in ["no_dot", "", ".table", "schema.", "."] {
        let err = split(bad).unwrap_err();
        assert_eq!(err, TableNameError::InvalidFormat, "input: {:?}", bad);
        assert_eq!(
            err.to_string(),
            "Table name must be in the format <schema>.<table>",
        );
    }
}
