use serde::{Deserialize, Serialize};

use crate::error::{ChargeError, ChargeResult};

/// Values of a single named column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    Int(Vec<i64>),
    Size(Vec<usize>),
    Float(Vec<f64>),
    Category(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int(v) => v.len(),
            ColumnData::Size(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Category(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric view of the column; categorical columns have none
    pub fn as_f64(&self) -> Option<Vec<f64>> {
        match self {
            ColumnData::Int(v) => Some(v.iter().map(|&x| x as f64).collect()),
            ColumnData::Size(v) => Some(v.iter().map(|&x| x as f64).collect()),
            ColumnData::Float(v) => Some(v.clone()),
            ColumnData::Category(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub header: String,
    pub data: ColumnData,
}

/// A small column-oriented table handed back to collaborators.
/// All columns hold exactly `rows` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    rows: usize,
    columns: Vec<Column>,
}

impl DataTable {
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            columns: Vec::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    pub fn add_column(&mut self, header: impl Into<String>, data: ColumnData) -> ChargeResult<()> {
        let header = header.into();
        if data.len() != self.rows {
            return Err(ChargeError::invalid_input(format!(
                "column '{}' has {} values, table has {} rows",
                header,
                data.len(),
                self.rows
            )));
        }
        self.columns.push(Column { header, data });
        Ok(())
    }

    pub fn add_float_column(&mut self, header: impl Into<String>, values: Vec<f64>) -> ChargeResult<()> {
        self.add_column(header, ColumnData::Float(values))
    }

    pub fn column(&self, header: &str) -> Option<&ColumnData> {
        self.columns
            .iter()
            .find(|c| c.header == header)
            .map(|c| &c.data)
    }

    /// Float column by name, or a `DataAccess` error naming it
    pub fn float_column(&self, header: &str) -> ChargeResult<&[f64]> {
        match self.column(header) {
            Some(ColumnData::Float(values)) => Ok(values),
            Some(_) => Err(ChargeError::data_access(format!(
                "column '{}' is not a float column",
                header
            ))),
            None => Err(ChargeError::data_access(format!("no column named '{}'", header))),
        }
    }
}
