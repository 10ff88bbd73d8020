/// Cell storage for one column. The variant is fixed when the table is loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<String>),
}

impl ColumnData {
    pub(crate) fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Numeric(values),
        }
    }

    pub fn text(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            data: ColumnData::Text(values),
        }
    }

    /// Render one cell for delimited output. Missing numbers render empty.
    pub fn cell(&self, row: usize) -> String {
        match &self.data {
            ColumnData::Numeric(v) => v[row].map(format_number).unwrap_or_default(),
            ColumnData::Text(v) => v[row].clone(),
        }
    }
}

/// One cell value, used when inserting whole rows.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(Option<f64>),
    Text(String),
}

/// Shortest round-trip form; integral values print without a fraction.
pub fn format_number(v: f64) -> String {
    if v == 0.0 {
        // Avoid "-0".
        return "0".to_string();
    }
    format!("{}", v)
}
