//! In-memory profiler tables: named, typed columns with ordered rows.

pub mod column;
pub mod parse;

pub use column::{Cell, Column, ColumnData};
pub use parse::{parse_delimited, read_delimited};

use crate::error::AnalysisError;

/// Ordered set of named columns with equal row counts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
    /// Set once a total policy has placed the aggregate at row 0.
    pinned_total: bool,
}

impl Table {
    /// Build a table, checking every column has the same number of rows.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, AnalysisError> {
        let rows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        for c in &columns {
            if c.data.len() != rows {
                return Err(AnalysisError::RaggedColumn {
                    column: c.name.clone(),
                    expected: rows,
                    found: c.data.len(),
                });
            }
        }
        Ok(Self {
            columns,
            rows,
            pinned_total: false,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.rows
    }

    /// Whether row 0 holds an aggregate produced by [`crate::stats::totals::apply`].
    pub fn has_pinned_total(&self) -> bool {
        self.pinned_total
    }

    pub(crate) fn pin_total(&mut self) {
        self.pinned_total = true;
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Numeric cells of `name`, or the reason they are unavailable.
    pub fn numeric(&self, name: &str) -> Result<&[Option<f64>], AnalysisError> {
        match self.column(name) {
            Some(Column {
                data: ColumnData::Numeric(v),
                ..
            }) => Ok(v),
            Some(_) => Err(AnalysisError::NotNumeric {
                column: name.to_string(),
            }),
            None => Err(AnalysisError::MissingColumn {
                column: name.to_string(),
            }),
        }
    }

    /// Textual view of `name`. Numeric columns are rendered cell by cell.
    pub fn text(&self, name: &str) -> Result<Vec<String>, AnalysisError> {
        let col = self
            .column(name)
            .ok_or_else(|| AnalysisError::MissingColumn {
                column: name.to_string(),
            })?;
        Ok((0..self.rows).map(|r| col.cell(r)).collect())
    }

    /// Value of a numeric cell that must be present.
    pub fn number_at(&self, name: &str, row: usize) -> Result<f64, AnalysisError> {
        self.numeric(name)?
            .get(row)
            .copied()
            .flatten()
            .ok_or_else(|| AnalysisError::MissingValue {
                column: name.to_string(),
                row,
            })
    }

    /// One cell of `name` rendered as text.
    pub fn cell(&self, name: &str, row: usize) -> Result<String, AnalysisError> {
        let col = self
            .column(name)
            .ok_or_else(|| AnalysisError::MissingColumn {
                column: name.to_string(),
            })?;
        if row >= self.rows {
            return Err(AnalysisError::InsufficientRows {
                rows: self.rows,
                needed: row + 1,
            });
        }
        Ok(col.cell(row))
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [Column] {
        &mut self.columns
    }

    /// Insert a row at `at`. `cells` must hold one entry per column, in
    /// column order, with variants matching the column types.
    pub fn insert_row(&mut self, at: usize, cells: Vec<Cell>) -> Result<(), AnalysisError> {
        if cells.len() != self.columns.len() {
            return Err(AnalysisError::RaggedColumn {
                column: "<row>".to_string(),
                expected: self.columns.len(),
                found: cells.len(),
            });
        }
        for (col, cell) in self.columns.iter().zip(&cells) {
            let ok = matches!(
                (&col.data, cell),
                (ColumnData::Numeric(_), Cell::Number(_)) | (ColumnData::Text(_), Cell::Text(_))
            );
            if !ok {
                return Err(AnalysisError::NotNumeric {
                    column: col.name.clone(),
                });
            }
        }
        for (col, cell) in self.columns.iter_mut().zip(cells) {
            match (&mut col.data, cell) {
                (ColumnData::Numeric(v), Cell::Number(n)) => v.insert(at, n),
                (ColumnData::Text(v), Cell::Text(s)) => v.insert(at, s),
                _ => unreachable!("cell types checked above"),
            }
        }
        self.rows += 1;
        Ok(())
    }

    /// Reorder rows so that new row `i` is old row `order[i]`.
    /// `order` must be a permutation of `0..num_rows()`.
    pub fn reorder_rows(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.rows);
        for col in &mut self.columns {
            match &mut col.data {
                ColumnData::Numeric(v) => *v = order.iter().map(|&i| v[i]).collect(),
                ColumnData::Text(v) => *v = order.iter().map(|&i| v[i].clone()).collect(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(vec![
            Column::text("Function", vec!["a".into(), "b".into()]),
            Column::numeric("CPU Time", vec![Some(1.0), None]),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = Table::from_columns(vec![
            Column::text("Function", vec!["a".into()]),
            Column::numeric("CPU Time", vec![Some(1.0), Some(2.0)]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::RaggedColumn {
                column: "CPU Time".into(),
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn typed_lookups() {
        let t = sample();
        assert!(t.numeric("CPU Time").is_ok());
        assert!(matches!(
            t.numeric("Function"),
            Err(AnalysisError::NotNumeric { .. })
        ));
        assert!(matches!(
            t.numeric("Nope"),
            Err(AnalysisError::MissingColumn { .. })
        ));
        assert!(matches!(
            t.number_at("CPU Time", 1),
            Err(AnalysisError::MissingValue { row: 1, .. })
        ));
    }

    #[test]
    fn insert_and_reorder() {
        let mut t = sample();
        t.insert_row(0, vec![Cell::Text("Total".into()), Cell::Number(Some(1.0))])
            .unwrap();
        assert_eq!(t.num_rows(), 3);
        t.reorder_rows(&[0, 2, 1]);
        assert_eq!(t.text("Function").unwrap(), vec!["Total", "b", "a"]);

        let err = t.insert_row(0, vec![Cell::Number(None), Cell::Number(None)]);
        assert!(err.is_err());
        assert_eq!(t.num_rows(), 3);
    }
}
