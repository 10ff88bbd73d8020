use crate::config::TotalPolicy;
use crate::error::AnalysisError;
use crate::table::{Cell, ColumnData, Table};

/// True when row 0 already holds a total synthesized with `label`.
///
/// A table already passed through [`apply`] carries the fact itself. A table
/// reloaded from disk is recognised by every text cell of row 0 reading
/// `label`.
pub fn has_synthesized_total(table: &Table, label: &str) -> bool {
    if table.has_pinned_total() {
        return true;
    }
    if table.num_rows() == 0 {
        return false;
    }
    let text: Vec<&Vec<String>> = table
        .columns()
        .iter()
        .filter_map(|c| match &c.data {
            ColumnData::Text(v) => Some(v),
            ColumnData::Numeric(_) => None,
        })
        .collect();
    !text.is_empty() && text.iter().all(|v| v[0] == label)
}

/// Column sum over rows `from..`, ignoring missing values.
///
/// Values are added in ascending order so the result does not depend on the
/// current row order.
fn sum_from(values: &[Option<f64>], from: usize) -> f64 {
    let mut present: Vec<f64> = values.iter().skip(from).flatten().copied().collect();
    present.sort_by(f64::total_cmp);
    present.iter().sum()
}

/// Produce the aggregate row at index 0 according to `policy`.
///
/// Both policies leave the table with its aggregate pinned at row 0 and are
/// idempotent: applying them again yields the same table.
pub fn apply(table: &mut Table, policy: TotalPolicy, label: &str) -> Result<(), AnalysisError> {
    match policy {
        TotalPolicy::Append => append_total(table, label)?,
        TotalPolicy::ReplaceIfZero => replace_zero_totals(table),
    }
    if table.num_rows() > 0 {
        table.pin_total();
    }
    Ok(())
}

fn append_total(table: &mut Table, label: &str) -> Result<(), AnalysisError> {
    if has_synthesized_total(table, label) {
        for col in table.columns_mut() {
            if let ColumnData::Numeric(v) = &mut col.data {
                let total = sum_from(v, 1);
                v[0] = Some(total);
            }
        }
        return Ok(());
    }

    let cells = table
        .columns()
        .iter()
        .map(|c| match &c.data {
            ColumnData::Numeric(v) => Cell::Number(Some(sum_from(v, 0))),
            ColumnData::Text(_) => Cell::Text(label.to_string()),
        })
        .collect();
    table.insert_row(0, cells)
}

fn replace_zero_totals(table: &mut Table) {
    if table.num_rows() == 0 {
        return;
    }
    for col in table.columns_mut() {
        if let ColumnData::Numeric(v) = &mut col.data {
            if v[0] == Some(0.0) {
                let total = sum_from(v, 1);
                v[0] = Some(total);
            }
        }
    }
}
