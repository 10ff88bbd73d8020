use crate::error::AnalysisError;
use crate::table::Table;

/// Stable descending sort of the data rows by numeric column `column`.
///
/// With `pinned` set, row 0 holds the aggregate and never moves. Every row in
/// the sorted range must have a value.
pub fn sort_descending(
    table: &mut Table,
    column: &str,
    pinned: bool,
) -> Result<(), AnalysisError> {
    let values = table.numeric(column)?;
    let start = usize::from(pinned).min(values.len());

    let mut keyed = Vec::with_capacity(values.len() - start);
    for (row, v) in values.iter().enumerate().skip(start) {
        let v = v.ok_or_else(|| AnalysisError::MissingValue {
            column: column.to_string(),
            row,
        })?;
        keyed.push((row, v));
    }

    // sort_by is stable, so equal values keep their original order.
    keyed.sort_by(|a, b| b.1.total_cmp(&a.1));

    let order: Vec<usize> = (0..start).chain(keyed.into_iter().map(|(row, _)| row)).collect();
    table.reorder_rows(&order);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use pretty_assertions::assert_eq;

    fn table(names: &[&str], values: &[Option<f64>]) -> Table {
        Table::from_columns(vec![
            Column::text("Function", names.iter().map(|s| s.to_string()).collect()),
            Column::numeric("CPU Time", values.to_vec()),
        ])
        .unwrap()
    }

    #[test]
    fn pinned_row_stays_first() {
        let mut t = table(
            &["Total", "f1", "f2", "f3", "f4"],
            &[Some(100.0), Some(40.0), Some(25.0), Some(15.0), Some(20.0)],
        );
        sort_descending(&mut t, "CPU Time", true).unwrap();
        assert_eq!(t.text("Function").unwrap(), vec!["Total", "f1", "f2", "f4", "f3"]);
    }

    #[test]
    fn ties_keep_original_order() {
        let mut t = table(
            &["a", "b", "c", "d"],
            &[Some(1.0), Some(5.0), Some(1.0), Some(5.0)],
        );
        sort_descending(&mut t, "CPU Time", false).unwrap();
        assert_eq!(t.text("Function").unwrap(), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn missing_value_in_ranked_range_fails() {
        let mut t = table(&["Total", "f1", "f2"], &[None, Some(1.0), None]);
        assert_eq!(
            sort_descending(&mut t, "CPU Time", true),
            Err(AnalysisError::MissingValue {
                column: "CPU Time".into(),
                row: 2
            })
        );
    }
}
