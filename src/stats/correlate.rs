use crate::config::CountersSchema;
use crate::error::AnalysisError;
use crate::table::{ColumnData, Table};
use tracing::{debug, info};

/// Pearson correlation coefficient over pairs where both values are present.
///
/// Returns `None` when fewer than two pairs exist or either side has zero
/// variance, since the coefficient is undefined there.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// Hardware-event columns whose per-row counts track the reference
/// clock-cycle column with a coefficient above `cutoff`.
///
/// Names are returned with the event prefix stripped, in column order. When
/// `pinned` is set, row 0 is an aggregate and is left out of the computation.
pub fn correlated_counters(
    table: &Table,
    schema: &CountersSchema,
    cutoff: f64,
    pinned: bool,
) -> Result<Vec<String>, AnalysisError> {
    let start = usize::from(pinned).min(table.num_rows());
    let clk = &table.numeric(&schema.clk_event)?[start..];
    let family = schema.clk_family();

    info!("counters correlated with {}", schema.display_name(&schema.clk_event));

    let mut out = Vec::new();
    for col in table.columns() {
        let ColumnData::Numeric(values) = &col.data else {
            continue;
        };
        if col.name == schema.clk_event || col.name.contains(family) {
            continue;
        }
        match pearson(clk, &values[start..]) {
            Some(coeff) if coeff > cutoff => {
                let name = schema.display_name(&col.name);
                info!("{} at {:.4}", name, coeff);
                out.push(name.to_string());
            }
            Some(_) => {}
            None => debug!("skipping {}: correlation undefined", col.name),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use pretty_assertions::assert_eq;

    fn some(v: &[f64]) -> Vec<Option<f64>> {
        v.iter().copied().map(Some).collect()
    }

    #[test]
    fn pearson_of_scaled_series_is_one() {
        let x = some(&[1000.0, 2.0, 350.0, 47.0, 810.0]);
        let y: Vec<Option<f64>> = x.iter().map(|v| v.map(|v| v * 3.0)).collect();
        let r = pearson(&x, &y).unwrap();
        assert!((r - 1.0).abs() < 1e-12, "{}", r);
    }

    #[test]
    fn pearson_undefined_without_variance() {
        assert_eq!(pearson(&some(&[1.0, 2.0]), &some(&[5.0, 5.0])), None);
        assert_eq!(pearson(&some(&[1.0]), &some(&[2.0])), None);
        assert_eq!(
            pearson(&[Some(1.0), None, Some(3.0)], &[None, Some(2.0), Some(1.0)]),
            None
        );
    }

    fn counters_table() -> Table {
        let schema = CountersSchema::default();
        let clk = [1000.0, 2.0, 400.0, 60.0, 700.0, 150.0];
        Table::from_columns(vec![
            Column::text(
                "Function",
                ["a", "b", "c", "d", "e", "f"].iter().map(|s| s.to_string()).collect(),
            ),
            Column::numeric(schema.clk_event.clone(), some(&clk)),
            // Same family as the reference: always excluded.
            Column::numeric(
                "Hardware Event Count:CPU_CLK_UNHALTED.REF_TSC",
                some(&clk.map(|v| v * 2.0)),
            ),
            Column::numeric(
                "Hardware Event Count:MEM_LOAD_RETIRED.L3_MISS",
                some(&clk.map(|v| v * 0.5)),
            ),
            // Uncorrelated with the ordering of clk.
            Column::numeric(
                "Hardware Event Count:BR_MISP_RETIRED.ALL_BRANCHES",
                some(&[5.0, 5.0, 1.0, 9.0, 1.0, 9.0]),
            ),
            Column::numeric("Hardware Event Count:UOPS_ISSUED.STALL", some(&[3.0; 6])),
            Column::numeric(schema.inst_event.clone(), some(&clk.map(|v| v * 1.7 + 10.0))),
        ])
        .unwrap()
    }

    #[test]
    fn finds_correlated_counters_in_column_order() {
        let schema = CountersSchema::default();
        let got = correlated_counters(&counters_table(), &schema, 0.80, false).unwrap();
        assert_eq!(got, vec!["MEM_LOAD_RETIRED.L3_MISS", "INST_RETIRED.ANY"]);
    }

    #[test]
    fn missing_reference_column_is_fatal() {
        let schema = CountersSchema::default();
        let t = Table::from_columns(vec![Column::numeric("x", some(&[1.0, 2.0]))]).unwrap();
        assert_eq!(
            correlated_counters(&t, &schema, 0.80, false),
            Err(AnalysisError::MissingColumn {
                column: schema.clk_event.clone()
            })
        );
    }
}
