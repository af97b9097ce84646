//! FILENAME: chart-engine/src/series.rs
//! Flat chart record transformation - sorted, Top-N-limited categories.
//!
//! Produces the `{name, <series>: value, ...}` records consumed by flat
//! chart renderers (bar, column, line, pie) and by the export layer. The
//! transform is independent of the category tree: it works directly on the
//! keyed rows, optionally re-aggregating them at a shallower hierarchy
//! depth first.

use pivot_model::{finite_or_zero, KeyedRow, RowKind, SortBy, SortOrder};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Name of the single implicit series when no explicit columns exist.
pub const IMPLICIT_SERIES: &str = "value";

/// Label of the synthetic record folding excluded categories.
pub const OTHERS_LABEL: &str = "Others";

/// One flat chart record. Serializes as a single flat JSON object:
/// `{"name": "Nord", "2023": 1000.0, "2024": 1200.0}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRecord {
    pub name: String,

    #[serde(flatten)]
    pub values: FxHashMap<String, f64>,
}

impl ChartRecord {
    /// Sum of all series values in this record.
    pub fn total(&self) -> f64 {
        self.values.values().sum()
    }
}

/// Options controlling sorting, truncation and re-aggregation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeriesOptions {
    #[serde(default)]
    pub sort_by: SortBy,

    #[serde(default)]
    pub sort_order: SortOrder,

    /// Keep the first N records after sorting (0 = unlimited).
    #[serde(default)]
    pub limit: usize,

    /// Fold records beyond `limit` into one synthetic "Others" record.
    #[serde(default)]
    pub show_others: bool,

    /// Re-aggregate rows at this key depth (1-based) instead of using leaf
    /// rows. Clamped to the deepest depth present in the data.
    #[serde(default)]
    pub hierarchy_level: Option<usize>,

    /// Include subtotal rows. Off unless explicitly requested.
    #[serde(default)]
    pub include_subtotals: bool,
}

/// Working accumulator before records are finalized.
struct Accumulator {
    name: String,
    total: f64,
    per_series: FxHashMap<String, f64>,
}

/// Transforms keyed rows into flat chart records.
///
/// `series_names` is the ordered column header list; empty means a single
/// implicit "value" series fed from row totals. With `limit = 0` and no
/// re-aggregation the sum of all output values equals the input grand
/// total. Never fails; malformed values degrade to 0.
pub fn transform_series(
    rows: &[KeyedRow],
    series_names: &[String],
    options: &SeriesOptions,
) -> Vec<ChartRecord> {
    log::trace!(
        "transforming series: {} rows, {} series",
        rows.len(),
        series_names.len()
    );

    let kept: Vec<&KeyedRow> = rows
        .iter()
        .filter(|r| r.kind == RowKind::Data || options.include_subtotals)
        .collect();

    let mut accs = match options.hierarchy_level {
        Some(level) => aggregate_at_level(&kept, series_names, level),
        None => leaf_accumulators(&kept, series_names),
    };

    sort_accumulators(&mut accs, options.sort_by, options.sort_order);

    if options.limit > 0 && accs.len() > options.limit {
        let excluded = accs.split_off(options.limit);
        if options.show_others {
            accs.push(fold_others(excluded, series_names));
        }
    }

    accs.into_iter()
        .map(|acc| finalize(acc, series_names))
        .collect()
}

/// One accumulator per row, values read defensively.
fn leaf_accumulators(rows: &[&KeyedRow], series_names: &[String]) -> Vec<Accumulator> {
    rows.iter()
        .map(|row| {
            let mut per_series = FxHashMap::default();
            for series in series_names {
                per_series.insert(series.clone(), row.series_value(series));
            }
            Accumulator {
                name: row_name(row),
                total: row.safe_total(),
                per_series,
            }
        })
        .collect()
}

/// Groups rows by their key path truncated to `level` components, summing
/// totals and per-series values. The level is clamped to the deepest depth
/// present rather than rejected.
fn aggregate_at_level(
    rows: &[&KeyedRow],
    series_names: &[String],
    level: usize,
) -> Vec<Accumulator> {
    let max_depth = rows.iter().map(|r| r.keys.len()).max().unwrap_or(0);
    if max_depth == 0 {
        return Vec::new();
    }
    let level = level.clamp(1, max_depth);

    let mut groups: Vec<Accumulator> = Vec::new();
    let mut index: FxHashMap<Vec<String>, usize> = FxHashMap::default();

    for row in rows {
        if row.keys.is_empty() {
            continue;
        }
        let prefix: Vec<String> = row.keys.iter().take(level).cloned().collect();

        let idx = match index.get(&prefix) {
            Some(&idx) => idx,
            None => {
                let idx = groups.len();
                groups.push(Accumulator {
                    name: prefix.join(" / "),
                    total: 0.0,
                    per_series: FxHashMap::default(),
                });
                index.insert(prefix, idx);
                idx
            }
        };

        let acc = &mut groups[idx];
        acc.total += row.safe_total();
        for series in series_names {
            *acc.per_series.entry(series.clone()).or_insert(0.0) += row.series_value(series);
        }
    }

    groups
}

/// Display name for one leaf record: the row label when present, the
/// joined key path otherwise.
fn row_name(row: &KeyedRow) -> String {
    if !row.label.is_empty() {
        row.label.clone()
    } else if row.keys.is_empty() {
        "(blank)".to_string()
    } else {
        row.keys.join(" / ")
    }
}

/// Stable sort; ties keep their original relative order.
fn sort_accumulators(accs: &mut [Accumulator], sort_by: SortBy, order: SortOrder) {
    let compare: fn(&Accumulator, &Accumulator) -> Ordering = match sort_by {
        SortBy::Name => |a, b| a.name.cmp(&b.name),
        SortBy::Value => |a, b| a.total.partial_cmp(&b.total).unwrap_or(Ordering::Equal),
        SortBy::SourceOrder => return,
    };

    match order {
        SortOrder::Ascending => accs.sort_by(compare),
        SortOrder::Descending => accs.sort_by(|a, b| compare(b, a)),
    }
}

/// Sums excluded accumulators into the synthetic "Others" record.
fn fold_others(excluded: Vec<Accumulator>, series_names: &[String]) -> Accumulator {
    let mut per_series: FxHashMap<String, f64> = FxHashMap::default();
    let mut total = 0.0;
    for acc in &excluded {
        total += acc.total;
        for series in series_names {
            *per_series.entry(series.clone()).or_insert(0.0) +=
                acc.per_series.get(series).copied().unwrap_or(0.0);
        }
    }
    Accumulator {
        name: OTHERS_LABEL.to_string(),
        total,
        per_series,
    }
}

/// Converts an accumulator into the output record shape. Missing series
/// values default to 0; the implicit series carries the row total.
fn finalize(acc: Accumulator, series_names: &[String]) -> ChartRecord {
    let mut values = FxHashMap::default();
    if series_names.is_empty() {
        values.insert(IMPLICIT_SERIES.to_string(), finite_or_zero(acc.total));
    } else {
        for series in series_names {
            values.insert(
                series.clone(),
                finite_or_zero(acc.per_series.get(series).copied().unwrap_or(0.0)),
            );
        }
    }
    ChartRecord {
        name: acc.name,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pivot_model::KeyedRow;

    fn series(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_multi_series_records() {
        let rows = vec![
            KeyedRow::new(["Nord"], 2200.0)
                .with_value("2023", 1000.0)
                .with_value("2024", 1200.0),
            KeyedRow::new(["Sud"], 3300.0)
                .with_value("2023", 1500.0)
                .with_value("2024", 1800.0),
        ];
        let records = transform_series(&rows, &series(&["2023", "2024"]), &SeriesOptions::default());

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Nord");
        assert_eq!(records[0].values["2023"], 1000.0);
        assert_eq!(records[0].values["2024"], 1200.0);
        assert_eq!(records[1].name, "Sud");
        assert_eq!(records[1].values["2023"], 1500.0);
        assert_eq!(records[1].values["2024"], 1800.0);
    }

    #[test]
    fn test_implicit_series_uses_total() {
        let rows = vec![KeyedRow::new(["Nord"], 2200.0)];
        let records = transform_series(&rows, &[], &SeriesOptions::default());
        assert_eq!(records[0].values[IMPLICIT_SERIES], 2200.0);
    }

    #[test]
    fn test_missing_series_defaults_to_zero() {
        let rows = vec![KeyedRow::new(["Nord"], 1000.0).with_value("2023", 1000.0)];
        let records = transform_series(&rows, &series(&["2023", "2024"]), &SeriesOptions::default());
        assert_eq!(records[0].values["2024"], 0.0);
    }

    #[test]
    fn test_limit_with_others() {
        let rows = vec![
            KeyedRow::new(["A"], 200.0),
            KeyedRow::new(["B"], 150.0),
            KeyedRow::new(["C"], 100.0),
        ];
        let options = SeriesOptions {
            sort_by: SortBy::Value,
            sort_order: SortOrder::Descending,
            limit: 2,
            show_others: true,
            ..Default::default()
        };
        let records = transform_series(&rows, &[], &options);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].values[IMPLICIT_SERIES], 200.0);
        assert_eq!(records[1].values[IMPLICIT_SERIES], 150.0);
        assert_eq!(records[2].name, OTHERS_LABEL);
        assert_eq!(records[2].values[IMPLICIT_SERIES], 100.0);
    }

    #[test]
    fn test_limit_without_others_drops_remainder() {
        let rows = vec![KeyedRow::new(["A"], 1.0), KeyedRow::new(["B"], 2.0)];
        let options = SeriesOptions {
            limit: 1,
            ..Default::default()
        };
        let records = transform_series(&rows, &[], &options);
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_sum_preserved_without_truncation() {
        let rows = vec![
            KeyedRow::new(["A"], 10.0),
            KeyedRow::new(["B"], 20.0),
            KeyedRow::new(["C"], 12.5),
        ];
        let records = transform_series(&rows, &[], &SeriesOptions::default());
        let sum: f64 = records.iter().map(|r| r.total()).sum();
        assert!((sum - 42.5).abs() < 1e-9);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let rows = vec![
            KeyedRow::new(["C"], 100.0),
            KeyedRow::new(["A"], 100.0),
            KeyedRow::new(["B"], 100.0),
        ];
        let options = SeriesOptions {
            sort_by: SortBy::Value,
            sort_order: SortOrder::Descending,
            ..Default::default()
        };
        let records = transform_series(&rows, &[], &options);
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_hierarchy_level_regroups() {
        let rows = vec![
            KeyedRow::new(["Nord", "Paris"], 100.0),
            KeyedRow::new(["Nord", "Lille"], 50.0),
            KeyedRow::new(["Sud", "Nice"], 200.0),
        ];
        let options = SeriesOptions {
            hierarchy_level: Some(1),
            ..Default::default()
        };
        let records = transform_series(&rows, &[], &options);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Nord");
        assert_eq!(records[0].values[IMPLICIT_SERIES], 150.0);
        assert_eq!(records[1].name, "Sud");
        assert_eq!(records[1].values[IMPLICIT_SERIES], 200.0);
    }

    #[test]
    fn test_hierarchy_level_clamped_to_available_depth() {
        let rows = vec![KeyedRow::new(["Nord", "Paris"], 100.0)];
        let options = SeriesOptions {
            hierarchy_level: Some(9),
            ..Default::default()
        };
        let records = transform_series(&rows, &[], &options);
        assert_eq!(records[0].name, "Nord / Paris");
    }

    #[test]
    fn test_subtotals_excluded_by_default() {
        let rows = vec![
            KeyedRow::new(["A"], 100.0),
            KeyedRow::new(["A"], 100.0).as_subtotal(),
        ];
        let records = transform_series(&rows, &[], &SeriesOptions::default());
        assert_eq!(records.len(), 1);

        let options = SeriesOptions {
            include_subtotals: true,
            ..Default::default()
        };
        assert_eq!(transform_series(&rows, &[], &options).len(), 2);
    }

    #[test]
    fn test_non_finite_coerced_to_zero() {
        let rows = vec![KeyedRow::new(["A"], f64::NAN).with_value("2023", f64::INFINITY)];
        let records = transform_series(&rows, &series(&["2023"]), &SeriesOptions::default());
        assert_eq!(records[0].values["2023"], 0.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(transform_series(&[], &[], &SeriesOptions::default()).is_empty());
    }

    #[test]
    fn test_flat_json_shape() {
        let rows = vec![KeyedRow::new(["Nord"], 1000.0).with_value("2023", 1000.0)];
        let records = transform_series(&rows, &series(&["2023"]), &SeriesOptions::default());
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["name"], "Nord");
        assert_eq!(json["2023"], 1000.0);
    }
}
