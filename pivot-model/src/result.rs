//! FILENAME: pivot-model/src/result.rs
//! Pre-aggregated pivot result - the input contract of the chart engine.
//!
//! The aggregation collaborator groups raw records into rows keyed by
//! ordered key tuples and hands over this structure. Everything in it is
//! derived and immutable; the chart engine never writes back into it.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Key path for one row. Inline storage covers the typical depth (≤ 4).
pub type KeyPath = SmallVec<[String; 4]>;

/// Distinguishes real data rows from subtotal rows emitted by the
/// aggregation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowKind {
    Data,
    Subtotal,
}

impl Default for RowKind {
    fn default() -> Self {
        RowKind::Data
    }
}

/// One pre-aggregated row: an ordered key tuple (one key per row-dimension
/// level), per-series values keyed by series name, and a row total.
///
/// `values` is empty when there is a single implicit series; consumers then
/// read `total` instead. Rows of heterogeneous key depth are legal input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyedRow {
    /// Ordered keys, outermost dimension first (e.g. ["Nord", "Paris"]).
    pub keys: KeyPath,

    /// Data or subtotal row.
    #[serde(default)]
    pub kind: RowKind,

    /// Depth/level of this row (0-based, normally `keys.len() - 1`).
    #[serde(default)]
    pub level: usize,

    /// Display label (usually the last key, but callers may override).
    #[serde(default)]
    pub label: String,

    /// Per-series values keyed by column/series name. Empty for a single
    /// implicit series.
    #[serde(default)]
    pub values: FxHashMap<String, f64>,

    /// Row total across all series.
    #[serde(default)]
    pub total: f64,
}

impl KeyedRow {
    /// Creates a single-series data row from a key path and a total.
    pub fn new<I, S>(keys: I, total: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: KeyPath = keys.into_iter().map(Into::into).collect();
        let level = keys.len().saturating_sub(1);
        let label = keys.last().cloned().unwrap_or_default();
        KeyedRow {
            keys,
            kind: RowKind::Data,
            level,
            label,
            values: FxHashMap::default(),
            total,
        }
    }

    /// Attaches a per-series value (builder style).
    pub fn with_value(mut self, series: impl Into<String>, value: f64) -> Self {
        self.values.insert(series.into(), value);
        self
    }

    /// Marks this row as a subtotal (builder style).
    pub fn as_subtotal(mut self) -> Self {
        self.kind = RowKind::Subtotal;
        self
    }

    /// Reads the value for one series, degrading to 0 for missing or
    /// non-finite entries. Never fails.
    pub fn series_value(&self, series: &str) -> f64 {
        finite_or_zero(self.values.get(series).copied().unwrap_or(0.0))
    }

    /// Row total with the same defensive coercion.
    pub fn safe_total(&self) -> f64 {
        finite_or_zero(self.total)
    }
}

/// Coerces NaN/infinite values to 0. Malformed numbers degrade, they never
/// propagate or raise.
pub fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// The complete pre-aggregated result handed over by the aggregation step:
/// tagged rows, column headers in display order, per-column totals, and the
/// grand total.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PivotResult {
    /// All rows, data and subtotals interleaved in display order.
    pub rows: Vec<KeyedRow>,

    /// Column/series headers in display order. Empty when there is a
    /// single implicit series.
    pub column_headers: Vec<String>,

    /// Total per column, keyed by header.
    #[serde(default)]
    pub column_totals: FxHashMap<String, f64>,

    /// Grand total across all data rows and columns.
    #[serde(default)]
    pub grand_total: f64,
}

impl PivotResult {
    /// Iterates the data rows only (subtotals filtered out).
    pub fn data_rows(&self) -> impl Iterator<Item = &KeyedRow> {
        self.rows.iter().filter(|r| r.kind == RowKind::Data)
    }

    /// Number of data rows.
    pub fn data_row_count(&self) -> usize {
        self.data_rows().count()
    }

    /// Deepest key depth present among data rows (0 for an empty result).
    pub fn max_key_depth(&self) -> usize {
        self.data_rows().map(|r| r.keys.len()).max().unwrap_or(0)
    }
}
