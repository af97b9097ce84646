//! FILENAME: chart-engine/src/classifier.rs
//! Chart shape recommendation from configuration and result shape.
//!
//! Inspects the shape configuration and the pre-aggregated result and
//! returns advisory metadata with a suggested chart type. The decision
//! procedure is an explicit ordered rule table evaluated top-to-bottom,
//! first match wins; each rule is independently testable and the table
//! order documents the priority. The classifier only recommends - callers
//! may override - and it never fails.

use pivot_model::{PivotResult, PivotShapeConfig};
use serde::{Deserialize, Serialize};

/// Chart kinds the rendering collaborator understands, plus the sentinel
/// returned for unrecognized requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartType {
    Line,
    Pie,
    StackedBar,
    Treemap,
    Column,
    Unsupported,
}

impl ChartType {
    /// Resolves a requested chart-type name. Unknown names yield the
    /// `Unsupported` sentinel for the caller to handle; nothing is raised.
    pub fn from_name(name: &str) -> ChartType {
        match name {
            "line" => ChartType::Line,
            "pie" => ChartType::Pie,
            "stacked-bar" => ChartType::StackedBar,
            "treemap" => ChartType::Treemap,
            "column" => ChartType::Column,
            _ => ChartType::Unsupported,
        }
    }
}

/// Advisory metadata consumed alongside any transform output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    pub is_multi_series: bool,
    pub has_temporal_data: bool,
    pub has_hierarchy: bool,
    pub total_data_points: usize,
    pub series_names: Vec<String>,
    pub suggested_type: ChartType,
}

// ============================================================================
// RULE TABLE
// ============================================================================

/// Pre-computed shape facts the rules decide on.
#[derive(Debug, Clone, Copy)]
struct ResultShape {
    series_count: usize,
    data_points: usize,
    leaf_rows: usize,
    row_depth: usize,
    temporal: bool,
}

type Rule = (&'static str, fn(&ResultShape) -> Option<ChartType>);

/// Evaluated top-to-bottom, first match wins. The final `column` default
/// lives outside the table.
const RULES: &[Rule] = &[
    ("temporal-multi-series", rule_temporal_multi_series),
    ("small-single-series", rule_small_single_series),
    ("few-series-few-points", rule_few_series_few_points),
    ("deep-hierarchy", rule_deep_hierarchy),
];

/// Period-grouped columns with more than one series read best over time.
fn rule_temporal_multi_series(s: &ResultShape) -> Option<ChartType> {
    (s.temporal && s.series_count > 1).then_some(ChartType::Line)
}

/// A handful of single-series categories fits a pie.
fn rule_small_single_series(s: &ResultShape) -> Option<ChartType> {
    ((1..=7).contains(&s.data_points) && s.series_count == 1).then_some(ChartType::Pie)
}

/// A few series over a modest category count stacks well.
fn rule_few_series_few_points(s: &ResultShape) -> Option<ChartType> {
    ((2..=8).contains(&s.series_count) && s.data_points >= 1 && s.data_points <= 20)
        .then_some(ChartType::StackedBar)
}

/// Hierarchical results with many leaves need a space-filling layout.
fn rule_deep_hierarchy(s: &ResultShape) -> Option<ChartType> {
    (s.row_depth > 1 && s.leaf_rows > 15).then_some(ChartType::Treemap)
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Classifies a result and returns the recommendation metadata.
pub fn classify(config: &PivotShapeConfig, result: &PivotResult) -> ChartMetadata {
    let shape = ResultShape {
        series_count: result.column_headers.len().max(1),
        data_points: result.data_row_count(),
        leaf_rows: leaf_row_count(config, result),
        row_depth: config.row_fields.len(),
        temporal: config.column_grouping.is_temporal(),
    };

    let mut suggested = ChartType::Column;
    for (name, rule) in RULES {
        if let Some(chart_type) = rule(&shape) {
            log::debug!("classifier rule '{}' matched: {:?}", name, chart_type);
            suggested = chart_type;
            break;
        }
    }

    ChartMetadata {
        is_multi_series: result.column_headers.len() > 1,
        has_temporal_data: shape.temporal,
        has_hierarchy: config.is_hierarchical(),
        total_data_points: shape.data_points,
        series_names: series_names(config, result),
        suggested_type: suggested,
    }
}

/// Data rows at the full configured depth. Without configured row fields
/// every data row counts as a leaf.
fn leaf_row_count(config: &PivotShapeConfig, result: &PivotResult) -> usize {
    if config.row_fields.is_empty() {
        result.data_row_count()
    } else {
        result
            .data_rows()
            .filter(|r| r.keys.len() == config.row_fields.len())
            .count()
    }
}

/// Column headers when present, otherwise the synthetic implicit series
/// name ("Sum of Revenue").
fn series_names(config: &PivotShapeConfig, result: &PivotResult) -> Vec<String> {
    if !result.column_headers.is_empty() {
        result.column_headers.clone()
    } else if config.value_field.is_empty() {
        vec!["Value".to_string()]
    } else {
        vec![config.implicit_series_name()]
    }
}
