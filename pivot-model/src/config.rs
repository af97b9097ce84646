//! FILENAME: pivot-model/src/config.rs
//! Shape configuration - the serializable snapshot of user intent.
//!
//! These structures describe how the pivot result was requested to be
//! shaped: which fields form the row hierarchy, which form the columns,
//! how columns are period-grouped, and how output should be sorted and
//! limited. They are immutable snapshots passed into pure transforms;
//! the engine holds no state between calls.

use serde::{Deserialize, Serialize};

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported aggregation functions for the value field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationType {
    Sum,
    Count,
    Average,
    Min,
    Max,
    CountNumbers,
    StdDev,
    StdDevP,
    Var,
    VarP,
    Product,
}

impl Default for AggregationType {
    fn default() -> Self {
        AggregationType::Sum
    }
}

impl AggregationType {
    /// Builds the synthetic series name used when no explicit column
    /// headers exist (e.g. "Sum of Revenue").
    pub fn display_name(&self, value_field: &str) -> String {
        let verb = match self {
            AggregationType::Sum => "Sum",
            AggregationType::Count => "Count",
            AggregationType::Average => "Average",
            AggregationType::Min => "Min",
            AggregationType::Max => "Max",
            AggregationType::CountNumbers => "Count Numbers",
            AggregationType::StdDev => "StdDev",
            AggregationType::StdDevP => "StdDevP",
            AggregationType::Var => "Var",
            AggregationType::VarP => "VarP",
            AggregationType::Product => "Product",
        };
        format!("{} of {}", verb, value_field)
    }
}

// ============================================================================
// COLUMN GROUPING
// ============================================================================

/// Time periods a column dimension can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeriodKind {
    Year,
    Quarter,
    Month,
    Week,
    Day,
}

/// How column values are grouped. `Period` marks the columns as temporal,
/// which the classifier uses to recommend line charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnGrouping {
    /// No grouping - raw column values.
    None,
    /// Columns are buckets of a time period.
    Period(PeriodKind),
}

impl Default for ColumnGrouping {
    fn default() -> Self {
        ColumnGrouping::None
    }
}

impl ColumnGrouping {
    pub fn is_temporal(&self) -> bool {
        matches!(self, ColumnGrouping::Period(_))
    }
}

// ============================================================================
// SORT / LIMIT DIRECTIVES
// ============================================================================

/// Which record attribute to sort flat chart records by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortBy {
    Name,
    Value,
    /// Keep the order the rows arrived in.
    SourceOrder,
}

impl Default for SortBy {
    fn default() -> Self {
        SortBy::SourceOrder
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Ascending
    }
}

// ============================================================================
// MAIN CONFIG STRUCT
// ============================================================================

/// The complete shape configuration for one pivot result.
/// Field lists are ordered outermost dimension first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PivotShapeConfig {
    /// Row-dimension field names (defines tree depth and per-level labels).
    pub row_fields: Vec<String>,

    /// Column-dimension field names.
    pub column_fields: Vec<String>,

    /// Column grouping mode.
    #[serde(default)]
    pub column_grouping: ColumnGrouping,

    /// Name of the aggregated value field (e.g. "Revenue").
    #[serde(default)]
    pub value_field: String,

    /// Aggregation applied upstream to the value field.
    #[serde(default)]
    pub aggregation: AggregationType,

    /// Sort directive for flat chart records.
    #[serde(default)]
    pub sort_by: SortBy,

    /// Sort direction.
    #[serde(default)]
    pub sort_order: SortOrder,

    /// Top-N limit for flat records (0 = unlimited).
    #[serde(default)]
    pub limit: usize,

    /// Fold records beyond the limit into one synthetic "Others" record.
    #[serde(default)]
    pub show_others: bool,

    /// Whether subtotal rows are visible in the source result.
    #[serde(default)]
    pub show_subtotals: bool,
}

impl PivotShapeConfig {
    /// True when more than one row dimension is configured (the result is
    /// hierarchical).
    pub fn is_hierarchical(&self) -> bool {
        self.row_fields.len() > 1
    }

    /// The synthetic series name used when there are no explicit columns.
    pub fn implicit_series_name(&self) -> String {
        self.aggregation.display_name(&self.value_field)
    }
}
