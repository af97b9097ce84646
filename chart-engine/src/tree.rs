//! FILENAME: chart-engine/src/tree.rs
//! Category forest construction from flat keyed rows.
//!
//! Builds an ordered forest of `CategoryNode` from the data rows of a
//! pivot result. Two passes: pass 1 inserts every row's key path, creating
//! or reusing a child per level and attaching the row total at the final
//! key; pass 2 reconciles effective values bottom-up. A node can hold both
//! an own value (a row ended exactly at its path) and children (another
//! row extended past it); reconciliation resolves that combination after
//! all insertions, so the final tree does not depend on row order.

use pivot_model::{KeyedRow, RowKind};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// One node of the category forest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    pub name: String,

    /// Value attached directly by a row ending at this path. Retained even
    /// when children exist; it never contributes to `value` in that case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub own_value: Option<f64>,

    /// Effective value: sum of children's effective values for internal
    /// nodes, own value for leaves. Filled by the reconciliation pass.
    pub value: f64,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

// ============================================================================
// BUILD PASS
// ============================================================================

/// Mutable node used during insertion. Keeps a by-name index next to the
/// ordered child list so siblings stay in first-appearance order with O(1)
/// lookup.
#[derive(Debug, Default)]
struct BuildNode {
    name: String,
    own_value: Option<f64>,
    children: Vec<BuildNode>,
    child_index: FxHashMap<String, usize>,
}

impl BuildNode {
    fn child_mut(&mut self, name: &str) -> &mut BuildNode {
        let idx = match self.child_index.get(name) {
            Some(&idx) => idx,
            None => {
                let idx = self.children.len();
                self.children.push(BuildNode {
                    name: name.to_string(),
                    ..Default::default()
                });
                self.child_index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.children[idx]
    }
}

/// Builds the category forest from the data rows of a result.
///
/// Only rows with `kind = Data` participate. `row_fields` bounds the
/// maximum depth when non-empty; keys past the configured depth are
/// ignored. A row with zero keys is skipped. Never fails.
pub fn build_category_tree(rows: &[KeyedRow], row_fields: &[String]) -> Vec<CategoryNode> {
    log::trace!(
        "building category tree: {} rows, {} row fields",
        rows.len(),
        row_fields.len()
    );

    let max_depth = if row_fields.is_empty() {
        usize::MAX
    } else {
        row_fields.len()
    };

    // Pass 1: insertion
    let mut root = BuildNode::default();
    for row in rows {
        if row.kind != RowKind::Data || row.keys.is_empty() {
            continue;
        }

        let mut node = &mut root;
        for key in row.keys.iter().take(max_depth) {
            node = node.child_mut(key);
        }
        // Repeated complete paths accumulate rather than overwrite
        *node.own_value.get_or_insert(0.0) += row.safe_total();
    }

    // Pass 2: reconciliation
    root.children.into_iter().map(reconcile).collect()
}

/// Bottom-up reconciliation: an internal node's effective value is the sum
/// of its children's effective values; the own value attached in pass 1 is
/// kept but treated as a restatement of the same aggregate, not an
/// addition. Leaves take their own value.
fn reconcile(node: BuildNode) -> CategoryNode {
    let children: Vec<CategoryNode> = node.children.into_iter().map(reconcile).collect();
    let value = if children.is_empty() {
        node.own_value.unwrap_or(0.0)
    } else {
        children.iter().map(|c| c.value).sum()
    };
    CategoryNode {
        name: node.name,
        own_value: node.own_value,
        value,
        children,
    }
}

/// Sum of all root effective values (the forest's grand total).
pub fn forest_total(forest: &[CategoryNode]) -> f64 {
    forest.iter().map(|n| n.value).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pivot_model::KeyedRow;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_two_level_forest() {
        let rows = vec![
            KeyedRow::new(["A", "A1", "A11"], 100.0),
            KeyedRow::new(["A", "A1", "A12"], 50.0),
            KeyedRow::new(["B", "B1", "B11"], 200.0),
        ];
        let forest = build_category_tree(&rows, &fields(&["L1", "L2", "L3"]));

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].name, "A");
        assert_eq!(forest[0].value, 150.0);
        assert_eq!(forest[0].children[0].name, "A1");
        assert_eq!(forest[0].children[0].value, 150.0);
        assert_eq!(forest[0].children[0].children.len(), 2);
        assert_eq!(forest[1].name, "B");
        assert_eq!(forest[1].value, 200.0);
    }

    #[test]
    fn test_short_row_does_not_discard_children() {
        // The short row ["A","A1"] arrives after the deeper row; A1 must
        // keep its child and display the children sum.
        let rows = vec![
            KeyedRow::new(["A", "A1", "A11"], 100.0),
            KeyedRow::new(["A", "A1"], 50.0),
        ];
        let forest = build_category_tree(&rows, &fields(&["L1", "L2", "L3"]));

        let a1 = &forest[0].children[0];
        assert_eq!(a1.children.len(), 1);
        assert_eq!(a1.children[0].name, "A11");
        assert_eq!(a1.value, 100.0);
        assert_eq!(a1.own_value, Some(50.0));
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let forward = vec![
            KeyedRow::new(["A", "A1", "A11"], 100.0),
            KeyedRow::new(["A", "A1"], 50.0),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let fields = fields(&["L1", "L2", "L3"]);
        let f1 = build_category_tree(&forward, &fields);
        let f2 = build_category_tree(&reversed, &fields);

        assert_eq!(f1[0].value, f2[0].value);
        assert_eq!(f1[0].children[0].value, f2[0].children[0].value);
        assert_eq!(
            f1[0].children[0].children.len(),
            f2[0].children[0].children.len()
        );
    }

    #[test]
    fn test_skips_subtotals_and_empty_keys() {
        let rows = vec![
            KeyedRow::new(["A"], 100.0),
            KeyedRow::new(["A"], 100.0).as_subtotal(),
            KeyedRow::new(Vec::<String>::new(), 999.0),
        ];
        let forest = build_category_tree(&rows, &fields(&["L1"]));
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].value, 100.0);
    }

    #[test]
    fn test_depth_bounded_by_row_fields() {
        let rows = vec![KeyedRow::new(["A", "A1", "A11"], 100.0)];
        let forest = build_category_tree(&rows, &fields(&["L1"]));
        assert_eq!(forest.len(), 1);
        assert!(forest[0].is_leaf());
        assert_eq!(forest[0].value, 100.0);
    }

    #[test]
    fn test_repeated_path_accumulates() {
        let rows = vec![
            KeyedRow::new(["A"], 100.0),
            KeyedRow::new(["A"], 25.0),
        ];
        let forest = build_category_tree(&rows, &fields(&["L1"]));
        assert_eq!(forest[0].value, 125.0);
    }

    #[test]
    fn test_empty_input() {
        let forest = build_category_tree(&[], &fields(&["L1"]));
        assert!(forest.is_empty());
        assert_eq!(forest_total(&forest), 0.0);
    }
}
