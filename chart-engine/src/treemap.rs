//! FILENAME: chart-engine/src/treemap.rs
//! Treemap transformation - sized nested nodes for space-filling charts.
//!
//! Builds on the reconciled category forest and relabels it into the
//! `{name, size}` / `{name, children}` shape treemap renderers consume.
//! Top-N + "Others" grouping applies only at the first level; the excluded
//! subtrees are kept intact under the "Others" node so drill-down into it
//! still works. Deeper levels are never truncated.

use pivot_model::KeyedRow;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::series::OTHERS_LABEL;
use crate::tree::{build_category_tree, CategoryNode};

/// One treemap node. Leaves serialize as `{name, size}`, internal nodes as
/// `{name, children}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreemapNode {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<TreemapNode>,
}

impl TreemapNode {
    /// Effective size: own size for leaves, children sum for internals.
    pub fn total_size(&self) -> f64 {
        match self.size {
            Some(size) if self.children.is_empty() => size,
            _ => self.children.iter().map(|c| c.total_size()).sum(),
        }
    }
}

/// First-level truncation options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreemapOptions {
    /// Keep the N largest first-level nodes (0 = unlimited).
    #[serde(default)]
    pub limit: usize,

    /// Fold excluded first-level nodes under one "Others" node.
    #[serde(default)]
    pub show_others: bool,
}

/// Builds the treemap forest from keyed rows.
///
/// When `limit > 0`, first-level nodes are ordered by descending size and
/// only the largest N are kept; with `show_others` the remainder is folded
/// under a single internal "Others" node that retains the excluded
/// subtrees. Never fails; empty input yields an empty forest.
pub fn build_treemap(
    rows: &[KeyedRow],
    row_fields: &[String],
    options: &TreemapOptions,
) -> Vec<TreemapNode> {
    let forest = build_category_tree(rows, row_fields);
    let mut nodes: Vec<TreemapNode> = forest.iter().map(to_treemap_node).collect();

    if options.limit > 0 && nodes.len() > options.limit {
        // Stable by size, so equal-sized nodes keep their source order
        nodes.sort_by(|a, b| {
            b.total_size()
                .partial_cmp(&a.total_size())
                .unwrap_or(Ordering::Equal)
        });
        let excluded = nodes.split_off(options.limit);
        if options.show_others {
            nodes.push(TreemapNode {
                name: OTHERS_LABEL.to_string(),
                size: None,
                children: excluded,
            });
        }
    }

    nodes
}

fn to_treemap_node(node: &CategoryNode) -> TreemapNode {
    if node.is_leaf() {
        TreemapNode {
            name: node.name.clone(),
            size: Some(node.value),
            children: Vec::new(),
        }
    } else {
        TreemapNode {
            name: node.name.clone(),
            size: None,
            children: node.children.iter().map(to_treemap_node).collect(),
        }
    }
}

/// Pure drill-down lookup: follows `path` by node name and returns the
/// children of the node it lands on. `None` when any component is missing;
/// an empty path yields the top-level nodes. The tree is never mutated.
pub fn drill_down<'a>(nodes: &'a [TreemapNode], path: &[&str]) -> Option<&'a [TreemapNode]> {
    let mut current = nodes;
    for name in path {
        let node = current.iter().find(|n| n.name == *name)?;
        current = &node.children;
    }
    Some(current)
}
