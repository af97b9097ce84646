//! FILENAME: chart-engine/src/rings.rs
//! Ring flattening - per-depth aggregates for sunburst charts.
//!
//! Flattens a reconciled category forest into one flat ring per depth.
//! Because effective values come from the reconciliation pass, children of
//! the same parent sum exactly to the parent's value, which makes
//! percentage-of-parent and percentage-of-total displays exact.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::color::{lighten, DEFAULT_PALETTE};
use crate::tree::{forest_total, CategoryNode};

/// How much lighter each additional depth renders compared to its
/// top-level ancestor's color.
const DEPTH_LIGHTEN_STEP: f64 = 0.18;

/// One node of one ring, carrying everything a radial renderer needs to
/// draw and label its arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingItem {
    pub name: String,
    pub value: f64,
    pub color: String,

    /// Name of the parent node; empty at depth 0.
    pub parent_name: String,

    /// Effective value of the parent (the grand total at depth 0).
    pub parent_total: f64,

    /// Sum of all depth-0 node values.
    pub grand_total: f64,

    /// Ancestor names from root down, excluding this node.
    pub path: SmallVec<[String; 4]>,

    pub depth: usize,
}

/// Flattens the forest into rings, one per depth `0..max_depth`.
///
/// `colors` is the per-root color sequence (normally one entry per
/// top-level node); deeper nodes reuse their root ancestor's color,
/// progressively lightened per depth. An empty sequence degrades to the
/// default palette.
pub fn flatten_rings(forest: &[CategoryNode], colors: &[String]) -> Vec<Vec<RingItem>> {
    let grand_total = forest_total(forest);
    let mut rings: Vec<Vec<RingItem>> = Vec::new();

    for (root_idx, root) in forest.iter().enumerate() {
        let base_color = root_color(colors, root_idx);
        walk(
            root,
            0,
            "",
            grand_total,
            grand_total,
            &SmallVec::new(),
            &base_color,
            &mut rings,
        );
    }

    rings
}

fn root_color(colors: &[String], index: usize) -> String {
    if colors.is_empty() {
        DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()].to_string()
    } else {
        colors[index % colors.len()].clone()
    }
}

#[allow(clippy::too_many_arguments)]
fn walk(
    node: &CategoryNode,
    depth: usize,
    parent_name: &str,
    parent_total: f64,
    grand_total: f64,
    path: &SmallVec<[String; 4]>,
    base_color: &str,
    rings: &mut Vec<Vec<RingItem>>,
) {
    if rings.len() <= depth {
        rings.push(Vec::new());
    }

    rings[depth].push(RingItem {
        name: node.name.clone(),
        value: node.value,
        color: lighten(base_color, depth as f64 * DEPTH_LIGHTEN_STEP),
        parent_name: parent_name.to_string(),
        parent_total,
        grand_total,
        path: path.clone(),
        depth,
    });

    if node.children.is_empty() {
        return;
    }

    let mut child_path = path.clone();
    child_path.push(node.name.clone());
    for child in &node.children {
        walk(
            child,
            depth + 1,
            &node.name,
            node.value,
            grand_total,
            &child_path,
            base_color,
            rings,
        );
    }
}
