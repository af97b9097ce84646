//! FILENAME: chart-engine/src/color.rs
//! Deterministic color-sequence generation for chart categories.
//!
//! Given a count N and a mode, produces N color tokens such that the same
//! index always maps to the same token for equal inputs. Colors are plain
//! `#rrggbb` strings; malformed input colors pass through unchanged rather
//! than failing.

use serde::{Deserialize, Serialize};

/// Default categorical palette, cycled when N exceeds its length.
pub const DEFAULT_PALETTE: &[&str] = &[
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948",
    "#b07aa1", "#ff9da7", "#9c755f", "#bab0ac",
];

/// Color assignment mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColorMode {
    /// Cycle through a finite palette.
    Palette(Vec<String>),
    /// Repeat one color for every index.
    Single(String),
    /// Linearly interpolate between two hex endpoints across N.
    Gradient { from: String, to: String },
}

impl Default for ColorMode {
    fn default() -> Self {
        ColorMode::Palette(DEFAULT_PALETTE.iter().map(|s| s.to_string()).collect())
    }
}

/// Index-stable color sequence generator.
#[derive(Debug, Clone, Default)]
pub struct ColorAssigner {
    mode: ColorMode,
}

impl ColorAssigner {
    pub fn new(mode: ColorMode) -> Self {
        ColorAssigner { mode }
    }

    /// Returns the color for one index. Equal (mode, index, count) inputs
    /// always produce the same token.
    pub fn color_at(&self, index: usize, count: usize) -> String {
        match &self.mode {
            ColorMode::Palette(palette) => {
                if palette.is_empty() {
                    // Degrade to the built-in palette rather than failing
                    DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()].to_string()
                } else {
                    palette[index % palette.len()].clone()
                }
            }
            ColorMode::Single(color) => color.clone(),
            ColorMode::Gradient { from, to } => {
                let t = if count <= 1 {
                    0.0
                } else {
                    index as f64 / (count - 1) as f64
                };
                interpolate(from, to, t)
            }
        }
    }

    /// Generates the full ordered sequence of `count` colors.
    pub fn assign(&self, count: usize) -> Vec<String> {
        (0..count).map(|i| self.color_at(i, count)).collect()
    }
}

/// Lightens a `#rrggbb` color by blending toward white. `amount` is clamped
/// to [0, 1]; a malformed color is returned unchanged.
pub fn lighten(color: &str, amount: f64) -> String {
    let amount = amount.clamp(0.0, 1.0);
    match parse_hex(color) {
        Some((r, g, b)) => {
            let blend = |c: u8| -> u8 {
                let c = c as f64;
                (c + (255.0 - c) * amount).round() as u8
            };
            format_hex(blend(r), blend(g), blend(b))
        }
        None => color.to_string(),
    }
}

/// Linear RGB interpolation between two hex colors at position `t` in
/// [0, 1]. Falls back to `from` when either endpoint is malformed.
fn interpolate(from: &str, to: &str, t: f64) -> String {
    match (parse_hex(from), parse_hex(to)) {
        (Some((r0, g0, b0)), Some((r1, g1, b1))) => {
            let mix = |a: u8, b: u8| -> u8 {
                (a as f64 + (b as f64 - a as f64) * t).round() as u8
            };
            format_hex(mix(r0, r1), mix(g0, g1), mix(b0, b1))
        }
        _ => from.to_string(),
    }
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    // Checked slicing: non-ASCII input must degrade, not panic
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
    Some((r, g, b))
}

fn format_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}
