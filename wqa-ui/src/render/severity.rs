//! Severity-derived visual treatment of a level

use wqa_common::{Axis, Severity};

/// CSS modifier and glyph for one severity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelStyle {
    pub class: &'static str,
    pub icon: &'static str,
}

pub fn level_style(severity: Severity) -> LevelStyle {
    match severity {
        Severity::Favorable => LevelStyle {
            class: "favorable",
            icon: "✓",
        },
        Severity::Cautionary => LevelStyle {
            class: "cautionary",
            icon: "⚠",
        },
        Severity::Severe => LevelStyle {
            class: "severe",
            icon: "✖",
        },
    }
}

/// Card glyph for an axis
pub fn axis_icon(axis: Axis) -> &'static str {
    match axis {
        Axis::Turbidity => "≋",
        Axis::Algae => "❦",
        Axis::Color => "◐",
        Axis::Residue => "⌘",
    }
}
