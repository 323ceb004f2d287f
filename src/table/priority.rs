//! Priority classification for record table cells

use ratatui::style::Style;

use crate::dashboard::ui::Styles;
use crate::models::PriorityTier;

/// How a single grid cell should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStyle {
    /// Unstyled text
    Plain,
    /// Badge colored by severity
    Severity(PriorityTier),
    /// Trailing per-row action control
    Action,
}

const PRIORITY_STYLES: &[(&str, PriorityTier)] = &[
    ("low", PriorityTier::Low),
    ("medium", PriorityTier::Medium),
    ("high", PriorityTier::High),
];

/// Resolve a priority value to its cell style; unknown values stay plain
pub fn classify(value: &str) -> CellStyle {
    let value = value.trim();
    PRIORITY_STYLES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(value))
        .map(|(_, tier)| CellStyle::Severity(*tier))
        .unwrap_or(CellStyle::Plain)
}

impl CellStyle {
    /// Terminal style for this cell
    pub fn style(&self) -> Style {
        match self {
            CellStyle::Plain => Style::default(),
            CellStyle::Severity(tier) => Styles::severity(*tier),
            CellStyle::Action => Styles::action(),
        }
    }
}
