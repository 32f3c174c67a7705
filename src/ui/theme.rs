//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection. The
//! theme can be flipped at runtime; the choice is not saved.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use fraudwatch_stream::StreamState;
use fraudwatch_types::{Decision, Severity};

use crate::data::RiskLevel;
use crate::notify::Level;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    pub dark: bool,
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for elevated risk and review decisions.
    pub warning: Color,
    /// Color for high risk, blocks and errors.
    pub critical: Color,
    /// Color for low risk, approvals and success.
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            dark: true,
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            dark: false,
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Switch between dark and light.
    pub fn toggled(&self) -> Self {
        if self.dark {
            Self::light()
        } else {
            Self::dark()
        }
    }

    pub fn name(&self) -> &'static str {
        if self.dark {
            "dark"
        } else {
            "light"
        }
    }

    pub fn risk_style(&self, level: RiskLevel) -> Style {
        match level {
            RiskLevel::Low => Style::default().fg(self.healthy),
            RiskLevel::Elevated => Style::default().fg(self.warning),
            RiskLevel::High => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
        }
    }

    pub fn decision_style(&self, decision: Decision) -> Style {
        match decision {
            Decision::Approved => Style::default().fg(self.healthy),
            Decision::Review | Decision::Pending => Style::default().fg(self.warning),
            Decision::Blocked => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
            Decision::Unknown => Style::default().add_modifier(Modifier::DIM),
        }
    }

    pub fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Critical => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
            Severity::High => Style::default().fg(self.critical),
            Severity::Medium => Style::default().fg(self.warning),
            Severity::Low => Style::default().fg(self.healthy),
            Severity::Unknown => Style::default().add_modifier(Modifier::DIM),
        }
    }

    pub fn level_style(&self, level: Level) -> Style {
        match level {
            Level::Success => Style::default().fg(self.healthy),
            Level::Error => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
            Level::Info => Style::default().fg(self.highlight),
        }
    }

    pub fn stream_style(&self, state: StreamState) -> Style {
        match state {
            StreamState::Running => Style::default().fg(self.healthy).add_modifier(Modifier::BOLD),
            StreamState::Paused => Style::default().fg(self.warning).add_modifier(Modifier::BOLD),
            StreamState::Idle | StreamState::Disposed => {
                Style::default().add_modifier(Modifier::DIM)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_and_back() {
        let dark = Theme::dark();
        let light = dark.toggled();
        assert!(!light.dark);
        assert_eq!(light.name(), "light");
        assert!(light.toggled().dark);
    }
}
