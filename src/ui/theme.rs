use crossterm::style::{Color, Stylize};
use rust_decimal::Decimal;

pub(crate) const ACCENT: Color = Color::Rgb {
    r: 137,
    g: 180,
    b: 250,
};
pub(crate) const GREEN: Color = Color::Rgb {
    r: 166,
    g: 227,
    b: 161,
};
pub(crate) const RED: Color = Color::Rgb {
    r: 243,
    g: 139,
    b: 168,
};
pub(crate) const YELLOW: Color = Color::Rgb {
    r: 249,
    g: 226,
    b: 175,
};
pub(crate) const TEXT_DIM: Color = Color::Rgb {
    r: 127,
    g: 132,
    b: 156,
};

/// ANSI styling for console output. A disabled theme returns text unchanged.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Theme {
    enabled: bool,
}

impl Theme {
    pub(crate) fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub(crate) fn plain() -> Self {
        Self { enabled: false }
    }

    pub(crate) fn paint(&self, text: &str, color: Color) -> String {
        if self.enabled {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub(crate) fn heading(&self, text: &str) -> String {
        if self.enabled {
            text.with(ACCENT).bold().to_string()
        } else {
            text.to_string()
        }
    }

    pub(crate) fn success(&self, text: &str) -> String {
        self.paint(text, GREEN)
    }

    pub(crate) fn error(&self, text: &str) -> String {
        self.paint(text, RED)
    }

    pub(crate) fn warning(&self, text: &str) -> String {
        self.paint(text, YELLOW)
    }

    pub(crate) fn dim(&self, text: &str) -> String {
        self.paint(text, TEXT_DIM)
    }

    /// Color for a signed figure: green when non-negative, red otherwise.
    pub(crate) fn amount_color(value: Decimal) -> Color {
        if value < Decimal::ZERO {
            RED
        } else {
            GREEN
        }
    }
}
