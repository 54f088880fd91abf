use std::fs;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub muted: String,
    pub unit_border: String,
    pub unit_focused: String,
    pub unit_dragging: String,
    pub drop_slot: String,
    pub accent: String,
    pub header_bg: String,
    pub header_fg: String,
    pub error: String,
    pub success: String,
}

impl Theme {
    /// Reads `<config_dir>/reordr/theme.toml`, falling back to the built-in
    /// palette when it is missing or invalid.
    pub fn load_user() -> Self {
        dirs::config_dir()
            .map(|dir| dir.join("reordr").join("theme.toml"))
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|content| toml::from_str::<Theme>(&content).ok())
            .unwrap_or_default()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        }
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1e1e2e".to_string(),
            fg: "#cdd6f4".to_string(),
            muted: "#585b70".to_string(),
            unit_border: "#45475a".to_string(),
            unit_focused: "#89b4fa".to_string(),
            unit_dragging: "#f9e2af".to_string(),
            drop_slot: "#94e2d5".to_string(),
            accent: "#89b4fa".to_string(),
            header_bg: "#313244".to_string(),
            header_fg: "#cdd6f4".to_string(),
            error: "#f38ba8".to_string(),
            success: "#a6e3a1".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn muted(&self) -> Color { Self::parse_color(&self.muted) }
    pub fn unit_border(&self) -> Color { Self::parse_color(&self.unit_border) }
    pub fn unit_focused(&self) -> Color { Self::parse_color(&self.unit_focused) }
    pub fn unit_dragging(&self) -> Color { Self::parse_color(&self.unit_dragging) }
    pub fn drop_slot(&self) -> Color { Self::parse_color(&self.drop_slot) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_and_fallback() {
        assert_eq!(ThemeColors::parse_color("#102030"), Color::Rgb(16, 32, 48));
        assert_eq!(ThemeColors::parse_color("nope"), Color::White);
    }

    #[test]
    fn partial_theme_file_keeps_defaults() {
        let theme: Theme = toml::from_str("name = \"mine\"\n[colors]\naccent = \"#ff0000\"\n").unwrap();
        assert_eq!(theme.colors.accent(), Color::Rgb(255, 0, 0));
        assert_eq!(theme.colors.bg, ThemeColors::default().bg);
    }
}
