//! Theme colors for the composer
//! Reads optional overrides from ~/.config/soru/theme.conf (kitty.conf syntax)

use ratatui::style::Color;
use std::collections::HashMap;
use std::fs;

use crate::config::AppConfig;

/// Theme colors for the UI
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub accent: Color,       // Focused borders, enabled submit control
    pub danger: Color,       // Failed analyses
    pub success: Color,      // Finished analyses
    pub warning: Color,      // Status messages, in-progress label
    pub text: Color,         // Primary text
    pub text_dim: Color,     // Hints, placeholder
    pub disabled: Color,     // Controls that cannot be used right now
    pub bg_selected: Color,  // Highlighted preset
    pub inactive: Color,     // Unfocused borders
    pub header: Color,       // Section headings
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(250, 179, 135),
            danger: Color::Rgb(243, 139, 168),
            success: Color::Rgb(166, 218, 149),
            warning: Color::Rgb(249, 226, 175),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            disabled: Color::Rgb(88, 91, 112),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(108, 112, 134),
            header: Color::Rgb(137, 180, 250),
        }
    }
}

impl Theme {
    /// Load the user's theme file, falling back to defaults
    pub fn load() -> Self {
        let path = match AppConfig::config_dir() {
            Ok(dir) => dir.join("theme.conf"),
            Err(_) => return Self::default(),
        };

        match fs::read_to_string(&path) {
            Ok(content) => Self::from_conf(&content),
            Err(_) => Self::default(),
        }
    }

    /// Apply `key #hexcolor` lines on top of the defaults
    pub fn from_conf(content: &str) -> Self {
        let colors = Self::parse_conf(content);
        let mut theme = Self::default();

        for (key, color) in colors {
            match key.as_str() {
                "accent" => theme.accent = color,
                "danger" => theme.danger = color,
                "success" => theme.success = color,
                "warning" => theme.warning = color,
                "text" | "foreground" => theme.text = color,
                "text_dim" => theme.text_dim = color,
                "disabled" => theme.disabled = color,
                "bg_selected" | "selection_background" => theme.bg_selected = color,
                "inactive" => theme.inactive = color,
                "header" => theme.header = color,
                other => tracing::debug!("Ignoring unknown theme key: {}", other),
            }
        }

        theme
    }

    fn parse_conf(content: &str) -> HashMap<String, Color> {
        let mut colors = HashMap::new();

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once(char::is_whitespace) {
                if let Some(color) = Self::parse_hex_color(value) {
                    colors.insert(key.trim().to_string(), color);
                }
            }
        }

        colors
    }

    /// Parse a hex color string (#RRGGBB or #RGB)
    fn parse_hex_color(s: &str) -> Option<Color> {
        let s = s.trim().trim_start_matches('#');

        if !s.is_ascii() {
            return None;
        }

        if s.len() == 6 {
            let r = u8::from_str_radix(&s[0..2], 16).ok()?;
            let g = u8::from_str_radix(&s[2..4], 16).ok()?;
            let b = u8::from_str_radix(&s[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        } else if s.len() == 3 {
            let r = u8::from_str_radix(&s[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&s[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&s[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        } else {
            None
        }
    }
}
