//! Color palette and style helpers for the kiosk console.

use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(0, 0, 0);
pub const C_GREEN: Color = Color::Rgb(0, 255, 0);
pub const C_WHITE: Color = Color::Rgb(255, 255, 255);
pub const C_DIM_WHITE: Color = Color::Rgb(120, 120, 120);
pub const C_ACCENT: Color = Color::Rgb(0, 160, 255); // title, ticker, SCANNING...
pub const C_QUOTE: Color = Color::Rgb(0, 120, 255);
pub const C_LOADER_RESPONSE: Color = Color::Rgb(80, 150, 255);

/// RGB triple used by the interpolation helpers.
pub type Rgb = (u8, u8, u8);

pub const RGB_GREEN: Rgb = (0, 255, 0);
pub const RGB_WARNING: Rgb = (220, 220, 0);
pub const RGB_DANGER: Rgb = (255, 0, 0);
pub const RGB_ACCENT: Rgb = (0, 160, 255);
pub const RGB_FLASH: Rgb = (255, 255, 255);
pub const RGB_RAIN_HEAD: Rgb = (200, 200, 200);

pub fn rgb(c: Rgb) -> Color {
    Color::Rgb(c.0, c.1, c.2)
}

fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round().clamp(0.0, 255.0) as u8
}

/// Linear interpolation between two colors, `t` clamped to `[0, 1]`.
pub fn lerp_color(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    (lerp_u8(a.0, b.0, t), lerp_u8(a.1, b.1, t), lerp_u8(a.2, b.2, t))
}

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_accent() -> Style {
    Style::default().fg(C_ACCENT)
}

pub fn style_version() -> Style {
    Style::default().fg(C_DIM_WHITE)
}

pub fn style_separator() -> Style {
    Style::default().fg(C_DIM_WHITE)
}

pub fn style_title() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub fn style_cursor_block() -> Style {
    Style::default().fg(C_WHITE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp_color(RGB_GREEN, RGB_DANGER, 0.0), RGB_GREEN);
        assert_eq!(lerp_color(RGB_GREEN, RGB_DANGER, 1.0), RGB_DANGER);
    }

    #[test]
    fn test_lerp_clamps() {
        assert_eq!(lerp_color(RGB_GREEN, RGB_DANGER, -3.0), RGB_GREEN);
        assert_eq!(lerp_color(RGB_GREEN, RGB_DANGER, 7.5), RGB_DANGER);
        assert_eq!(lerp_color(RGB_GREEN, RGB_DANGER, f64::NAN), RGB_GREEN);
    }

    #[test]
    fn test_lerp_midpoint() {
        assert_eq!(lerp_color((0, 0, 0), (200, 100, 50), 0.5), (100, 50, 25));
    }
}
