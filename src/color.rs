use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use noshow_dash::Outcome;

// ---------------------------------------------------------------------------
// Outcome colours
// ---------------------------------------------------------------------------

pub const NO_SHOW_COLOR: Color32 = Color32::from_rgb(0xEF, 0x55, 0x3B);
pub const SHOW_COLOR: Color32 = Color32::from_rgb(0x00, 0xCC, 0x96);

pub fn outcome_color(outcome: Outcome) -> Color32 {
    match outcome {
        Outcome::Yes => NO_SHOW_COLOR,
        Outcome::No => SHOW_COLOR,
    }
}

// ---------------------------------------------------------------------------
// Continuous scale: no-show rate → Color32
// ---------------------------------------------------------------------------

/// Purple → teal → yellow, in the spirit of viridis. `rate` is a fraction
/// and is clamped to `[0, 1]`.
pub fn rate_color(rate: f64) -> Color32 {
    let t = if rate.is_finite() { rate.clamp(0.0, 1.0) as f32 } else { 0.0 };
    let hue = 280.0 - t * 220.0;
    let lightness = 0.30 + t * 0.30;
    let hsl = Hsl::new(hue, 0.70, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}
