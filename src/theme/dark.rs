//! Dark Theme
//!
//! Deep slate chrome around the card, with pronounced shadows for depth.

use eframe::egui::Visuals;

use super::{build_visuals, ShadowDepth, ThemeColors};

/// Create egui Visuals configured for the dark theme.
pub fn create_dark_visuals() -> Visuals {
    build_visuals(
        &ThemeColors::dark(),
        Visuals::dark(),
        ShadowDepth {
            offset: 4.0,
            blur: 16.0,
            alpha: 80,
        },
    )
}
