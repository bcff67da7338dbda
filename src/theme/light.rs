//! Light Theme
//!
//! Soft grey chrome so the dark card surface stands out.

use eframe::egui::Visuals;

use super::{build_visuals, ShadowDepth, ThemeColors};

/// Create egui Visuals configured for the light theme.
pub fn create_light_visuals() -> Visuals {
    build_visuals(
        &ThemeColors::light(),
        Visuals::light(),
        ShadowDepth {
            offset: 2.0,
            blur: 8.0,
            alpha: 25,
        },
    )
}
