//! Theme Manager for Persona Card
//!
//! Holds the active theme, applies it to the egui context and tracks the
//! system preference when `Theme::System` is selected.

use eframe::egui::{Context, Visuals};
use log::{debug, info};

use super::{dark, light, ThemeColors};
use crate::config::Theme;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Manager
// ─────────────────────────────────────────────────────────────────────────────

/// Manages theme state and applies themes to the egui context.
#[derive(Debug, Clone)]
pub struct ThemeManager {
    /// Current theme setting (Light, Dark, or System)
    current_theme: Theme,
    /// Cached visuals for the current theme
    cached_visuals: Option<Visuals>,
    needs_apply: bool,
    /// Last detected system dark mode state (for System theme)
    last_system_dark_mode: Option<bool>,
}

impl ThemeManager {
    pub fn new(theme: Theme) -> Self {
        info!("ThemeManager initialized with theme: {:?}", theme);
        Self {
            current_theme: theme,
            cached_visuals: None,
            needs_apply: true,
            last_system_dark_mode: None,
        }
    }

    pub fn current_theme(&self) -> Theme {
        self.current_theme
    }

    /// Set the theme and mark for reapplication.
    ///
    /// Takes effect on the next `apply_if_needed()`.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.current_theme != theme {
            info!("Theme changed from {:?} to {:?}", self.current_theme, theme);
            self.current_theme = theme;
            self.cached_visuals = None;
            self.needs_apply = true;
        }
    }

    /// Advance Light → Dark → System → Light. Returns the new theme.
    pub fn cycle(&mut self) -> Theme {
        let new_theme = self.current_theme.cycle();
        self.set_theme(new_theme);
        new_theme
    }

    pub fn needs_apply(&self) -> bool {
        self.needs_apply
    }

    /// Apply the current theme to the egui context.
    pub fn apply(&mut self, ctx: &Context) {
        let visuals = self.get_or_create_visuals(ctx);
        ctx.set_visuals(visuals);
        self.needs_apply = false;
        debug!("Applied theme: {:?}", self.current_theme);
    }

    /// Apply the theme only if it changed, or if the system preference
    /// changed while following the system. Returns `true` if applied.
    pub fn apply_if_needed(&mut self, ctx: &Context) -> bool {
        if self.current_theme == Theme::System {
            let current_system_dark = ctx.style().visuals.dark_mode;
            if self.last_system_dark_mode != Some(current_system_dark) {
                self.last_system_dark_mode = Some(current_system_dark);
                self.cached_visuals = None;
                self.needs_apply = true;
                debug!("System dark mode changed to: {}", current_system_dark);
            }
        }

        if self.needs_apply {
            self.apply(ctx);
            true
        } else {
            false
        }
    }

    fn get_or_create_visuals(&mut self, ctx: &Context) -> Visuals {
        if let Some(ref visuals) = self.cached_visuals {
            return visuals.clone();
        }

        let visuals = match self.current_theme {
            Theme::Light => light::create_light_visuals(),
            Theme::Dark => dark::create_dark_visuals(),
            Theme::System => {
                let system_dark = ctx.style().visuals.dark_mode;
                self.last_system_dark_mode = Some(system_dark);
                if system_dark {
                    dark::create_dark_visuals()
                } else {
                    light::create_light_visuals()
                }
            }
        };

        self.cached_visuals = Some(visuals.clone());
        visuals
    }

    /// Colors of the effective theme (System resolved to light or dark).
    pub fn colors(&self, ctx: &Context) -> ThemeColors {
        ThemeColors::from_theme(self.current_theme, &ctx.style().visuals)
    }

    pub fn icon(&self) -> &'static str {
        match self.current_theme {
            Theme::Light => "☀",
            Theme::Dark => "🌙",
            Theme::System => "💻",
        }
    }

    pub fn tooltip(&self, ctx: &Context) -> String {
        let label = self.current_theme.label();
        match self.current_theme {
            Theme::Light | Theme::Dark => format!("{} theme (click to cycle)", label),
            Theme::System => {
                let effective = if ctx.style().visuals.dark_mode {
                    "dark"
                } else {
                    "light"
                };
                format!("{} theme, currently {} (click to cycle)", label, effective)
            }
        }
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
