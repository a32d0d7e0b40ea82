use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;

/// Colours used to draw the ring, resolved from the widget's style context.
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    pub active: Srgba<f64>,
    pub idle: Srgba<f64>,
    pub track: Srgba<f64>,
    pub center_circle: Srgba<f64>,
    pub text: Srgba<f64>,
}

struct ColorRole {
    css_name: &'static str,
    fallback: (f64, f64, f64, f64),
    /// Replaces the theme colour's alpha when set.
    alpha: Option<f64>,
}

impl ColorRole {
    const fn new(css_name: &'static str, fallback: (f64, f64, f64, f64), alpha: Option<f64>) -> Self {
        Self {
            css_name,
            fallback,
            alpha,
        }
    }

    fn resolve(&self, context: &gtk::StyleContext) -> Srgba<f64> {
        let Some(c) = context.lookup_color(self.css_name) else {
            let (r, g, b, a) = self.fallback;
            return Srgba::new(r, g, b, a);
        };
        Srgba::new(
            c.red() as f64,
            c.green() as f64,
            c.blue() as f64,
            self.alpha.unwrap_or(c.alpha() as f64),
        )
    }
}

const ACTIVE: ColorRole = ColorRole::new("accent_bg_color", (0.21, 0.52, 0.89, 1.0), None);
const IDLE: ColorRole = ColorRole::new("theme_bg_color", (0.18, 0.18, 0.2, 0.85), Some(0.85));
const TRACK: ColorRole = ColorRole::new("borders", (0.5, 0.5, 0.5, 0.35), Some(0.35));
const CENTER: ColorRole = ColorRole::new("theme_base_color", (0.12, 0.12, 0.14, 1.0), None);
const TEXT: ColorRole = ColorRole::new("theme_fg_color", (0.92, 0.92, 0.92, 1.0), None);

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            active: ACTIVE.resolve(context),
            idle: IDLE.resolve(context),
            track: TRACK.resolve(context),
            center_circle: CENTER.resolve(context),
            text: TEXT.resolve(context),
        }
    }
}
