//! Multi-stop colour scales for the surface plot.

use egui::Color32;

#[derive(Debug, Clone, Copy)]
struct ColorStop {
    t: f64,
    rgb: [u8; 3],
}

const fn stop(t: f64, r: u8, g: u8, b: u8) -> ColorStop {
    ColorStop { t, rgb: [r, g, b] }
}

const VIRIDIS_STOPS: &[ColorStop] = &[
    stop(0.00, 68, 1, 84),
    stop(0.25, 59, 82, 139),
    stop(0.50, 33, 145, 140),
    stop(0.75, 94, 201, 98),
    stop(1.00, 253, 231, 37),
];

const MAGMA_STOPS: &[ColorStop] = &[
    stop(0.00, 0, 0, 4),
    stop(0.25, 81, 18, 124),
    stop(0.50, 183, 55, 121),
    stop(0.75, 252, 137, 97),
    stop(1.00, 252, 253, 191),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScale {
    #[default]
    Viridis,
    Magma,
    Grayscale,
}

impl ColorScale {
    pub const ALL: &[ColorScale] = &[Self::Viridis, Self::Magma, Self::Grayscale];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Viridis => "Viridis",
            Self::Magma => "Magma",
            Self::Grayscale => "Grayscale",
        }
    }

    /// Colour at normalized position `t`, clamped to [0, 1].
    pub fn evaluate(&self, t: f64) -> Color32 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let [r, g, b] = match self {
            Self::Viridis => multi_stop(VIRIDIS_STOPS, t),
            Self::Magma => multi_stop(MAGMA_STOPS, t),
            Self::Grayscale => {
                let v = (t * 255.0).round() as u8;
                [v, v, v]
            }
        };
        Color32::from_rgb(r, g, b)
    }
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
}

fn multi_stop(stops: &[ColorStop], t: f64) -> [u8; 3] {
    for pair in stops.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        if t <= hi.t {
            let ratio = (t - lo.t) / (hi.t - lo.t);
            return [
                lerp(lo.rgb[0], hi.rgb[0], ratio),
                lerp(lo.rgb[1], hi.rgb[1], ratio),
                lerp(lo.rgb[2], hi.rgb[2], ratio),
            ];
        }
    }
    stops[stops.len() - 1].rgb
}
