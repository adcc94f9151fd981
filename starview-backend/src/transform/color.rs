//! Temperature to color lookup

use starview_common::SpectralClass;

/// One row of the lookup: stars hotter than `threshold_k` get `class` and `color`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorBand {
    pub threshold_k: f64,
    pub class: SpectralClass,
    pub color: &'static str,
}

/// Ordered by descending threshold; the first band with `temp > threshold` wins.
pub const COLOR_TABLE: &[ColorBand] = &[
    ColorBand { threshold_k: 30000.0, class: SpectralClass::O, color: "#9bb0ff" },
    ColorBand { threshold_k: 10000.0, class: SpectralClass::B, color: "#aabfff" },
    ColorBand { threshold_k: 7500.0, class: SpectralClass::A, color: "#cad7ff" },
    ColorBand { threshold_k: 6000.0, class: SpectralClass::F, color: "#f8f7ff" },
    ColorBand { threshold_k: 5200.0, class: SpectralClass::G, color: "#fff4ea" },
    ColorBand { threshold_k: 3700.0, class: SpectralClass::K, color: "#ffd2a1" },
];

/// Coolest bucket, used when no band matches
pub const FALLBACK_BAND: ColorBand = ColorBand {
    threshold_k: f64::NEG_INFINITY,
    class: SpectralClass::M,
    color: "#ffcc6f",
};

/// Total over every f64; NaN lands in the coolest bucket.
pub fn classify_temperature(temperature_k: f64) -> ColorBand {
    COLOR_TABLE
        .iter()
        .copied()
        .find(|band| temperature_k > band.threshold_k)
        .unwrap_or(FALLBACK_BAND)
}

pub fn temperature_to_color(temperature_k: f64) -> &'static str {
    classify_temperature(temperature_k).color
}
