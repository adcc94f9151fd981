//! Rough stellar parameters from Gaia photometry
//!
//! Gaia's nearby-star query returns G magnitude and BP-RP color but no
//! temperature or radius, so both are estimated here. Every function returns
//! `None` instead of a non-finite value.

/// Absolute G magnitude of the Sun
pub const SUN_ABS_MAG: f64 = 4.83;
/// Solar effective temperature (K)
pub const SUN_TEMPERATURE_K: f64 = 5778.0;

/// Effective temperature (K) from BP-RP color (Ballesteros 2012 form).
pub fn temperature_from_bp_rp(bp_rp: f64) -> Option<f64> {
    let hot = 0.92 * bp_rp + 1.7;
    let cool = 0.92 * bp_rp + 0.62;
    if !(hot > 0.0 && cool > 0.0) {
        return None;
    }
    finite(4600.0 * (1.0 / hot + 1.0 / cool))
}

/// Absolute magnitude from apparent magnitude and distance in parsecs.
pub fn absolute_magnitude(apparent_mag: f64, distance_pc: f64) -> Option<f64> {
    if !(distance_pc > 0.0) {
        return None;
    }
    finite(apparent_mag - 5.0 * distance_pc.log10() + 5.0)
}

/// Luminosity relative to the Sun from absolute magnitude.
pub fn luminosity_ratio(abs_mag: f64) -> Option<f64> {
    finite(10f64.powf(-0.4 * (abs_mag - SUN_ABS_MAG)))
}

/// Radius in solar radii via Stefan-Boltzmann: L ∝ R² T⁴.
pub fn radius_from_luminosity(luminosity_ratio: f64, temperature_k: f64) -> Option<f64> {
    if !(luminosity_ratio >= 0.0 && temperature_k > 0.0) {
        return None;
    }
    finite(luminosity_ratio.sqrt() * (SUN_TEMPERATURE_K / temperature_k).powi(2))
}

/// Radius estimate straight from apparent magnitude, distance and temperature.
pub fn estimate_radius(apparent_mag: f64, distance_pc: f64, temperature_k: f64) -> Option<f64> {
    let abs_mag = absolute_magnitude(apparent_mag, distance_pc)?;
    let luminosity = luminosity_ratio(abs_mag)?;
    radius_from_luminosity(luminosity, temperature_k)
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
