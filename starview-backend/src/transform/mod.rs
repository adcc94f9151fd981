//! Raw catalog record -> renderable star
//!
//! The transform is pure and total: records that cannot be placed in space
//! are excluded with an [`ExclusionNotice`], missing physical quantities are
//! defaulted from the [`DisplayPolicy`].

pub mod color;
pub mod coords;

use serde::{Deserialize, Serialize};
use starview_common::{DisplayStar, RawStarRecord, SourceId};

use crate::catalog::photometry;
pub use color::{classify_temperature, temperature_to_color, ColorBand, COLOR_TABLE};
pub use coords::{parallax_to_distance, spherical_to_cartesian};

/// Defaults and render-size bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayPolicy {
    /// Used when a record has no (finite) temperature; Sun-like
    #[serde(default = "default_temperature_k")]
    pub default_temperature_k: f64,

    /// Used when a record has no usable radius
    #[serde(default = "default_radius_solar")]
    pub default_radius_solar: f64,

    /// Display units per solar radius
    #[serde(default = "default_radius_scale")]
    pub radius_scale: f64,

    #[serde(default = "default_min_radius")]
    pub min_radius: f64,

    #[serde(default = "default_max_radius")]
    pub max_radius: f64,
}

fn default_temperature_k() -> f64 {
    5800.0
}

fn default_radius_solar() -> f64 {
    1.0
}

fn default_radius_scale() -> f64 {
    0.3
}

fn default_min_radius() -> f64 {
    0.1
}

fn default_max_radius() -> f64 {
    2.0
}

impl Default for DisplayPolicy {
    fn default() -> Self {
        Self {
            default_temperature_k: default_temperature_k(),
            default_radius_solar: default_radius_solar(),
            radius_scale: default_radius_scale(),
            min_radius: default_min_radius(),
            max_radius: default_max_radius(),
        }
    }
}

impl DisplayPolicy {
    /// Reject policies that would let a star vanish or overflow the clamp.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.min_radius.is_finite() && self.min_radius > 0.0) {
            anyhow::bail!("display.min_radius must be finite and positive, got {}", self.min_radius);
        }
        if !(self.max_radius.is_finite() && self.max_radius >= self.min_radius) {
            anyhow::bail!(
                "display.max_radius ({}) must be finite and >= min_radius ({})",
                self.max_radius,
                self.min_radius
            );
        }
        if !(self.radius_scale.is_finite() && self.radius_scale > 0.0) {
            anyhow::bail!("display.radius_scale must be finite and positive, got {}", self.radius_scale);
        }
        if !(self.default_radius_solar.is_finite() && self.default_radius_solar >= 0.0) {
            anyhow::bail!(
                "display.default_radius_solar must be finite and non-negative, got {}",
                self.default_radius_solar
            );
        }
        if !self.default_temperature_k.is_finite() {
            anyhow::bail!("display.default_temperature_k must be finite");
        }
        Ok(())
    }

    /// Temperature to render with, substituting the default for missing or non-finite values.
    pub fn effective_temperature(&self, temperature_k: Option<f64>) -> f64 {
        temperature_k
            .filter(|t| t.is_finite())
            .unwrap_or(self.default_temperature_k)
    }

    /// Radius in solar radii to render with; negative or non-finite values count as missing.
    pub fn effective_radius_solar(&self, radius_solar: Option<f64>) -> f64 {
        radius_solar
            .filter(|r| r.is_finite() && *r >= 0.0)
            .unwrap_or(self.default_radius_solar)
    }

    /// `radius_solar * radius_scale` bounded to `[min_radius, max_radius]`.
    pub fn render_radius(&self, radius_solar: f64) -> f64 {
        let scaled = radius_solar * self.radius_scale;
        if scaled.is_nan() {
            return self.min_radius;
        }
        scaled.max(self.min_radius).min(self.max_radius)
    }
}

/// Why a record was left out of the display set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    MissingParallax,
    NonPositiveParallax,
    NonFiniteParallax,
}

impl ExclusionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExclusionReason::MissingParallax => "missing parallax",
            ExclusionReason::NonPositiveParallax => "non-positive parallax",
            ExclusionReason::NonFiniteParallax => "non-finite parallax",
        }
    }
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Informational record of one excluded star; not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionNotice {
    pub source_id: SourceId,
    pub reason: ExclusionReason,
}

/// Result of one transform pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transformed {
    /// Same order as the input, minus excluded records
    pub stars: Vec<DisplayStar>,
    pub exclusions: Vec<ExclusionNotice>,
}

pub fn star_label(source_id: SourceId) -> String {
    format!("Gaia DR3 {}", source_id)
}

/// Map one record, or say why it cannot be shown.
pub fn transform_record(
    record: &RawStarRecord,
    policy: &DisplayPolicy,
) -> Result<DisplayStar, ExclusionNotice> {
    let exclude = |reason| ExclusionNotice {
        source_id: record.source_id,
        reason,
    };

    let parallax = record
        .parallax_mas
        .ok_or_else(|| exclude(ExclusionReason::MissingParallax))?;
    if !parallax.is_finite() {
        return Err(exclude(ExclusionReason::NonFiniteParallax));
    }
    let distance = parallax_to_distance(parallax)
        .ok_or_else(|| exclude(ExclusionReason::NonPositiveParallax))?;

    let position = spherical_to_cartesian(record.right_ascension, record.declination, distance);

    let temperature = policy.effective_temperature(record.effective_temperature);
    let band = classify_temperature(temperature);

    let radius_solar = policy.effective_radius_solar(record.stellar_radius);

    Ok(DisplayStar {
        source_id: record.source_id,
        label: star_label(record.source_id),
        position,
        color: band.color.to_string(),
        spectral_class: band.class,
        render_radius: policy.render_radius(radius_solar),
        distance_parsecs: distance,
        temperature_kelvin: temperature,
        radius_solar,
        right_ascension: record.right_ascension,
        declination: record.declination,
        apparent_magnitude: record.apparent_magnitude,
        absolute_magnitude: record
            .apparent_magnitude
            .and_then(|mag| photometry::absolute_magnitude(mag, distance)),
    })
}

/// Map every record, keeping input order and collecting exclusions.
pub fn transform(records: &[RawStarRecord], policy: &DisplayPolicy) -> Transformed {
    let mut out = Transformed {
        stars: Vec::with_capacity(records.len()),
        exclusions: Vec::new(),
    };

    for record in records {
        match transform_record(record, policy) {
            Ok(star) => out.stars.push(star),
            Err(notice) => {
                tracing::debug!("Excluding star {}: {}", notice.source_id, notice.reason);
                out.exclusions.push(notice);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use starview_common::SpectralClass;

    fn record(source_id: SourceId, parallax: Option<f64>, ra: f64, dec: f64) -> RawStarRecord {
        RawStarRecord {
            source_id,
            right_ascension: ra,
            declination: dec,
            parallax_mas: parallax,
            apparent_magnitude: None,
            effective_temperature: None,
            stellar_radius: None,
        }
    }

    #[test]
    fn test_sun_like_star_at_ten_parsecs() {
        let raw = RawStarRecord {
            effective_temperature: Some(5800.0),
            stellar_radius: Some(1.0),
            ..record(1, Some(100.0), 0.0, 0.0)
        };
        let star = transform_record(&raw, &DisplayPolicy::default()).unwrap();

        assert!((star.distance_parsecs - 10.0).abs() < 1e-12);
        assert!((star.position.x - 10.0).abs() < 1e-9);
        assert!(star.position.y.abs() < 1e-9);
        assert!(star.position.z.abs() < 1e-9);
        assert_eq!(star.color, "#fff4ea");
        assert_eq!(star.spectral_class, SpectralClass::G);
        assert!((star.render_radius - 0.3).abs() < 1e-12);
        assert_eq!(star.label, "Gaia DR3 1");
    }

    #[test]
    fn test_zero_parallax_excluded() {
        let out = transform(&[record(9, Some(0.0), 45.0, 30.0)], &DisplayPolicy::default());
        assert!(out.stars.is_empty());
        assert_eq!(
            out.exclusions,
            vec![ExclusionNotice {
                source_id: 9,
                reason: ExclusionReason::NonPositiveParallax
            }]
        );
    }

    #[test]
    fn test_exclusion_reasons() {
        let records = vec![
            record(1, None, 0.0, 0.0),
            record(2, Some(-3.0), 0.0, 0.0),
            record(3, Some(f64::NAN), 0.0, 0.0),
            record(4, Some(f64::INFINITY), 0.0, 0.0),
        ];
        let out = transform(&records, &DisplayPolicy::default());
        let reasons: Vec<_> = out.exclusions.iter().map(|n| n.reason).collect();
        assert_eq!(
            reasons,
            vec![
                ExclusionReason::MissingParallax,
                ExclusionReason::NonPositiveParallax,
                ExclusionReason::NonFiniteParallax,
                ExclusionReason::NonFiniteParallax,
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let out = transform(&[], &DisplayPolicy::default());
        assert!(out.stars.is_empty());
        assert!(out.exclusions.is_empty());
    }

    #[test]
    fn test_order_and_count_preserved() {
        let records = vec![
            record(10, Some(50.0), 10.0, 10.0),
            record(11, None, 0.0, 0.0),
            record(12, Some(200.0), 20.0, -5.0),
            record(13, Some(-1.0), 0.0, 0.0),
            record(14, Some(25.0), 300.0, 60.0),
        ];
        let out = transform(&records, &DisplayPolicy::default());

        assert_eq!(out.stars.len(), records.len() - out.exclusions.len());
        let ids: Vec<_> = out.stars.iter().map(|s| s.source_id).collect();
        assert_eq!(ids, vec![10, 12, 14]);
        assert!(out.stars.iter().all(|s| s.distance_parsecs > 0.0));
    }

    #[test]
    fn test_distance_is_exact_inverse() {
        for p in [1.0, 3.7, 42.0, 768.07] {
            let star = transform_record(&record(1, Some(p), 12.0, 34.0), &DisplayPolicy::default()).unwrap();
            let expected = 1000.0 / p;
            assert!(((star.distance_parsecs - expected) / expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_defaults_applied() {
        let star = transform_record(&record(1, Some(100.0), 0.0, 0.0), &DisplayPolicy::default()).unwrap();
        assert_eq!(star.temperature_kelvin, 5800.0);
        assert_eq!(star.radius_solar, 1.0);
        assert_eq!(star.color, "#fff4ea");
        assert!(star.absolute_magnitude.is_none());

        let odd = RawStarRecord {
            effective_temperature: Some(f64::NAN),
            stellar_radius: Some(-4.0),
            ..record(2, Some(100.0), 0.0, 0.0)
        };
        let star = transform_record(&odd, &DisplayPolicy::default()).unwrap();
        assert_eq!(star.temperature_kelvin, 5800.0);
        assert_eq!(star.radius_solar, 1.0);
    }

    #[test]
    fn test_render_radius_bounds() {
        let policy = DisplayPolicy::default();
        for r in [0.0, 0.01, 0.5, 1.0, 5.0, 1000.0, f64::INFINITY] {
            let rr = policy.render_radius(r);
            assert!((0.1..=2.0).contains(&rr), "radius {} -> {}", r, rr);
        }
        assert_eq!(policy.render_radius(0.0), 0.1);
        assert_eq!(policy.render_radius(1000.0), 2.0);
        assert_eq!(policy.render_radius(f64::NAN), 0.1);
    }

    #[test]
    fn test_huge_star_clamped_in_transform() {
        let raw = RawStarRecord {
            stellar_radius: Some(1000.0),
            ..record(1, Some(100.0), 0.0, 0.0)
        };
        let star = transform_record(&raw, &DisplayPolicy::default()).unwrap();
        assert_eq!(star.render_radius, 2.0);
        assert_eq!(star.radius_solar, 1000.0);
    }

    #[test]
    fn test_absolute_magnitude_derived() {
        let raw = RawStarRecord {
            apparent_magnitude: Some(4.83),
            ..record(1, Some(100.0), 0.0, 0.0)
        };
        let star = transform_record(&raw, &DisplayPolicy::default()).unwrap();
        assert!((star.absolute_magnitude.unwrap() - 4.83).abs() < 1e-9);
    }

    #[test]
    fn test_policy_validation() {
        assert!(DisplayPolicy::default().validate().is_ok());

        let bad = DisplayPolicy { min_radius: 0.0, ..DisplayPolicy::default() };
        assert!(bad.validate().is_err());

        let bad = DisplayPolicy { max_radius: 0.05, ..DisplayPolicy::default() };
        assert!(bad.validate().is_err());

        let bad = DisplayPolicy { radius_scale: f64::NAN, ..DisplayPolicy::default() };
        assert!(bad.validate().is_err());

        let bad = DisplayPolicy { default_radius_solar: -1.0, ..DisplayPolicy::default() };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_custom_policy() {
        let policy = DisplayPolicy {
            default_temperature_k: 3000.0,
            radius_scale: 1.0,
            min_radius: 0.5,
            max_radius: 0.8,
            ..DisplayPolicy::default()
        };
        let star = transform_record(&record(1, Some(10.0), 0.0, 0.0), &policy).unwrap();
        assert_eq!(star.color, "#ffcc6f");
        assert_eq!(star.render_radius, 0.8);
    }
}
