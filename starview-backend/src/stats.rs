//! Summary statistics over a transformed star field

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use starview_common::{DisplayStar, SourceId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub total_stars: usize,
    pub min_distance_pc: f64,
    pub max_distance_pc: f64,
    pub mean_distance_pc: f64,
    pub min_temperature_k: f64,
    pub max_temperature_k: f64,
    pub hottest_star: SourceId,
    pub min_radius_solar: f64,
    pub max_radius_solar: f64,
    pub largest_star: SourceId,
    /// Star count keyed by spectral class letter
    pub class_counts: BTreeMap<String, usize>,
}

impl FieldStats {
    /// `None` for an empty field.
    pub fn from_stars(stars: &[DisplayStar]) -> Option<Self> {
        let first = stars.first()?;

        let mut stats = FieldStats {
            total_stars: stars.len(),
            min_distance_pc: first.distance_parsecs,
            max_distance_pc: first.distance_parsecs,
            mean_distance_pc: 0.0,
            min_temperature_k: first.temperature_kelvin,
            max_temperature_k: first.temperature_kelvin,
            hottest_star: first.source_id,
            min_radius_solar: first.radius_solar,
            max_radius_solar: first.radius_solar,
            largest_star: first.source_id,
            class_counts: BTreeMap::new(),
        };

        let mut distance_sum = 0.0;
        for star in stars {
            distance_sum += star.distance_parsecs;
            stats.min_distance_pc = stats.min_distance_pc.min(star.distance_parsecs);
            stats.max_distance_pc = stats.max_distance_pc.max(star.distance_parsecs);

            stats.min_temperature_k = stats.min_temperature_k.min(star.temperature_kelvin);
            if star.temperature_kelvin > stats.max_temperature_k {
                stats.max_temperature_k = star.temperature_kelvin;
                stats.hottest_star = star.source_id;
            }

            stats.min_radius_solar = stats.min_radius_solar.min(star.radius_solar);
            if star.radius_solar > stats.max_radius_solar {
                stats.max_radius_solar = star.radius_solar;
                stats.largest_star = star.source_id;
            }

            *stats
                .class_counts
                .entry(star.spectral_class.to_string())
                .or_insert(0) += 1;
        }
        stats.mean_distance_pc = distance_sum / stars.len() as f64;

        Some(stats)
    }
}

impl std::fmt::Display for FieldStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Total stars: {}", self.total_stars)?;
        writeln!(
            f,
            "Distance range: {:.2} - {:.2} pc (mean {:.1} pc)",
            self.min_distance_pc, self.max_distance_pc, self.mean_distance_pc
        )?;
        writeln!(
            f,
            "Temperature range: {:.0} - {:.0} K (hottest: Gaia DR3 {})",
            self.min_temperature_k, self.max_temperature_k, self.hottest_star
        )?;
        writeln!(
            f,
            "Radius range: {:.2} - {:.2} solar radii (largest: Gaia DR3 {})",
            self.min_radius_solar, self.max_radius_solar, self.largest_star
        )?;
        let classes: Vec<String> = self
            .class_counts
            .iter()
            .map(|(class, count)| format!("{}={}", class, count))
            .collect();
        write!(f, "Spectral classes: {}", classes.join(" "))
    }
}
