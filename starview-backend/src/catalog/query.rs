//! ADQL for the nearby-star query

use starview_common::FetchParams;

pub const GAIA_SOURCE_TABLE: &str = "gaiadr3.gaia_source";

/// Build the nearby-star query.
///
/// Stars are restricted to `parallax > 1000 / max_distance` with a relative
/// parallax error below `max_relative_parallax_error`, and must have both
/// G magnitude and BP-RP color. Ordering by descending parallax returns the
/// closest stars first.
pub fn build_nearby_stars_query(params: &FetchParams, max_relative_parallax_error: f64) -> String {
    format!(
        "SELECT TOP {count} \
source_id, ra, dec, parallax, parallax_error, phot_g_mean_mag, bp_rp \
FROM {table} \
WHERE parallax > {min_parallax} \
AND parallax_error / parallax < {max_error} \
AND phot_g_mean_mag IS NOT NULL \
AND bp_rp IS NOT NULL \
ORDER BY parallax DESC",
        count = params.star_count(),
        table = GAIA_SOURCE_TABLE,
        min_parallax = params.min_parallax_mas(),
        max_error = max_relative_parallax_error,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_embeds_bounds() {
        let params = FetchParams::new(500, 50.0);
        let query = build_nearby_stars_query(&params, 0.2);

        assert!(query.starts_with("SELECT TOP 500 "));
        assert!(query.contains("FROM gaiadr3.gaia_source"));
        assert!(query.contains("WHERE parallax > 20 "));
        assert!(query.contains("parallax_error / parallax < 0.2"));
        assert!(query.ends_with("ORDER BY parallax DESC"));
    }

    #[test]
    fn test_query_uses_clamped_values() {
        let params = FetchParams::new(1, 1000.0);
        let query = build_nearby_stars_query(&params, 0.1);

        assert!(query.starts_with("SELECT TOP 50 "));
        assert!(query.contains("parallax > 10 "));
    }

    #[test]
    fn test_query_selects_required_columns() {
        let query = build_nearby_stars_query(&FetchParams::default(), 0.2);
        for column in ["source_id", "ra", "dec", "parallax", "phot_g_mean_mag", "bp_rp"] {
            assert!(query.contains(column), "missing column {}", column);
        }
    }
}
