use starview_common::CartesianPosition;

/// Distance in parsecs for a parallax in milliarcseconds.
///
/// `None` unless the parallax is finite and positive.
pub fn parallax_to_distance(parallax_mas: f64) -> Option<f64> {
    if parallax_mas.is_finite() && parallax_mas > 0.0 {
        Some(1000.0 / parallax_mas)
    } else {
        None
    }
}

/// Equatorial (RA, Dec in degrees) plus distance to Cartesian coordinates.
pub fn spherical_to_cartesian(ra_deg: f64, dec_deg: f64, distance: f64) -> CartesianPosition {
    let (sin_ra, cos_ra) = ra_deg.to_radians().sin_cos();
    let (sin_dec, cos_dec) = dec_deg.to_radians().sin_cos();

    CartesianPosition {
        x: distance * cos_dec * cos_ra,
        y: distance * cos_dec * sin_ra,
        z: distance * sin_dec,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_parallax_inversion() {
        for p in [0.5, 1.0, 33.3, 100.0, 768.07] {
            let d = parallax_to_distance(p).unwrap();
            assert!(((d - 1000.0 / p) / d).abs() < 1e-9);
        }
        assert_eq!(parallax_to_distance(100.0), Some(10.0));
    }

    #[test]
    fn test_invalid_parallax() {
        assert_eq!(parallax_to_distance(0.0), None);
        assert_eq!(parallax_to_distance(-2.0), None);
        assert_eq!(parallax_to_distance(f64::NAN), None);
        assert_eq!(parallax_to_distance(f64::INFINITY), None);
    }

    #[test]
    fn test_cardinal_directions() {
        let p = spherical_to_cartesian(0.0, 0.0, 10.0);
        assert!(close(p.x, 10.0) && close(p.y, 0.0) && close(p.z, 0.0));

        let p = spherical_to_cartesian(90.0, 0.0, 10.0);
        assert!(close(p.x, 0.0) && close(p.y, 10.0) && close(p.z, 0.0));

        let p = spherical_to_cartesian(123.0, 90.0, 10.0);
        assert!(close(p.x, 0.0) && close(p.y, 0.0) && close(p.z, 10.0));

        let p = spherical_to_cartesian(0.0, -90.0, 4.0);
        assert!(close(p.z, -4.0));
    }

    #[test]
    fn test_norm_preserved() {
        let p = spherical_to_cartesian(217.39, -62.68, 1.302);
        assert!(close(p.norm(), 1.302));
    }
}
