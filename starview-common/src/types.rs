use serde::{Deserialize, Serialize};

/// Gaia DR3 `source_id`
pub type SourceId = i64;

/// Spectral class bucket derived from effective temperature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpectralClass {
    O,
    B,
    A,
    F,
    G,
    K,
    M,
}

impl SpectralClass {
    /// Hottest first
    pub const ALL: [SpectralClass; 7] = [
        SpectralClass::O,
        SpectralClass::B,
        SpectralClass::A,
        SpectralClass::F,
        SpectralClass::G,
        SpectralClass::K,
        SpectralClass::M,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SpectralClass::O => "O",
            SpectralClass::B => "B",
            SpectralClass::A => "A",
            SpectralClass::F => "F",
            SpectralClass::G => "G",
            SpectralClass::K => "K",
            SpectralClass::M => "M",
        }
    }
}

impl std::fmt::Display for SpectralClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SpectralClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "O" => Ok(SpectralClass::O),
            "B" => Ok(SpectralClass::B),
            "A" => Ok(SpectralClass::A),
            "F" => Ok(SpectralClass::F),
            "G" => Ok(SpectralClass::G),
            "K" => Ok(SpectralClass::K),
            "M" => Ok(SpectralClass::M),
            _ => Err(format!("Unknown spectral class: {}", s)),
        }
    }
}

/// One star as returned by the catalog, before any display conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStarRecord {
    pub source_id: SourceId,
    /// Right ascension (degrees)
    pub right_ascension: f64,
    /// Declination (degrees)
    pub declination: f64,
    /// Parallax (milliarcseconds); may be absent or non-positive
    pub parallax_mas: Option<f64>,
    /// Apparent G-band magnitude
    pub apparent_magnitude: Option<f64>,
    /// Effective temperature (Kelvin)
    pub effective_temperature: Option<f64>,
    /// Stellar radius (solar radii)
    pub stellar_radius: Option<f64>,
}

/// Heliocentric Cartesian position in parsecs
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CartesianPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianPosition {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Renderable attribute set for one star.
///
/// Built once per fetch-and-transform cycle and replaced wholesale on the
/// next fetch. `distance_parsecs` is always positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayStar {
    pub source_id: SourceId,
    pub label: String,
    pub position: CartesianPosition,
    /// Hex color, e.g. "#fff4ea"
    pub color: String,
    pub spectral_class: SpectralClass,
    /// Sphere radius in display units
    pub render_radius: f64,
    pub distance_parsecs: f64,
    pub temperature_kelvin: f64,
    pub radius_solar: f64,
    pub right_ascension: f64,
    pub declination: f64,
    pub apparent_magnitude: Option<f64>,
    pub absolute_magnitude: Option<f64>,
}

/// Bounded fetch request.
///
/// Fields are private so a value is always within
/// [`FetchParams::STAR_COUNT_RANGE`] and [`FetchParams::DISTANCE_RANGE_PC`].
/// Deserialization goes through [`FetchParams::new`] as well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawFetchParams")]
pub struct FetchParams {
    star_count: u32,
    max_distance_parsecs: f64,
}

#[derive(Deserialize)]
struct RawFetchParams {
    star_count: i64,
    max_distance_parsecs: f64,
}

impl From<RawFetchParams> for FetchParams {
    fn from(raw: RawFetchParams) -> Self {
        Self::new(raw.star_count, raw.max_distance_parsecs)
    }
}

impl FetchParams {
    pub const STAR_COUNT_RANGE: (u32, u32) = (50, 2000);
    pub const DISTANCE_RANGE_PC: (f64, f64) = (10.0, 100.0);

    /// Clamp the requested values into the supported ranges.
    ///
    /// A non-finite distance falls back to the lower bound.
    pub fn new(star_count: i64, max_distance_parsecs: f64) -> Self {
        let (min_count, max_count) = Self::STAR_COUNT_RANGE;
        let (min_dist, max_dist) = Self::DISTANCE_RANGE_PC;

        let star_count = star_count.clamp(min_count as i64, max_count as i64) as u32;
        let max_distance_parsecs = if max_distance_parsecs.is_finite() {
            max_distance_parsecs.clamp(min_dist, max_dist)
        } else {
            min_dist
        };

        Self {
            star_count,
            max_distance_parsecs,
        }
    }

    /// Whether the raw values would pass through [`FetchParams::new`] unchanged.
    pub fn is_in_range(star_count: i64, max_distance_parsecs: f64) -> bool {
        let (min_count, max_count) = Self::STAR_COUNT_RANGE;
        let (min_dist, max_dist) = Self::DISTANCE_RANGE_PC;
        (min_count as i64..=max_count as i64).contains(&star_count)
            && (min_dist..=max_dist).contains(&max_distance_parsecs)
    }

    pub fn star_count(&self) -> u32 {
        self.star_count
    }

    pub fn max_distance_parsecs(&self) -> f64 {
        self.max_distance_parsecs
    }

    /// Smallest parallax (mas) a star within range can have
    pub fn min_parallax_mas(&self) -> f64 {
        1000.0 / self.max_distance_parsecs
    }
}

impl Default for FetchParams {
    fn default() -> Self {
        Self::new(300, 30.0)
    }
}
