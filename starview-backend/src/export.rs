//! Star field export
//!
//! Two formats: a record-oriented JSON document (one object per star with a
//! nested position and property block) for the viewer, and a flat CSV table
//! with the same fields as columns for analysis.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use starview_common::{CartesianPosition, DisplayStar, SourceId, SpectralClass};
use tokio::fs;
use tracing::{debug, info};

use crate::transform::star_label;

pub const JSON_FILE: &str = "star_data.json";
pub const CSV_FILE: &str = "star_data.csv";

/// Viewer-facing JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarDocument {
    pub exported_at: DateTime<Utc>,
    pub total_count: usize,
    /// Set when the fetch matched nothing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub stars: Vec<StarEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarEntry {
    pub id: SourceId,
    pub label: String,
    pub position: CartesianPosition,
    pub properties: StarProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarProperties {
    pub ra: f64,
    pub dec: f64,
    pub distance_pc: f64,
    pub magnitude: Option<f64>,
    pub abs_magnitude: Option<f64>,
    pub temperature: f64,
    pub radius_solar: f64,
    pub render_radius: f64,
    pub color: String,
    pub spectral_class: SpectralClass,
}

impl From<&DisplayStar> for StarEntry {
    fn from(star: &DisplayStar) -> Self {
        Self {
            id: star.source_id,
            label: star.label.clone(),
            position: star.position,
            properties: StarProperties {
                ra: star.right_ascension,
                dec: star.declination,
                distance_pc: star.distance_parsecs,
                magnitude: star.apparent_magnitude,
                abs_magnitude: star.absolute_magnitude,
                temperature: star.temperature_kelvin,
                radius_solar: star.radius_solar,
                render_radius: star.render_radius,
                color: star.color.clone(),
                spectral_class: star.spectral_class,
            },
        }
    }
}

impl From<StarEntry> for DisplayStar {
    fn from(entry: StarEntry) -> Self {
        let p = entry.properties;
        Self {
            source_id: entry.id,
            label: entry.label,
            position: entry.position,
            color: p.color,
            spectral_class: p.spectral_class,
            render_radius: p.render_radius,
            distance_parsecs: p.distance_pc,
            temperature_kelvin: p.temperature,
            radius_solar: p.radius_solar,
            right_ascension: p.ra,
            declination: p.dec,
            apparent_magnitude: p.magnitude,
            absolute_magnitude: p.abs_magnitude,
        }
    }
}

impl StarDocument {
    pub fn from_stars(stars: &[DisplayStar]) -> Self {
        Self {
            exported_at: Utc::now(),
            total_count: stars.len(),
            warning: None,
            stars: stars.iter().map(StarEntry::from).collect(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    pub fn into_stars(self) -> Vec<DisplayStar> {
        self.stars.into_iter().map(DisplayStar::from).collect()
    }
}

/// One CSV line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarCsvRow {
    pub source_id: SourceId,
    #[serde(default)]
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub distance_pc: f64,
    pub ra: f64,
    pub dec: f64,
    pub magnitude: Option<f64>,
    pub abs_magnitude: Option<f64>,
    pub temperature_k: f64,
    pub radius_solar: f64,
    pub render_radius: f64,
    pub color: String,
    pub spectral_class: SpectralClass,
}

impl From<&DisplayStar> for StarCsvRow {
    fn from(star: &DisplayStar) -> Self {
        Self {
            source_id: star.source_id,
            label: star.label.clone(),
            x: star.position.x,
            y: star.position.y,
            z: star.position.z,
            distance_pc: star.distance_parsecs,
            ra: star.right_ascension,
            dec: star.declination,
            magnitude: star.apparent_magnitude,
            abs_magnitude: star.absolute_magnitude,
            temperature_k: star.temperature_kelvin,
            radius_solar: star.radius_solar,
            render_radius: star.render_radius,
            color: star.color.clone(),
            spectral_class: star.spectral_class,
        }
    }
}

impl From<StarCsvRow> for DisplayStar {
    fn from(row: StarCsvRow) -> Self {
        let label = if row.label.is_empty() {
            star_label(row.source_id)
        } else {
            row.label
        };
        Self {
            source_id: row.source_id,
            label,
            position: CartesianPosition::new(row.x, row.y, row.z),
            color: row.color,
            spectral_class: row.spectral_class,
            render_radius: row.render_radius,
            distance_parsecs: row.distance_pc,
            temperature_kelvin: row.temperature_k,
            radius_solar: row.radius_solar,
            right_ascension: row.ra,
            declination: row.dec,
            apparent_magnitude: row.magnitude,
            absolute_magnitude: row.abs_magnitude,
        }
    }
}

pub fn to_json_string(document: &StarDocument) -> Result<String> {
    serde_json::to_string_pretty(document).context("Failed to serialize star document")
}

pub fn write_csv<W: Write>(stars: &[DisplayStar], writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for star in stars {
        csv_writer
            .serialize(StarCsvRow::from(star))
            .with_context(|| format!("Failed to write CSV row for {}", star.source_id))?;
    }
    csv_writer.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

pub fn to_csv_string(stars: &[DisplayStar]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(stars, &mut buf)?;
    String::from_utf8(buf).context("CSV output was not valid UTF-8")
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<DisplayStar>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    csv_reader
        .deserialize::<StarCsvRow>()
        .enumerate()
        .map(|(index, row)| {
            row.map(DisplayStar::from)
                .with_context(|| format!("Failed to parse CSV row {}", index + 1))
        })
        .collect()
}

/// Paths written by [`StarExporter::export_all`]
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
}

/// Writes export files into one output directory
pub struct StarExporter {
    output_dir: PathBuf,
}

impl StarExporter {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub async fn ensure_output_dir(&self) -> Result<()> {
        if !self.output_dir.exists() {
            fs::create_dir_all(&self.output_dir)
                .await
                .context("Failed to create output directory")?;
            info!("Created output directory: {:?}", self.output_dir);
        }
        Ok(())
    }

    pub async fn export_json(&self, stars: &[DisplayStar]) -> Result<PathBuf> {
        self.ensure_output_dir().await?;

        let path = self.output_dir.join(JSON_FILE);
        let content = to_json_string(&StarDocument::from_stars(stars))?;
        fs::write(&path, content)
            .await
            .context("Failed to write JSON export")?;

        debug!("Wrote {} stars to {:?}", stars.len(), path);
        Ok(path)
    }

    pub async fn export_csv(&self, stars: &[DisplayStar]) -> Result<PathBuf> {
        self.ensure_output_dir().await?;

        let path = self.output_dir.join(CSV_FILE);
        let content = to_csv_string(stars)?;
        fs::write(&path, content)
            .await
            .context("Failed to write CSV export")?;

        debug!("Wrote {} stars to {:?}", stars.len(), path);
        Ok(path)
    }

    pub async fn export_all(&self, stars: &[DisplayStar]) -> Result<ExportPaths> {
        let json = self.export_json(stars).await?;
        let csv = self.export_csv(stars).await?;
        info!("Data saved to {} and {}", json.display(), csv.display());
        Ok(ExportPaths { json, csv })
    }

    pub async fn load_json(&self) -> Result<StarDocument> {
        let path = self.output_dir.join(JSON_FILE);
        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content).context("Failed to parse star document")
    }

    pub async fn load_csv(&self) -> Result<Vec<DisplayStar>> {
        let path = self.output_dir.join(CSV_FILE);
        let content = fs::read(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        read_csv(content.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{transform, DisplayPolicy};
    use starview_common::RawStarRecord;
    use std::collections::HashSet;

    fn sample_stars() -> Vec<DisplayStar> {
        let records = vec![
            RawStarRecord {
                source_id: 5853498713190525696,
                right_ascension: 217.39,
                declination: -62.68,
                parallax_mas: Some(768.07),
                apparent_magnitude: Some(8.98),
                effective_temperature: Some(3042.0),
                stellar_radius: Some(0.15),
            },
            RawStarRecord {
                source_id: 2,
                right_ascension: 101.28,
                declination: -16.71,
                parallax_mas: Some(379.21),
                apparent_magnitude: None,
                effective_temperature: Some(9940.0),
                stellar_radius: Some(1.71),
            },
            RawStarRecord {
                source_id: 3,
                right_ascension: 0.0,
                declination: 0.0,
                parallax_mas: Some(100.0),
                apparent_magnitude: Some(4.83),
                effective_temperature: None,
                stellar_radius: None,
            },
        ];
        transform(&records, &DisplayPolicy::default()).stars
    }

    fn key(star: &DisplayStar) -> (SourceId, u64, String) {
        (star.source_id, star.distance_parsecs.to_bits(), star.color.clone())
    }

    #[test]
    fn test_csv_round_trip_preserves_identity_distance_color() {
        let stars = sample_stars();
        let csv = to_csv_string(&stars).unwrap();
        let parsed = read_csv(csv.as_bytes()).unwrap();

        let before: HashSet<_> = stars.iter().map(key).collect();
        let after: HashSet<_> = parsed.iter().map(key).collect();
        assert_eq!(before, after);
        assert_eq!(parsed, stars);
    }

    #[test]
    fn test_csv_header_columns() {
        let csv = to_csv_string(&sample_stars()).unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "source_id,label,x,y,z,distance_pc,ra,dec,magnitude,abs_magnitude,temperature_k,radius_solar,render_radius,color,spectral_class"
        );
    }

    #[test]
    fn test_csv_empty_magnitude_is_blank() {
        let stars = sample_stars();
        let csv = to_csv_string(&stars[1..2]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.contains(",,,"), "row: {}", row);
    }

    #[test]
    fn test_read_csv_reports_bad_row() {
        let csv = "source_id,label,x,y,z,distance_pc,ra,dec,magnitude,abs_magnitude,temperature_k,radius_solar,render_radius,color,spectral_class\n\
                   1,a,1,2,3,10,0,0,,,5800,1,0.3,#fff4ea,Q\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_json_document_shape() {
        let stars = sample_stars();
        let document = StarDocument::from_stars(&stars);
        let json = to_json_string(&document).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["total_count"], 3);
        assert!(value.get("warning").is_none());
        let first = &value["stars"][0];
        assert_eq!(first["id"], 5853498713190525696i64);
        assert!(first["position"]["x"].is_number());
        assert_eq!(first["properties"]["color"], "#ffcc6f");
        assert_eq!(first["properties"]["spectral_class"], "M");

        let back: StarDocument = serde_json::from_str(&json).unwrap();
        let back = back.into_stars();
        assert_eq!(back.len(), stars.len());
        for (a, b) in back.iter().zip(&stars) {
            assert_eq!(a.source_id, b.source_id);
            assert_eq!(a.color, b.color);
            assert!(((a.distance_parsecs - b.distance_parsecs) / b.distance_parsecs).abs() < 1e-12);
        }
    }

    #[test]
    fn test_warning_serialized_when_set() {
        let document = StarDocument::from_stars(&[]).with_warning("no stars found within 10 pc");
        let json = to_json_string(&document).unwrap();
        assert!(json.contains("\"warning\": \"no stars found within 10 pc\""));
        assert!(json.contains("\"stars\": []"));
    }

    #[tokio::test]
    async fn test_export_all_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = StarExporter::new(dir.path().join("data"));
        let stars = sample_stars();

        let paths = exporter.export_all(&stars).await.unwrap();
        assert!(paths.json.ends_with(JSON_FILE));
        assert!(paths.csv.ends_with(CSV_FILE));

        let document = exporter.load_json().await.unwrap();
        assert_eq!(document.total_count, stars.len());
        assert_eq!(exporter.load_csv().await.unwrap(), stars);
    }
}
