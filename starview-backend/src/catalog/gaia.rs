//! Gaia DR3 TAP client
//!
//! Sends one synchronous ADQL query to the ESA Gaia archive and parses the
//! CSV result into raw star records.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use starview_common::{FetchParams, RawStarRecord, SourceId};

use super::photometry;
use super::query::build_nearby_stars_query;
use super::StarCatalog;
use crate::config::CatalogConfig;
use crate::error::{FetchError, FetchResult};

/// One row of the nearby-star query result
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GaiaRow {
    pub source_id: SourceId,
    pub ra: f64,
    pub dec: f64,
    pub parallax: Option<f64>,
    #[serde(default)]
    pub parallax_error: Option<f64>,
    #[serde(default)]
    pub phot_g_mean_mag: Option<f64>,
    #[serde(default)]
    pub bp_rp: Option<f64>,
}

impl GaiaRow {
    /// Convert to a catalog-neutral record, estimating temperature and radius
    /// from photometry where possible.
    pub fn into_record(self) -> RawStarRecord {
        let distance_pc = self
            .parallax
            .filter(|p| p.is_finite() && *p > 0.0)
            .map(|p| 1000.0 / p);

        let temperature = self.bp_rp.and_then(photometry::temperature_from_bp_rp);

        let radius = match (self.phot_g_mean_mag, distance_pc, temperature) {
            (Some(mag), Some(distance), Some(temp)) => {
                photometry::estimate_radius(mag, distance, temp)
            }
            _ => None,
        };

        RawStarRecord {
            source_id: self.source_id,
            right_ascension: self.ra,
            declination: self.dec,
            parallax_mas: self.parallax,
            apparent_magnitude: self.phot_g_mean_mag,
            effective_temperature: temperature,
            stellar_radius: radius,
        }
    }
}

/// Parse a TAP CSV result body.
///
/// Malformed rows are logged and skipped. A body without a `source_id`
/// header, or one where every row is malformed, is a query failure.
pub fn parse_gaia_csv(body: &str) -> FetchResult<Vec<RawStarRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader.headers()?.clone();
    if !headers.iter().any(|h| h == "source_id") {
        return Err(FetchError::query_failure(format!(
            "unexpected response, missing source_id column (headers: {:?})",
            headers.iter().collect::<Vec<_>>()
        )));
    }

    let mut records = Vec::new();
    let mut row_count = 0;
    let mut error_count = 0;

    for result in reader.deserialize::<GaiaRow>() {
        row_count += 1;
        match result {
            Ok(row) => records.push(row.into_record()),
            Err(e) => {
                error_count += 1;
                tracing::warn!("Error parsing Gaia CSV row {}: {}", row_count, e);
            }
        }
    }

    if row_count > 0 && error_count == row_count {
        return Err(FetchError::query_failure(format!(
            "all {} rows of the catalog response were malformed",
            row_count
        )));
    }

    tracing::debug!("Parsed {} Gaia rows, {} errors", row_count, error_count);
    Ok(records)
}

/// [`StarCatalog`] backed by the Gaia archive TAP service.
pub struct GaiaTapClient {
    client: Client,
    tap_url: String,
    max_attempts: u32,
    retry_delay: Duration,
    max_relative_parallax_error: f64,
}

impl GaiaTapClient {
    pub fn new(config: &CatalogConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            tap_url: config.tap_url.clone(),
            max_attempts: config.max_attempts.max(1),
            retry_delay: Duration::from_secs(config.retry_delay_secs),
            max_relative_parallax_error: config.max_relative_parallax_error,
        })
    }

    pub fn tap_url(&self) -> &str {
        &self.tap_url
    }

    /// Full synchronous-query URL for `params`
    pub fn query_url(&self, params: &FetchParams) -> FetchResult<Url> {
        let adql = build_nearby_stars_query(params, self.max_relative_parallax_error);
        Url::parse_with_params(
            &self.tap_url,
            &[
                ("REQUEST", "doQuery"),
                ("LANG", "ADQL"),
                ("FORMAT", "csv"),
                ("QUERY", adql.as_str()),
            ],
        )
        .map_err(|e| FetchError::query_failure_with(format!("invalid TAP URL '{}'", self.tap_url), e))
    }

    /// Single fetch attempt
    async fn fetch_attempt(&self, url: &Url) -> FetchResult<Vec<RawStarRecord>> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::query_failure(format!("HTTP error {}", status)));
        }

        let body = response.text().await?;
        parse_gaia_csv(&body)
    }
}

#[async_trait]
impl StarCatalog for GaiaTapClient {
    async fn fetch(&self, params: &FetchParams) -> FetchResult<Vec<RawStarRecord>> {
        let url = self.query_url(params)?;

        tracing::info!(
            "Fetching up to {} stars within {} parsecs from {}",
            params.star_count(),
            params.max_distance_parsecs(),
            self.tap_url
        );

        let mut attempt = 1;
        let records = loop {
            match self.fetch_attempt(&url).await {
                Ok(records) => break records,
                Err(e) if attempt < self.max_attempts => {
                    tracing::warn!(
                        "Attempt {}/{} failed: {}",
                        attempt,
                        self.max_attempts,
                        e
                    );
                    let delay = self.retry_delay * attempt;
                    attempt += 1;
                    tracing::debug!("Retrying after {:?} (attempt {}/{})", delay, attempt, self.max_attempts);
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!("Catalog query failed after {} attempt(s): {}", attempt, e);
                    return Err(e);
                }
            }
        };

        if records.is_empty() {
            return Err(FetchError::EmptyResult {
                max_distance_pc: params.max_distance_parsecs(),
            });
        }

        tracing::info!("Successfully fetched {} stars", records.len());
        Ok(records)
    }

    fn name(&self) -> &str {
        "gaia-dr3"
    }
}
