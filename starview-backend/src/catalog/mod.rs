//! Star catalog access
//!
//! The pipeline only depends on [`StarCatalog`]; [`GaiaTapClient`] is the
//! production implementation backed by the ESA Gaia archive.

mod gaia;
pub mod photometry;
pub mod query;

pub use gaia::{GaiaRow, GaiaTapClient, parse_gaia_csv};
pub use query::build_nearby_stars_query;

use async_trait::async_trait;
use starview_common::{FetchParams, RawStarRecord};

use crate::error::FetchResult;

/// A source of raw star records.
///
/// Implementations issue one bounded query per call and return records
/// ordered by ascending distance. Zero matches is reported as
/// [`FetchError::EmptyResult`](crate::error::FetchError::EmptyResult).
#[async_trait]
pub trait StarCatalog: Send + Sync {
    async fn fetch(&self, params: &FetchParams) -> FetchResult<Vec<RawStarRecord>>;

    /// Short name used in logs
    fn name(&self) -> &str;
}
