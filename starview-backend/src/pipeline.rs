//! Fetch -> transform, and the resulting selectable star field

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use starview_common::{DisplayStar, FetchParams, SourceId};

use crate::catalog::StarCatalog;
use crate::error::FetchResult;
use crate::stats::FieldStats;
use crate::transform::{transform, DisplayPolicy, ExclusionNotice};

/// One fetch-and-transform result.
///
/// Immutable once built; the next fetch produces a new field.
#[derive(Debug, Clone)]
pub struct StarField {
    pub params: FetchParams,
    pub fetched_at: DateTime<Utc>,
    stars: Vec<DisplayStar>,
    exclusions: Vec<ExclusionNotice>,
    index: HashMap<SourceId, usize>,
}

impl StarField {
    pub fn new(params: FetchParams, stars: Vec<DisplayStar>, exclusions: Vec<ExclusionNotice>) -> Self {
        let index = stars
            .iter()
            .enumerate()
            .map(|(i, star)| (star.source_id, i))
            .collect();
        Self {
            params,
            fetched_at: Utc::now(),
            stars,
            exclusions,
            index,
        }
    }

    pub fn stars(&self) -> &[DisplayStar] {
        &self.stars
    }

    pub fn exclusions(&self) -> &[ExclusionNotice] {
        &self.exclusions
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Selection query: the full attribute set of one star.
    pub fn select(&self, source_id: SourceId) -> Option<&DisplayStar> {
        self.index.get(&source_id).map(|&i| &self.stars[i])
    }

    pub fn stats(&self) -> Option<FieldStats> {
        FieldStats::from_stars(&self.stars)
    }
}

/// Runs one catalog query and transforms the result.
#[derive(Clone)]
pub struct StarPipeline {
    catalog: Arc<dyn StarCatalog>,
    policy: DisplayPolicy,
}

impl StarPipeline {
    pub fn new(catalog: Arc<dyn StarCatalog>, policy: DisplayPolicy) -> Self {
        Self { catalog, policy }
    }

    pub async fn run(&self, params: FetchParams) -> FetchResult<StarField> {
        let records = self.catalog.fetch(&params).await?;
        let transformed = transform(&records, &self.policy);

        if !transformed.exclusions.is_empty() {
            tracing::info!(
                "Excluded {} of {} records from {} without a usable parallax",
                transformed.exclusions.len(),
                records.len(),
                self.catalog.name()
            );
        }
        tracing::info!("Transformed {} stars for display", transformed.stars.len());

        Ok(StarField::new(params, transformed.stars, transformed.exclusions))
    }
}
