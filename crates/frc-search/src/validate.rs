//! Candidate validation: liveness, page fetch, extraction and classification.

use std::time::Duration;

use frc_core::matching::{classify, match_text};
use frc_core::ProductListing;
use frc_scraper::extract_product;
use futures::stream::{self, StreamExt};
use tokio::time::Instant;

use crate::engine::SearchEngine;

/// How long a validated product record is trusted.
const PRODUCT_TTL: Duration = Duration::from_secs(24 * 3600);

impl SearchEngine {
    /// Validates candidates with bounded concurrency, in input order. Stops
    /// at the deadline and keeps what finished before it.
    pub(crate) async fn validate_all(
        &self,
        candidates: Vec<ProductListing>,
        deadline: Instant,
    ) -> Vec<ProductListing> {
        let total = candidates.len();
        let outcomes: Vec<Option<ProductListing>> = stream::iter(candidates)
            .map(|listing| self.validate(listing))
            .buffered(self.settings.validation_concurrency.max(1))
            .take_until(tokio::time::sleep_until(deadline))
            .collect()
            .await;

        if outcomes.len() < total {
            tracing::warn!(
                checked = outcomes.len(),
                total,
                "search deadline reached during validation"
            );
        }
        outcomes
            .into_iter()
            .flatten()
            .filter(ProductListing::is_well_formed)
            .collect()
    }

    /// A listing survives when the product cache already knows it, or when
    /// its page is live and classifies as a competition-robotics part.
    async fn validate(&self, mut listing: ProductListing) -> Option<ProductListing> {
        if let Some(record) = self.cache.product_info(&listing.url) {
            listing.overlay(&record);
            return Some(listing);
        }

        if !self.is_alive(&listing.url).await {
            tracing::debug!(url = %listing.url, "dropping dead listing");
            return None;
        }

        let html = self.client.fetch_page(&listing.url).await?;
        let structured = extract_product(&html, &listing.url)
            .filter(|page| page.structured)
            .map(|page| page.record);

        let text = match &structured {
            Some(r) => match_text(&[
                Some(r.name.as_str()),
                r.description.as_deref(),
                r.sku.as_deref(),
                r.mpn.as_deref(),
                Some(html.as_str()),
            ]),
            None => match_text(&[
                Some(listing.name.as_str()),
                listing.description.as_deref(),
                listing.sku.as_deref(),
                Some(html.as_str()),
            ]),
        };

        let verdict = classify(&text);
        if !verdict.is_frc_part {
            tracing::debug!(url = %listing.url, score = verdict.score, "not recognised as a part");
            return None;
        }

        if let Some(record) = structured {
            listing.overlay(&record);
            let url = listing.url.clone();
            self.write_cache(move |cache| cache.set_product_info(&url, &record, Some(PRODUCT_TTL)))
                .await;
        }
        listing.frc_category = Some(verdict.category.to_string());
        listing.match_score = Some(verdict.score);
        Some(listing)
    }
}
