//! City name search for the search box.
//!
//! Uses the GeoDB Cities API when a real key is configured and the bundled
//! world list otherwise. Remote failures also fall back to the bundled list,
//! so a search never surfaces an error.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;

use nimbus_core::GeoDbConfig;

use crate::cities::{BundledCity, WORLD_CITIES};

/// Queries shorter than this return nothing
pub const MIN_QUERY_LEN: usize = 3;
pub const DEFAULT_LIMIT: usize = 8;
const MIN_POPULATION: &str = "10000";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// One city suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitySearchResult {
    pub id: u64,
    pub name: String,
    pub country: String,
    pub country_code: String,
    #[serde(default)]
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&BundledCity> for CitySearchResult {
    fn from(city: &BundledCity) -> Self {
        Self {
            id: city.id,
            name: city.name.to_string(),
            country: city.country.to_string(),
            country_code: city.country_code.to_string(),
            region: city.region.to_string(),
            latitude: city.latitude,
            longitude: city.longitude,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeoCitiesResponse {
    #[serde(default)]
    data: Vec<CitySearchResult>,
}

/// City search client
#[derive(Debug, Clone)]
pub struct CitySearch {
    client: Client,
    geodb: GeoDbConfig,
}

impl CitySearch {
    pub fn new(geodb: GeoDbConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to build city search client ({}); using defaults", e);
                Client::new()
            });
        Self { client, geodb }
    }

    /// Whether searches go to the remote API
    pub fn uses_remote(&self) -> bool {
        self.geodb.is_configured()
    }

    /// Up to `limit` cities matching `query`.
    #[instrument(skip(self), level = "debug")]
    pub async fn search(&self, query: &str, limit: usize) -> Vec<CitySearchResult> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Vec::new();
        }

        if !self.uses_remote() {
            return search_bundled(query, limit);
        }

        match self.search_remote(query, limit).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("GeoDB search failed, using bundled cities: {}", e);
                search_bundled(query, limit)
            }
        }
    }

    async fn search_remote(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CitySearchResult>, reqwest::Error> {
        let url = format!("{}/cities", self.geodb.base_url.trim_end_matches('/'));
        let limit = limit.to_string();

        let response = self
            .client
            .get(&url)
            .header("X-RapidAPI-Key", &self.geodb.api_key)
            .header("X-RapidAPI-Host", &self.geodb.host)
            .query(&[
                ("namePrefix", query),
                ("limit", limit.as_str()),
                ("minPopulation", MIN_POPULATION),
                ("types", "CITY"),
                ("sort", "-population"),
                ("languageCode", "en"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: GeoCitiesResponse = response.json().await?;
        tracing::debug!(results = body.data.len(), "GeoDB search complete");
        Ok(body.data)
    }
}

/// Case-insensitive substring match on city or country name.
pub fn search_bundled(query: &str, limit: usize) -> Vec<CitySearchResult> {
    let needle = query.to_lowercase();
    WORLD_CITIES
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&needle) || c.country.to_lowercase().contains(&needle)
        })
        .take(limit)
        .map(CitySearchResult::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_matches_city_or_country() {
        let by_name = search_bundled("lond", DEFAULT_LIMIT);
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "London");
        assert_eq!(by_name[0].country_code, "GB");

        let by_country = search_bundled("TURKEY", DEFAULT_LIMIT);
        assert_eq!(by_country.len(), 5);
        assert!(by_country.iter().all(|c| c.country == "Turkey"));
    }

    #[test]
    fn bundled_respects_limit() {
        assert_eq!(search_bundled("united states", 3).len(), 3);
    }

    #[tokio::test]
    async fn short_queries_return_nothing() {
        let search = CitySearch::new(GeoDbConfig::default());
        assert!(search.search("is", DEFAULT_LIMIT).await.is_empty());
        assert!(search.search("  is  ", DEFAULT_LIMIT).await.is_empty());
    }

    #[tokio::test]
    async fn placeholder_key_uses_bundled_list() {
        let search = CitySearch::new(GeoDbConfig::default());
        assert!(!search.uses_remote());
        let results = search.search("tok", DEFAULT_LIMIT).await;
        assert_eq!(results[0].name, "Tokyo");
    }
}
