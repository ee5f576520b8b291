use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::{
    model::{Listing, ListingDetail},
    weather::WeatherService,
};

/// Read side of the listing store.
pub trait ListingStore {
    fn find_by_id(&self, id: &str) -> Option<Listing>;

    /// Listings whose title contains `query`, ignoring case. Blank matches all.
    fn search(&self, query: &str) -> Vec<Listing>;

    fn all(&self) -> Vec<Listing> {
        self.search("")
    }
}

/// Listings held in memory, typically loaded from a JSON array.
#[derive(Debug, Clone, Default)]
pub struct JsonListingStore {
    listings: Vec<Listing>,
}

impl JsonListingStore {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self { listings }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read listings file: {}", path.display()))?;
        let listings: Vec<Listing> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse listings file: {}", path.display()))?;
        Ok(Self::new(listings))
    }
}

impl ListingStore for JsonListingStore {
    fn find_by_id(&self, id: &str) -> Option<Listing> {
        self.listings.iter().find(|l| l.id == id).cloned()
    }

    fn search(&self, query: &str) -> Vec<Listing> {
        let needle = query.trim().to_lowercase();
        self.listings
            .iter()
            .filter(|l| needle.is_empty() || l.title.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

/// Detail view data for listing `id`, or `None` when it does not exist.
pub async fn enrich_listing(
    store: &dyn ListingStore,
    weather: &WeatherService,
    id: &str,
) -> Option<ListingDetail> {
    let listing = store.find_by_id(id)?;
    let weather = weather.resolve(&listing.location).await.into_snapshot();
    Some(ListingDetail { listing, weather })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::tests::{FakeWeather, snapshot_for};
    use std::sync::Arc;

    fn listing(id: &str, title: &str, location: &str) -> Listing {
        Listing {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            location: location.into(),
            country: "India".into(),
            price: 1500.0,
        }
    }

    fn store() -> JsonListingStore {
        JsonListingStore::new(vec![
            listing("1", "Cozy Beachfront Cottage", "Goa"),
            listing("2", "Modern Loft in Downtown", "London"),
            listing("3", "Mountain Retreat", ""),
        ])
    }

    #[test]
    fn finds_by_id() {
        assert_eq!(store().find_by_id("2").map(|l| l.title), Some("Modern Loft in Downtown".into()));
        assert!(store().find_by_id("42").is_none());
    }

    #[test]
    fn search_is_case_insensitive() {
        let hits = store().search("LOFT");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "2");
        assert_eq!(store().search("  ").len(), 3);
        assert_eq!(store().all().len(), 3);
    }

    #[test]
    fn loads_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.json");
        fs::write(&path, r#"[{"id":"a","title":"Villa","location":"Rome","price":9000}]"#).unwrap();

        let store = JsonListingStore::load(&path).unwrap();
        assert_eq!(store.find_by_id("a").map(|l| l.price), Some(9000.0));
    }

    #[test]
    fn bad_json_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listings.json");
        fs::write(&path, "{").unwrap();

        let err = JsonListingStore::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse listings file"));
    }

    #[tokio::test]
    async fn detail_carries_weather_for_listing_location() {
        let fake = Arc::new(FakeWeather::knowing(&["London", "New York"]));
        let weather = WeatherService::new(Box::new(fake.clone()), "New York");

        let detail = enrich_listing(&store(), &weather, "2").await.unwrap();

        assert_eq!(detail.listing.id, "2");
        assert_eq!(detail.weather, Some(snapshot_for("London")));
    }

    #[tokio::test]
    async fn blank_location_gets_fallback_weather() {
        let fake = Arc::new(FakeWeather::knowing(&["New York"]));
        let weather = WeatherService::new(Box::new(fake.clone()), "New York");

        let detail = enrich_listing(&store(), &weather, "3").await.unwrap();

        assert_eq!(detail.weather.map(|w| w.city), Some("New York".into()));
        assert_eq!(fake.calls(), vec!["New York"]);
    }

    #[tokio::test]
    async fn detail_renders_without_weather_when_unavailable() {
        let fake = Arc::new(FakeWeather::knowing(&[]));
        let weather = WeatherService::new(Box::new(fake), "New York");

        let detail = enrich_listing(&store(), &weather, "1").await.unwrap();

        assert_eq!(detail.weather, None);
    }

    #[tokio::test]
    async fn missing_listing_skips_weather() {
        let fake = Arc::new(FakeWeather::knowing(&["New York"]));
        let weather = WeatherService::new(Box::new(fake.clone()), "New York");

        assert!(enrich_listing(&store(), &weather, "nope").await.is_none());
        assert!(fake.calls().is_empty());
    }
}
