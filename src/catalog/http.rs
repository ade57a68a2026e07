//! `reqwest`-backed implementation of [`CatalogApi`].

use async_trait::async_trait;
use reqwest::{Client, Request, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use super::api::{CatalogApi, OneOrMany};
use super::error::CatalogError;
use super::query::CharacterQuery;
use crate::model::{CharacterPage, CharacterRecord, LocationPage, LocationRecord};

pub const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api";

/// HTTP client for the public character catalog.
#[derive(Clone, Debug)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn character_request(&self, id: u32) -> Result<Request, CatalogError> {
        self.get(&format!("/character/{id}"), &[])
    }

    pub fn characters_by_ids_request(&self, ids: &[u32]) -> Result<Request, CatalogError> {
        let joined = ids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.get(&format!("/character/{joined}"), &[])
    }

    pub fn characters_page_request(&self, query: &CharacterQuery) -> Result<Request, CatalogError> {
        self.get("/character", &query.query_pairs())
    }

    pub fn location_request(&self, id: u32) -> Result<Request, CatalogError> {
        self.get(&format!("/location/{id}"), &[])
    }

    pub fn search_locations_request(&self, name: &str) -> Result<Request, CatalogError> {
        let pairs: Vec<_> = super::query::non_blank(name)
            .map(|n| ("name", n.to_string()))
            .into_iter()
            .collect();
        self.get("/location", &pairs)
    }

    fn get(&self, path: &str, query: &[(&'static str, String)]) -> Result<Request, CatalogError> {
        let mut builder = self.client.get(format!("{}{}", self.base_url, path));
        if !query.is_empty() {
            builder = builder.query(query);
        }
        builder
            .build()
            .map_err(|e| CatalogError::Transport(e.to_string()))
    }

    async fn send<T: DeserializeOwned>(&self, request: Request) -> Result<T, CatalogError> {
        let url = request.url().to_string();
        debug!(%url, "GET");
        let response = self.client.execute(request).await?;
        let response = check_status(response, &url).await?;
        Ok(response.json::<T>().await?)
    }
}

async fn check_status(response: Response, url: &str) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    if status == reqwest::StatusCode::NOT_FOUND {
        debug!(%url, "Not found");
        return Err(CatalogError::not_found(url));
    }
    warn!(%url, status = status.as_u16(), "Request failed");
    Err(CatalogError::Http {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    #[instrument(skip(self))]
    async fn character(&self, id: u32) -> Result<CharacterRecord, CatalogError> {
        self.send(self.character_request(id)?).await
    }

    #[instrument(skip(self))]
    async fn characters_by_ids(
        &self,
        ids: &[u32],
    ) -> Result<OneOrMany<CharacterRecord>, CatalogError> {
        if ids.is_empty() {
            return Ok(OneOrMany::default());
        }
        self.send(self.characters_by_ids_request(ids)?).await
    }

    #[instrument(skip(self))]
    async fn characters_page(&self, query: &CharacterQuery) -> Result<CharacterPage, CatalogError> {
        self.send(self.characters_page_request(query)?).await
    }

    #[instrument(skip(self))]
    async fn location(&self, id: u32) -> Result<LocationRecord, CatalogError> {
        self.send(self.location_request(id)?).await
    }

    #[instrument(skip(self))]
    async fn search_locations(&self, name: &str) -> Result<Vec<LocationRecord>, CatalogError> {
        let page: LocationPage = self.send(self.search_locations_request(name)?).await?;
        Ok(page.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> HttpCatalog {
        HttpCatalog::with_client(Client::new(), "https://catalog.test/api/")
    }

    #[test]
    fn test_page_request_omits_blank_species() {
        let catalog = catalog();

        let with_species = catalog
            .characters_page_request(&CharacterQuery::new(1, "", "Human"))
            .unwrap();
        assert_eq!(
            with_species.url().as_str(),
            "https://catalog.test/api/character?page=1&species=Human"
        );

        let without = catalog
            .characters_page_request(&CharacterQuery::new(1, "", ""))
            .unwrap();
        assert_eq!(without.url().as_str(), "https://catalog.test/api/character?page=1");
        assert!(!without.url().as_str().contains("species"));
    }

    #[test]
    fn test_batch_request_joins_ids() {
        let request = catalog().characters_by_ids_request(&[1, 2, 38]).unwrap();
        assert_eq!(request.url().path(), "/api/character/1,2,38");
    }

    #[test]
    fn test_location_requests() {
        let catalog = catalog();
        assert_eq!(
            catalog.location_request(20).unwrap().url().as_str(),
            "https://catalog.test/api/location/20"
        );
        assert_eq!(
            catalog.search_locations_request(" Citadel ").unwrap().url().as_str(),
            "https://catalog.test/api/location?name=Citadel"
        );
    }

    #[tokio::test]
    async fn test_empty_batch_skips_network() {
        let records = catalog().characters_by_ids(&[]).await.unwrap();
        assert!(records.into_vec().is_empty());
    }
}
