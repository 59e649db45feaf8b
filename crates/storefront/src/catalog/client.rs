//! HTTP client for the public demo product API.

use std::time::Duration;

use tracing::{debug, instrument};
use url::Url;

use super::conversions::convert_product_list;
use super::{CatalogError, ProductSource};
use crate::config::CatalogConfig;
use crate::models::Product;

/// Client for a Fake Store style product listing endpoint.
///
/// Issues a single `GET <endpoint>?limit=<n>`; no pagination, no auth.
#[derive(Clone, Debug)]
pub struct FakeStoreClient {
    client: reqwest::Client,
    url: Url,
}

impl FakeStoreClient {
    /// Create a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` if the HTTP client fails to build, or
    /// `CatalogError::InvalidEndpoint` if the endpoint is not a URL.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let mut url = Url::parse(&config.endpoint)?;
        url.query_pairs_mut()
            .append_pair("limit", &config.limit.to_string());

        Ok(Self { client, url })
    }

    /// The full request URL, including the limit.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

impl ProductSource for FakeStoreClient {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self.client.get(self.url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Product API returned non-success status"
            );
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let products = convert_product_list(&body)?;
        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }
}
