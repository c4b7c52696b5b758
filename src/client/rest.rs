use std::marker::PhantomData;

use async_trait::async_trait;
use reqwest::{Response, Url};
use tracing::debug;

use crate::config::ClientConfig;
use crate::core::{DashboardError, Record, RecordId, Result};

use super::RecordSource;

/// Shared HTTP client for one backend. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base = config.base()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Typed handle on one collection of the backend.
    pub fn source<R: Record>(&self) -> RestSource<R> {
        RestSource {
            client: self.clone(),
            _record: PhantomData,
        }
    }

    fn collection_url(&self, resource: &str) -> Result<Url> {
        self.base
            .join(resource)
            .map_err(|e| DashboardError::Config(format!("bad resource path '{}': {}", resource, e)))
    }

    fn item_url(&self, resource: &str, id: &RecordId) -> Result<Url> {
        let mut url = self.collection_url(resource)?;
        url.path_segments_mut()
            .map_err(|_| DashboardError::Config(format!("base URL cannot hold a path: {}", self.base)))?
            .push(&id.to_string());
        Ok(url)
    }
}

fn check(response: Response) -> Result<Response> {
    Ok(response.error_for_status()?)
}

pub struct RestSource<R> {
    client: ApiClient,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> RestSource<R> {
    fn ensure_writable(&self, action: &str) -> Result<()> {
        if R::WRITABLE {
            Ok(())
        } else {
            Err(DashboardError::UnsupportedOperation(format!(
                "cannot {} {}: read-only resource",
                action,
                R::RESOURCE
            )))
        }
    }
}

#[async_trait]
impl<R: Record> RecordSource<R> for RestSource<R> {
    async fn fetch_all(&self) -> Result<Vec<R>> {
        let url = self.client.collection_url(R::RESOURCE)?;
        debug!(method = "GET", %url, "request");
        let response = check(self.client.http.get(url).send().await?)?;
        Ok(response.json::<Vec<R>>().await?)
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        self.ensure_writable("create")?;
        let url = self.client.collection_url(R::RESOURCE)?;
        debug!(method = "POST", %url, "request");
        let response = check(self.client.http.post(url).json(draft).send().await?)?;
        Ok(response.json::<R>().await?)
    }

    async fn update(&self, id: &RecordId, draft: &R::Draft) -> Result<R> {
        self.ensure_writable("update")?;
        let url = self.client.item_url(R::RESOURCE, id)?;
        debug!(method = "PUT", %url, "request");
        let response = check(self.client.http.put(url).json(draft).send().await?)?;
        Ok(response.json::<R>().await?)
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        self.ensure_writable("delete")?;
        let url = self.client.item_url(R::RESOURCE, id)?;
        debug!(method = "DELETE", %url, "request");
        check(self.client.http.delete(url).send().await?)?;
        Ok(())
    }
}
