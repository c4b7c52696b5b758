//! REST Collaborator
//!
//! The view model only talks to the backend through [`RecordSource`], so
//! tests can swap in an in-memory source and the binary uses [`RestSource`].

mod rest;

use async_trait::async_trait;

use crate::core::{Record, RecordId, Result};

pub use rest::{ApiClient, RestSource};

#[async_trait]
pub trait RecordSource<R: Record>: Send + Sync {
    /// `GET /{resource}`
    async fn fetch_all(&self) -> Result<Vec<R>>;

    /// `POST /{resource}`, returns the stored record with its assigned id
    async fn create(&self, draft: &R::Draft) -> Result<R>;

    /// `PUT /{resource}/{id}`
    async fn update(&self, id: &RecordId, draft: &R::Draft) -> Result<R>;

    /// `DELETE /{resource}/{id}`
    async fn delete(&self, id: &RecordId) -> Result<()>;
}
