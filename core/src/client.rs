//! Stateless HTTP request builder and response parser for a HAL collection.
//!
//! # Design
//! `CollectionClient` holds only where the collection lives and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that consumes
//! an `HttpResponse`. The caller executes the actual round-trip.
//!
//! Deletes target the item's own `_links.self.href` rather than a path put
//! together from a locally known id, so a backend that lives behind a
//! different origin still receives the path it advertised.

use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::hal::{extract_embedded, HalCollection};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::link::request_target;
use crate::types::{NewUser, User};

/// Synchronous, stateless client for one collection resource.
#[derive(Debug, Clone)]
pub struct CollectionClient {
    base_url: String,
    collection_path: String,
    embedded_rel: String,
}

impl CollectionClient {
    /// Client for the default `/be/users` collection under `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self::from_config(&ClientConfig {
            base_url: base_url.to_string(),
            ..ClientConfig::default()
        })
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let path = config.collection_path.trim().trim_end_matches('/');
        let collection_path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        Self {
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            collection_path,
            embedded_rel: config.embedded_rel.clone(),
        }
    }

    pub fn collection_url(&self) -> String {
        format!("{}{}", self.base_url, self.collection_path)
    }

    pub fn embedded_rel(&self) -> &str {
        &self.embedded_rel
    }

    pub fn build_list_users(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.collection_url(),
            headers: vec![("accept".to_string(), "application/hal+json".to_string())],
            body: None,
        }
    }

    pub fn build_create_user(&self, draft: &NewUser) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(draft).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.collection_url(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    /// Target the user's self link. Users from a bare-array body carry a
    /// numeric id instead and fall back to `<collection>/<id>`.
    pub fn build_delete_user(&self, user: &User) -> Result<HttpRequest, ApiError> {
        match (user.self_href(), user.id) {
            (Some(href), _) => self.build_delete_link(href),
            (None, Some(id)) => Ok(self.delete_request(format!("{}/{id}", self.collection_path))),
            (None, None) => Err(ApiError::MissingLink),
        }
    }

    pub fn build_delete_link(&self, href: &str) -> Result<HttpRequest, ApiError> {
        let target = request_target(href)?;
        debug!(href, %target, "resolved delete target");
        Ok(self.delete_request(target))
    }

    fn delete_request(&self, target: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}{target}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<HalCollection<User>, ApiError> {
        check_status(&response, &[200])?;
        let collection = extract_embedded(&response.body, &self.embedded_rel)?;
        debug!(count = collection.items.len(), "parsed user collection");
        Ok(collection)
    }

    /// The create response is only checked for status; its body may be a
    /// partial HAL document and callers refetch instead.
    pub fn parse_create_user(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200, 201])
    }

    pub fn parse_delete_user(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, &[200, 204])
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: &[u16]) -> Result<(), ApiError> {
    if expected.contains(&response.status) {
        return Ok(());
    }
    warn!(status = response.status, ?expected, "unexpected response status");
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::Status {
        status: response.status,
        body: response.body.clone(),
    })
}
