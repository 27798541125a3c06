//! Local view state for a remote user collection.
//!
//! # Design
//! The `Reconciler` owns the displayed list, a loading flag, the last error
//! message and the add-form draft. Every state change bumps `revision`,
//! which is the explicit redraw signal for whatever renders the list.
//!
//! Two policies decide how a successful delete reaches local state:
//! - `Optimistic` removes the item before the request goes out and only
//!   refetches if the request fails.
//! - `Pessimistic` never edits the list itself and refetches after every
//!   mutation.
//!
//! Adds refetch under both policies: the create response may be a partial
//! HAL document and is never trusted as the new row. A failed delete always
//! triggers a refetch, so local state trails the server by at most one round
//! trip. Fetches replace the whole list; overlapping responses are applied
//! last-write-wins.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::client::CollectionClient;
use crate::config::{ClientConfig, Policy};
use crate::error::ApiError;
use crate::hal::HalCollection;
use crate::http::Transport;
use crate::types::{Link, Links, NewUser, PageMetadata, User};

pub struct Reconciler<X> {
    client: CollectionClient,
    transport: X,
    policy: Policy,
    items: Vec<User>,
    page: Option<PageMetadata>,
    draft: NewUser,
    loading: bool,
    error: Option<String>,
    revision: u64,
}

impl<X: Transport> Reconciler<X> {
    pub fn new(client: CollectionClient, transport: X, policy: Policy) -> Self {
        Self {
            client,
            transport,
            policy,
            items: Vec::new(),
            page: None,
            draft: NewUser::default(),
            loading: false,
            error: None,
            revision: 0,
        }
    }

    pub fn from_config(config: &ClientConfig, transport: X) -> Self {
        Self::new(CollectionClient::from_config(config), transport, config.policy)
    }

    pub fn items(&self) -> &[User] {
        &self.items
    }

    /// Display rows in collection order.
    pub fn rows(&self) -> Vec<String> {
        self.items.iter().map(User::display_row).collect()
    }

    pub fn page(&self) -> Option<PageMetadata> {
        self.page
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        if self.error.take().is_some() {
            self.touch();
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn draft(&self) -> &NewUser {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut NewUser {
        self.touch();
        &mut self.draft
    }

    pub fn set_draft(&mut self, draft: NewUser) {
        self.draft = draft;
        self.touch();
    }

    pub fn transport(&self) -> &X {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut X {
        &mut self.transport
    }

    /// Replace the list with the server's current collection.
    pub fn refresh(&mut self) -> Result<(), ApiError> {
        self.error = None;
        self.reload().inspect_err(|e| self.fail(e))
    }

    /// POST the draft. On success the draft is reset and the list refetched;
    /// on failure the draft is left exactly as the user typed it.
    pub fn submit_draft(&mut self) -> Result<(), ApiError> {
        self.error = None;
        if let Err(e) = self.create() {
            self.fail(&e);
            return Err(e);
        }
        self.draft = NewUser::default();
        self.touch();
        self.reload().inspect_err(|e| self.fail(e))
    }

    /// DELETE the user through its link reference and fold the outcome back
    /// into the list according to the policy.
    pub fn delete(&mut self, user: &User) -> Result<(), ApiError> {
        self.error = None;
        let request = match self.client.build_delete_user(user) {
            Ok(request) => request,
            Err(e) => {
                self.fail(&e);
                return Err(e);
            }
        };

        let removed = match self.policy {
            Policy::Optimistic => self.remove_one(user),
            Policy::Pessimistic => None,
        };

        let outcome = self
            .transport
            .execute(&request)
            .and_then(|response| self.client.parse_delete_user(response));

        match outcome {
            Ok(()) => match self.policy {
                Policy::Optimistic => Ok(()),
                Policy::Pessimistic => self.reload().inspect_err(|e| self.fail(e)),
            },
            Err(e) => {
                warn!(error = %e, "delete failed, resynchronizing");
                self.fail(&e);
                if let Err(reload) = self.reload() {
                    warn!(error = %reload, "resync after failed delete also failed");
                    if let Some((index, user)) = removed {
                        let index = index.min(self.items.len());
                        self.items.insert(index, user);
                        self.touch();
                    }
                }
                Err(e)
            }
        }
    }

    /// Delete the item whose self link is `href`.
    pub fn delete_link(&mut self, href: &str) -> Result<(), ApiError> {
        let user = self
            .items
            .iter()
            .find(|u| u.self_href() == Some(href))
            .cloned()
            .unwrap_or_else(|| User {
                links: Some(Links {
                    self_link: Some(Link {
                        href: href.to_string(),
                        templated: false,
                    }),
                }),
                ..Default::default()
            });
        self.delete(&user)
    }

    fn create(&mut self) -> Result<(), ApiError> {
        let request = self.client.build_create_user(&self.draft)?;
        let response = self.transport.execute(&request)?;
        self.client.parse_create_user(response)
    }

    fn fetch(&mut self) -> Result<HalCollection<User>, ApiError> {
        let request = self.client.build_list_users();
        let response = self.transport.execute(&request)?;
        self.client.parse_list_users(response)
    }

    /// Fetch and replace without touching the error message.
    fn reload(&mut self) -> Result<(), ApiError> {
        self.loading = true;
        self.touch();
        let result = self.fetch();
        self.loading = false;
        match result {
            Ok(collection) => {
                self.replace(collection);
                Ok(())
            }
            Err(e) => {
                self.touch();
                Err(e)
            }
        }
    }

    fn replace(&mut self, collection: HalCollection<User>) {
        let mut seen = HashSet::new();
        for href in collection.items.iter().filter_map(User::self_href) {
            if !seen.insert(href) {
                warn!(href, "duplicate link reference in collection");
            }
        }
        debug!(count = collection.items.len(), "collection replaced");
        self.items = collection.items;
        self.page = collection.page;
        self.touch();
    }

    /// Remove the first item with the same identity as `user`.
    fn remove_one(&mut self, user: &User) -> Option<(usize, User)> {
        let index = self.items.iter().position(|u| same_identity(u, user))?;
        let removed = self.items.remove(index);
        self.touch();
        Some((index, removed))
    }

    fn fail(&mut self, error: &ApiError) {
        self.error = Some(error.to_string());
        self.touch();
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Two users are the same item when their self links match, or, lacking
/// links on both sides, their numeric ids match.
fn same_identity(a: &User, b: &User) -> bool {
    match (a.self_href(), b.self_href()) {
        (Some(x), Some(y)) => x == y,
        (None, None) => a.id.is_some() && a.id == b.id,
        _ => false,
    }
}
