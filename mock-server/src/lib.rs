use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// Row stored by the backend. Columns are nullable, as in the user table.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserInput {
    pub username: Option<String>,
    pub gender: Option<String>,
    pub name: Option<String>,
    pub age: Option<i32>,
    pub status: Option<i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HalLink {
    pub href: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserLinks {
    #[serde(rename = "self")]
    pub self_link: HalLink,
    pub user: HalLink,
}

/// HAL representation of one user. The id is only visible through links.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserModel {
    #[serde(flatten)]
    pub user: UserInput,
    #[serde(rename = "_links")]
    pub links: UserLinks,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Embedded {
    pub users: Vec<UserModel>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CollectionLinks {
    #[serde(rename = "self")]
    pub self_link: HalLink,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub size: u64,
    pub total_elements: u64,
    pub total_pages: u64,
    pub number: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CollectionModel {
    #[serde(rename = "_embedded")]
    pub embedded: Embedded,
    #[serde(rename = "_links")]
    pub links: CollectionLinks,
    pub page: Page,
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: i64,
    users: BTreeMap<i64, UserInput>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone)]
pub struct AppState {
    db: Db,
    origin: Arc<str>,
}

impl AppState {
    fn user_href(&self, id: i64) -> String {
        format!("{}/be/users/{id}", self.origin)
    }

    fn model(&self, id: i64, user: &UserInput) -> UserModel {
        let href = self.user_href(id);
        UserModel {
            user: user.clone(),
            links: UserLinks {
                self_link: HalLink { href: href.clone() },
                user: HalLink { href },
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<u64>,
    pub size: Option<u64>,
}

/// Router whose links point at [`DEFAULT_ORIGIN`].
pub fn app() -> Router {
    app_with_origin(DEFAULT_ORIGIN)
}

/// Router whose self links are built on `origin`, which need not be the
/// address the server is actually reachable on.
pub fn app_with_origin(origin: &str) -> Router {
    let state = AppState {
        db: Arc::new(RwLock::new(Store::default())),
        origin: Arc::from(origin.trim_end_matches('/')),
    };
    Router::new()
        .route("/be/users", get(list_users).post(create_user))
        .route("/be/users/{id}", get(get_user).delete(delete_user))
        .with_state(state)
}

pub async fn run(listener: TcpListener, origin: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_origin(origin)).await
}

async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Json<CollectionModel> {
    let size = params.size.filter(|s| *s > 0).unwrap_or(DEFAULT_PAGE_SIZE);
    let number = params.page.unwrap_or(0);
    let offset = usize::try_from(number.saturating_mul(size)).unwrap_or(usize::MAX);
    let store = state.db.read().await;
    let total = store.users.len() as u64;
    let users = store
        .users
        .iter()
        .skip(offset)
        .take(usize::try_from(size).unwrap_or(usize::MAX))
        .map(|(id, user)| state.model(*id, user))
        .collect::<Vec<_>>();
    debug!(total, returned = users.len(), "list users");
    Json(CollectionModel {
        embedded: Embedded { users },
        links: CollectionLinks {
            self_link: HalLink {
                href: format!("{}/be/users", state.origin),
            },
        },
        page: Page {
            size,
            total_elements: total,
            total_pages: total.div_ceil(size),
            number,
        },
    })
}

async fn create_user(State(state): State<AppState>, Json(input): Json<UserInput>) -> Response {
    let blank = input.name.as_deref().map(str::trim).unwrap_or("").is_empty();
    if blank {
        debug!("rejected user without a name");
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "name must not be blank" })),
        )
            .into_response();
    }
    let mut store = state.db.write().await;
    store.next_id += 1;
    let id = store.next_id;
    store.users.insert(id, input.clone());
    debug!(id, "created user");
    let model = state.model(id, &input);
    (
        StatusCode::CREATED,
        [(header::LOCATION, state.user_href(id))],
        Json(model),
    )
        .into_response()
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserModel>, StatusCode> {
    let store = state.db.read().await;
    store
        .users
        .get(&id)
        .map(|user| Json(state.model(id, user)))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = state.db.write().await;
    let removed = store.users.remove(&id);
    debug!(id, found = removed.is_some(), "delete user");
    removed
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}
