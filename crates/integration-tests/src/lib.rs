//! Integration test harness for Nom Now.
//!
//! [`TestContext::start`] boots two in-process servers on ephemeral ports:
//!
//! - a [`FakeBackend`] that answers the Nom Now REST API from seeded JSON
//! - the real storefront router, configured to talk to that fake
//!
//! Tests then drive the storefront with a cookie-keeping `reqwest` client,
//! the same way a browser would.
//!
//! # Seed data
//!
//! | Restaurant | Menu items                                  | Reviews            |
//! |------------|---------------------------------------------|--------------------|
//! | 1 Taco Town | 10 Al Pastor Taco ($3.50), 11 Horchata ($2.25) | 1 "Great tacos" (order 5) |
//! | 2 Pho Real  | 20 Pho Tai ($12.00)                         | none               |
//!
//! `demo@aa.io` / `password` logs in as a user with a full delivery address.
//! A review for [`REJECTED_ORDER_ID`] is refused with a form error.

#![allow(clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use nom_now_storefront::api::NomNowClient;
use nom_now_storefront::config::{ApiConfig, StorefrontConfig};
use nom_now_storefront::state::AppState;
use serde_json::{Value, json};
use url::Url;

/// Login email the fake backend accepts.
pub const DEMO_EMAIL: &str = "demo@aa.io";
/// Password for [`DEMO_EMAIL`].
pub const DEMO_PASSWORD: &str = "password";
/// Reviews for this order are refused by the fake backend.
pub const REJECTED_ORDER_ID: i64 = 999;

// =============================================================================
// Fake backend
// =============================================================================

#[derive(Debug, Default)]
struct BackendData {
    restaurants: Vec<Value>,
    menu_items: Vec<Value>,
    reviews: Vec<Value>,
    next_review_id: i64,
    requests: Vec<String>,
}

/// In-memory stand-in for the Nom Now backend.
#[derive(Clone, Default)]
pub struct FakeBackend {
    data: Arc<Mutex<BackendData>>,
}

impl FakeBackend {
    /// A backend holding the seed data described in the crate docs.
    #[must_use]
    pub fn seeded() -> Self {
        let data = BackendData {
            restaurants: vec![
                restaurant(1, "Taco Town", "Mexican"),
                restaurant(2, "Pho Real", "Vietnamese"),
            ],
            menu_items: vec![
                menu_item(10, 1, "Al Pastor Taco", "3.50"),
                menu_item(11, 1, "Horchata", "2.25"),
                menu_item(20, 2, "Pho Tai", "12.00"),
            ],
            reviews: vec![json!({
                "id": 1,
                "user_id": 1,
                "restaurant_id": 1,
                "order_id": 5,
                "review": "Great tacos",
                "order_rating": 5,
                "restaurant_rating": 4,
            })],
            next_review_id: 2,
            requests: Vec::new(),
        };

        Self {
            data: Arc::new(Mutex::new(data)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BackendData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every request seen so far, as `METHOD /path`.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    /// How many times `METHOD /path` was requested.
    #[must_use]
    pub fn count(&self, request: &str) -> usize {
        self.lock().requests.iter().filter(|r| *r == request).count()
    }

    /// Review texts currently stored for a restaurant.
    #[must_use]
    pub fn review_texts(&self, restaurant_id: i64) -> Vec<String> {
        self.lock()
            .reviews
            .iter()
            .filter(|r| r["restaurant_id"] == restaurant_id)
            .filter_map(|r| r["review"].as_str().map(str::to_string))
            .collect()
    }

    /// The backend's routes.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/restaurants", get(list_restaurants))
            .route("/api/restaurants/{id}", get(show_restaurant))
            .route("/api/menu-items", get(list_menu_items))
            .route("/api/menu-items/{id}", get(show_menu_item))
            .route("/api/menu-items/{id}/update", put(update_menu_item))
            .route("/api/menu-items/{id}/delete", delete(delete_menu_item))
            .route("/api/reviews", post(create_review))
            .route("/api/reviews/{id}", delete(delete_review))
            .route("/api/reviews/restaurant/{id}", get(list_reviews))
            .route("/api/auth/login", post(login))
            .route("/api/auth/signup", post(signup))
            .route("/api/auth/logout", get(logout))
            .layer(middleware::from_fn_with_state(self.clone(), record_request))
            .with_state(self.clone())
    }
}

fn restaurant(id: i64, name: &str, cuisine: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "address": "12 Elm St",
        "city": "Austin",
        "state": "TX",
        "zip": "78701",
        "cuisineType": cuisine,
        "priceLevel": "$$",
        "deliveryTime": 25,
        "deliveryFee": "2.99",
        "businessHours": "11am - 10pm",
    })
}

fn menu_item(id: i64, restaurant_id: i64, name: &str, price: &str) -> Value {
    json!({
        "id": id,
        "restaurantId": restaurant_id,
        "name": name,
        "foodType": "Entree",
        "description": format!("House {name}"),
        "price": price,
    })
}

fn demo_user() -> Value {
    json!({
        "id": 1,
        "username": "demo",
        "email": DEMO_EMAIL,
        "firstName": "Demo",
        "lastName": "User",
        "address": "1 Main St",
        "city": "Austin",
        "state": "TX",
        "zip": "78701",
    })
}

fn not_found(message: &str) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
}

fn find(list: &[Value], id: i64) -> Option<Value> {
    list.iter().find(|v| v["id"] == id).cloned()
}

async fn record_request(State(backend): State<FakeBackend>, request: Request, next: Next) -> Response {
    let line = format!("{} {}", request.method(), request.uri().path());
    backend.lock().requests.push(line);
    next.run(request).await
}

async fn list_restaurants(State(backend): State<FakeBackend>) -> Json<Value> {
    Json(json!({ "restaurants": backend.lock().restaurants }))
}

async fn show_restaurant(State(backend): State<FakeBackend>, Path(id): Path<i64>) -> Response {
    match find(&backend.lock().restaurants, id) {
        Some(restaurant) => Json(json!({ "restaurant": restaurant })).into_response(),
        None => not_found("Restaurant couldn't be found"),
    }
}

async fn list_menu_items(State(backend): State<FakeBackend>) -> Json<Value> {
    Json(json!({ "menuItems": backend.lock().menu_items }))
}

async fn show_menu_item(State(backend): State<FakeBackend>, Path(id): Path<i64>) -> Response {
    match find(&backend.lock().menu_items, id) {
        Some(item) => Json(item).into_response(),
        None => not_found("Menu item couldn't be found"),
    }
}

async fn update_menu_item(
    State(backend): State<FakeBackend>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if body["name"].as_str().is_none_or(str::is_empty) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "errors": { "name": ["This field is required."] } })),
        )
            .into_response();
    }

    let mut data = backend.lock();
    let Some(item) = data.menu_items.iter_mut().find(|v| v["id"] == id) else {
        return not_found("Menu item couldn't be found");
    };
    for field in ["name", "foodType", "description", "price", "foodImage"] {
        item[field] = body[field].clone();
    }
    Json(item.clone()).into_response()
}

async fn delete_menu_item(State(backend): State<FakeBackend>, Path(id): Path<i64>) -> Response {
    let mut data = backend.lock();
    let before = data.menu_items.len();
    data.menu_items.retain(|v| v["id"] != id);
    if data.menu_items.len() == before {
        return not_found("Menu item couldn't be found");
    }
    Json(json!({ "message": "Successfully deleted", "id": id })).into_response()
}

async fn list_reviews(State(backend): State<FakeBackend>, Path(id): Path<i64>) -> Json<Value> {
    let reviews: Vec<Value> = backend
        .lock()
        .reviews
        .iter()
        .filter(|r| r["restaurant_id"] == id)
        .cloned()
        .collect();
    Json(json!({ "reviews": reviews }))
}

async fn create_review(State(backend): State<FakeBackend>, Json(body): Json<Value>) -> Response {
    if body["order_id"] == REJECTED_ORDER_ID {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "errors": { "order_id": ["Order not found"] } })),
        )
            .into_response();
    }

    let mut data = backend.lock();
    let review = json!({
        "id": data.next_review_id,
        "user_id": 1,
        "restaurant_id": body["restaurant_id"],
        "order_id": body["order_id"],
        "review": body["review"],
        "order_rating": body["order_rating"],
        "restaurant_rating": body["restaurant_rating"],
    });
    data.next_review_id += 1;
    data.reviews.push(review.clone());

    (StatusCode::CREATED, Json(review)).into_response()
}

async fn delete_review(State(backend): State<FakeBackend>, Path(id): Path<i64>) -> Response {
    let mut data = backend.lock();
    let before = data.reviews.len();
    data.reviews.retain(|r| r["id"] != id);
    if data.reviews.len() == before {
        return not_found("Review couldn't be found");
    }
    Json(json!({ "message": "Successfully deleted" })).into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["email"] == DEMO_EMAIL && body["password"] == DEMO_PASSWORD {
        return Json(demo_user()).into_response();
    }
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "errors": { "credentials": ["Invalid email or password"] } })),
    )
        .into_response()
}

async fn signup(Json(body): Json<Value>) -> Response {
    if body["email"] == DEMO_EMAIL {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "errors": { "email": ["Email address is already in use."] } })),
        )
            .into_response();
    }
    Json(json!({
        "id": 2,
        "username": body["username"],
        "email": body["email"],
        "firstName": body["firstName"],
        "lastName": body["lastName"],
        "address": body["address"],
        "city": body["city"],
        "state": body["state"],
        "zip": body["zip"],
    }))
    .into_response()
}

async fn logout() -> Json<Value> {
    Json(json!({ "message": "User logged out" }))
}

// =============================================================================
// Test context
// =============================================================================

async fn serve(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("Failed to bind test listener");
    let addr = listener
        .local_addr()
        .expect("Failed to read listener address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Storefront configuration pointing at a backend URL.
#[must_use]
pub fn storefront_config(api_url: Url) -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://127.0.0.1".to_string(),
        api: ApiConfig::new(api_url),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// A running fake backend plus a storefront wired to it.
pub struct TestContext {
    pub backend: FakeBackend,
    pub api_url: Url,
    pub storefront_url: String,
    /// Follows redirects and keeps the session cookie.
    pub client: reqwest::Client,
}

impl TestContext {
    pub async fn start() -> Self {
        let backend = FakeBackend::seeded();
        let backend_addr = serve(backend.router()).await;
        let api_url =
            Url::parse(&format!("http://{backend_addr}")).expect("Failed to build backend URL");

        let state = AppState::new(storefront_config(api_url.clone()))
            .expect("Failed to build storefront state");
        let storefront_addr = serve(nom_now_storefront::app(state)).await;

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            backend,
            api_url,
            storefront_url: format!("http://{storefront_addr}"),
            client,
        }
    }

    /// Absolute storefront URL for a path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.storefront_url)
    }

    /// A backend client talking straight to the fake.
    #[must_use]
    pub fn api_client(&self) -> NomNowClient {
        let config = storefront_config(self.api_url.clone());
        NomNowClient::new(&config.api).expect("Failed to build API client")
    }

    /// GET a storefront page, returning status and body.
    pub async fn get(&self, path: &str) -> (reqwest::StatusCode, String) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET");
        let status = resp.status();
        (status, resp.text().await.expect("Failed to read body"))
    }

    /// POST a form, following the redirect; returns the final status and body.
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> (reqwest::StatusCode, String) {
        let resp = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Failed to send POST");
        let status = resp.status();
        (status, resp.text().await.expect("Failed to read body"))
    }

    /// Log in as the demo user.
    pub async fn login(&self) -> String {
        let (status, body) = self
            .post("/login", &[("email", DEMO_EMAIL), ("password", DEMO_PASSWORD)])
            .await;
        assert_eq!(status, reqwest::StatusCode::OK, "login failed: {body}");
        body
    }
}
