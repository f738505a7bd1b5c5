//! HTTP client for the Nom Now backend.
//!
//! Uses `reqwest` for HTTP. Restaurants and menu items are cached using
//! `moka` for the configured TTL; writes to a menu item evict its entries.

use std::sync::Arc;

use moka::future::Cache;
use nom_now_core::{
    MenuItem, MenuItemId, MenuItemUpdate, NewReview, Restaurant, RestaurantId, Review, ReviewId,
    User,
};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, instrument};
use url::Url;

use super::cache::{CacheKey, CacheValue};
use super::{
    ApiError, Credentials, MenuItemsEnvelope, NomNowApi, RestaurantEnvelope, RestaurantsEnvelope,
    ReviewsEnvelope, Signup, describe_errors,
};
use crate::config::ApiConfig;

/// Maximum number of cached responses.
const CACHE_CAPACITY: u64 = 1000;

/// Client for the Nom Now backend REST API.
///
/// Cheap to clone; clones share the connection pool and cache.
#[derive(Clone)]
pub struct NomNowClient {
    inner: Arc<NomNowClientInner>,
}

struct NomNowClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl NomNowClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| ApiError::Parse(format!("Invalid API token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            inner: Arc::new(NomNowClientInner {
                client,
                base_url: with_trailing_slash(config.base_url.clone()),
                cache,
            }),
        })
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// Send a request and decode the JSON body.
    ///
    /// An `errors` key anywhere in a JSON body wins over the status code, since
    /// the backend sometimes reports validation failures with a 200.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        let parsed: Option<Value> = serde_json::from_str(&body).ok();

        if let Some(errors) = parsed
            .as_ref()
            .and_then(|v| v.get("errors"))
            .filter(|e| !e.is_null())
        {
            debug!(status = %status, errors = %errors, "Backend rejected request");
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: describe_errors(errors),
            });
        }

        if status == StatusCode::NOT_FOUND {
            let message = parsed
                .as_ref()
                .and_then(|v| v.get("message").or_else(|| v.get("error")))
                .and_then(Value::as_str)
                .map_or_else(|| format!("{what} couldn't be found"), str::to_string);
            return Err(ApiError::NotFound(message));
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let value = parsed.ok_or_else(|| ApiError::Parse(format!("{what}: body is not JSON")))?;
        serde_json::from_value(value).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to decode backend response"
            );
            ApiError::Parse(format!("{what}: {e}"))
        })
    }

    async fn evict_menu_item(&self, id: MenuItemId) {
        self.inner.cache.invalidate(&CacheKey::MenuItem(id)).await;
        self.inner.cache.invalidate(&CacheKey::MenuItems).await;
    }
}

impl NomNowApi for NomNowClient {
    #[instrument(skip(self))]
    async fn get_restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        if let Some(CacheValue::Restaurants(list)) =
            self.inner.cache.get(&CacheKey::Restaurants).await
        {
            debug!("Cache hit for restaurants");
            return Ok(list);
        }

        let request = self.inner.client.get(self.url("api/restaurants")?);
        let envelope: RestaurantsEnvelope = self.send(request, "Restaurants").await?;

        self.inner
            .cache
            .insert(
                CacheKey::Restaurants,
                CacheValue::Restaurants(envelope.restaurants.clone()),
            )
            .await;

        Ok(envelope.restaurants)
    }

    #[instrument(skip(self), fields(restaurant_id = %id))]
    async fn get_restaurant(&self, id: RestaurantId) -> Result<Restaurant, ApiError> {
        let key = CacheKey::Restaurant(id);
        if let Some(CacheValue::Restaurant(restaurant)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for restaurant");
            return Ok(*restaurant);
        }

        let request = self
            .inner
            .client
            .get(self.url(&format!("api/restaurants/{id}"))?);
        let envelope: RestaurantEnvelope = self.send(request, "Restaurant").await?;

        self.inner
            .cache
            .insert(key, CacheValue::Restaurant(Box::new(envelope.restaurant.clone())))
            .await;

        Ok(envelope.restaurant)
    }

    #[instrument(skip(self))]
    async fn get_menu_items(&self) -> Result<Vec<MenuItem>, ApiError> {
        if let Some(CacheValue::MenuItems(items)) = self.inner.cache.get(&CacheKey::MenuItems).await
        {
            debug!("Cache hit for menu items");
            return Ok(items);
        }

        let request = self.inner.client.get(self.url("api/menu-items")?);
        let envelope: MenuItemsEnvelope = self.send(request, "Menu items").await?;

        self.inner
            .cache
            .insert(
                CacheKey::MenuItems,
                CacheValue::MenuItems(envelope.menu_items.clone()),
            )
            .await;

        Ok(envelope.menu_items)
    }

    #[instrument(skip(self), fields(menu_item_id = %id))]
    async fn get_menu_item(&self, id: MenuItemId) -> Result<MenuItem, ApiError> {
        let key = CacheKey::MenuItem(id);
        if let Some(CacheValue::MenuItem(item)) = self.inner.cache.get(&key).await {
            debug!("Cache hit for menu item");
            return Ok(*item);
        }

        let request = self
            .inner
            .client
            .get(self.url(&format!("api/menu-items/{id}"))?);
        let item: MenuItem = self.send(request, "Menu item").await?;

        self.inner
            .cache
            .insert(key, CacheValue::MenuItem(Box::new(item.clone())))
            .await;

        Ok(item)
    }

    #[instrument(skip(self, update), fields(menu_item_id = %id))]
    async fn update_menu_item(
        &self,
        id: MenuItemId,
        update: &MenuItemUpdate,
    ) -> Result<MenuItem, ApiError> {
        let request = self
            .inner
            .client
            .put(self.url(&format!("api/menu-items/{id}/update"))?)
            .json(update);
        let item: MenuItem = self.send(request, "Menu item").await?;

        self.evict_menu_item(id).await;
        Ok(item)
    }

    #[instrument(skip(self), fields(menu_item_id = %id))]
    async fn delete_menu_item(&self, id: MenuItemId) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .delete(self.url(&format!("api/menu-items/{id}/delete"))?);
        let _: Value = self.send(request, "Menu item").await?;

        self.evict_menu_item(id).await;
        Ok(())
    }

    #[instrument(skip(self), fields(restaurant_id = %id))]
    async fn get_reviews_for_restaurant(&self, id: RestaurantId) -> Result<Vec<Review>, ApiError> {
        let request = self
            .inner
            .client
            .get(self.url(&format!("api/reviews/restaurant/{id}"))?);
        let envelope: ReviewsEnvelope = self.send(request, "Reviews").await?;
        Ok(envelope.reviews)
    }

    #[instrument(skip(self, review), fields(restaurant_id = %review.restaurant_id, order_id = %review.order_id))]
    async fn create_review(&self, review: &NewReview) -> Result<Review, ApiError> {
        let request = self
            .inner
            .client
            .post(self.url("api/reviews")?)
            .json(review);
        self.send(request, "Review").await
    }

    #[instrument(skip(self), fields(review_id = %id))]
    async fn delete_review(&self, id: ReviewId) -> Result<(), ApiError> {
        let request = self
            .inner
            .client
            .delete(self.url(&format!("api/reviews/{id}"))?);
        let _: Value = self.send(request, "Review").await?;
        Ok(())
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn login(&self, credentials: &Credentials) -> Result<User, ApiError> {
        let body = json!({
            "email": credentials.email,
            "password": credentials.password.expose_secret(),
        });
        let request = self
            .inner
            .client
            .post(self.url("api/auth/login")?)
            .json(&body);
        self.send(request, "User").await
    }

    #[instrument(skip(self, signup), fields(email = %signup.email))]
    async fn signup(&self, signup: &Signup) -> Result<User, ApiError> {
        let body = json!({
            "username": signup.username,
            "email": signup.email,
            "password": signup.password.expose_secret(),
            "firstName": signup.first_name,
            "lastName": signup.last_name,
            "address": signup.address,
            "city": signup.city,
            "state": signup.state,
            "zip": signup.zip,
        });
        let request = self
            .inner
            .client
            .post(self.url("api/auth/signup")?)
            .json(&body);
        self.send(request, "User").await
    }

    #[instrument(skip(self))]
    async fn logout(&self) -> Result<(), ApiError> {
        let request = self.inner.client.get(self.url("api/auth/logout")?);
        let _: Value = self.send(request, "Session").await?;
        Ok(())
    }
}

/// Ensure relative joins append to the base path instead of replacing it.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let base = with_trailing_slash(Url::parse("http://backend.local/nom-now").unwrap());
        assert_eq!(
            base.join("api/restaurants").unwrap().as_str(),
            "http://backend.local/nom-now/api/restaurants"
        );

        let root = with_trailing_slash(Url::parse("http://127.0.0.1:5000").unwrap());
        assert_eq!(
            root.join("api/menu-items/3").unwrap().as_str(),
            "http://127.0.0.1:5000/api/menu-items/3"
        );
    }

    #[test]
    fn test_client_rejects_unprintable_token() {
        let mut config = ApiConfig::new(Url::parse("http://127.0.0.1:5000").unwrap());
        config.token = Some(secrecy::SecretString::from("bad\ntoken"));
        assert!(matches!(
            NomNowClient::new(&config),
            Err(ApiError::Parse(_))
        ));
    }
}
