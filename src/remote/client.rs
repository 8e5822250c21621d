//! HTTP client for the wardrobe REST API

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::{Deserialize, de::DeserializeOwned};

use super::stats::Statistic;
use crate::config::WardrobeConfig;
use crate::database::WardrobeItem;
use crate::error::{Result, WardrobeError};
use crate::events::{EventBus, EventName, EventPayload};

/// Body of `GET items/{userId}`
#[derive(Debug, Deserialize)]
struct UserItemsResponse {
    #[serde(rename = "usersItems", default)]
    users_items: Vec<WardrobeItem>,
}

/// Body of every `GET stats/{userId}/...`
#[derive(Debug, Deserialize)]
struct StatsResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

/// Client for the remote item repository.
///
/// Requests carry the cookie-based session and are never retried; a failed
/// attempt is returned as [`WardrobeError::NetworkError`] and, for mutations,
/// reported on the bus.
#[derive(Debug, Clone)]
pub struct RemoteRepository {
    client: Client,
    base_url: Url,
    bus: EventBus,
}

impl RemoteRepository {
    /// Create a client from configuration
    pub fn new(config: &WardrobeConfig, bus: EventBus) -> Result<Self> {
        let base_url = Url::parse(&config.api_base_url).map_err(|e| {
            WardrobeError::InvalidConfig(format!("api_base_url '{}': {e}", config.api_base_url))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(WardrobeError::InvalidConfig(format!(
                "api_base_url '{}' cannot be a base URL",
                config.api_base_url
            )));
        }

        let mut builder = Client::builder().cookie_store(true);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| WardrobeError::InvalidConfig(format!("HTTP client: {e}")))?;

        tracing::debug!(base_url = %base_url, "remote repository created");
        Ok(Self {
            client,
            base_url,
            bus,
        })
    }

    /// Create a client for `base_url` with otherwise default configuration
    pub fn with_base_url(base_url: &str, bus: EventBus) -> Result<Self> {
        Self::new(&WardrobeConfig::default().with_api_base_url(base_url), bus)
    }

    /// The configured API base
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve path segments against the base URL, percent-encoding each one
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| WardrobeError::InvalidConfig("API base URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(WardrobeError::NetworkError(format!(
                "Bad network response: {status} from {}",
                response.url()
            )));
        }
        Ok(response)
    }

    /// Store a new item for its user.
    ///
    /// Returns the created record when the server echoes it back.
    /// Emits `item-store-success` or `item-store-failure`.
    pub async fn create_item(&self, item: &WardrobeItem) -> Result<Option<WardrobeItem>> {
        let result = self.post_item(item).await;
        match &result {
            Ok(created) => {
                let payload = created.clone().unwrap_or_else(|| item.clone());
                self.bus
                    .emit(EventName::ItemStoreSuccess, Some(EventPayload::Item(payload)));
            }
            Err(e) => self.report_failure(EventName::ItemStoreFailure, "Error storing wardrobe items", e),
        }
        result
    }

    async fn post_item(&self, item: &WardrobeItem) -> Result<Option<WardrobeItem>> {
        item.validate()?;
        let url = self.endpoint(&["items", ""])?;
        tracing::debug!(%url, name = %item.name, "POST item");

        let response = self.send(self.request(Method::POST, url).json(item)).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice::<WardrobeItem>(&body).ok())
    }

    /// Every item owned by `user_id`. Reads emit no events.
    pub async fn read_all_for_user(&self, user_id: &str) -> Result<Vec<WardrobeItem>> {
        let url = self.endpoint(&["items", user_id])?;
        tracing::debug!(%url, "GET items");

        let result = async {
            let response = self.send(self.request(Method::GET, url)).await?;
            let body: UserItemsResponse = decode_body(response).await?;
            Ok::<_, WardrobeError>(body.users_items)
        }
        .await;

        if let Err(e) = &result {
            tracing::error!("Error fetching wardrobe items: {e}");
        }
        result
    }

    /// Replace an item with the complete `item`; the server locates it by `item_id`.
    ///
    /// Emits `item-update-success` or `item-update-failure`.
    pub async fn update_item(&self, item: &WardrobeItem) -> Result<()> {
        let result = self.put_item(item).await;
        match &result {
            Ok(()) => self
                .bus
                .emit(EventName::ItemUpdateSuccess, Some(EventPayload::Item(item.clone()))),
            Err(e) => self.report_failure(EventName::ItemUpdateFailure, "Error updating wardrobe items", e),
        }
        result
    }

    async fn put_item(&self, item: &WardrobeItem) -> Result<()> {
        item.validate()?;
        if item.item_id.is_none() {
            return Err(WardrobeError::ValidationError(
                "Cannot update an item without item_id".to_string(),
            ));
        }
        let url = self.endpoint(&["items", ""])?;
        tracing::debug!(%url, item_id = ?item.item_id, "PUT item");

        self.send(self.request(Method::PUT, url).json(item)).await?;
        Ok(())
    }

    /// One statistics collection for `user_id`
    pub async fn statistic<T: DeserializeOwned>(
        &self,
        user_id: &str,
        statistic: Statistic,
    ) -> Result<Vec<T>> {
        let url = self.endpoint(&["stats", user_id, statistic.path()])?;
        tracing::debug!(%url, "GET statistic");

        let result = async {
            let response = self.send(self.request(Method::GET, url)).await?;
            let body: StatsResponse<T> = decode_body(response).await?;
            Ok::<_, WardrobeError>(body.items)
        }
        .await;

        if let Err(e) = &result {
            tracing::error!(statistic = statistic.path(), "Error fetching wardrobe items: {e}");
        }
        result
    }

    /// Suggested outfit combinations for `user_id`, as returned by the server
    pub async fn suggested_outfits(&self, user_id: &str) -> Result<serde_json::Value> {
        let url = self.endpoint(&["suggestions", user_id])?;
        tracing::debug!(%url, "GET suggestions");

        let result = async {
            let response = self.send(self.request(Method::GET, url)).await?;
            decode_body::<serde_json::Value>(response).await
        }
        .await;

        if let Err(e) = &result {
            tracing::error!("Error fetching suggested outfits: {e}");
        }
        result
    }

    fn report_failure(&self, name: EventName, context: &str, err: &WardrobeError) {
        tracing::error!(event = %name, "{context}: {err}");
        self.bus.emit(name, Some(EventPayload::Error(err.to_string())));
    }
}

/// Read the whole body, then parse it. A malformed body is a
/// [`WardrobeError::SerializationError`], not a transport failure.
async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Occasion, Season};
    use crate::events::Event;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn base(server: &Server) -> String {
        format!("{}/v1/", server.url())
    }

    fn recorder(bus: &EventBus, names: &[EventName]) -> Arc<Mutex<Vec<Event>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        for name in names {
            let seen = seen.clone();
            bus.subscribe(*name, move |event| seen.lock().unwrap().push(event.clone()));
        }
        seen
    }

    fn jacket() -> WardrobeItem {
        let mut item = WardrobeItem::new("Blue Jacket", [Season::Fall, Season::Winter]);
        item.user_id = Some("user-1".to_string());
        item.occasion = Occasion::Casual;
        item
    }

    #[test]
    fn test_endpoint_building() {
        let repo = RemoteRepository::with_base_url("http://localhost:4000/v1/", EventBus::new())
            .unwrap();
        assert_eq!(
            repo.endpoint(&["items", ""]).unwrap().as_str(),
            "http://localhost:4000/v1/items/"
        );
        assert_eq!(
            repo.endpoint(&["stats", "a b", "most-worn"]).unwrap().as_str(),
            "http://localhost:4000/v1/stats/a%20b/most-worn"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = RemoteRepository::with_base_url("not a url", EventBus::new());
        assert!(matches!(result, Err(WardrobeError::InvalidConfig(_))));

        let result = RemoteRepository::with_base_url("mailto:someone@example.com", EventBus::new());
        assert!(matches!(result, Err(WardrobeError::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_create_item_posts_and_emits_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/items/")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(json!({
                "name": "Blue Jacket",
                "seasons": ["fall", "winter"],
                "occasion": "casual"
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "item_id": 7,
                    "user_id": "user-1",
                    "name": "Blue Jacket",
                    "seasons": ["fall", "winter"],
                    "occasion": "casual"
                })
                .to_string(),
            )
            .create_async()
            .await;

        let bus = EventBus::new();
        let seen = recorder(&bus, &[EventName::ItemStoreSuccess]);
        let repo = RemoteRepository::with_base_url(&base(&server), bus).unwrap();

        let created = repo.create_item(&jacket()).await.unwrap().unwrap();
        assert_eq!(created.item_id, Some(7));
        assert_eq!(seen.lock().unwrap().len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_item_failure_emits_failure() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/v1/items/")
            .with_status(500)
            .create_async()
            .await;

        let bus = EventBus::new();
        let seen = recorder(&bus, &[EventName::ItemStoreSuccess, EventName::ItemStoreFailure]);
        let repo = RemoteRepository::with_base_url(&base(&server), bus).unwrap();

        let result = repo.create_item(&jacket()).await;
        assert!(matches!(result, Err(WardrobeError::NetworkError(_))));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].name, EventName::ItemStoreFailure);
    }

    #[tokio::test]
    async fn test_read_all_for_user() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/v1/items/user-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "usersItems": [
                    { "item_id": 1, "name": "Blue Jacket", "brand": "Acme", "seasons": ["fall"], "occasion": "casual" },
                    { "item_id": 2, "name": "Loafers", "seasons": ["spring", "summer"], "occasion": "business" }
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let bus = EventBus::new();
        let seen = recorder(&bus, &EventName::ALL);
        let repo = RemoteRepository::with_base_url(&base(&server), bus).unwrap();

        let items = repo.read_all_for_user("user-1").await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].occasion, Occasion::Business);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_all_for_user_accepts_null_columns() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/v1/items/user-1")
            .with_status(200)
            .with_body(
                json!({ "usersItems": [
                    { "item_id": 1, "name": "A", "brand": "Acme", "seasons": ["fall"] },
                    { "item_id": 2, "name": "B", "brand": null, "size": null, "cost": null,
                      "image": null, "seasons": ["fall"] }
                ]})
                .to_string(),
            )
            .create_async()
            .await;

        let repo = RemoteRepository::with_base_url(&base(&server), EventBus::new()).unwrap();
        let items = repo.read_all_for_user("user-1").await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].brand, "");
        assert_eq!(items[1].cost, 0.0);
    }

    #[tokio::test]
    async fn test_malformed_body_is_serialization_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/v1/items/user-1")
            .with_status(200)
            .with_body(r#"{ "usersItems": [ { "name": "A", "seasons": ["monsoon"] } ] }"#)
            .create_async()
            .await;

        let repo = RemoteRepository::with_base_url(&base(&server), EventBus::new()).unwrap();
        let result = repo.read_all_for_user("user-1").await;
        assert!(matches!(result, Err(WardrobeError::SerializationError(_))));
    }

    #[tokio::test]
    async fn test_read_all_for_user_non_ok() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/v1/items/user-1")
            .with_status(404)
            .create_async()
            .await;

        let repo = RemoteRepository::with_base_url(&base(&server), EventBus::new()).unwrap();
        let result = repo.read_all_for_user("user-1").await;
        assert!(matches!(result, Err(WardrobeError::NetworkError(_))));
    }

    #[tokio::test]
    async fn test_update_item_puts_full_record() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/v1/items/")
            .match_body(Matcher::PartialJson(json!({ "item_id": 7, "is_favorite": true })))
            .with_status(200)
            .create_async()
            .await;

        let bus = EventBus::new();
        let seen = recorder(&bus, &[EventName::ItemUpdateSuccess]);
        let repo = RemoteRepository::with_base_url(&base(&server), bus).unwrap();

        let mut item = jacket();
        item.item_id = Some(7);
        item.is_favorite = true;
        repo.update_item(&item).await.unwrap();

        assert_eq!(seen.lock().unwrap().len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_item_without_id_is_rejected() {
        let bus = EventBus::new();
        let seen = recorder(&bus, &[EventName::ItemUpdateFailure]);
        let repo = RemoteRepository::with_base_url("http://localhost:4000/v1/", bus).unwrap();

        let result = repo.update_item(&jacket()).await;
        assert!(matches!(result, Err(WardrobeError::ValidationError(_))));
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_statistics_and_suggestions() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/v1/stats/user-1/most-worn")
            .with_status(200)
            .with_body(json!({ "items": [{ "name": "Blue Jacket", "times_worn": 12 }] }).to_string())
            .create_async()
            .await;
        server
            .mock("GET", "/v1/stats/user-1/category-frequency")
            .with_status(503)
            .create_async()
            .await;
        server
            .mock("GET", "/v1/suggestions/user-1")
            .with_status(200)
            .with_body(json!({ "outfits": [[1, 2], [3]] }).to_string())
            .create_async()
            .await;

        let repo = RemoteRepository::with_base_url(&base(&server), EventBus::new()).unwrap();

        let worn: Vec<serde_json::Value> =
            repo.statistic("user-1", Statistic::MostWorn).await.unwrap();
        assert_eq!(worn[0]["times_worn"], json!(12));

        let failed = repo
            .statistic::<serde_json::Value>("user-1", Statistic::CategoryFrequency)
            .await;
        assert!(matches!(failed, Err(WardrobeError::NetworkError(_))));

        let suggestions = repo.suggested_outfits("user-1").await.unwrap();
        assert_eq!(suggestions["outfits"][1], json!([3]));
    }
}
