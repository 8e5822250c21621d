//! Read-only statistics endpoints
//!
//! Each statistic is a parameterless (besides the user id) GET answering
//! `{items: [...]}`. Entry shapes are server-defined and passed through as JSON.

use serde_json::Value;

use super::client::RemoteRepository;
use crate::error::Result;

/// Statistics exposed under `stats/{userId}/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    /// Top-worn items
    MostWorn,
    /// Items worn less than twice
    LeastWorn,
    /// Cost divided by wear count, per item
    CostPerWear,
    /// Wear counts by category
    CategoryFrequency,
    /// Item counts by category
    ItemsPerCategory,
}

impl Statistic {
    pub const ALL: [Statistic; 5] = [
        Statistic::MostWorn,
        Statistic::LeastWorn,
        Statistic::CostPerWear,
        Statistic::CategoryFrequency,
        Statistic::ItemsPerCategory,
    ];

    /// Final path segment
    pub fn path(&self) -> &'static str {
        match self {
            Statistic::MostWorn => "most-worn",
            Statistic::LeastWorn => "least-worn",
            Statistic::CostPerWear => "cost-per-wear",
            Statistic::CategoryFrequency => "category-frequency",
            Statistic::ItemsPerCategory => "items-per-category",
        }
    }
}

impl RemoteRepository {
    pub async fn most_worn(&self, user_id: &str) -> Result<Vec<Value>> {
        self.statistic(user_id, Statistic::MostWorn).await
    }

    pub async fn least_worn(&self, user_id: &str) -> Result<Vec<Value>> {
        self.statistic(user_id, Statistic::LeastWorn).await
    }

    pub async fn cost_per_wear(&self, user_id: &str) -> Result<Vec<Value>> {
        self.statistic(user_id, Statistic::CostPerWear).await
    }

    /// Wear frequency grouped by category
    pub async fn category_frequency(&self, user_id: &str) -> Result<Vec<Value>> {
        self.statistic(user_id, Statistic::CategoryFrequency).await
    }

    pub async fn items_per_category(&self, user_id: &str) -> Result<Vec<Value>> {
        self.statistic(user_id, Statistic::ItemsPerCategory).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WardrobeError;
    use crate::events::EventBus;
    use mockito::Server;
    use serde_json::json;

    #[test]
    fn test_paths_are_distinct() {
        let mut paths: Vec<&str> = Statistic::ALL.iter().map(Statistic::path).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), Statistic::ALL.len());
    }

    #[tokio::test]
    async fn test_every_statistic_hits_its_endpoint() {
        let mut server = Server::new_async().await;
        let mut mocks = Vec::new();
        for stat in Statistic::ALL {
            let mock = server
                .mock("GET", format!("/v1/stats/u7/{}", stat.path()).as_str())
                .with_status(200)
                .with_body(json!({ "items": [{ "stat": stat.path() }] }).to_string())
                .create_async()
                .await;
            mocks.push(mock);
        }

        let repo = RemoteRepository::with_base_url(&format!("{}/v1/", server.url()), EventBus::new())
            .unwrap();

        assert_eq!(repo.most_worn("u7").await.unwrap()[0]["stat"], json!("most-worn"));
        assert_eq!(repo.least_worn("u7").await.unwrap()[0]["stat"], json!("least-worn"));
        assert_eq!(repo.cost_per_wear("u7").await.unwrap()[0]["stat"], json!("cost-per-wear"));
        assert_eq!(
            repo.category_frequency("u7").await.unwrap()[0]["stat"],
            json!("category-frequency")
        );
        assert_eq!(
            repo.items_per_category("u7").await.unwrap()[0]["stat"],
            json!("items-per-category")
        );

        for mock in mocks {
            mock.assert_async().await;
        }
    }

    #[tokio::test]
    async fn test_non_ok_statistic_is_network_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/v1/stats/u7/least-worn")
            .with_status(401)
            .create_async()
            .await;

        let repo = RemoteRepository::with_base_url(&format!("{}/v1/", server.url()), EventBus::new())
            .unwrap();
        assert!(matches!(
            repo.least_worn("u7").await,
            Err(WardrobeError::NetworkError(_))
        ));
    }
}
