//! Analytics REST backend client

use async_trait::async_trait;
use branch_assistant_config::AnalyticsConfig;
use branch_assistant_core::{BranchComparison, BranchDirectory, FootfallDay, RealTimeStats};
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::range::DateRange;
use crate::AnalyticsError;

/// Source of dashboard analytics
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    /// Daily footfall per branch over the range
    async fn footfall_trends(&self, range: &DateRange) -> Result<Vec<FootfallDay>, AnalyticsError>;

    /// Aggregated branch metrics over the range, names already mapped for display
    async fn branch_comparison(&self, range: &DateRange) -> Result<Vec<BranchComparison>, AnalyticsError>;

    /// Live server figures
    async fn real_time_stats(&self) -> Result<RealTimeStats, AnalyticsError>;

    /// Ask the backend to push fresh data into the language-model service
    async fn refresh_data_context(&self) -> Result<(), AnalyticsError>;
}

/// HTTP client for the analytics backend
#[derive(Clone)]
pub struct HttpAnalyticsClient {
    client: Client,
    base_url: String,
    directory: BranchDirectory,
}

impl HttpAnalyticsClient {
    pub fn new(config: &AnalyticsConfig, directory: BranchDirectory) -> Result<Self, AnalyticsError> {
        if config.base_url.trim().is_empty() {
            return Err(AnalyticsError::Configuration("base_url is empty".to_string()));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| AnalyticsError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            directory,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        range: Option<&DateRange>,
    ) -> Result<T, AnalyticsError> {
        let url = self.url(path);
        let mut request = self.client.get(&url);
        if let Some(range) = range {
            request = request.query(&range.query());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AnalyticsError::Status {
                status: status.as_u16(),
                url,
            });
        }

        response
            .json()
            .await
            .map_err(|e| AnalyticsError::Decode(format!("{}: {}", path, e)))
    }
}

#[async_trait]
impl AnalyticsSource for HttpAnalyticsClient {
    async fn footfall_trends(&self, range: &DateRange) -> Result<Vec<FootfallDay>, AnalyticsError> {
        self.get_json("/analytics/footfall-trends", Some(range)).await
    }

    async fn branch_comparison(&self, range: &DateRange) -> Result<Vec<BranchComparison>, AnalyticsError> {
        let mut branches: Vec<BranchComparison> =
            self.get_json("/analytics/branch-comparison", Some(range)).await?;
        for branch in &mut branches {
            branch.branch_name = self.directory.display_name(&branch.branch_name);
        }
        Ok(branches)
    }

    async fn real_time_stats(&self) -> Result<RealTimeStats, AnalyticsError> {
        self.get_json("/dashboard/real-time-stats", None).await
    }

    async fn refresh_data_context(&self) -> Result<(), AnalyticsError> {
        let url = self.url("/data-context/refresh");
        let response = self.client.post(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AnalyticsError::Status {
                status: status.as_u16(),
                url,
            });
        }
        tracing::info!(url = %url, "Requested data context refresh");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let config = AnalyticsConfig {
            base_url: "http://localhost:8080/api/".to_string(),
            ..Default::default()
        };
        let client = HttpAnalyticsClient::new(&config, BranchDirectory::default()).unwrap();
        assert_eq!(client.url("/dashboard/real-time-stats"), "http://localhost:8080/api/dashboard/real-time-stats");
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let config = AnalyticsConfig {
            base_url: " ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            HttpAnalyticsClient::new(&config, BranchDirectory::default()),
            Err(AnalyticsError::Configuration(_))
        ));
    }
}
