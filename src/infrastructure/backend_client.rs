// Dashboard backend client - one GET per source, no retries
use crate::application::sources::DashboardSource;
use crate::domain::source_result::{SourceKind, SourceResult};
use crate::domain::sources::{AnalyticsData, HealthData, ProjectsData, SourcePayload, WorkflowsData};
use crate::infrastructure::config::resource_url;
use crate::infrastructure::fetch_error::FetchError;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpDashboardClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDashboardClient {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build dashboard HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn path_for(kind: SourceKind) -> &'static str {
        match kind {
            SourceKind::Health => "/health",
            SourceKind::Analytics => "/analytics",
            SourceKind::Workflows => "/workflows",
            SourceKind::Projects => "/projects",
        }
    }

    async fn fetch<T: SourcePayload>(&self) -> SourceResult<T> {
        let url = resource_url(&self.base_url, Self::path_for(T::KIND));
        tracing::debug!("Fetching {} from {}", T::KIND, url);

        let result = get_json::<T>(&self.client, &url).await;
        if let Err(e) = &result {
            tracing::debug!("Fetch of {} failed: {}", T::KIND, e);
        }
        result.into()
    }
}

/// GET a JSON body, classifying every failure into a `FetchError`.
pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, FetchError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus(status.as_u16()));
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[async_trait]
impl DashboardSource for HttpDashboardClient {
    async fn fetch_health(&self) -> SourceResult<HealthData> {
        self.fetch().await
    }

    async fn fetch_analytics(&self) -> SourceResult<AnalyticsData> {
        self.fetch().await
    }

    async fn fetch_workflows(&self) -> SourceResult<WorkflowsData> {
        self.fetch().await
    }

    async fn fetch_projects(&self) -> SourceResult<ProjectsData> {
        self.fetch().await
    }
}
