use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Response, header::DATE};
use serde::de::DeserializeOwned;

use crate::dao::{
    CurrentStateResponse, ScoreboardApi,
    models::{
        CurrentState, RoundInformation, ServiceStatsInformation, TeamHistoryInformation, TeamId,
        TeamsDocument, Tick,
    },
};

use super::{
    config::ApiConfig,
    error::{ApiError, ApiResult},
};

const CURRENT_STATE: &str = "scoreboard_current.json";
const TEAMS: &str = "scoreboard_teams.json";
const SERVICE_STATS: &str = "scoreboard_service_stats.json";

fn round_path(tick: Tick) -> String {
    format!("scoreboard_round_{tick}.json")
}

fn team_path(team_id: TeamId) -> String {
    format!("scoreboard_team_{team_id}.json")
}

/// [`ScoreboardApi`] implementation fetching the documents over HTTP(S).
#[derive(Clone)]
pub struct HttpScoreboardApi {
    client: Client,
    base_url: Arc<str>,
}

impl HttpScoreboardApi {
    /// Build the HTTP client for the configured backend.
    pub fn new(config: ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|source| ApiError::ClientBuilder { source })?;

        let base = config.normalized_base();
        if reqwest::Url::parse(&base).is_err() {
            return Err(ApiError::InvalidUrl { url: base });
        }

        Ok(Self {
            client,
            base_url: Arc::from(base),
        })
    }

    async fn send(&self, path: &str) -> ApiResult<Response> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::RequestSend {
                path: path.to_string(),
                source,
            })?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ApiError::RequestStatus {
                path: path.to_string(),
                status: response.status(),
            })
        }
    }

    async fn get_document<T>(&self, path: &str) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(path).await?;
        response
            .json::<T>()
            .await
            .map_err(|source| ApiError::DecodeResponse {
                path: path.to_string(),
                source,
            })
    }
}

impl ScoreboardApi for HttpScoreboardApi {
    fn current_state(&self) -> BoxFuture<'static, ApiResult<CurrentStateResponse>> {
        let api = self.clone();
        Box::pin(async move {
            let response = api.send(CURRENT_STATE).await?;
            let date_header = response
                .headers()
                .get(DATE)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            let state = response
                .json::<CurrentState>()
                .await
                .map_err(|source| ApiError::DecodeResponse {
                    path: CURRENT_STATE.to_string(),
                    source,
                })?;
            Ok(CurrentStateResponse { state, date_header })
        })
    }

    fn teams(&self) -> BoxFuture<'static, ApiResult<TeamsDocument>> {
        let api = self.clone();
        Box::pin(async move { api.get_document(TEAMS).await })
    }

    fn round(&self, tick: Tick) -> BoxFuture<'static, ApiResult<RoundInformation>> {
        let api = self.clone();
        Box::pin(async move { api.get_document(&round_path(tick)).await })
    }

    fn team_history(&self, team_id: TeamId) -> BoxFuture<'static, ApiResult<TeamHistoryInformation>> {
        let api = self.clone();
        Box::pin(async move { api.get_document(&team_path(team_id)).await })
    }

    fn service_stats(&self) -> BoxFuture<'static, ApiResult<ServiceStatsInformation>> {
        let api = self.clone();
        Box::pin(async move { api.get_document(SERVICE_STATS).await })
    }
}
