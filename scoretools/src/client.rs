use anyhow::{anyhow, Result};
use log::debug;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Response,
    StatusCode,
};
use score_engine::db_types::StatsSummary;
use score_server::data_objects::{MatchResponse, ScoreUpdateRequest};
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

pub struct ScoreServerClient {
    client: Client,
    server: Url,
}

impl ScoreServerClient {
    pub fn new(server: &str) -> Result<Self> {
        let server = Url::parse(server).map_err(|e| anyhow!("Invalid server URL {server}. {e}"))?;
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        let client = Client::builder().user_agent("Football Score Client").default_headers(headers).build()?;
        Ok(Self { client, server })
    }

    pub fn server(&self) -> &str {
        self.server.as_str()
    }

    pub fn url(&self, path: &str) -> Result<Url> {
        self.server.join(path).map_err(|e| anyhow!("Failed to join URL: {}", e))
    }

    pub async fn health(&self) -> Result<String> {
        let url = self.url("/health")?;
        let res = self.client.get(url).send().await?;
        let response = res.text().await?;
        Ok(response)
    }

    pub async fn create_match(&self, team_a: &str, team_b: &str, scheduled_at: &str) -> Result<MatchResponse> {
        let url = self.url("/matches")?;
        let body = json!({ "team_a": team_a, "team_b": team_b, "scheduled_at": scheduled_at });
        let res = self.client.post(url).json(&body).send().await?;
        parse_response(res).await
    }

    /// Lists matches. `status` takes precedence over the `from`/`to` range on the server.
    pub async fn list_matches(
        &self,
        status: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<MatchResponse>> {
        let mut url = self.url("/matches")?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(status) = status {
                query.append_pair("status", status);
            }
            if let Some(from) = from {
                query.append_pair("from", from);
            }
            if let Some(to) = to {
                query.append_pair("to", to);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        debug!("GET {url}");
        let res = self.client.get(url).send().await?;
        parse_response(res).await
    }

    pub async fn get_match(&self, id: i64) -> Result<Option<MatchResponse>> {
        let url = self.url(&format!("/matches/{id}"))?;
        let res = self.client.get(url).send().await?;
        if res.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        parse_response(res).await.map(Some)
    }

    pub async fn update_score(&self, id: i64, score_a: i32, score_b: i32) -> Result<MatchResponse> {
        let url = self.url(&format!("/matches/{id}/score"))?;
        let res = self.client.put(url).json(&ScoreUpdateRequest { score_a, score_b }).send().await?;
        parse_response(res).await
    }

    pub async fn close_match(&self, id: i64) -> Result<MatchResponse> {
        let url = self.url(&format!("/matches/{id}/status?status=CLOSED"))?;
        let res = self.client.put(url).send().await?;
        parse_response(res).await
    }

    pub async fn delete_match(&self, id: i64) -> Result<()> {
        let url = self.url(&format!("/matches/{id}"))?;
        let res = self.client.delete(url).send().await?;
        if res.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(res).await)
        }
    }

    pub async fn stats(&self) -> Result<StatsSummary> {
        let url = self.url("/matches/stats")?;
        let res = self.client.get(url).send().await?;
        parse_response(res).await
    }
}

async fn parse_response<T: DeserializeOwned>(res: Response) -> Result<T> {
    if res.status().is_success() {
        Ok(res.json::<T>().await?)
    } else {
        Err(error_from_response(res).await)
    }
}

async fn error_from_response(res: Response) -> anyhow::Error {
    let status = res.status();
    let body = res.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["error"].as_str().map(String::from))
        .unwrap_or(body);
    anyhow!("Server responded with {status}. {message}")
}
