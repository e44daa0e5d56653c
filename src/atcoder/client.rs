use std::collections::BTreeMap;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::model::{Contest, ContestProblem, ProblemModel, Submission};
use crate::participants::Handle;
use crate::{Error, Result};

pub const SERVICE_URL: &str = "https://kenkoooo.com/atcoder";

/// Where the metadata of a generation comes from. Every call is one request;
/// nothing is cached between calls.
#[allow(async_fn_in_trait)]
pub trait ProblemSource {
    async fn contests(&self) -> Result<Vec<Contest>>;
    async fn contest_problems(&self) -> Result<Vec<ContestProblem>>;
    async fn problem_models(&self) -> Result<BTreeMap<String, ProblemModel>>;
    /// One page of `user`'s submissions starting at `from_second`.
    async fn submissions(&self, user: &Handle, from_second: i64) -> Result<Vec<Submission>>;
}

/// The AtCoder Problems resource endpoints.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    service_url: String,
}

impl HttpSource {
    pub fn new(service_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .gzip(true)
            .build()
            .map_err(|e| Error::network("http client", e))?;
        Ok(Self {
            client,
            service_url: service_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, resource: &str, url: String) -> Result<T> {
        debug!(%url, "fetching {}", resource);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::network(resource, e))?;
        response.json().await.map_err(|e| Error::network(resource, e))
    }
}

impl ProblemSource for HttpSource {
    async fn contests(&self) -> Result<Vec<Contest>> {
        self.get_json(
            "contests.json",
            format!("{}/resources/contests.json", self.service_url),
        )
        .await
    }

    async fn contest_problems(&self) -> Result<Vec<ContestProblem>> {
        self.get_json(
            "contest-problem.json",
            format!("{}/resources/contest-problem.json", self.service_url),
        )
        .await
    }

    async fn problem_models(&self) -> Result<BTreeMap<String, ProblemModel>> {
        self.get_json(
            "problem-models.json",
            format!("{}/resources/problem-models.json", self.service_url),
        )
        .await
    }

    async fn submissions(&self, user: &Handle, from_second: i64) -> Result<Vec<Submission>> {
        self.get_json(
            "user submissions",
            format!(
                "{}/atcoder-api/v3/user/submissions?user={}&from_second={}",
                self.service_url, user, from_second
            ),
        )
        .await
    }
}
