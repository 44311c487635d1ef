#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

//! A GitHub REST v3 implementation of [`IssueTracker`].

mod wire;


use githubissue_controller_core::{IssueEdit, IssueTracker, RemoteIssue, Repository};
use reqwest::{header, Method, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "githubissue-controller";
const PAGE_SIZE: usize = 100;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,

    /// Personal access token. Requests are unauthenticated when unset.
    pub token: Option<String>,

    pub timeout: Duration,
}

#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("github request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status code: {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("pagination link {0} is outside of the API URL")]
    ForeignLink(String),
}

// === impl Config ===

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(10),
        }
    }
}

// === impl Client ===

impl Client {
    pub fn new(config: Config) -> Result<Self, Error> {
        let Config {
            api_url,
            token,
            timeout,
        } = config;
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub async fn list(&self, repo: &Repository) -> Result<Vec<RemoteIssue>, Error> {
        let mut issues = Vec::new();
        let mut next = Some(format!(
            "{}?state=open&per_page={PAGE_SIZE}",
            self.issues_url(repo)
        ));
        while let Some(url) = next.take() {
            debug!(%url, "Listing issues");
            let rsp = expect(self.request(Method::GET, &url).send().await?, StatusCode::OK).await?;
            if let Some(link) = next_link(rsp.headers()) {
                // Links carry the token, so they must not leave the API host.
                if !self.is_api_url(&link) {
                    warn!(%link, api_url = %self.api_url, "Refusing to follow pagination link");
                    return Err(Error::ForeignLink(link));
                }
                next = Some(link);
            }
            let page = rsp.json::<Vec<wire::Issue>>().await?;
            issues.extend(page.into_iter().map(RemoteIssue::from));
        }
        Ok(issues)
    }

    pub async fn create(
        &self,
        repo: &Repository,
        title: &str,
        body: &str,
    ) -> Result<RemoteIssue, Error> {
        let url = self.issues_url(repo);
        debug!(%url, %title, "Creating issue");
        let req = wire::IssueRequest {
            title: Some(title),
            body: Some(body),
            state: None,
        };
        let rsp = self.request(Method::POST, &url).json(&req).send().await?;
        let issue = expect(rsp, StatusCode::CREATED)
            .await?
            .json::<wire::Issue>()
            .await?;
        Ok(issue.into())
    }

    pub async fn edit(
        &self,
        repo: &Repository,
        number: u64,
        edit: &IssueEdit,
    ) -> Result<RemoteIssue, Error> {
        let url = format!("{}/{number}", self.issues_url(repo));
        debug!(%url, ?edit, "Editing issue");
        let req = wire::IssueRequest {
            title: edit.title.as_deref(),
            body: edit.body.as_deref(),
            state: edit.state.as_deref(),
        };
        let rsp = self.request(Method::PATCH, &url).json(&req).send().await?;
        let issue = expect(rsp, StatusCode::OK)
            .await?
            .json::<wire::Issue>()
            .await?;
        Ok(issue.into())
    }

    fn is_api_url(&self, url: &str) -> bool {
        url.strip_prefix(&self.api_url)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/') || rest.starts_with('?'))
    }

    fn issues_url(&self, Repository { owner, name }: &Repository) -> String {
        format!("{}/repos/{owner}/{name}/issues", self.api_url)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let req = self
            .http
            .request(method, url)
            .header(header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        match self.token.as_deref() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

#[async_trait::async_trait]
impl IssueTracker for Client {
    async fn list_issues(&self, repo: &Repository) -> anyhow::Result<Vec<RemoteIssue>> {
        Ok(self.list(repo).await?)
    }

    async fn create_issue(
        &self,
        repo: &Repository,
        title: &str,
        body: &str,
    ) -> anyhow::Result<RemoteIssue> {
        Ok(self.create(repo, title, body).await?)
    }

    async fn edit_issue(
        &self,
        repo: &Repository,
        number: u64,
        edit: IssueEdit,
    ) -> anyhow::Result<RemoteIssue> {
        Ok(self.edit(repo, number, &edit).await?)
    }
}

async fn expect(rsp: Response, status: StatusCode) -> Result<Response, Error> {
    if rsp.status() == status {
        return Ok(rsp);
    }
    let status = rsp.status();
    let body = rsp.text().await.unwrap_or_default();
    Err(Error::UnexpectedStatus { status, body })
}

/// Extracts the `rel="next"` target from a `Link` header.
fn next_link(headers: &header::HeaderMap) -> Option<String> {
    let link = headers.get(header::LINK)?.to_str().ok()?;
    link.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        if !parts.any(|p| p.trim() == r#"rel="next""#) {
            return None;
        }
        let target = target.strip_prefix('<')?.strip_suffix('>')?;
        Some(target.to_string())
    })
}
