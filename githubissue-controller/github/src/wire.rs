use githubissue_controller_core::RemoteIssue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct Issue {
    pub number: u64,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub state: String,
    #[serde(default)]
    pub pull_request: Option<PullRequestLinks>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PullRequestLinks {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Only the fields that are set are serialized; GitHub leaves the rest as-is.
#[derive(Debug, Serialize)]
pub(crate) struct IssueRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<&'a str>,
}

impl From<Issue> for RemoteIssue {
    fn from(issue: Issue) -> Self {
        let Issue {
            number,
            title,
            body,
            state,
            pull_request,
        } = issue;
        Self {
            number,
            title,
            body: body.unwrap_or_default(),
            state,
            pull_request: pull_request.map(|pr| pr.html_url.or(pr.url).unwrap_or_default()),
        }
    }
}
