use k8s_openapi::apimachinery::pkg::apis::meta::v1::Condition;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const GROUP: &str = "training.redhat.com";

/// Blocks removal of a GithubIssue until its remote issue has been closed.
pub const FINALIZER: &str = "redhat.com/githubissue-finalizer";

/// Describes an issue that should exist in a GitHub repository.
#[derive(Clone, Debug, PartialEq, Eq, CustomResource, Deserialize, Serialize, JsonSchema)]
#[kube(
    group = "training.redhat.com",
    version = "v1alpha1",
    kind = "GithubIssue",
    status = "GithubIssueStatus",
    shortname = "ghi",
    printcolumn = r#"{"name":"Repo","type":"string","jsonPath":".spec.repo"}"#,
    printcolumn = r#"{"name":"Title","type":"string","jsonPath":".spec.title"}"#,
    printcolumn = r#"{"name":"Open","type":"string","jsonPath":".status.conditions[?(@.type==\"IssueOpen\")].status"}"#,
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct GithubIssueSpec {
    /// Repository URL, e.g. `https://github.com/OWNER/REPO`.
    pub repo: String,

    /// Identifies the remote issue within the repository.
    pub title: String,

    #[serde(default)]
    pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GithubIssueStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,

    /// The description last observed on the remote issue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_description: Option<String>,
}
