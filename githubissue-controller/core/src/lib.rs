#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod issue;
mod repository;

pub use self::{
    issue::{find_by_title, IssueEdit, RemoteIssue, CLOSED_STATE},
    repository::{InvalidRepository, Repository},
};
use anyhow::Result;

/// Reads and mutates issues in a remote issue tracker.
///
/// Implementations must reject any response whose status is not the expected
/// success status for the operation.
#[async_trait::async_trait]
pub trait IssueTracker: Send + Sync {
    /// Lists all issues in the repository, in the order the tracker returns them.
    async fn list_issues(&self, repo: &Repository) -> Result<Vec<RemoteIssue>>;

    async fn create_issue(&self, repo: &Repository, title: &str, body: &str)
        -> Result<RemoteIssue>;

    /// Applies `edit` to an existing issue. Fields left unset are not sent and
    /// therefore left untouched by the tracker.
    async fn edit_issue(
        &self,
        repo: &Repository,
        number: u64,
        edit: IssueEdit,
    ) -> Result<RemoteIssue>;
}

#[async_trait::async_trait]
impl<T: IssueTracker + ?Sized> IssueTracker for std::sync::Arc<T> {
    async fn list_issues(&self, repo: &Repository) -> Result<Vec<RemoteIssue>> {
        (**self).list_issues(repo).await
    }

    async fn create_issue(
        &self,
        repo: &Repository,
        title: &str,
        body: &str,
    ) -> Result<RemoteIssue> {
        (**self).create_issue(repo, title, body).await
    }

    async fn edit_issue(
        &self,
        repo: &Repository,
        number: u64,
        edit: IssueEdit,
    ) -> Result<RemoteIssue> {
        (**self).edit_issue(repo, number, edit).await
    }
}
