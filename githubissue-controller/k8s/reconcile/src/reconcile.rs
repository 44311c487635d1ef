use crate::{ObjectStore, ResourceId};
use githubissue_controller_core::{
    find_by_title, InvalidRepository, IssueEdit, IssueTracker, RemoteIssue, Repository,
};
use githubissue_controller_k8s_api::{
    self as k8s,
    conditions::{self, ISSUE_HAS_PR, ISSUE_OPEN, STATUS_FALSE, STATUS_TRUE, STATUS_UNKNOWN},
    finalizer, Action, Condition, GithubIssue, ResourceExt, FINALIZER,
};
use tracing::{debug, error, info, warn};

const REASON_OPEN: &str = "IssueInOpenState";
const REASON_CLOSED: &str = "IssueClosed";
const REASON_INVALID_REPOSITORY: &str = "InvalidRepository";
const REASON_HAS_PR: &str = "PullRequestExists";
const REASON_NO_PR: &str = "NoPullRequest";

/// Synchronizes GithubIssue resources with issues in a remote tracker.
///
/// Each call to [`Reconciler::reconcile`] is a complete, level-triggered pass:
/// state is inferred from the resource's finalizers, its deletion timestamp,
/// and the remote issue list. Callers must not reconcile the same resource
/// concurrently.
#[derive(Debug)]
pub struct Reconciler<S, T> {
    store: S,
    tracker: T,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to access GithubIssue: {0:#}")]
    Store(anyhow::Error),

    #[error("issue tracker request failed: {0:#}")]
    Tracker(anyhow::Error),
}

// === impl Reconciler ===

impl<S, T> Reconciler<S, T>
where
    S: ObjectStore,
    T: IssueTracker,
{
    pub fn new(store: S, tracker: T) -> Self {
        Self { store, tracker }
    }

    pub async fn reconcile(&self, id: &ResourceId) -> Result<Action, Error> {
        let Some(mut issue) = self.store.get(id).await.map_err(|error| {
            error!(%id, %error, "Failed to fetch GithubIssue");
            Error::Store(error)
        })?
        else {
            debug!(%id, "GithubIssue not found; it must have been deleted");
            return Ok(Action::await_change());
        };

        if finalizer::is_deleting(&issue) {
            self.finalize(issue).await?;
            return Ok(Action::await_change());
        }

        if finalizer::add(&mut issue, FINALIZER) {
            issue = self.store.update(&issue).await.map_err(|error| {
                error!(%id, %error, "Failed to add finalizer");
                Error::Store(error)
            })?;
            info!(%id, "Added finalizer");
        }

        let repo = match issue.spec.repo.parse::<Repository>() {
            Ok(repo) => repo,
            Err(invalid) => {
                warn!(%id, error = %invalid, "Ignoring GithubIssue with an invalid repository");
                set_invalid_repository(&mut issue, &invalid);
                self.update_status(&issue).await?;
                return Ok(Action::await_change());
            }
        };

        let remote = self.sync(&repo, &issue).await?;

        let generation = issue.metadata.generation;
        let status = issue.status.get_or_insert_with(Default::default);
        conditions::set(&mut status.conditions, open_condition(&remote, generation));
        conditions::set(&mut status.conditions, pull_request_condition(&remote, generation));
        status.active_description = Some(remote.body);

        self.update_status(&issue).await?;
        Ok(Action::await_change())
    }

    /// Ensures the remote issue exists and carries the desired description.
    async fn sync(&self, repo: &Repository, issue: &GithubIssue) -> Result<RemoteIssue, Error> {
        let spec = &issue.spec;
        let issues = self.list_issues(repo).await?;

        let remote = match find_by_title(&issues, &spec.title) {
            Some(remote) => {
                let matches = issues.iter().filter(|i| i.title == spec.title).count();
                if matches > 1 {
                    warn!(%repo, title = %spec.title, matches, number = remote.number, "Multiple issues share this title; using the first");
                }
                remote.clone()
            }
            None => {
                let created = self
                    .tracker
                    .create_issue(repo, &spec.title, &spec.description)
                    .await
                    .map_err(|error| {
                        error!(%repo, title = %spec.title, %error, "Failed to create issue");
                        Error::Tracker(error)
                    })?;
                info!(%repo, number = created.number, "Created issue");
                created
            }
        };

        if remote.body == spec.description {
            return Ok(remote);
        }

        let updated = self
            .tracker
            .edit_issue(repo, remote.number, IssueEdit::body(&spec.description))
            .await
            .map_err(|error| {
                error!(%repo, number = remote.number, %error, "Failed to update issue description");
                Error::Tracker(error)
            })?;
        info!(%repo, number = updated.number, "Updated issue description");
        Ok(updated)
    }

    /// Closes the remote issue and releases the finalizer so the resource can
    /// be removed.
    async fn finalize(&self, mut issue: GithubIssue) -> Result<(), Error> {
        if !finalizer::contains(&issue, FINALIZER) {
            return Ok(());
        }

        match issue.spec.repo.parse::<Repository>() {
            Ok(repo) => {
                let issues = self.list_issues(&repo).await?;
                if let Some(remote) = find_by_title(&issues, &issue.spec.title) {
                    self.tracker
                        .edit_issue(&repo, remote.number, IssueEdit::close())
                        .await
                        .map_err(|error| {
                            error!(%repo, number = remote.number, %error, "Failed to close issue");
                            Error::Tracker(error)
                        })?;
                    info!(%repo, number = remote.number, "Closed issue");
                } else {
                    debug!(%repo, title = %issue.spec.title, "No matching issue to close");
                }
            }
            // An issue created under an earlier, valid repository is left open.
            Err(error) => warn!(
                %error,
                title = %issue.spec.title,
                "Releasing GithubIssue with an invalid repository; any previously created issue is not closed"
            ),
        }

        finalizer::remove(&mut issue, FINALIZER);
        self.store.update(&issue).await.map_err(|error| {
            error!(name = %issue.name_any(), %error, "Failed to remove finalizer");
            Error::Store(error)
        })?;
        info!(name = %issue.name_any(), "Removed finalizer");
        Ok(())
    }

    async fn list_issues(&self, repo: &Repository) -> Result<Vec<RemoteIssue>, Error> {
        self.tracker.list_issues(repo).await.map_err(|error| {
            error!(%repo, %error, "Failed to list issues");
            Error::Tracker(error)
        })
    }

    async fn update_status(&self, issue: &GithubIssue) -> Result<(), Error> {
        self.store.update_status(issue).await.map_err(|error| {
            error!(name = %issue.name_any(), %error, "Failed to update status");
            Error::Store(error)
        })?;
        Ok(())
    }
}

/// Marks every remote-derived field unknown, since nothing observed under a
/// previous repository applies any more.
fn set_invalid_repository(issue: &mut GithubIssue, invalid: &InvalidRepository) {
    let generation = issue.metadata.generation;
    let status = issue.status.get_or_insert_with(Default::default);
    for type_ in [ISSUE_OPEN, ISSUE_HAS_PR] {
        conditions::set(
            &mut status.conditions,
            condition(
                type_,
                STATUS_UNKNOWN,
                REASON_INVALID_REPOSITORY,
                invalid.to_string(),
                generation,
            ),
        );
    }
    status.active_description = None;
}

fn open_condition(remote: &RemoteIssue, generation: Option<i64>) -> Condition {
    if remote.is_closed() {
        condition(
            ISSUE_OPEN,
            STATUS_FALSE,
            REASON_CLOSED,
            "The issue is closed",
            generation,
        )
    } else {
        condition(
            ISSUE_OPEN,
            STATUS_TRUE,
            REASON_OPEN,
            "The issue is in open state",
            generation,
        )
    }
}

fn pull_request_condition(remote: &RemoteIssue, generation: Option<i64>) -> Condition {
    if remote.has_pull_request() {
        condition(
            ISSUE_HAS_PR,
            STATUS_TRUE,
            REASON_HAS_PR,
            "The issue has a PR",
            generation,
        )
    } else {
        condition(
            ISSUE_HAS_PR,
            STATUS_FALSE,
            REASON_NO_PR,
            "The issue does not have a PR",
            generation,
        )
    }
}

fn condition(
    type_: &str,
    status: &str,
    reason: &str,
    message: impl Into<String>,
    observed_generation: Option<i64>,
) -> Condition {
    Condition {
        type_: type_.to_string(),
        status: status.to_string(),
        reason: reason.to_string(),
        message: message.into(),
        last_transition_time: k8s::now(),
        observed_generation,
    }
}
