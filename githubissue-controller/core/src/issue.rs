pub const CLOSED_STATE: &str = "closed";

/// An issue as observed in the remote tracker.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemoteIssue {
    /// Repository-scoped issue number.
    pub number: u64,
    pub title: String,
    /// A missing body is represented as the empty string.
    pub body: String,
    pub state: String,
    /// Set when the tracker reports a linked pull request.
    pub pull_request: Option<String>,
}

/// A partial update to a remote issue.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IssueEdit {
    pub title: Option<String>,
    pub body: Option<String>,
    pub state: Option<String>,
}

/// Returns the first issue whose title is exactly `title`.
pub fn find_by_title<'i>(issues: &'i [RemoteIssue], title: &str) -> Option<&'i RemoteIssue> {
    issues.iter().find(|issue| issue.title == title)
}

// === impl RemoteIssue ===

impl RemoteIssue {
    pub fn is_closed(&self) -> bool {
        self.state == CLOSED_STATE
    }

    pub fn has_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }
}

// === impl IssueEdit ===

impl IssueEdit {
    pub fn body(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            ..Default::default()
        }
    }

    pub fn close() -> Self {
        Self {
            state: Some(CLOSED_STATE.to_string()),
            ..Default::default()
        }
    }
}
