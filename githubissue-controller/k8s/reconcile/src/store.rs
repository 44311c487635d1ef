use crate::ResourceId;
use anyhow::Result;
use githubissue_controller_k8s_api::{
    self as k8s, GithubIssue, Patch, PatchParams, PostParams, ResourceExt,
};

/// Reads and writes GithubIssue resources.
///
/// Writes are conditioned on the object's `resourceVersion`; a stale object
/// fails with a conflict error rather than overwriting newer state.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Returns `None` if the resource does not exist.
    async fn get(&self, id: &ResourceId) -> Result<Option<GithubIssue>>;

    /// Replaces the resource's metadata and spec.
    async fn update(&self, issue: &GithubIssue) -> Result<GithubIssue>;

    /// Writes the resource's status subresource.
    async fn update_status(&self, issue: &GithubIssue) -> Result<GithubIssue>;
}

/// An [`ObjectStore`] backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeStore {
    client: k8s::Client,
}

// === impl KubeStore ===

impl KubeStore {
    pub fn new(client: k8s::Client) -> Self {
        Self { client }
    }

    fn api(&self, namespace: &str) -> k8s::Api<GithubIssue> {
        k8s::Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait::async_trait]
impl ObjectStore for KubeStore {
    async fn get(&self, id: &ResourceId) -> Result<Option<GithubIssue>> {
        Ok(self.api(&id.namespace).get_opt(&id.name).await?)
    }

    async fn update(&self, issue: &GithubIssue) -> Result<GithubIssue> {
        let ResourceId { namespace, name } = ResourceId::of(issue);
        let updated = self
            .api(&namespace)
            .replace(&name, &PostParams::default(), issue)
            .await?;
        Ok(updated)
    }

    async fn update_status(&self, issue: &GithubIssue) -> Result<GithubIssue> {
        let ResourceId { namespace, name } = ResourceId::of(issue);
        let patch = status_patch(issue)?;
        let updated = self
            .api(&namespace)
            .patch_status(&name, &PatchParams::default(), &Patch::Merge(patch))
            .await?;
        Ok(updated)
    }
}

/// Builds a merge patch for the status subresource, conditioned on the
/// object's resourceVersion.
fn status_patch(issue: &GithubIssue) -> serde_json::Result<serde_json::Value> {
    let mut status = serde_json::to_value(&issue.status)?;
    if let Some(fields) = status.as_object_mut() {
        // A merge patch only removes fields that are explicitly null.
        fields
            .entry("activeDescription")
            .or_insert(serde_json::Value::Null);
    }
    Ok(serde_json::json!({
        "metadata": {
            "resourceVersion": issue.resource_version(),
        },
        "status": status,
    }))
}
