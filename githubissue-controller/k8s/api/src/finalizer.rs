use kube::{Resource, ResourceExt};

pub fn contains<K: Resource>(obj: &K, finalizer: &str) -> bool {
    obj.finalizers().iter().any(|f| f == finalizer)
}

/// Adds `finalizer` if it is not already present. Returns true if it was added.
pub fn add<K: Resource>(obj: &mut K, finalizer: &str) -> bool {
    if contains(obj, finalizer) {
        return false;
    }
    obj.finalizers_mut().push(finalizer.to_string());
    true
}

/// Removes every occurrence of `finalizer`. Returns true if any were removed.
pub fn remove<K: Resource>(obj: &mut K, finalizer: &str) -> bool {
    let finalizers = obj.finalizers_mut();
    let before = finalizers.len();
    finalizers.retain(|f| f != finalizer);
    finalizers.len() != before
}

/// Returns true once deletion of the object has been requested.
pub fn is_deleting<K: Resource>(obj: &K) -> bool {
    obj.meta().deletion_timestamp.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GithubIssue, GithubIssueSpec, FINALIZER};

    fn issue() -> GithubIssue {
        GithubIssue::new(
            "issue",
            GithubIssueSpec {
                repo: "https://github.com/org/repo".to_string(),
                title: "T".to_string(),
                description: "D".to_string(),
            },
        )
    }

    #[test]
    fn add_is_idempotent() {
        let mut obj = issue();
        assert!(!contains(&obj, FINALIZER));
        assert!(add(&mut obj, FINALIZER));
        assert!(!add(&mut obj, FINALIZER));
        assert_eq!(obj.finalizers(), [FINALIZER.to_string()]);
    }

    #[test]
    fn remove_leaves_other_finalizers() {
        let mut obj = issue();
        obj.finalizers_mut().push("example.com/other".to_string());
        add(&mut obj, FINALIZER);
        assert!(remove(&mut obj, FINALIZER));
        assert!(!remove(&mut obj, FINALIZER));
        assert_eq!(obj.finalizers(), ["example.com/other".to_string()]);
    }

    #[test]
    fn deletion_timestamp_marks_deleting() {
        let mut obj = issue();
        assert!(!is_deleting(&obj));
        obj.meta_mut().deletion_timestamp = Some(crate::now());
        assert!(is_deleting(&obj));
    }
}
