use k8s_openapi::apimachinery::pkg::apis::meta::v1::Condition;

pub const ISSUE_OPEN: &str = "IssueOpen";
pub const ISSUE_HAS_PR: &str = "IssueHasPR";

pub const STATUS_TRUE: &str = "True";
pub const STATUS_FALSE: &str = "False";
pub const STATUS_UNKNOWN: &str = "Unknown";

/// Merges `condition` into `conditions`, replacing any existing condition of
/// the same type.
///
/// An existing condition keeps its `lastTransitionTime` unless its status
/// changes. New condition types are appended. Returns true if anything changed.
pub fn set(conditions: &mut Vec<Condition>, condition: Condition) -> bool {
    let Some(idx) = conditions.iter().position(|c| c.type_ == condition.type_) else {
        conditions.push(condition);
        return true;
    };

    let existing = &mut conditions[idx];
    let mut changed = false;
    if existing.status != condition.status {
        existing.status = condition.status;
        existing.last_transition_time = condition.last_transition_time;
        changed = true;
    }
    if existing.reason != condition.reason {
        existing.reason = condition.reason;
        changed = true;
    }
    if existing.message != condition.message {
        existing.message = condition.message;
        changed = true;
    }
    if existing.observed_generation != condition.observed_generation {
        existing.observed_generation = condition.observed_generation;
        changed = true;
    }
    changed
}

pub fn find<'c>(conditions: &'c [Condition], type_: &str) -> Option<&'c Condition> {
    conditions.iter().find(|c| c.type_ == type_)
}

pub fn is_true(conditions: &[Condition], type_: &str) -> bool {
    find(conditions, type_).is_some_and(|c| c.status == STATUS_TRUE)
}
