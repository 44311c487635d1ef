#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod conditions;
pub mod finalizer;
pub mod githubissue;

pub use self::githubissue::{GithubIssue, GithubIssueSpec, GithubIssueStatus, FINALIZER, GROUP};
pub use k8s_openapi::{
    apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition,
    apimachinery::pkg::apis::meta::v1::{Condition, Time},
};
pub use kube::{
    api::{Api, ObjectMeta, Patch, PatchParams, PostParams, ResourceExt},
    runtime::{controller::Action, watcher},
    Client, CustomResourceExt, Error, Resource,
};

/// Returns the current time as a Kubernetes timestamp.
pub fn now() -> Time {
    Time(chrono::Utc::now())
}
