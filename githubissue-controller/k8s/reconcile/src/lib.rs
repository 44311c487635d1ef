#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod metrics;
mod reconcile;
mod resource_id;
mod store;


pub use self::{
    metrics::ReconcileMetrics,
    reconcile::{Error, Reconciler},
    resource_id::ResourceId,
    store::{KubeStore, ObjectStore},
};
