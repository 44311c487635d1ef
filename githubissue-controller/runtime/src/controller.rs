use crate::{
    github,
    k8s::{self, Action, GithubIssue},
    reconcile::{Error, KubeStore, ReconcileMetrics, Reconciler, ResourceId},
};
use futures::prelude::*;
use kube::runtime::{controller, Controller};
use std::sync::Arc;
use tokio::time::{Duration, Instant};
use tracing::{debug, info_span, warn, Instrument};

pub(crate) struct Context {
    pub reconciler: Reconciler<KubeStore, github::Client>,
    pub metrics: ReconcileMetrics,
    pub error_requeue: Duration,
}

/// Reconciles every GithubIssue visible through `api` until `shutdown`
/// completes and in-flight reconciles finish.
///
/// The kube controller never runs two reconciles for the same object at once;
/// distinct objects are reconciled concurrently up to `concurrency`.
pub(crate) fn run<F>(
    api: k8s::Api<GithubIssue>,
    ctx: Context,
    concurrency: u16,
    shutdown: F,
) -> impl Future<Output = ()>
where
    F: Future<Output = ()> + Send + Sync + 'static,
{
    Controller::new(api, k8s::watcher::Config::default())
        .with_config(controller::Config::default().concurrency(concurrency))
        .graceful_shutdown_on(shutdown)
        .run(reconcile, error_policy, Arc::new(ctx))
        .for_each(|res| async move {
            match res {
                Ok((obj, _)) => {
                    debug!(namespace = ?obj.namespace, name = %obj.name, "Reconciled")
                }
                Err(error) => warn!(%error, "Reconcile failed"),
            }
        })
}

async fn reconcile(issue: Arc<GithubIssue>, ctx: Arc<Context>) -> Result<Action, Error> {
    let id = ResourceId::of(issue.as_ref());
    let start = Instant::now();
    let result = ctx
        .reconciler
        .reconcile(&id)
        .instrument(info_span!("reconcile", namespace = %id.namespace, name = %id.name))
        .await;
    ctx.metrics.observe(&result, start.elapsed());
    result
}

fn error_policy(issue: Arc<GithubIssue>, error: &Error, ctx: Arc<Context>) -> Action {
    let id = ResourceId::of(issue.as_ref());
    warn!(%id, %error, requeue = ?ctx.error_requeue, "Retrying GithubIssue");
    Action::requeue(ctx.error_requeue)
}
