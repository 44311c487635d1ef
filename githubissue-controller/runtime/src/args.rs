use crate::{
    controller::{self, Context},
    github,
    k8s::{self, CustomResourceExt, GithubIssue},
    reconcile::{KubeStore, ReconcileMetrics, Reconciler},
};
use anyhow::{bail, Result};
use clap::Parser;
use futures::prelude::*;
use prometheus_client::registry::Registry;
use tokio::{sync::oneshot, time::Duration};
use tracing::{info, info_span, warn, Instrument};

#[derive(Debug, Parser)]
#[clap(
    name = "githubissue-controller",
    about = "Keeps GitHub issues in sync with GithubIssue resources"
)]
pub struct Args {
    #[clap(
        long,
        default_value = "githubissue=info,warn",
        env = "GITHUBISSUE_CONTROLLER_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    #[clap(flatten)]
    client: kubert::ClientArgs,

    #[clap(flatten)]
    admin: kubert::AdminArgs,

    /// Personal access token used to authenticate to GitHub.
    ///
    /// Requests are unauthenticated when no token is set.
    #[clap(long, env = "GH_PERSONAL_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    #[clap(long, env = "GITHUB_API_URL", default_value = github::DEFAULT_API_URL)]
    github_api_url: String,

    #[clap(long, default_value = "10000")]
    github_timeout_ms: u64,

    /// Delay before a failed reconcile is retried.
    #[clap(long, default_value = "5")]
    error_requeue_secs: u64,

    /// Only watch GithubIssues in this namespace.
    #[clap(long)]
    namespace: Option<String>,

    /// Maximum number of GithubIssues reconciled concurrently.
    #[clap(long, default_value = "4")]
    concurrency: u16,

    /// Print the GithubIssue CustomResourceDefinition and exit.
    #[clap(long)]
    print_crd: bool,
}

impl Args {
    #[inline]
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            client,
            admin,
            github_token,
            github_api_url,
            github_timeout_ms,
            error_requeue_secs,
            namespace,
            concurrency,
            print_crd,
        } = self;

        if print_crd {
            print!("{}", serde_yaml::to_string(&GithubIssue::crd())?);
            return Ok(());
        }

        let mut prom = <Registry>::default();
        let metrics = ReconcileMetrics::register(prom.sub_registry_with_prefix("githubissue"));
        let rt_metrics = kubert::RuntimeMetrics::register(prom.sub_registry_with_prefix("kube"));

        let runtime = kubert::Runtime::builder()
            .with_log(log_level, log_format)
            .with_metrics(rt_metrics)
            .with_admin(admin.into_builder().with_prometheus(prom))
            .with_client(client)
            .build()
            .await?;

        let github = github::Client::new(github::Config {
            api_url: github_api_url,
            token: github_token,
            timeout: Duration::from_millis(github_timeout_ms),
        })?;
        if !github.is_authenticated() {
            warn!("No GitHub token configured; requests will be unauthenticated");
        }

        let api = match namespace.as_deref() {
            Some(ns) => k8s::Api::<GithubIssue>::namespaced(runtime.client(), ns),
            None => k8s::Api::<GithubIssue>::all(runtime.client()),
        };
        let ctx = Context {
            reconciler: Reconciler::new(KubeStore::new(runtime.client()), github),
            metrics,
            error_requeue: Duration::from_secs(error_requeue_secs),
        };

        // Run the controller until shutdown is signaled, then hold the drain
        // open until in-flight reconciles complete.
        let drain = runtime.shutdown_handle();
        let (close_tx, close_rx) = oneshot::channel::<()>();
        let controller = controller::run(api, ctx, concurrency, close_rx.map(|_| {}));
        tokio::spawn(
            async move {
                tokio::pin!(controller);
                info!(namespace = namespace.as_deref().unwrap_or("*"), "Watching GithubIssues");
                tokio::select! {
                    _ = (&mut controller) => {}
                    handle = drain.signaled() => {
                        let _ = close_tx.send(());
                        handle.release_after(controller).await;
                    }
                }
            }
            .instrument(info_span!("githubissues")),
        );

        // Block the main thread on the shutdown signal. Once it fires, wait for the background tasks to
        // complete before exiting.
        if runtime.run().await.is_err() {
            bail!("Aborted");
        }

        Ok(())
    }
}
