use prometheus_client::{
    encoding::EncodeLabelSet,
    metrics::{counter::Counter, family::Family, histogram::Histogram},
    registry::Registry,
};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ReconcileMetrics {
    reconciles: Family<ResultLabels, Counter>,
    duration: Histogram,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
struct ResultLabels {
    result: &'static str,
}

// === impl ReconcileMetrics ===

impl ReconcileMetrics {
    pub fn register(reg: &mut Registry) -> Self {
        let reconciles = Family::<ResultLabels, Counter>::default();
        reg.register(
            "reconcile",
            "Total number of GithubIssue reconcile passes by result",
            reconciles.clone(),
        );

        let duration = Histogram::new([0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0].into_iter());
        reg.register(
            "reconcile_duration_seconds",
            "Time taken by GithubIssue reconcile passes",
            duration.clone(),
        );

        Self {
            reconciles,
            duration,
        }
    }

    pub fn observe<T, E>(&self, result: &Result<T, E>, elapsed: Duration) {
        let result = if result.is_ok() { "ok" } else { "error" };
        self.reconciles
            .get_or_create(&ResultLabels { result })
            .inc();
        self.duration.observe(elapsed.as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus_client::encoding::text::encode;

    #[test]
    fn counts_by_result() {
        let mut reg = Registry::default();
        let metrics = ReconcileMetrics::register(reg.sub_registry_with_prefix("githubissue"));
        metrics.observe::<(), ()>(&Ok(()), Duration::from_millis(20));
        metrics.observe::<(), ()>(&Ok(()), Duration::from_millis(20));
        metrics.observe::<(), ()>(&Err(()), Duration::from_millis(20));

        let mut out = String::new();
        encode(&mut out, &reg).unwrap();
        assert!(out.contains(r#"githubissue_reconcile_total{result="ok"} 2"#), "{out}");
        assert!(out.contains(r#"githubissue_reconcile_total{result="error"} 1"#), "{out}");
        assert!(out.contains("githubissue_reconcile_duration_seconds_count 3"), "{out}");
    }
}
