pub use githubissue_controller_core as core;
pub use githubissue_controller_github as github;
pub use githubissue_controller_k8s_api as k8s;
pub use githubissue_controller_k8s_reconcile as reconcile;

mod args;
mod controller;

pub use self::args::Args;
