//! `user-service` binary: loads configuration from the environment, builds the
//! lock-guarded accessor, and serves it over HTTP.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use user_rwlock_service::builders::build_service;
use user_rwlock_service::config::ServiceConfig;
use user_rwlock_service::core::AppResult;
use user_rwlock_service::runtime::serve;
use user_rwlock_service::util::init_tracing;

fn main() -> AppResult<()> {
    init_tracing();

    let cfg = ServiceConfig::from_env().map_err(|e| anyhow!("configuration error: {e}"))?;
    let service = Arc::new(build_service(&cfg).context("failed to build user service")?);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(cfg.http.effective_worker_threads())
        .thread_name("user-service")
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    runtime.block_on(serve(&cfg.http, service))
}
