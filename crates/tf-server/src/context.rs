//! Application context shared by request handlers.
//!
//! [`AppContext`] is handed to every route via Axum state. It holds the
//! immutable configuration snapshot, the uploads store and the observability
//! handles the handlers need, so nothing is pulled from process globals.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;
use tf_core::config::Config;

use crate::storage::UploadStore;

/// Application context shared by all request handlers (via Axum state).
///
/// This is cheaply cloneable because it only holds `Arc`s.
#[derive(Clone)]
pub struct AppContext {
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// Uploads and thumbnails directory manager.
    pub storage: Arc<UploadStore>,
    /// Prometheus recorder handle; `None` when no recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppContext {
    pub fn new(config: Config, metrics: Option<PrometheusHandle>) -> Self {
        let storage = Arc::new(UploadStore::new(&config.storage.base_dir));
        Self {
            config: Arc::new(config),
            storage,
            metrics,
        }
    }
}
