//! Shared application state
//!
//! One instance per process, shared by every request through an `Arc`.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::completion::CompletionGateway;
use crate::config::ServerConfig;
use crate::error::ChatServerError;
use crate::middleware::AdmissionGuard;
use crate::session::SessionIssuer;

pub struct AppState {
    pub config: ServerConfig,
    pub catalog: Catalog,
    pub admission: AdmissionGuard,
    pub sessions: SessionIssuer,
    pub gateway: CompletionGateway,
}

impl AppState {
    pub fn new(config: ServerConfig, catalog: Catalog) -> Result<Arc<Self>, ChatServerError> {
        let admission = AdmissionGuard::from_config(&config.admission);
        Self::with_admission(config, catalog, admission)
    }

    /// Build with a caller-supplied guard, e.g. one backed by a shared counter store
    pub fn with_admission(
        config: ServerConfig,
        catalog: Catalog,
        admission: AdmissionGuard,
    ) -> Result<Arc<Self>, ChatServerError> {
        let gateway = CompletionGateway::from_config(&config.completion)?;
        let sessions = SessionIssuer::new(&config.session.cookie_name);

        Ok(Arc::new(Self {
            config,
            catalog,
            admission,
            sessions,
            gateway,
        }))
    }
}
