//! Logging middleware
//!
//! Provides request logging functionality. Rejections are logged where the
//! error is turned into a response.

use log::info;

use crate::utils::ClientAddr;

/// Log a request that passed the admission guard
pub fn log_admitted(client: &ClientAddr, path: &str) {
    info!("Client {} admitted: {}", client, path);
}

/// Log a reply answered straight from the catalog
pub fn log_local_reply(client: &ClientAddr, product: &str) {
    info!("Client {} served from catalog: {}", client, product);
}

/// Log a reply produced by the completion gateway
pub fn log_gateway_reply(client: &ClientAddr, context_items: usize, succeeded: bool) {
    info!(
        "Client {} answered by completion gateway ({} context items, {})",
        client,
        context_items,
        if succeeded { "ok" } else { "apology" }
    );
}
