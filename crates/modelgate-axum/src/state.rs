//! Shared application state type.
//!
//! Defines the `AppState` type used across all handlers and routers.

use crate::bootstrap::GatewayContext;
use std::sync::Arc;

/// Application state shared across all handlers.
///
/// This is an Arc-wrapped `GatewayContext` holding the snapshot source,
/// the service directory, and the completion port.
pub type AppState = Arc<GatewayContext>;
