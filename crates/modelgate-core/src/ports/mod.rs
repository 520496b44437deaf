//! Port definitions (trait abstractions) for upstream systems.
//!
//! Ports define what the domain expects from infrastructure without naming
//! an HTTP client. `modelgate-upstream` implements them with reqwest; tests
//! use hand-rolled fakes.

pub mod catalog;
pub mod completion;

pub use catalog::{AdvertisedModel, CatalogError, ModelCatalogPort};
pub use completion::{CompletionError, CompletionPort, UpstreamReply};
