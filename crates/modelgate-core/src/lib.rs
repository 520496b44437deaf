#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod bindings;
pub mod directory;
pub mod endpoint;
pub mod ports;
pub mod resolver;
pub mod service;
pub mod snapshot;

// Re-export commonly used types for convenience
pub use bindings::{
    BindingsError, BoundService, Credentials, LegacyCredentials, MultiPlanCredentials,
    parse_bindings,
};
pub use directory::ServiceDirectory;
pub use endpoint::{
    OPENAI_PUBLIC_BASE, OPENAI_PUBLIC_V1, build_chat_endpoint, build_models_endpoint,
    fallback_models_endpoint,
};
pub use ports::{
    AdvertisedModel, CatalogError, CompletionError, CompletionPort, ModelCatalogPort,
    UpstreamReply,
};
pub use resolver::{ResolvedConfig, normalize_base_url, resolve, select_service};
pub use service::{
    CHAT_CAPABILITY, DEFAULT_MODELS, LOCAL_SERVICE_ID, LOCAL_SERVICE_KIND, LOCAL_SERVICE_NAME,
    LOCAL_SERVICE_PLAN, MODEL_NAME_SEPARATOR, Model, Service, composite_model_name,
    split_composite,
};
pub use snapshot::{
    ENV_API_KEY, ENV_BASE_URL, ENV_SERVICE_BINDINGS, EnvSnapshot, EnvSnapshotSource,
    SnapshotSource, StaticSnapshotSource,
};
