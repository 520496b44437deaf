//! Endpoint construction for OpenAI-compatible upstreams.
//!
//! Configured base URLs come in several shapes: the canonical public
//! `/v1` base, fully spelled-out completion URLs, and gateway roots that
//! nest the OpenAI surface under a provider prefix. The builders here
//! map each shape to concrete request URLs without ever stacking path
//! segments twice.

/// Public OpenAI API origin.
pub const OPENAI_PUBLIC_BASE: &str = "https://api.openai.com";

/// Canonical versioned base for the public OpenAI API.
pub const OPENAI_PUBLIC_V1: &str = "https://api.openai.com/v1";

/// Known provider prefixes that nest an OpenAI-compatible surface.
///
/// A base ending in one of these gets `/v1/...` appended directly
/// instead of the full gateway path.
const PROVIDER_SUFFIXES: &[&str] = &["/openai"];

/// Build the chat-completions URL for a configured base.
///
/// Calling this on its own output returns the same URL, so already
/// resolved endpoints pass through untouched.
#[must_use]
pub fn build_chat_endpoint(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base == OPENAI_PUBLIC_V1 {
        return format!("{base}/chat/completions");
    }
    if base.ends_with("/chat/completions") {
        return base.to_string();
    }
    if has_provider_suffix(base) {
        return format!("{base}/v1/chat/completions");
    }
    format!("{base}/openai/v1/chat/completions")
}

/// Build the model-listing URL for a configured base.
///
/// Mirrors [`build_chat_endpoint`] with `/models` as the terminal
/// segment.
#[must_use]
pub fn build_models_endpoint(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base == OPENAI_PUBLIC_V1 {
        return format!("{base}/models");
    }
    if base.ends_with("/models") {
        return base.to_string();
    }
    if has_provider_suffix(base) {
        return format!("{base}/v1/models");
    }
    format!("{base}/openai/v1/models")
}

/// Plain `/v1/models` variant used as a second attempt when the primary
/// model-listing URL does not answer.
#[must_use]
pub fn fallback_models_endpoint(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    format!("{base}/v1/models")
}

fn has_provider_suffix(base: &str) -> bool {
    PROVIDER_SUFFIXES.iter().any(|suffix| base.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_base_gets_the_short_path() {
        assert_eq!(
            build_chat_endpoint("https://api.openai.com/v1"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            build_models_endpoint("https://api.openai.com/v1"),
            "https://api.openai.com/v1/models"
        );
    }

    #[test]
    fn spelled_out_endpoint_passes_through() {
        let full = "https://llm.example.com/v1/chat/completions";
        assert_eq!(build_chat_endpoint(full), full);
        assert_eq!(
            build_models_endpoint("https://llm.example.com/v1/models"),
            "https://llm.example.com/v1/models"
        );
    }

    #[test]
    fn building_twice_is_a_fixed_point() {
        for base in [
            "https://api.openai.com/v1",
            "https://broker.example.com/gateway",
            "https://broker.example.com/openai",
        ] {
            let once = build_chat_endpoint(base);
            assert_eq!(build_chat_endpoint(&once), once);
            let models_once = build_models_endpoint(base);
            assert_eq!(build_models_endpoint(&models_once), models_once);
        }
    }

    #[test]
    fn provider_suffix_skips_the_gateway_prefix() {
        assert_eq!(
            build_chat_endpoint("https://broker.example.com/openai"),
            "https://broker.example.com/openai/v1/chat/completions"
        );
        assert_eq!(
            build_models_endpoint("https://broker.example.com/openai/"),
            "https://broker.example.com/openai/v1/models"
        );
    }

    #[test]
    fn unknown_base_gets_the_full_gateway_path() {
        assert_eq!(
            build_chat_endpoint("https://broker.example.com/gateway"),
            "https://broker.example.com/gateway/openai/v1/chat/completions"
        );
        assert_eq!(
            build_models_endpoint("https://broker.example.com"),
            "https://broker.example.com/openai/v1/models"
        );
    }

    #[test]
    fn trailing_slashes_never_double_up() {
        assert_eq!(
            build_chat_endpoint("https://api.openai.com/v1///"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            fallback_models_endpoint("https://broker.example.com/gateway/"),
            "https://broker.example.com/gateway/v1/models"
        );
    }
}
