//! Services command handler.
//!
//! Displays the chat services the gateway would discover from the
//! current environment, using the same snapshot and directory code as
//! the server.

use std::sync::Arc;

use anyhow::Result;

use modelgate_axum::insecure_tls_from_env;
use modelgate_core::directory::ServiceDirectory;
use modelgate_core::service::Service;
use modelgate_core::snapshot::EnvSnapshot;
use modelgate_upstream::{UpstreamClient, UpstreamConfig};

use crate::presentation::{print_separator, truncate_string};

/// Execute the services command.
///
/// Captures the environment once, runs discovery (including remote
/// catalog fetches for multi-plan bindings), and prints the result.
///
/// # Errors
///
/// Fails only when the upstream HTTP client cannot be constructed or
/// the JSON output cannot be serialized; discovery itself degrades to
/// an empty list like the server does.
pub async fn execute(json: bool) -> Result<()> {
    let snapshot = EnvSnapshot::capture_from_env();
    tracing::debug!(
        has_api_key = snapshot.has_api_key(),
        has_bindings = snapshot.services_json.is_some(),
        "Captured environment for service discovery"
    );

    // Same TLS opt-out the server honors, so the dump matches what a
    // running gateway would discover
    let upstream = UpstreamConfig::new().with_insecure_tls(insecure_tls_from_env());
    let client = Arc::new(UpstreamClient::new(&upstream)?);
    let directory = ServiceDirectory::new(client);
    let services = directory.list_services(&snapshot).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&services)?);
        return Ok(());
    }

    if services.is_empty() {
        println!("No chat services discovered.");
        println!("Bind a service through VCAP_SERVICES or set OPENAI_API_KEY.");
        return Ok(());
    }

    println!("Found {} service(s):\n", services.len());
    println!(
        "{:<14} {:<18} {:<8} {:<10} {:<4} {:<32} Models",
        "ID", "Name", "Type", "Plan", "Key", "Base URL"
    );
    print_separator(110);

    for service in &services {
        println!(
            "{:<14} {:<18} {:<8} {:<10} {:<4} {:<32} {}",
            truncate_string(&service.id, 13),
            truncate_string(&service.name, 17),
            truncate_string(&service.kind, 7),
            truncate_string(&service.plan, 9),
            if service.has_api_key { "yes" } else { "no" },
            truncate_string(&service.base_url, 31),
            format_models(service),
        );
    }

    Ok(())
}

/// Original model names, the service default marked with an asterisk.
fn format_models(service: &Service) -> String {
    if service.models.is_empty() {
        return "--".to_string();
    }
    service
        .models
        .iter()
        .map(|model| {
            if model.is_default {
                format!("{}*", model.original_name)
            } else {
                model.original_name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgate_core::service::Model;

    fn service_with_models(names: &[&str]) -> Service {
        let models = names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                Model::new(
                    "svc-1",
                    "Alpha",
                    (*name).to_string(),
                    None,
                    vec!["chat".to_string()],
                    index == 0,
                )
            })
            .collect();
        Service {
            id: "svc-1".to_string(),
            name: "Alpha".to_string(),
            kind: "genai".to_string(),
            plan: "chat".to_string(),
            base_url: "https://svc.example".to_string(),
            models,
            has_api_key: true,
            binding_name: None,
            api_key: Some("key".to_string()),
        }
    }

    #[test]
    fn default_model_is_starred() {
        let service = service_with_models(&["m-1", "m-2"]);
        assert_eq!(format_models(&service), "m-1*, m-2");
    }

    #[test]
    fn empty_model_list_shows_a_placeholder() {
        let service = service_with_models(&[]);
        assert_eq!(format_models(&service), "--");
    }
}
