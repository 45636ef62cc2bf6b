//! Configuration loading with silent fallback.
//!
//! The widget must always end up with a usable configuration, so this
//! loader never fails its caller: every failure path degrades to the
//! compiled-in defaults, with the reason retained for diagnostics and a
//! `log` warning. The transport itself lives behind [`ConfigFetcher`];
//! abandoning an in-flight retrieval is the transport owner's concern
//! (drop the call), after which nothing here observes it.

use log::warn;
use serde_json::Value;

use crate::config::PricingConfig;
use crate::constants::{DEFAULT_PRICING_PATH, SCHEMA_VERSION, SCHEMA_VERSION_COMPAT};
use crate::defaults::{default_config, effective_config};

/// Platform-specific retrieval of the pricing document body.
/// Implementations should treat a non-success HTTP status as an error.
pub trait ConfigFetcher {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Retrieve the raw document at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error when the document cannot be retrieved.
    fn fetch(&self, url: &str) -> Result<String, Self::Error>;
}

/// Why the loader fell back to the built-in defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// Transport failure or non-success status.
    Fetch,
    /// The body was not parseable JSON.
    Malformed,
    /// The body parsed but was not a non-empty object.
    EmptyDocument,
    /// The merged document did not decode into the schema.
    Schema,
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingSource {
    Remote,
    Fallback(FallbackReason),
}

#[derive(Debug, Clone)]
pub struct LoadedPricing {
    pub config: PricingConfig,
    pub source: PricingSource,
}

fn fall_back(reason: FallbackReason) -> LoadedPricing {
    LoadedPricing {
        config: default_config().clone(),
        source: PricingSource::Fallback(reason),
    }
}

/// Load the effective configuration: retrieve, merge over defaults,
/// decode, and check the version tag. Never fails; every failure path
/// returns the defaults with the reason recorded.
pub fn load<F: ConfigFetcher>(fetcher: &F, override_url: Option<&str>) -> LoadedPricing {
    let url = override_url.unwrap_or(DEFAULT_PRICING_PATH);

    let body = match fetcher.fetch(url) {
        Ok(body) => body,
        Err(err) => {
            warn!("pricing fetch failed for {url}: {err}; using built-in defaults");
            return fall_back(FallbackReason::Fetch);
        }
    };

    let overlay: Value = match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(err) => {
            warn!("pricing document at {url} is not valid JSON: {err}; using built-in defaults");
            return fall_back(FallbackReason::Malformed);
        }
    };

    let non_empty_object = overlay.as_object().is_some_and(|obj| !obj.is_empty());
    if !non_empty_object {
        warn!("pricing document at {url} is not a non-empty object; using built-in defaults");
        return fall_back(FallbackReason::EmptyDocument);
    }

    let config = match effective_config(&overlay) {
        Ok(config) => config,
        Err(err) => {
            warn!("merged pricing document does not match the schema: {err}; using built-in defaults");
            return fall_back(FallbackReason::Schema);
        }
    };

    check_schema_version(&config);
    LoadedPricing {
        config,
        source: PricingSource::Remote,
    }
}

/// Warn on a version mismatch; rendering proceeds in best-effort
/// compatibility mode either way.
pub fn check_schema_version(config: &PricingConfig) {
    match config.schema_version {
        Some(SCHEMA_VERSION) => {}
        Some(SCHEMA_VERSION_COMPAT) => {
            warn!(
                "pricing schemaVersion is {SCHEMA_VERSION_COMPAT} (expected {SCHEMA_VERSION}); \
                 continuing in compatibility mode"
            );
        }
        other => {
            warn!(
                "pricing schemaVersion is {other:?} (expected {SCHEMA_VERSION}); \
                 continuing in compatibility mode"
            );
        }
    }
}
