//! Compiled-in default pricing document.
//!
//! The widget must always have a usable configuration, so a complete
//! default document ships inside the binary. It is exposed both typed and
//! as a raw [`Value`] so the deep merge can overlay a remote document on
//! it before decoding.

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::config::PricingConfig;
use crate::merge::deep_merge;

static DEFAULT_JSON: &str = include_str!("../assets/default-pricing.json");

static DEFAULT_VALUE: Lazy<Value> = Lazy::new(|| {
    serde_json::from_str(DEFAULT_JSON).expect("embedded default pricing document parses")
});

static DEFAULT_CONFIG: Lazy<PricingConfig> = Lazy::new(|| {
    serde_json::from_value(DEFAULT_VALUE.clone())
        .expect("embedded default pricing document matches schema")
});

/// The complete built-in configuration.
#[must_use]
pub fn default_config() -> &'static PricingConfig {
    &DEFAULT_CONFIG
}

/// The built-in configuration as a raw JSON value (merge base).
#[must_use]
pub fn default_value() -> &'static Value {
    &DEFAULT_VALUE
}

/// Overlay a (possibly partial) remote document onto the defaults and
/// decode the effective configuration.
///
/// # Errors
///
/// Returns an error when the merged document does not decode into the
/// schema, i.e. the overlay carried type-corrupt values. Merely missing
/// or nulled fields decode fine.
pub fn effective_config(overlay: &Value) -> Result<PricingConfig, serde_json::Error> {
    serde_json::from_value(deep_merge(default_value(), overlay))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SupportTier;
    use serde_json::json;

    #[test]
    fn embedded_document_parses_into_schema() {
        let cfg = default_config();
        assert_eq!(cfg.schema_version, Some(5));
        assert_eq!(cfg.base_fee("legacy.bronze"), Some(52_060));
        assert_eq!(cfg.base_fee("legacy.diamond"), Some(140_930));
        assert_eq!(cfg.genre_surcharge("753-3", SupportTier::A), Some(8800));
        assert_eq!(cfg.rental_price("omiya_ubugi", "E"), Some(14_900));
        assert_eq!(
            cfg.delivery.as_ref().unwrap().busy_months,
            vec![10, 11, 12]
        );
    }

    #[test]
    fn effective_config_overlays_partial_documents() {
        let overlay = json!({
            "baseFees": {"legacy": {"bronze": 60000}},
            "delivery": {"sameDayPrice": 6600}
        });
        let cfg = effective_config(&overlay).unwrap();
        assert_eq!(cfg.base_fee("legacy.bronze"), Some(60000));
        // untouched siblings inherit the defaults
        assert_eq!(cfg.base_fee("legacy.silver"), Some(72_496));
        let delivery = cfg.delivery.unwrap();
        assert_eq!(delivery.same_day_price, 6600);
        assert_eq!(delivery.rush_price, 5500);
    }

    #[test]
    fn type_corrupt_overlay_fails_decoding() {
        let overlay = json!({"baseFees": {"ateOne": "not a number"}});
        assert!(effective_config(&overlay).is_err());
    }
}
