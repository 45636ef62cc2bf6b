//! Deep-link handoff to the external reservation form.
//!
//! The selected keys are assembled into one flat JSON object and carried
//! as a single query parameter. Only the "plain" encoding is implemented;
//! other mode tags are a reserved extension point and make the encoder a
//! no-op rather than a guess. Payload size and content validation belong
//! to the receiving form.

use serde_json::{Map, Value, json};
use url::form_urlencoded;

use crate::config::{DeepLinkConfig, PricingConfig};
use crate::selection::Selection;

const MODE_PLAIN: &str = "plain";

fn selection_field(sel: &Selection, key: &str) -> Option<Value> {
    let value = match key {
        "genre" => json!(sel.genre),
        "support" => json!(sel.support),
        "costume" => json!(sel.costume),
        "partnerCategory" => json!(sel.partner_category),
        "partnerRank" => json!(sel.partner_rank),
        "month" => json!(sel.month),
        "weekdayWeekend" => json!(sel.weekday_weekend),
        "sameDayData" => json!(sel.same_day_data),
        "rushNextDay" => json!(sel.rush_next_day),
        "locationAddOn" => json!(sel.location_add_on),
        "sibling753" => json!(sel.sibling_753),
        "visitRental" => json!(sel.visit_rental),
        "westernAddOn" => json!(sel.western_add_on),
        "extras" => json!(sel.extras),
        "familyOutfits" => json!(sel.family_outfits),
        "micro" => json!({
            "nihongami": sel.nihongami,
            "hairChange": sel.hair_change,
            "westernAddOn": sel.western_add_on,
        }),
        // Unrecognized key names are ignored, not errors.
        _ => return None,
    };
    Some(value)
}

/// Build the flat payload object from the configured key list.
#[must_use]
pub fn build_payload(link: &DeepLinkConfig, sel: &Selection) -> Option<Value> {
    if link.mode != MODE_PLAIN {
        return None;
    }
    let mut payload = Map::new();
    for key in &link.include_keys {
        if let Some(value) = selection_field(sel, key) {
            payload.insert(key.clone(), value);
        }
    }
    Some(Value::Object(payload))
}

/// Serialize the payload as `<queryParam>=<json>` with form encoding.
#[must_use]
pub fn build_query(link: &DeepLinkConfig, sel: &Selection) -> Option<String> {
    let payload = build_payload(link, sel)?;
    let encoded: String = form_urlencoded::Serializer::new(String::new())
        .append_pair(&link.query_param, &payload.to_string())
        .finish();
    Some(encoded)
}

/// Full handoff URL: the configured reservation form plus the query.
#[must_use]
pub fn build_reserve_url(cfg: &PricingConfig, sel: &Selection) -> Option<String> {
    let link = cfg.deep_link.as_ref()?;
    if link.reserve_form_url.is_empty() {
        return None;
    }
    let query = build_query(link, sel)?;
    let joiner = if link.reserve_form_url.contains('?') { '&' } else { '?' };
    Some(format!("{}{}{}", link.reserve_form_url, joiner, query))
}
