//! Copy-template interpolation.
//!
//! Copy strings in the pricing document may carry `{placeholder}` slots,
//! e.g. `"着付けのみ（{price}）"`. Unknown placeholders render as empty,
//! matching the degrade-gracefully policy for partially configured copy.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("placeholder pattern is valid"));

/// Replace every `{name}` slot with the matching value from `vars`;
/// missing names become the empty string.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, String)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            vars.iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.clone())
                .unwrap_or_default()
        })
        .into_owned()
}
