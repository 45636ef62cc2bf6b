//! Typed schema for the versioned pricing document.
//!
//! The document is supplied externally as JSON (camelCase keys) and merged
//! over the compiled-in defaults before it is decoded into these types.
//! Every top-level block the engine can survive without is optional: a
//! remote document may null a block out entirely, and every lookup then
//! degrades to "not configured" instead of failing. The engine never
//! raises for a merely-incomplete document.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::{PLAN_ATE_COLLECTION, PLAN_ATE_ONE, PLAN_LEGACY_PREFIX};
use crate::selection::{CostumeSource, DayType, SupportTier};

/// Root of the pricing document. Immutable for the duration of a session;
/// replaced wholesale on reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PricingConfig {
    pub schema_version: Option<u32>,
    pub colors: Option<ThemeColors>,
    pub ui: Option<UiConfig>,
    pub copy: Option<CopyPack>,
    pub missing_hints: Option<MissingHints>,
    pub calc_rules: Option<CalcRules>,
    pub deep_link: Option<DeepLinkConfig>,
    pub plan_badges: Option<HashMap<String, String>>,
    pub option_discount_blurb: Option<HashMap<String, String>>,
    pub delivery: Option<Delivery>,
    pub participants: Option<Participants>,
    pub adult_dressing: Option<AdultDressing>,
    pub add_ons: Option<AddOns>,
    pub base_fees: Option<BaseFees>,
    pub plans: Option<Vec<PlanMeta>>,
    pub durations: Option<HashMap<String, PlanDuration>>,
    pub genre_addons: Option<HashMap<String, GenreAddonEntry>>,
    pub costumes: Option<Costumes>,
    pub wedding: Option<WeddingConfig>,
    pub genre_plan_overrides: Option<HashMap<String, GenrePlanOverride>>,
    pub reserve_url: Option<String>,
    /// Predecessor of `reserveUrl`; still accepted from older documents.
    pub line_url: Option<String>,
}

/// Color palette for the hosting widget. Carried verbatim for the UI
/// layer; the engine itself never interprets these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeColors {
    pub primary: String,
    pub primary_hover: String,
    pub accent: String,
    pub badge_bg: String,
    pub badge_text: String,
    pub ring: String,
    pub border: String,
    pub border_active: String,
    pub card_bg: String,
    pub text: String,
    pub muted: String,
    pub body_bg: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UiConfig {
    pub theme: Option<UiTheme>,
    pub breakdown: BreakdownUi,
    pub calc_mode: CalcMode,
    pub defaults: Option<UiDefaults>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UiTheme {
    pub brand_name: Option<String>,
    pub colors: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BreakdownUi {
    pub default_open: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalcMode {
    pub require_estimate_confirm: bool,
    pub confirm_button_id: String,
}

impl Default for CalcMode {
    fn default() -> Self {
        Self {
            require_estimate_confirm: true,
            confirm_button_id: "estimateNow".to_string(),
        }
    }
}

/// Externally supplied initial values for a fresh selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UiDefaults {
    pub month: Option<u8>,
    pub weekday_weekend: Option<DayType>,
    pub genre: Option<String>,
    pub support: Option<SupportTier>,
    pub costume: Option<CostumeSource>,
    pub show_ate_one: Option<bool>,
}

/// Copy tables keyed by semantic name; lookups fall back to the key
/// itself so missing copy degrades visibly instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CopyPack {
    pub titles: HashMap<String, String>,
    pub buttons: HashMap<String, String>,
    pub labels: HashMap<String, String>,
}

/// Localized validation hints shown when a required field is missing at
/// confirm time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MissingHints {
    pub weekday_weekend: String,
    pub month: String,
    pub genre: String,
    pub support: String,
    pub costume: String,
    pub partner_category: String,
    pub partner_rank: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CalcRules {
    pub feature_rules: FeatureRules,
    pub prepared_arrival: PreparedArrival,
    pub discount_eligible_genres: Vec<String>,
    pub support_a_forces_bring: bool,
    pub reset_on_genre_change: ResetRules,
    /// Genres for which the family-outfit block is hidden; empty means
    /// the block is offered everywhere.
    pub family_hidden_genres: Vec<String>,
    pub min_total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureRules {
    pub western_add_on_eligible_genres: Vec<String>,
}

/// Discount for arriving already dressed and styled (support tier A).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PreparedArrival {
    pub enabled: bool,
    pub mode: DiscountMode,
    pub flat_amount: Option<i64>,
    pub by_genre: HashMap<String, i64>,
    pub excluded_genres: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DiscountMode {
    #[default]
    Flat,
    AgeTiered,
}

/// Stale-selection clearing applied when the genre changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ResetRules {
    pub clear_family_if_hidden: bool,
    pub clear_visit_if_not_omiya: bool,
    #[serde(rename = "clearSiblingIfNot753")]
    pub clear_sibling_if_not_753: bool,
    pub reset_partner_if_not_allowed: bool,
}

fn default_query_param() -> String {
    "quote".to_string()
}

fn default_deep_link_mode() -> String {
    "plain".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeepLinkConfig {
    pub reserve_form_url: String,
    pub query_param: String,
    pub include_keys: Vec<String>,
    /// Only "plain" is implemented; other tags are a reserved extension
    /// point and make the encoder a no-op.
    pub mode: String,
}

impl Default for DeepLinkConfig {
    fn default() -> Self {
        Self {
            reserve_form_url: String::new(),
            query_param: default_query_param(),
            include_keys: Vec::new(),
            mode: default_deep_link_mode(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Delivery {
    pub same_day_price: i64,
    pub rush_price: i64,
    pub busy_months: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Participants {
    pub included: u32,
    pub extra: ExtraFees,
    pub semi_main: SemiMainFees,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtraFees {
    #[serde(rename = "adultOrHS")]
    pub adult_or_hs: i64,
    pub child_u15: i64,
    pub dog: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SemiMainFees {
    pub person: i64,
    pub dog: i64,
}

/// Dressing fees for family members joining the shoot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AdultDressing {
    pub dress_only: i64,
    pub dress_hair: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AddOns {
    #[serde(rename = "sibling753")]
    pub sibling_753: i64,
    pub location: i64,
    #[serde(rename = "visitRental753")]
    pub visit_rental_753: i64,
    pub omiya_visit_rental_baby: i64,
    pub omiya_visit_rental_adult: i64,
    pub nihongami: i64,
    pub hair_change: i64,
    #[serde(alias = "westernOutfitFrom")]
    pub western_add_on_from: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BaseFees {
    pub ate_one: i64,
    pub ate_collection: i64,
    /// Tiered legacy rates keyed by tier name (bronze … diamond).
    pub legacy: HashMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMeta {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub badge: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanDuration {
    pub shoot: String,
    pub stay: String,
}

/// Surcharge row for one genre. A `null`/absent tier means the tier is
/// not offered for that genre (no breakdown line); an explicit `0` means
/// offered at no extra cost and renders a visible zero-amount line.
/// Collapsing the two silently would be a correctness bug.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GenreAddonEntry {
    pub label: String,
    #[serde(rename = "A")]
    pub a: Option<i64>,
    #[serde(rename = "B")]
    pub b: Option<i64>,
    #[serde(rename = "C")]
    pub c: Option<i64>,
}

impl GenreAddonEntry {
    #[must_use]
    pub const fn tier(&self, tier: SupportTier) -> Option<i64> {
        match tier {
            SupportTier::A => self.a,
            SupportTier::B => self.b,
            SupportTier::C => self.c,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Costumes {
    pub bring: CostumePrice,
    pub in_store: CostumePrice,
    pub partner: PartnerCostumes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CostumePrice {
    pub label: String,
    pub price: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PartnerCostumes {
    pub label: String,
    /// Main subject's genre → categories offered from the partner catalog.
    pub rental_category_by_genre: HashMap<String, Vec<String>>,
    pub category_display_names: HashMap<String, CategoryLabel>,
    /// Family outfit gender → categories offered.
    pub family_gender_category_map: Option<FamilyGenderCategories>,
    /// category → rank letter → price.
    pub rental_prices: HashMap<String, HashMap<String, i64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FamilyGenderCategories {
    pub female: Vec<String>,
    pub male: Vec<String>,
}

/// Display name for a partner category: either one plain label, or a map
/// of genre id → label for categories shared across gendered genres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryLabel {
    Plain(String),
    ByGenre(HashMap<String, String>),
}

/// Per-unit labor surcharge formula for the wedding genre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct WeddingConfig {
    pub enabled: bool,
    pub expected_photos: i64,
    pub minutes_per_photo: i64,
    pub cost_per_minute: i64,
    pub contents_expected_counts: HashMap<String, i64>,
}

/// Genre-scoped plan adjustments: metadata and/or base fee replaced, and
/// plan keys hidden (literal keys or anchored regex patterns).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GenrePlanOverride {
    pub plan_overrides: HashMap<String, PlanOverride>,
    pub hide_plan_keys: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanOverride {
    pub name: Option<String>,
    pub badge: Option<String>,
    pub note: Option<String>,
    pub base_fee_override: Option<i64>,
}

impl PricingConfig {
    /// Decode a complete (already merged) document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be decoded into the schema.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn plans(&self) -> &[PlanMeta] {
        self.plans.as_deref().unwrap_or(&[])
    }

    #[must_use]
    pub fn genre_addon(&self, genre: &str) -> Option<&GenreAddonEntry> {
        self.genre_addons.as_ref()?.get(genre)
    }

    /// Tier surcharge for a genre; `None` when the genre is unknown or the
    /// tier is not offered for it.
    #[must_use]
    pub fn genre_surcharge(&self, genre: &str, tier: SupportTier) -> Option<i64> {
        self.genre_addon(genre)?.tier(tier)
    }

    /// Base fee for a plan key from the fee tables, before any per-genre
    /// override is applied.
    #[must_use]
    pub fn base_fee(&self, plan_key: &str) -> Option<i64> {
        let fees = self.base_fees.as_ref()?;
        match plan_key {
            PLAN_ATE_ONE => Some(fees.ate_one),
            PLAN_ATE_COLLECTION => Some(fees.ate_collection),
            _ => {
                let tier = plan_key.strip_prefix(PLAN_LEGACY_PREFIX)?;
                fees.legacy.get(tier).copied()
            }
        }
    }

    #[must_use]
    pub fn plan_override(&self, genre: &str, plan_key: &str) -> Option<&PlanOverride> {
        self.genre_plan_overrides
            .as_ref()?
            .get(genre)?
            .plan_overrides
            .get(plan_key)
    }

    #[must_use]
    pub fn partner(&self) -> Option<&PartnerCostumes> {
        Some(&self.costumes.as_ref()?.partner)
    }

    /// Partner categories offered for a genre; empty when the genre is
    /// absent from the table.
    #[must_use]
    pub fn partner_categories(&self, genre: &str) -> &[String] {
        self.partner()
            .and_then(|p| p.rental_category_by_genre.get(genre))
            .map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn rental_price(&self, category: &str, rank: &str) -> Option<i64> {
        self.partner()?.rental_prices.get(category)?.get(rank).copied()
    }

    /// Display label for a partner category, resolved per genre when the
    /// stored label is genre-specific. Falls back to the category key.
    #[must_use]
    pub fn category_label(&self, category: &str, genre: &str) -> String {
        match self.partner().and_then(|p| p.category_display_names.get(category)) {
            Some(CategoryLabel::Plain(label)) => label.clone(),
            Some(CategoryLabel::ByGenre(by_genre)) => by_genre
                .get(genre)
                .cloned()
                .unwrap_or_else(|| category.to_string()),
            None => category.to_string(),
        }
    }

    /// Copy label by semantic key, falling back to the key itself.
    #[must_use]
    pub fn label(&self, key: &str) -> String {
        self.copy
            .as_ref()
            .and_then(|copy| copy.labels.get(key))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    #[must_use]
    pub fn rules(&self) -> Option<&CalcRules> {
        self.calc_rules.as_ref()
    }

    #[must_use]
    pub fn min_total(&self) -> i64 {
        self.rules().map_or(0, |rules| rules.min_total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_camel_case_document() {
        let doc = json!({
            "schemaVersion": 5,
            "baseFees": {"ateOne": 16500, "ateCollection": 29800, "legacy": {"bronze": 52060}},
            "genreAddons": {
                "753-3": {"label": "七五三 3歳", "A": 8800, "B": 11000, "C": null}
            },
            "addOns": {"westernOutfitFrom": 4950}
        });
        let cfg: PricingConfig = serde_json::from_value(doc).unwrap();
        assert_eq!(cfg.schema_version, Some(5));
        assert_eq!(cfg.base_fee("legacy.bronze"), Some(52060));
        assert_eq!(cfg.base_fee("ateOne"), Some(16500));
        assert_eq!(cfg.base_fee("legacy.unknown"), None);
        let addon = cfg.genre_addon("753-3").unwrap();
        assert_eq!(addon.tier(SupportTier::A), Some(8800));
        assert_eq!(addon.tier(SupportTier::C), None);
        // backward-compatible alias
        assert_eq!(cfg.add_ons.unwrap().western_add_on_from, 4950);
    }

    #[test]
    fn null_tier_and_zero_tier_stay_distinct() {
        let doc = json!({
            "genreAddons": {
                "baby611": {"label": "ハーフ/1歳", "A": null, "B": null, "C": 0}
            }
        });
        let cfg: PricingConfig = serde_json::from_value(doc).unwrap();
        let entry = cfg.genre_addon("baby611").unwrap();
        assert_eq!(entry.tier(SupportTier::B), None);
        assert_eq!(entry.tier(SupportTier::C), Some(0));
    }

    #[test]
    fn gendered_category_labels_resolve_per_genre() {
        let doc = json!({
            "costumes": {"partner": {"categoryDisplayNames": {
                "plainCat": "そのまま",
                "half_furisode_hakama": {
                    "half-girl": "女児ジュニア着物",
                    "half-boy": "男児ジュニア着物"
                }
            }}}
        });
        let cfg: PricingConfig = serde_json::from_value(doc).unwrap();
        assert_eq!(cfg.category_label("plainCat", "753-3"), "そのまま");
        assert_eq!(
            cfg.category_label("half_furisode_hakama", "half-boy"),
            "男児ジュニア着物"
        );
        // no genre match falls back to the key itself
        assert_eq!(
            cfg.category_label("half_furisode_hakama", "753-3"),
            "half_furisode_hakama"
        );
        assert_eq!(cfg.category_label("missing", "753-3"), "missing");
    }

    #[test]
    fn nulled_block_degrades_lookups() {
        let doc = json!({"baseFees": null, "genreAddons": null});
        let cfg: PricingConfig = serde_json::from_value(doc).unwrap();
        assert_eq!(cfg.base_fee("ateOne"), None);
        assert!(cfg.genre_addon("753-3").is_none());
        assert!(cfg.partner_categories("omiya").is_empty());
    }
}
