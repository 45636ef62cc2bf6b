//! Per-plan quote computation.
//!
//! `compute_plan` is a pure function of (configuration, selection). Each
//! pricing step contributes at most one top-level line item. A step whose
//! amount resolves from an explicit configured figure renders even at
//! zero; a step whose lookup misses (unknown genre, category, rank or
//! plan) contributes nothing and is silently omitted. The engine never
//! fails for an incomplete configuration.

use std::collections::HashMap;
use std::sync::Mutex;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{PlanDuration, PlanMeta, PricingConfig};
use crate::constants::{GENRE_753_PREFIX, GENRE_OMIYA, GENRE_WEDDING, PLAN_ATE_ONE};
use crate::eligibility::{
    family_block_offered, rush_allowed, same_day_allowed, western_add_on_eligible,
};
use crate::selection::{
    CostumeSource, DressingTier, Extras, FamilyGender, FamilySource, Selection, SupportTier,
};
use crate::text::render_template;

/// One labeled amount in a plan breakdown. Discounts carry a negative
/// amount. Family outfits expand into child lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub label: String,
    pub amount: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LineItem>,
}

impl LineItem {
    #[must_use]
    pub fn new(label: impl Into<String>, amount: i64) -> Self {
        Self {
            label: label.into(),
            amount,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_children(label: impl Into<String>, amount: i64, children: Vec<Self>) -> Self {
        Self {
            label: label.into(),
            amount,
            children,
        }
    }
}

/// Computed estimate for one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanQuote {
    pub plan_key: String,
    pub name: String,
    pub badge: Option<String>,
    pub note: Option<String>,
    pub duration: Option<PlanDuration>,
    pub total: i64,
    pub breakdown: Vec<LineItem>,
}

/// Compiled hide patterns, keyed by the raw pattern string. The set of
/// patterns comes from the pricing document and is small.
static HIDE_PATTERNS: Lazy<Mutex<HashMap<String, Option<Regex>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn compile_hide_pattern(pattern: &str) -> Option<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).ok()
}

/// Hide patterns may be literal plan keys or regex strings ("legacy.*").
/// Patterns are matched anchored; an invalid pattern falls back to a
/// literal comparison.
fn plan_key_matches(pattern: &str, plan_key: &str) -> bool {
    if let Ok(mut cache) = HIDE_PATTERNS.lock() {
        let compiled = cache
            .entry(pattern.to_string())
            .or_insert_with(|| compile_hide_pattern(pattern));
        return match compiled {
            Some(re) => re.is_match(plan_key),
            None => pattern == plan_key,
        };
    }
    // Poisoned cache lock: compile uncached rather than fail the match.
    match compile_hide_pattern(pattern) {
        Some(re) => re.is_match(plan_key),
        None => pattern == plan_key,
    }
}

fn plan_hidden(cfg: &PricingConfig, genre: &str, plan_key: &str) -> bool {
    cfg.genre_plan_overrides
        .as_ref()
        .and_then(|overrides| overrides.get(genre))
        .is_some_and(|ov| {
            ov.hide_plan_keys
                .iter()
                .any(|pattern| plan_key_matches(pattern, plan_key))
        })
}

/// Plans offered for the current selection, with per-genre metadata
/// overrides applied. The trial plan is listed only when opted in.
#[must_use]
pub fn visible_plans(cfg: &PricingConfig, sel: &Selection) -> Vec<PlanMeta> {
    cfg.plans()
        .iter()
        .filter(|plan| plan.key != PLAN_ATE_ONE || sel.show_ate_one)
        .filter(|plan| !plan_hidden(cfg, &sel.genre, &plan.key))
        .map(|plan| resolve_plan_meta(cfg, &sel.genre, plan))
        .collect()
}

fn resolve_plan_meta(cfg: &PricingConfig, genre: &str, plan: &PlanMeta) -> PlanMeta {
    let mut meta = plan.clone();
    if let Some(ov) = cfg.plan_override(genre, &plan.key) {
        if let Some(name) = &ov.name {
            meta.name = name.clone();
        }
        if let Some(badge) = &ov.badge {
            meta.badge = Some(badge.clone());
        }
        if let Some(note) = &ov.note {
            meta.note = Some(note.clone());
        }
    }
    meta
}

/// Base fee for a plan under a genre: per-genre override first, then the
/// fee tables.
#[must_use]
pub fn resolved_base_fee(cfg: &PricingConfig, genre: &str, plan_key: &str) -> Option<i64> {
    if let Some(ov) = cfg.plan_override(genre, plan_key)
        && let Some(fee) = ov.base_fee_override
    {
        return Some(fee);
    }
    cfg.base_fee(plan_key)
}

fn main_costume_cost(cfg: &PricingConfig, sel: &Selection) -> Option<i64> {
    let costumes = cfg.costumes.as_ref()?;
    match sel.costume {
        CostumeSource::Bring => Some(costumes.bring.price),
        CostumeSource::InStore => Some(costumes.in_store.price),
        CostumeSource::Partner => {
            let category = sel.partner_category.as_deref()?;
            let rank = sel.partner_rank.as_deref()?;
            cfg.rental_price(category, rank)
        }
    }
}

fn dressing_price(cfg: &PricingConfig, tier: DressingTier) -> i64 {
    cfg.adult_dressing.as_ref().map_or(0, |fees| match tier {
        DressingTier::DressOnly => fees.dress_only,
        DressingTier::DressHair => fees.dress_hair,
    })
}

fn family_line(cfg: &PricingConfig, sel: &Selection) -> Option<LineItem> {
    if sel.family_outfits.is_empty() || !family_block_offered(cfg, &sel.genre) {
        return None;
    }
    let mut entries = Vec::with_capacity(sel.family_outfits.len());
    let mut total = 0i64;
    for outfit in &sel.family_outfits {
        let dressing = dressing_price(cfg, outfit.dressing);
        let dressing_label_key = match outfit.dressing {
            DressingTier::DressOnly => "familyDressOnly",
            DressingTier::DressHair => "familyDressHair",
        };
        let dressing_line = LineItem::new(
            render_template(
                &cfg.label(dressing_label_key),
                &[("price", crate::money::format_yen(dressing))],
            ),
            dressing,
        );

        // The rental sub-line is always shown, zero-cost included, so a
        // brought-in outfit is visible in the breakdown.
        let (rental_label, rental) = match outfit.source {
            FamilySource::Bring => (cfg.label("familySourceBring"), 0),
            FamilySource::Partner => {
                let price = outfit
                    .category
                    .as_deref()
                    .zip(outfit.rank.as_deref())
                    .and_then(|(category, rank)| cfg.rental_price(category, rank))
                    .unwrap_or(0);
                let label = outfit.category.as_deref().map_or_else(
                    || cfg.label("familySourcePartner"),
                    |category| cfg.category_label(category, &sel.genre),
                );
                (label, price)
            }
        };
        let rental_line = LineItem::new(rental_label, rental);

        let gender_label = match outfit.gender {
            FamilyGender::Female => cfg.label("familyGenderFemale"),
            FamilyGender::Male => cfg.label("familyGenderMale"),
        };
        let entry_total = dressing + rental;
        total += entry_total;
        entries.push(LineItem::with_children(
            gender_label,
            entry_total,
            vec![dressing_line, rental_line],
        ));
    }
    Some(LineItem::with_children(
        cfg.label("breakdownFamily"),
        total,
        entries,
    ))
}

fn extras_line(cfg: &PricingConfig, sel: &Selection) -> Option<LineItem> {
    let extras = &sel.extras;
    if *extras == Extras::default() {
        return None;
    }
    let fees = cfg.participants.as_ref()?;
    let mut children = Vec::new();
    let mut total = 0i64;
    let mut push = |label_key: &str, qty: u32, unit: i64| {
        if qty > 0 {
            let amount = unit * i64::from(qty);
            total += amount;
            children.push(LineItem::new(
                format!("{} ×{qty}", cfg.label(label_key)),
                amount,
            ));
        }
    };
    push("extraAdult", extras.adult, fees.extra.adult_or_hs);
    push("extraChild", extras.child, fees.extra.child_u15);
    push("extraDog", extras.dog, fees.extra.dog);
    push("semiPerson", extras.semi_person, fees.semi_main.person);
    push("semiDog", extras.semi_dog, fees.semi_main.dog);
    Some(LineItem::with_children(
        cfg.label("breakdownExtras"),
        total,
        children,
    ))
}

fn visit_rental_line(cfg: &PricingConfig, sel: &Selection) -> Option<LineItem> {
    if !sel.visit_rental {
        return None;
    }
    let add_ons = cfg.add_ons.as_ref()?;
    if sel.genre.starts_with(GENRE_753_PREFIX) {
        return Some(LineItem::new(
            cfg.label("breakdownVisit753"),
            add_ons.visit_rental_753,
        ));
    }
    // The shrine-visit branch only applies while the main costume comes
    // from the partner catalog.
    if sel.genre == GENRE_OMIYA && sel.costume == CostumeSource::Partner {
        return Some(LineItem::new(
            cfg.label("breakdownVisitOmiya"),
            add_ons.omiya_visit_rental_baby + add_ons.omiya_visit_rental_adult,
        ));
    }
    None
}

fn micro_line(cfg: &PricingConfig, sel: &Selection) -> Option<LineItem> {
    let add_ons = cfg.add_ons.as_ref()?;
    let mut children = Vec::new();
    if sel.nihongami {
        children.push(LineItem::new(cfg.label("nihongami"), add_ons.nihongami));
    }
    if sel.hair_change {
        children.push(LineItem::new(cfg.label("hairChange"), add_ons.hair_change));
    }
    if sel.western_add_on && western_add_on_eligible(cfg, &sel.genre) {
        children.push(LineItem::new(
            cfg.label("westernAddOn"),
            add_ons.western_add_on_from,
        ));
    }
    if children.is_empty() {
        return None;
    }
    let total: i64 = children.iter().map(|c| c.amount).sum();
    Some(LineItem::with_children(
        cfg.label("breakdownMicro"),
        total,
        children,
    ))
}

fn wedding_line(cfg: &PricingConfig, sel: &Selection) -> Option<LineItem> {
    if sel.genre != GENRE_WEDDING {
        return None;
    }
    let wedding = cfg.wedding.as_ref()?;
    if !wedding.enabled {
        return None;
    }
    let amount = wedding.expected_photos * wedding.minutes_per_photo * wedding.cost_per_minute;
    Some(LineItem::new(cfg.label("breakdownWedding"), amount))
}

fn prepared_arrival_line(cfg: &PricingConfig, sel: &Selection) -> Option<LineItem> {
    if sel.support != SupportTier::A {
        return None;
    }
    let discount = &cfg.rules()?.prepared_arrival;
    if !discount.enabled || discount.excluded_genres.iter().any(|g| g == &sel.genre) {
        return None;
    }
    let figure = match discount.mode {
        crate::config::DiscountMode::Flat => discount.flat_amount?,
        crate::config::DiscountMode::AgeTiered => discount.by_genre.get(&sel.genre).copied()?,
    };
    // The configured magnitude may be stored with either sign; the line is
    // always a discount.
    Some(LineItem::new(cfg.label("breakdownPrepared"), -figure.abs()))
}

/// Compute the quote for one plan. Invoked once per visible plan after a
/// confirmed selection.
#[must_use]
pub fn compute_plan(cfg: &PricingConfig, sel: &Selection, plan_key: &str) -> PlanQuote {
    let meta = cfg
        .plans()
        .iter()
        .find(|plan| plan.key == plan_key)
        .map(|plan| resolve_plan_meta(cfg, &sel.genre, plan));

    let mut breakdown = Vec::new();

    // 1. Base fee.
    if let Some(fee) = resolved_base_fee(cfg, &sel.genre, plan_key) {
        breakdown.push(LineItem::new(cfg.label("breakdownBase"), fee));
    }

    // 2. Genre/support surcharge. A configured zero renders as a visible
    //    zero-amount line; a missing tier renders nothing.
    if let Some(surcharge) = cfg.genre_surcharge(&sel.genre, sel.support) {
        breakdown.push(LineItem::new(cfg.label("breakdownGenre"), surcharge));
    }

    // 3. Main costume.
    if let Some(cost) = main_costume_cost(cfg, sel) {
        breakdown.push(LineItem::new(cfg.label("breakdownCostume"), cost));
    }

    // 4. Family outfits.
    if let Some(line) = family_line(cfg, sel) {
        breakdown.push(line);
    }

    // Extra participants and semi-featured subjects.
    if let Some(line) = extras_line(cfg, sel) {
        breakdown.push(line);
    }

    // 5. Delivery surcharges, re-gated at compute time: a checked option
    //    that has since become unavailable must not bill.
    if let Some(delivery) = cfg.delivery.as_ref() {
        if sel.same_day_data && same_day_allowed(cfg, sel) {
            breakdown.push(LineItem::new(
                cfg.label("breakdownSameDay"),
                delivery.same_day_price,
            ));
        }
        if sel.rush_next_day && rush_allowed(cfg, sel) {
            breakdown.push(LineItem::new(cfg.label("breakdownRush"), delivery.rush_price));
        }
    }

    // 6. Independent add-ons.
    if let Some(add_ons) = cfg.add_ons.as_ref() {
        if sel.location_add_on {
            breakdown.push(LineItem::new(cfg.label("breakdownLocation"), add_ons.location));
        }
        if sel.sibling_753 && sel.genre.starts_with(GENRE_753_PREFIX) {
            breakdown.push(LineItem::new(
                cfg.label("breakdownSibling"),
                add_ons.sibling_753,
            ));
        }
    }
    if let Some(line) = visit_rental_line(cfg, sel) {
        breakdown.push(line);
    }
    if let Some(line) = micro_line(cfg, sel) {
        breakdown.push(line);
    }

    // 7. Per-unit labor surcharge (wedding only).
    if let Some(line) = wedding_line(cfg, sel) {
        breakdown.push(line);
    }

    // 8. Prepared-arrival discount.
    if let Some(line) = prepared_arrival_line(cfg, sel) {
        breakdown.push(line);
    }

    // 9. Total, clamped up to the configured floor.
    let raw: i64 = breakdown.iter().map(|line| line.amount).sum();
    let total = raw.max(cfg.min_total());

    PlanQuote {
        plan_key: plan_key.to_string(),
        name: meta.as_ref().map_or_else(|| plan_key.to_string(), |m| m.name.clone()),
        badge: meta.as_ref().and_then(|m| m.badge.clone()),
        note: meta.as_ref().and_then(|m| m.note.clone()),
        duration: cfg
            .durations
            .as_ref()
            .and_then(|d| d.get(plan_key))
            .cloned(),
        total,
        breakdown,
    }
}
