//! Eligibility derivations: pure functions of configuration + selection.
//!
//! Nothing here mutates state; the session calls these both when offering
//! options and again at compute time, so an option that stopped being
//! available after it was checked can never bill.

use crate::config::PricingConfig;
use crate::constants::{GENRE_ADULT_FEMALE, GENRE_ADULT_MALE, GENRE_HALF_BOY, GENRE_HALF_GIRL};
use crate::selection::{CostumeSource, DayType, Selection, SupportTier};

/// True iff the month is one of the configured busy months.
#[must_use]
pub fn is_busy_month(cfg: &PricingConfig, month: u8) -> bool {
    cfg.delivery
        .as_ref()
        .is_some_and(|d| d.busy_months.contains(&month))
}

/// Same-day data delivery: unavailable only on busy-season weekends.
#[must_use]
pub fn same_day_allowed(cfg: &PricingConfig, sel: &Selection) -> bool {
    !(is_busy_month(cfg, sel.month) && sel.weekday_weekend == DayType::Weekend)
}

/// Rush (next-business-day) delivery: offered only on busy-season
/// weekends, the exact window same-day is unavailable in.
#[must_use]
pub fn rush_allowed(cfg: &PricingConfig, sel: &Selection) -> bool {
    is_busy_month(cfg, sel.month) && sel.weekday_weekend == DayType::Weekend
}

/// The in-store rack is not offered for the half-age-of-majority and
/// coming-of-age milestone genres.
#[must_use]
pub fn in_store_allowed(genre: &str) -> bool {
    !matches!(
        genre,
        GENRE_HALF_GIRL | GENRE_HALF_BOY | GENRE_ADULT_FEMALE | GENRE_ADULT_MALE
    )
}

/// Costume source forced by the support tier, if any. Tier A means the
/// subject arrives fully prepared, so only a brought costume makes sense
/// when the rule is enabled.
#[must_use]
pub fn forced_costume(cfg: &PricingConfig, tier: SupportTier) -> Option<CostumeSource> {
    let rules = cfg.rules()?;
    (rules.support_a_forces_bring && tier == SupportTier::A).then_some(CostumeSource::Bring)
}

/// Whether the family-outfit block is offered for a genre.
#[must_use]
pub fn family_block_offered(cfg: &PricingConfig, genre: &str) -> bool {
    cfg.rules()
        .is_none_or(|rules| !rules.family_hidden_genres.iter().any(|g| g == genre))
}

/// Whether the western-style add-on can be taken for a genre.
#[must_use]
pub fn western_add_on_eligible(cfg: &PricingConfig, genre: &str) -> bool {
    cfg.rules().is_some_and(|rules| {
        rules
            .feature_rules
            .western_add_on_eligible_genres
            .iter()
            .any(|g| g == genre)
    })
}
