//! Estimation session: one configuration plus one selection, with the
//! confirm/reset state machine.
//!
//! The machine has two states, unconfirmed and confirmed. Any selection
//! mutation whatsoever drops back to unconfirmed; only a valid confirm
//! action moves forward. Quotes are only available in the confirmed
//! state, so a displayed estimate can never be stale.

use crate::config::PricingConfig;
use crate::deeplink;
use crate::defaults::default_config;
use crate::eligibility::{family_block_offered, forced_costume};
use crate::pricing::{PlanQuote, compute_plan, visible_plans};
use crate::selection::{
    CostumeSource, DayType, Extras, FamilyOutfit, Selection, SupportTier,
};
use crate::validate::{ValidationError, validate};

#[derive(Debug, Clone)]
pub struct Session {
    config: PricingConfig,
    selection: Selection,
    confirmed: bool,
    validation_msg: Option<String>,
    next_outfit_id: u32,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(default_config().clone())
    }
}

impl Session {
    /// Start a session with the given effective configuration; the
    /// initial selection is seeded from `ui.defaults` when present.
    #[must_use]
    pub fn new(config: PricingConfig) -> Self {
        let mut selection = Selection::default();
        if let Some(defaults) = config.ui.as_ref().and_then(|ui| ui.defaults.as_ref()) {
            if let Some(month) = defaults.month {
                selection.month = month;
            }
            if let Some(day) = defaults.weekday_weekend {
                selection.weekday_weekend = day;
            }
            if let Some(genre) = &defaults.genre {
                selection.genre = genre.clone();
            }
            if let Some(support) = defaults.support {
                selection.support = support;
            }
            if let Some(costume) = defaults.costume {
                selection.costume = costume;
            }
            if let Some(show) = defaults.show_ate_one {
                selection.show_ate_one = show;
            }
        }
        let mut session = Self {
            config,
            selection,
            confirmed: false,
            validation_msg: None,
            next_outfit_id: 1,
        };
        // The seeded tier may force the costume source straight away.
        session.apply_forced_costume();
        session
    }

    #[must_use]
    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    #[must_use]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[must_use]
    pub const fn confirmed(&self) -> bool {
        self.confirmed
    }

    #[must_use]
    pub fn validation_message(&self) -> Option<&str> {
        self.validation_msg.as_deref()
    }

    /// Replace the configuration wholesale (document reload). The
    /// displayed estimate is invalidated like any other change.
    pub fn replace_config(&mut self, config: PricingConfig) {
        self.config = config;
        self.touch();
    }

    fn touch(&mut self) {
        self.confirmed = false;
    }

    fn apply_forced_costume(&mut self) {
        if let Some(forced) = forced_costume(&self.config, self.selection.support)
            && self.selection.costume != forced
        {
            self.selection.costume = forced;
            self.selection.clear_partner();
        }
    }

    // Selection mutators. Every one of these unconditionally resets the
    // confirmed flag.

    pub fn set_month(&mut self, month: u8) {
        self.selection.month = month.clamp(1, 12);
        self.touch();
    }

    pub fn set_day_type(&mut self, day: DayType) {
        self.selection.weekday_weekend = day;
        self.touch();
    }

    /// Change the genre and clear whatever the new genre invalidates, per
    /// the configured reset rules. Stale selections must never price into
    /// a different genre's context.
    pub fn set_genre(&mut self, genre: &str) {
        self.selection.genre = genre.to_string();
        let rules = self
            .config
            .rules()
            .map(|r| r.reset_on_genre_change.clone())
            .unwrap_or_default();

        if rules.clear_family_if_hidden && !family_block_offered(&self.config, genre) {
            self.selection.family_outfits.clear();
        }
        if rules.clear_visit_if_not_omiya
            && genre != crate::constants::GENRE_OMIYA
            && !genre.starts_with(crate::constants::GENRE_753_PREFIX)
        {
            self.selection.visit_rental = false;
        }
        if rules.clear_sibling_if_not_753
            && !genre.starts_with(crate::constants::GENRE_753_PREFIX)
        {
            self.selection.sibling_753 = false;
        }
        if rules.reset_partner_if_not_allowed
            && let Some(category) = self.selection.partner_category.clone()
            && !self
                .config
                .partner_categories(genre)
                .iter()
                .any(|c| c == &category)
        {
            self.selection.clear_partner();
        }
        self.touch();
    }

    pub fn set_support(&mut self, tier: SupportTier) {
        self.selection.support = tier;
        // Active correction, not a display constraint: tier A snaps the
        // costume source back to "brought" when the rule is on.
        self.apply_forced_costume();
        self.touch();
    }

    pub fn set_costume(&mut self, source: CostumeSource) {
        let source = forced_costume(&self.config, self.selection.support).unwrap_or(source);
        if self.selection.costume != source {
            self.selection.costume = source;
            self.selection.clear_partner();
        }
        self.touch();
    }

    /// Pick a partner category; the rank resets because rank tables are
    /// per category.
    pub fn set_partner_category(&mut self, category: &str) {
        self.selection.partner_category = Some(category.to_string());
        self.selection.partner_rank = None;
        self.touch();
    }

    pub fn set_partner_rank(&mut self, rank: &str) {
        self.selection.partner_rank = Some(rank.to_string());
        self.touch();
    }

    pub fn set_show_ate_one(&mut self, show: bool) {
        self.selection.show_ate_one = show;
        self.touch();
    }

    pub fn set_same_day_data(&mut self, on: bool) {
        self.selection.same_day_data = on;
        self.touch();
    }

    pub fn set_rush_next_day(&mut self, on: bool) {
        self.selection.rush_next_day = on;
        self.touch();
    }

    pub fn set_location_add_on(&mut self, on: bool) {
        self.selection.location_add_on = on;
        self.touch();
    }

    pub fn set_sibling_753(&mut self, on: bool) {
        self.selection.sibling_753 = on;
        self.touch();
    }

    pub fn set_visit_rental(&mut self, on: bool) {
        self.selection.visit_rental = on;
        self.touch();
    }

    pub fn set_nihongami(&mut self, on: bool) {
        self.selection.nihongami = on;
        self.touch();
    }

    pub fn set_hair_change(&mut self, on: bool) {
        self.selection.hair_change = on;
        self.touch();
    }

    pub fn set_western_add_on(&mut self, on: bool) {
        self.selection.western_add_on = on;
        self.touch();
    }

    pub fn set_extras(&mut self, extras: Extras) {
        self.selection.extras = extras;
        self.touch();
    }

    /// Append a family outfit entry, assigning it a session-unique id.
    /// Returns the id.
    pub fn add_family_outfit(&mut self, mut outfit: FamilyOutfit) -> u32 {
        let id = self.next_outfit_id;
        self.next_outfit_id += 1;
        outfit.id = id;
        self.selection.family_outfits.push(outfit);
        self.touch();
        id
    }

    pub fn remove_family_outfit(&mut self, id: u32) {
        self.selection.family_outfits.retain(|o| o.id != id);
        self.touch();
    }

    // Confirm machinery.

    /// Run the pre-confirm gate; on success the session enters the
    /// confirmed state and quotes become available.
    ///
    /// # Errors
    ///
    /// Returns the validation failure; the session stays unconfirmed and
    /// the localized hint is retained for display.
    pub fn confirm(&mut self) -> Result<(), ValidationError> {
        match validate(&self.selection) {
            Ok(()) => {
                self.validation_msg = None;
                self.confirmed = true;
                Ok(())
            }
            Err(err) => {
                self.confirmed = false;
                self.validation_msg = Some(err.hint(&self.config));
                Err(err)
            }
        }
    }

    /// Quotes for every visible plan. `None` until the selection has been
    /// explicitly confirmed.
    #[must_use]
    pub fn quotes(&self) -> Option<Vec<PlanQuote>> {
        if !self.confirmed {
            return None;
        }
        Some(
            visible_plans(&self.config, &self.selection)
                .iter()
                .map(|plan| compute_plan(&self.config, &self.selection, &plan.key))
                .collect(),
        )
    }

    /// Reservation handoff URL for the current selection, when deep links
    /// are configured in plain mode.
    #[must_use]
    pub fn reserve_url(&self) -> Option<String> {
        deeplink::build_reserve_url(&self.config, &self.selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::effective_config;
    use crate::selection::{DressingTier, FamilyGender, FamilySource};
    use serde_json::json;

    fn outfit() -> FamilyOutfit {
        FamilyOutfit {
            id: 0,
            gender: FamilyGender::Female,
            source: FamilySource::Bring,
            dressing: DressingTier::DressOnly,
            category: None,
            rank: None,
        }
    }

    #[test]
    fn defaults_seed_the_initial_selection() {
        let session = Session::default();
        let sel = session.selection();
        assert_eq!(sel.month, 9);
        assert_eq!(sel.genre, "753-3");
        assert_eq!(sel.support, SupportTier::A);
        assert_eq!(sel.costume, CostumeSource::Bring);
        assert!(!session.confirmed());
    }

    #[test]
    fn any_mutation_resets_confirmation() {
        let mut session = Session::default();
        session.confirm().unwrap();
        assert!(session.confirmed());
        session.set_month(10);
        assert!(!session.confirmed());

        session.confirm().unwrap();
        session.set_location_add_on(true);
        assert!(!session.confirmed());
    }

    #[test]
    fn confirm_fails_with_hint_for_incomplete_partner_choice() {
        let mut session = Session::default();
        session.set_support(SupportTier::B);
        session.set_costume(CostumeSource::Partner);
        let err = session.confirm().unwrap_err();
        assert_eq!(err, ValidationError::MissingPartnerCategory);
        assert!(!session.confirmed());
        assert_eq!(
            session.validation_message(),
            Some("提携衣装のジャンルを選んでください。")
        );

        session.set_partner_category("753_3_hifu");
        assert_eq!(session.confirm().unwrap_err(), ValidationError::MissingPartnerRank);

        session.set_partner_rank("A");
        session.confirm().unwrap();
        assert!(session.confirmed());
        assert_eq!(session.validation_message(), None);
    }

    #[test]
    fn tier_a_forces_brought_costume() {
        let mut session = Session::default();
        session.set_support(SupportTier::B);
        session.set_costume(CostumeSource::Partner);
        session.set_partner_category("753_3_hifu");
        session.set_partner_rank("A");

        session.set_support(SupportTier::A);
        assert_eq!(session.selection().costume, CostumeSource::Bring);
        assert_eq!(session.selection().partner_category, None);
        assert_eq!(session.selection().partner_rank, None);
    }

    #[test]
    fn genre_change_clears_disallowed_partner_choice() {
        let mut session = Session::default();
        session.set_support(SupportTier::B);
        session.set_costume(CostumeSource::Partner);
        session.set_partner_category("753_3_hifu");
        session.set_partner_rank("A");

        // omiya does not offer the 3-year-old hifu category
        session.set_genre("omiya");
        assert_eq!(session.selection().partner_category, None);
        assert_eq!(session.selection().partner_rank, None);
        assert_eq!(session.selection().costume, CostumeSource::Partner);
    }

    #[test]
    fn genre_change_clears_sibling_and_visit_flags() {
        let mut session = Session::default();
        session.set_sibling_753(true);
        session.set_visit_rental(true);

        session.set_genre("maternity");
        assert!(!session.selection().sibling_753);
        assert!(!session.selection().visit_rental);

        // moving between 753 ages keeps both
        let mut session = Session::default();
        session.set_sibling_753(true);
        session.set_visit_rental(true);
        session.set_genre("753-7");
        assert!(session.selection().sibling_753);
        assert!(session.selection().visit_rental);
    }

    #[test]
    fn genre_change_clears_family_outfits_when_hidden() {
        let cfg = effective_config(&json!({
            "calcRules": {"familyHiddenGenres": ["newborn"]}
        }))
        .unwrap();

        let mut session = Session::new(cfg.clone());
        session.add_family_outfit(outfit());
        session.set_genre("newborn");
        assert!(session.selection().family_outfits.is_empty());

        // a genre outside the hidden set keeps the entries
        let mut session = Session::new(cfg);
        session.add_family_outfit(outfit());
        session.set_genre("family");
        assert_eq!(session.selection().family_outfits.len(), 1);
    }

    #[test]
    fn quotes_unavailable_until_confirmed() {
        let mut session = Session::default();
        assert!(session.quotes().is_none());
        session.confirm().unwrap();
        let quotes = session.quotes().unwrap();
        // ateOne is opted out by default
        assert_eq!(quotes.len(), 6);
    }

    #[test]
    fn replacing_config_invalidates_estimate() {
        let mut session = Session::default();
        session.confirm().unwrap();
        session.replace_config(default_config().clone());
        assert!(!session.confirmed());
    }
}
