//! Pre-confirm validation gate.
//!
//! Only the partner-rental pair is currently constrained; every other
//! field carries a default and cannot be "unset". The user-facing message
//! text comes from the configured hint table.

use thiserror::Error;

use crate::config::PricingConfig;
use crate::selection::{CostumeSource, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("partner rental requires a category")]
    MissingPartnerCategory,
    #[error("partner rental requires a rank")]
    MissingPartnerRank,
}

impl ValidationError {
    /// Localized hint for this error, from configuration.
    #[must_use]
    pub fn hint(self, cfg: &PricingConfig) -> String {
        let hints = cfg.missing_hints.as_ref();
        match self {
            Self::MissingPartnerCategory => hints
                .map(|h| h.partner_category.clone())
                .unwrap_or_else(|| self.to_string()),
            Self::MissingPartnerRank => hints
                .map(|h| h.partner_rank.clone())
                .unwrap_or_else(|| self.to_string()),
        }
    }
}

/// Check the selection for confirmability. Synchronous, side-effect free.
///
/// # Errors
///
/// Returns the first missing partner-rental field when the costume source
/// is partner rental.
pub fn validate(sel: &Selection) -> Result<(), ValidationError> {
    if sel.costume == CostumeSource::Partner {
        if sel.partner_category.is_none() {
            return Err(ValidationError::MissingPartnerCategory);
        }
        if sel.partner_rank.is_none() {
            return Err(ValidationError::MissingPartnerRank);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_config;

    #[test]
    fn partner_rental_requires_category_then_rank() {
        let mut sel = Selection {
            costume: CostumeSource::Partner,
            ..Selection::default()
        };
        assert_eq!(validate(&sel), Err(ValidationError::MissingPartnerCategory));

        sel.partner_category = Some("753_3_hifu".to_string());
        assert_eq!(validate(&sel), Err(ValidationError::MissingPartnerRank));

        sel.partner_rank = Some("A".to_string());
        assert_eq!(validate(&sel), Ok(()));
    }

    #[test]
    fn other_costume_sources_are_unconstrained() {
        assert_eq!(validate(&Selection::default()), Ok(()));
    }

    #[test]
    fn hints_come_from_configuration() {
        let cfg = default_config();
        let hint = ValidationError::MissingPartnerRank.hint(cfg);
        assert_eq!(hint, "提携衣装のランクを選んでください。");
    }
}
