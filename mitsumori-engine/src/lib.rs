//! Mitsumori Estimation Engine
//!
//! Platform-agnostic pricing logic for the studio booking widget. This
//! crate owns the pricing document schema and compiled-in defaults, the
//! deep-merge overlay for remote documents, the selection/confirm session
//! state, and the pure per-plan quote computation. It has no UI and no
//! transport; hosts supply retrieval through the [`ConfigFetcher`] trait.

pub mod config;
pub mod constants;
pub mod deeplink;
pub mod defaults;
pub mod eligibility;
pub mod loader;
pub mod merge;
pub mod money;
pub mod pricing;
pub mod selection;
pub mod session;
pub mod text;
pub mod validate;

// Re-export commonly used types
pub use config::{
    AddOns, BaseFees, CalcRules, CategoryLabel, CopyPack, Costumes, DeepLinkConfig, Delivery,
    DiscountMode, GenreAddonEntry, GenrePlanOverride, MissingHints, PlanDuration, PlanMeta,
    PlanOverride, PreparedArrival, PricingConfig, ResetRules, WeddingConfig,
};
pub use deeplink::{build_payload, build_query, build_reserve_url};
pub use defaults::{default_config, default_value, effective_config};
pub use eligibility::{
    family_block_offered, forced_costume, in_store_allowed, is_busy_month, rush_allowed,
    same_day_allowed, western_add_on_eligible,
};
pub use loader::{ConfigFetcher, FallbackReason, LoadedPricing, PricingSource, load};
pub use merge::deep_merge;
pub use money::{format_signed_yen, format_yen};
pub use pricing::{LineItem, PlanQuote, compute_plan, resolved_base_fee, visible_plans};
pub use selection::{
    CostumeSource, DayType, DressingTier, Extras, FamilyGender, FamilyOutfit, FamilySource,
    Selection, SupportTier,
};
pub use session::Session;
pub use validate::{ValidationError, validate};
