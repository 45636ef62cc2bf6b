//! Well-known genre identifiers and plan-key conventions.
//!
//! These ids are the wire vocabulary shared with the pricing document and
//! the reservation form.

/// Default location of the external pricing document.
pub const DEFAULT_PRICING_PATH: &str = "/static/assets/data/pricing.json";

/// Current schema version; version 4 documents are accepted in
/// compatibility mode.
pub const SCHEMA_VERSION: u32 = 5;
pub const SCHEMA_VERSION_COMPAT: u32 = 4;

// Genre vocabulary ---------------------------------------------------------

/// Shichi-go-san milestone genres share this key prefix ("753-3" etc.).
pub const GENRE_753_PREFIX: &str = "753";
/// Shrine-visit (omiyamairi) genre.
pub const GENRE_OMIYA: &str = "omiya";
/// Wedding genre, the only genre the per-unit labor surcharge applies to.
pub const GENRE_WEDDING: &str = "wedding";
/// Half-age-of-majority genres, used for gendered category labels and for
/// blocking the in-store costume source.
pub const GENRE_HALF_GIRL: &str = "half-girl";
pub const GENRE_HALF_BOY: &str = "half-boy";
/// Coming-of-age genres; in-store costume is not offered for these either.
pub const GENRE_ADULT_FEMALE: &str = "adult-female";
pub const GENRE_ADULT_MALE: &str = "adult-male";

// Plan vocabulary ----------------------------------------------------------

pub const PLAN_ATE_ONE: &str = "ateOne";
pub const PLAN_ATE_COLLECTION: &str = "ateCollection";
/// Tiered legacy plans are keyed "legacy.<tier>".
pub const PLAN_LEGACY_PREFIX: &str = "legacy.";
