//! Selection state for one estimation session.
//!
//! This is the only mutable record in the engine. Mutation goes through
//! [`crate::session::Session`], which owns the confirm/reset state machine
//! and the stale-selection clearing rules; the types here are plain data.

use serde::{Deserialize, Serialize};

/// Weekday vs. weekend/holiday shoot date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    #[default]
    Weekday,
    Weekend,
}

/// Styling assistance level: A arrives ready, B full dressing and hair,
/// C change only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SupportTier {
    #[default]
    A,
    B,
    C,
}

/// Where the main subject's costume comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum CostumeSource {
    #[default]
    Bring,
    InStore,
    Partner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FamilyGender {
    #[default]
    Female,
    Male,
}

/// Family outfits are either brought in or rented from the partner
/// catalog; the in-store rack is main-subject only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum FamilySource {
    #[default]
    Bring,
    Partner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum DressingTier {
    #[default]
    DressOnly,
    DressHair,
}

/// Extra participants beyond the included party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Extras {
    pub adult: u32,
    pub child: u32,
    pub dog: u32,
    pub semi_person: u32,
    pub semi_dog: u32,
}

/// One family member's outfit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyOutfit {
    pub id: u32,
    pub gender: FamilyGender,
    pub source: FamilySource,
    pub dressing: DressingTier,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub rank: Option<String>,
}

/// The complete set of user choices for one estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Selection {
    /// Shoot month 1–12.
    pub month: u8,
    pub weekday_weekend: DayType,
    pub genre: String,
    pub support: SupportTier,
    pub costume: CostumeSource,
    pub partner_category: Option<String>,
    pub partner_rank: Option<String>,
    pub show_ate_one: bool,
    pub same_day_data: bool,
    pub rush_next_day: bool,
    pub location_add_on: bool,
    #[serde(rename = "sibling753")]
    pub sibling_753: bool,
    pub visit_rental: bool,
    pub nihongami: bool,
    pub hair_change: bool,
    pub western_add_on: bool,
    pub extras: Extras,
    pub family_outfits: Vec<FamilyOutfit>,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            month: 9,
            weekday_weekend: DayType::Weekday,
            genre: "753-3".to_string(),
            support: SupportTier::A,
            costume: CostumeSource::Bring,
            partner_category: None,
            partner_rank: None,
            show_ate_one: false,
            same_day_data: false,
            rush_next_day: false,
            location_add_on: false,
            sibling_753: false,
            visit_rental: false,
            nihongami: false,
            hair_change: false,
            western_add_on: false,
            extras: Extras::default(),
            family_outfits: Vec::new(),
        }
    }
}

impl Selection {
    /// Drop the partner costume choice (category and rank together).
    pub fn clear_partner(&mut self) {
        self.partner_category = None;
        self.partner_rank = None;
    }
}
