use mitsumori_engine::{
    CostumeSource, DayType, DressingTier, FamilyGender, FamilyOutfit, FamilySource, Selection,
    SupportTier, compute_plan, default_config, effective_config,
};
use serde_json::json;

fn line_amount(quote: &mitsumori_engine::PlanQuote, label: &str) -> Option<i64> {
    quote
        .breakdown
        .iter()
        .find(|l| l.label == label)
        .map(|l| l.amount)
}

#[test]
fn age_three_milestone_tier_a_example() {
    let cfg = default_config();
    let sel = Selection {
        month: 11,
        weekday_weekend: DayType::Weekend,
        genre: "753-3".to_string(),
        support: SupportTier::A,
        costume: CostumeSource::Bring,
        ..Selection::default()
    };
    let quote = compute_plan(cfg, &sel, "legacy.bronze");
    assert_eq!(line_amount(&quote, &cfg.label("breakdownBase")), Some(52_060));
    assert_eq!(line_amount(&quote, &cfg.label("breakdownGenre")), Some(8800));
    assert_eq!(line_amount(&quote, &cfg.label("breakdownCostume")), Some(0));
    // prepared-arrival discount is configured as 0 for this genre
    assert_eq!(line_amount(&quote, &cfg.label("breakdownPrepared")), Some(0));
    assert_eq!(quote.total, 60_860);
}

#[test]
fn shrine_visit_partner_rental_example() {
    let cfg = default_config();
    let sel = Selection {
        genre: "omiya".to_string(),
        support: SupportTier::C,
        costume: CostumeSource::Partner,
        partner_category: Some("omiya_ubugi".to_string()),
        partner_rank: Some("E".to_string()),
        visit_rental: true,
        ..Selection::default()
    };
    let quote = compute_plan(cfg, &sel, "ateCollection");
    assert_eq!(
        line_amount(&quote, &cfg.label("breakdownCostume")),
        Some(14_900)
    );
    // baby garment + one adult garment
    assert_eq!(
        line_amount(&quote, &cfg.label("breakdownVisitOmiya")),
        Some(7700)
    );
    assert_eq!(quote.total, 29_800 + 19_800 + 14_900 + 7700);
}

#[test]
fn shrine_visit_rental_requires_partner_costume() {
    let cfg = default_config();
    let sel = Selection {
        genre: "omiya".to_string(),
        support: SupportTier::C,
        costume: CostumeSource::Bring,
        visit_rental: true,
        ..Selection::default()
    };
    let quote = compute_plan(cfg, &sel, "ateCollection");
    assert_eq!(line_amount(&quote, &cfg.label("breakdownVisitOmiya")), None);
}

#[test]
fn family_outfit_contributes_dressing_and_zero_rental_subline() {
    let cfg = default_config();
    let sel = Selection {
        support: SupportTier::B,
        family_outfits: vec![FamilyOutfit {
            id: 1,
            gender: FamilyGender::Female,
            source: FamilySource::Bring,
            dressing: DressingTier::DressHair,
            category: None,
            rank: None,
        }],
        ..Selection::default()
    };
    let quote = compute_plan(cfg, &sel, "legacy.gold");
    let family = quote
        .breakdown
        .iter()
        .find(|l| l.label == cfg.label("breakdownFamily"))
        .expect("family line");
    assert_eq!(family.amount, 16_500);
    let entry = &family.children[0];
    assert_eq!(entry.amount, 16_500);
    let amounts: Vec<i64> = entry.children.iter().map(|c| c.amount).collect();
    assert_eq!(amounts, vec![16_500, 0], "zero rental sub-line must be visible");
}

#[test]
fn family_line_suppressed_for_hidden_genre() {
    let cfg = effective_config(&json!({
        "calcRules": {"familyHiddenGenres": ["newborn"]}
    }))
    .unwrap();
    let outfits = vec![FamilyOutfit {
        id: 1,
        gender: FamilyGender::Male,
        source: FamilySource::Bring,
        dressing: DressingTier::DressHair,
        category: None,
        rank: None,
    }];

    let hidden_sel = Selection {
        genre: "newborn".to_string(),
        support: SupportTier::C,
        family_outfits: outfits.clone(),
        ..Selection::default()
    };
    let quote = compute_plan(&cfg, &hidden_sel, "ateCollection");
    assert_eq!(line_amount(&quote, &cfg.label("breakdownFamily")), None);

    // the same outfits price normally for an unhidden genre
    let offered_sel = Selection {
        genre: "family".to_string(),
        support: SupportTier::C,
        family_outfits: outfits,
        ..Selection::default()
    };
    let quote = compute_plan(&cfg, &offered_sel, "ateCollection");
    assert_eq!(
        line_amount(&quote, &cfg.label("breakdownFamily")),
        Some(16_500)
    );
}

#[test]
fn null_and_zero_genre_surcharges_are_observably_different() {
    let cfg = default_config();
    // baby611 offers tier C at an explicit 0
    let zero_sel = Selection {
        genre: "baby611".to_string(),
        support: SupportTier::C,
        ..Selection::default()
    };
    let zero_quote = compute_plan(cfg, &zero_sel, "ateCollection");
    assert_eq!(line_amount(&zero_quote, &cfg.label("breakdownGenre")), Some(0));

    // omiya does not offer tier A at all
    let null_sel = Selection {
        genre: "omiya".to_string(),
        support: SupportTier::A,
        ..Selection::default()
    };
    let null_quote = compute_plan(cfg, &null_sel, "ateCollection");
    assert_eq!(line_amount(&null_quote, &cfg.label("breakdownGenre")), None);
}

#[test]
fn totals_clamp_up_to_the_configured_floor() {
    // a tiny base fee plus the maternity tier-C reduction drives the raw
    // total negative
    let cfg = effective_config(&json!({"baseFees": {"ateCollection": 1000}})).unwrap();
    let sel = Selection {
        genre: "maternity".to_string(),
        support: SupportTier::C,
        ..Selection::default()
    };
    let quote = compute_plan(&cfg, &sel, "ateCollection");
    let raw: i64 = quote.breakdown.iter().map(|l| l.amount).sum();
    assert_eq!(raw, 1000 - 5000);
    assert_eq!(quote.total, 0);

    let cfg = effective_config(&json!({
        "baseFees": {"ateCollection": 1000},
        "calcRules": {"minTotal": 500}
    }))
    .unwrap();
    let quote = compute_plan(&cfg, &sel, "ateCollection");
    assert_eq!(quote.total, 500);
}

#[test]
fn delivery_eligibility_is_rechecked_at_compute_time() {
    let cfg = default_config();
    let mut sel = Selection {
        month: 11,
        weekday_weekend: DayType::Weekday,
        same_day_data: true,
        ..Selection::default()
    };
    let before = compute_plan(cfg, &sel, "ateCollection");
    assert_eq!(
        line_amount(&before, &cfg.label("breakdownSameDay")),
        Some(5500)
    );

    // the user flips to a busy-season weekend after checking the box
    sel.weekday_weekend = DayType::Weekend;
    let after = compute_plan(cfg, &sel, "ateCollection");
    assert_eq!(line_amount(&after, &cfg.label("breakdownSameDay")), None);
    assert_eq!(after.total, before.total - 5500);
}

#[test]
fn prepared_arrival_discount_sign_is_forced_negative() {
    let cfg = effective_config(&json!({
        "calcRules": {"preparedArrival": {"mode": "flat", "flatAmount": 3300}}
    }))
    .unwrap();
    let sel = Selection {
        genre: "753-7".to_string(),
        support: SupportTier::A,
        ..Selection::default()
    };
    let quote = compute_plan(&cfg, &sel, "ateCollection");
    assert_eq!(
        line_amount(&quote, &cfg.label("breakdownPrepared")),
        Some(-3300)
    );
}

#[test]
fn genre_plan_override_replaces_metadata_and_fee() {
    let cfg = effective_config(&json!({
        "genrePlanOverrides": {
            "newborn": {
                "planOverrides": {
                    "ateOne": {
                        "name": "ニューボーン｜アテワン",
                        "badge": "新生児専用",
                        "baseFeeOverride": 18000
                    }
                },
                "hidePlanKeys": ["legacy.*"]
            }
        }
    }))
    .unwrap();
    let sel = Selection {
        genre: "newborn".to_string(),
        support: SupportTier::C,
        show_ate_one: true,
        ..Selection::default()
    };
    let quote = compute_plan(&cfg, &sel, "ateOne");
    assert_eq!(quote.name, "ニューボーン｜アテワン");
    assert_eq!(quote.badge.as_deref(), Some("新生児専用"));
    assert_eq!(line_amount(&quote, &cfg.label("breakdownBase")), Some(18_000));

    let visible = mitsumori_engine::visible_plans(&cfg, &sel);
    assert!(visible.iter().all(|p| !p.key.starts_with("legacy.")));
    assert!(visible.iter().any(|p| p.key == "ateOne"));

    // other genres keep the stock plan list
    let stock_sel = Selection::default();
    let stock = mitsumori_engine::visible_plans(&cfg, &stock_sel);
    assert!(stock.iter().any(|p| p.key == "legacy.bronze"));
}

#[test]
fn sibling_package_needs_a_milestone_genre() {
    let cfg = default_config();
    let mut sel = Selection {
        sibling_753: true,
        ..Selection::default()
    };
    let quote = compute_plan(cfg, &sel, "ateCollection");
    assert_eq!(
        line_amount(&quote, &cfg.label("breakdownSibling")),
        Some(33_000)
    );

    sel.genre = "family".to_string();
    let quote = compute_plan(cfg, &sel, "ateCollection");
    assert_eq!(line_amount(&quote, &cfg.label("breakdownSibling")), None);
}

#[test]
fn western_add_on_only_for_eligible_genres() {
    let cfg = default_config();
    let mut sel = Selection {
        western_add_on: true,
        support: SupportTier::B,
        ..Selection::default()
    };
    let quote = compute_plan(cfg, &sel, "ateCollection");
    let micro = quote
        .breakdown
        .iter()
        .find(|l| l.label == cfg.label("breakdownMicro"))
        .expect("micro line");
    assert_eq!(micro.amount, 4950);

    sel.genre = "maternity".to_string();
    let quote = compute_plan(cfg, &sel, "ateCollection");
    assert!(!quote.breakdown.iter().any(|l| l.label == cfg.label("breakdownMicro")));
}

#[test]
fn unknown_lookups_never_panic_and_contribute_zero() {
    let cfg = default_config();
    let sel = Selection {
        genre: "not-a-genre".to_string(),
        costume: CostumeSource::Partner,
        partner_category: Some("not-a-category".to_string()),
        partner_rank: Some("Z".to_string()),
        support: SupportTier::B,
        ..Selection::default()
    };
    let quote = compute_plan(cfg, &sel, "ateCollection");
    assert_eq!(line_amount(&quote, &cfg.label("breakdownGenre")), None);
    assert_eq!(line_amount(&quote, &cfg.label("breakdownCostume")), None);
    assert_eq!(quote.total, 29_800);
}
