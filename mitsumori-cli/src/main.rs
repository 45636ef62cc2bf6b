use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use thiserror::Error;

use mitsumori_engine::loader::{ConfigFetcher, PricingSource, load};
use mitsumori_engine::{
    CostumeSource, DayType, Extras, LineItem, PlanQuote, Session, SupportTier, format_signed_yen,
    format_yen,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SupportArg {
    /// Arrive ready (discount may apply)
    A,
    /// Full dressing and hair
    B,
    /// Change only
    C,
}

impl From<SupportArg> for SupportTier {
    fn from(value: SupportArg) -> Self {
        match value {
            SupportArg::A => Self::A,
            SupportArg::B => Self::B,
            SupportArg::C => Self::C,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CostumeArg {
    /// Brought by the customer
    Bring,
    /// In-house rack
    InStore,
    /// Partner rental catalog
    Partner,
}

impl From<CostumeArg> for CostumeSource {
    fn from(value: CostumeArg) -> Self {
        match value {
            CostumeArg::Bring => Self::Bring,
            CostumeArg::InStore => Self::InStore,
            CostumeArg::Partner => Self::Partner,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "mitsumori", version)]
#[command(about = "Quote calculator for the studio booking widget - loads a pricing document and prints per-plan estimates")]
struct Args {
    /// Pricing document location (http(s) URL or file path); built-in
    /// defaults are used when omitted or unreachable
    #[arg(long)]
    pricing: Option<String>,

    /// Subject genre (e.g. 753-3, omiya, adult-female)
    #[arg(long, default_value = "753-3")]
    genre: String,

    /// Shoot month 1-12
    #[arg(long, default_value_t = 9)]
    month: u8,

    /// Weekend/holiday shoot date (weekday when absent)
    #[arg(long)]
    weekend: bool,

    /// Styling support tier
    #[arg(long, value_enum, default_value_t = SupportArg::A)]
    support: SupportArg,

    /// Main costume source
    #[arg(long, value_enum, default_value_t = CostumeArg::Bring)]
    costume: CostumeArg,

    /// Partner rental category (required with --costume partner)
    #[arg(long)]
    partner_category: Option<String>,

    /// Partner rental rank letter
    #[arg(long)]
    partner_rank: Option<String>,

    /// List the first-time trial plan as well
    #[arg(long)]
    show_ate_one: bool,

    #[arg(long)]
    same_day: bool,
    #[arg(long)]
    rush: bool,
    #[arg(long)]
    location: bool,
    #[arg(long)]
    sibling: bool,
    #[arg(long)]
    visit_rental: bool,
    #[arg(long)]
    nihongami: bool,
    #[arg(long)]
    hair_change: bool,
    #[arg(long)]
    western: bool,

    /// Extra adults (high school and up)
    #[arg(long, default_value_t = 0)]
    adults: u32,
    /// Extra children (junior high and under)
    #[arg(long, default_value_t = 0)]
    children: u32,
    /// Accompanying pets
    #[arg(long, default_value_t = 0)]
    dogs: u32,

    /// Emit quotes as JSON instead of the formatted table
    #[arg(long)]
    json: bool,

    /// Print the reservation-form handoff URL after the quotes
    #[arg(long)]
    reserve_link: bool,
}

#[derive(Debug, Error)]
enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Fetches from http(s) URLs or the local filesystem.
struct DocumentFetcher;

impl ConfigFetcher for DocumentFetcher {
    type Error = FetchError;

    fn fetch(&self, url: &str) -> Result<String, Self::Error> {
        if url.starts_with("http://") || url.starts_with("https://") {
            let response = reqwest::blocking::get(url)?;
            if !response.status().is_success() {
                return Err(FetchError::Status(response.status()));
            }
            Ok(response.text()?)
        } else {
            Ok(std::fs::read_to_string(url)?)
        }
    }
}

fn print_line(line: &LineItem, depth: usize) {
    let indent = "  ".repeat(depth + 1);
    let amount = if line.amount < 0 {
        format_signed_yen(line.amount).green()
    } else {
        format_signed_yen(line.amount).normal()
    };
    println!("{indent}{} {amount}", line.label);
    for child in &line.children {
        print_line(child, depth + 1);
    }
}

fn print_quote(quote: &PlanQuote) {
    let badge = quote
        .badge
        .as_deref()
        .map(|b| format!(" [{b}]").yellow().to_string())
        .unwrap_or_default();
    println!();
    println!("{}{badge}", quote.name.bold());
    if let Some(note) = &quote.note {
        println!("  {}", note.dimmed());
    }
    if let Some(duration) = &quote.duration {
        println!("  {} / {}", duration.shoot.dimmed(), duration.stay.dimmed());
    }
    for line in &quote.breakdown {
        print_line(line, 0);
    }
    println!("  {} {}", "total:".bold(), format_yen(quote.total).bold().green());
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let loaded = load(&DocumentFetcher, args.pricing.as_deref());
    match loaded.source {
        PricingSource::Remote => log::info!("pricing loaded from remote document"),
        PricingSource::Fallback(reason) => {
            log::info!("pricing using built-in defaults ({reason:?})");
        }
    }

    let mut session = Session::new(loaded.config);
    session.set_month(args.month);
    session.set_day_type(if args.weekend {
        DayType::Weekend
    } else {
        DayType::Weekday
    });
    session.set_genre(&args.genre);
    session.set_support(args.support.into());
    session.set_costume(args.costume.into());
    if let Some(category) = &args.partner_category {
        session.set_partner_category(category);
    }
    if let Some(rank) = &args.partner_rank {
        session.set_partner_rank(rank);
    }
    session.set_show_ate_one(args.show_ate_one);
    session.set_same_day_data(args.same_day);
    session.set_rush_next_day(args.rush);
    session.set_location_add_on(args.location);
    session.set_sibling_753(args.sibling);
    session.set_visit_rental(args.visit_rental);
    session.set_nihongami(args.nihongami);
    session.set_hair_change(args.hair_change);
    session.set_western_add_on(args.western);
    session.set_extras(Extras {
        adult: args.adults,
        child: args.children,
        dog: args.dogs,
        ..Extras::default()
    });

    if let Err(err) = session.confirm() {
        let hint = session
            .validation_message()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string());
        eprintln!("{}", hint.red());
        bail!("selection failed validation: {err}");
    }

    let quotes = session
        .quotes()
        .context("confirmed session must produce quotes")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&quotes)?);
    } else {
        for quote in &quotes {
            print_quote(quote);
        }
    }

    if args.reserve_link
        && let Some(url) = session.reserve_url()
    {
        println!();
        println!("{} {url}", "reserve:".bold());
    }

    Ok(())
}
