//! `laboratory` command-line interface.
//!
//! Thin wrappers over the library: evaluate expressions, parse and format
//! durations, inspect translations, compute damage, store regions and preview
//! schedule dates.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveTime, Weekday};
use clap::{Parser, Subcommand, ValueEnum};

use laboratory::core::damage::{DamageMetadata, DamagePacket, DamageType};
use laboratory::core::duration::{DurationFormatter, parse_duration};
use laboratory::core::expression::Evaluator;
use laboratory::core::schedule::{ScheduleSettings, next_schedule_date};
use laboratory::geometry::{CircularRegion, Position};
use laboratory::io::config::{CONFIG_FILE, LaboratoryConfig, load_config};
use laboratory::io::json::{self, JsonStyle};
use laboratory::io::storage::StorageHandler;
use laboratory::locale::manager::default_locale;
use laboratory::locale::{GlobalTranslator, Locale, TranslationManager};
use laboratory::{exit_codes, logging};

const REGION_FILE: &str = "circular-region";

#[derive(Parser)]
#[command(name = "laboratory", version, about = "Game-server utility toolbox")]
struct Cli {
    /// Config file (TOML). A missing file means defaults.
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate an arithmetic expression.
    Eval {
        expression: String,
        /// Variable binding, e.g. `-v x=2`. Repeatable.
        #[arg(short = 'v', long = "var", value_parser = parse_variable)]
        variables: Vec<(String, f64)>,
    },
    /// Parse a duration like `2w 5h 45m` and print it formatted.
    Duration {
        text: String,
        #[arg(long, value_enum, default_value_t = Style::Long)]
        style: Style,
        /// Locale such as `en` or `fr_CA`; defaults to the configured one.
        #[arg(long)]
        locale: Option<String>,
    },
    /// Reload translations and list the available locales.
    Locales,
    /// Apply modifiers to a base damage value.
    Damage {
        #[arg(long, allow_negative_numbers = true)]
        base: f64,
        /// Multiplicative coefficient (`1.5` = +50%). Repeatable.
        #[arg(long = "multiplier", allow_negative_numbers = true)]
        multipliers: Vec<f64>,
        /// Additive bonus (`0.1` = +10%). Repeatable.
        #[arg(long = "additive", allow_negative_numbers = true)]
        additives: Vec<f64>,
    },
    /// Store a circular region and print it back.
    Region {
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
        #[arg(long, allow_negative_numbers = true)]
        z: f64,
        #[arg(long, default_value = "overworld")]
        world: String,
        #[arg(long, allow_negative_numbers = true)]
        radius: f64,
    },
    /// Print when a weekly task would first run.
    NextRun {
        /// Starting weekday (`mon`, `tuesday`, ...).
        #[arg(long, value_parser = parse_weekday)]
        day: Option<Weekday>,
        /// Starting time of day, `HH:MM`.
        #[arg(long, value_parser = parse_time)]
        at: Option<NaiveTime>,
        /// Repeat period, e.g. `1w` or `12h`.
        #[arg(long, value_parser = parse_period)]
        every: Duration,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Style {
    Long,
    Concise,
    ConciseLowAccuracy,
}

impl Style {
    fn formatter(self) -> DurationFormatter {
        match self {
            Style::Long => DurationFormatter::LONG,
            Style::Concise => DurationFormatter::CONCISE,
            Style::ConciseLowAccuracy => DurationFormatter::CONCISE_LOW_ACCURACY,
        }
    }
}

fn main() {
    logging::init();
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(exit_codes::INVALID);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(&cli.config)?;
    match cli.command {
        Command::Eval {
            expression,
            variables,
        } => cmd_eval(&expression, variables),
        Command::Duration {
            text,
            style,
            locale,
        } => cmd_duration(&cfg, &text, style, locale.as_deref()),
        Command::Locales => cmd_locales(&cfg),
        Command::Damage {
            base,
            multipliers,
            additives,
        } => cmd_damage(base, &multipliers, &additives),
        Command::Region {
            x,
            y,
            z,
            world,
            radius,
        } => cmd_region(&cfg, Position::new(x, y, z, world), radius),
        Command::NextRun { day, at, every } => cmd_next_run(day, at, every),
    }
}

fn cmd_eval(expression: &str, variables: Vec<(String, f64)>) -> Result<()> {
    let mut evaluator = Evaluator::new(expression);
    evaluator.register_variables(variables);
    let value = evaluator
        .eval()
        .with_context(|| format!("evaluate '{expression}'"))?;
    println!("{value}");
    Ok(())
}

fn cmd_duration(
    cfg: &LaboratoryConfig,
    text: &str,
    style: Style,
    locale: Option<&str>,
) -> Result<()> {
    let locale = match locale {
        Some(raw) => Locale::parse(raw).ok_or_else(|| anyhow!("invalid locale '{raw}'"))?,
        None => cfg.locale(),
    };
    let duration = parse_duration(text)?;
    let global = GlobalTranslator::global();
    load_translations(cfg.translations_dir(), global)?;
    println!("{}", style.formatter().format(duration, global, Some(&locale)));
    Ok(())
}

fn cmd_locales(cfg: &LaboratoryConfig) -> Result<()> {
    let manager = load_translations(cfg.translations_dir(), GlobalTranslator::global())?;
    println!("{} (bundled)", default_locale());
    for locale in manager.installed_locales() {
        println!("{locale}");
    }
    Ok(())
}

fn cmd_damage(base: f64, multipliers: &[f64], additives: &[f64]) -> Result<()> {
    let mut packet = DamagePacket::new(0.0, Vec::<DamageType>::new());
    packet.set_value(base)?;
    let mut damage = DamageMetadata::from_packets(vec![packet]);
    for &multiplier in multipliers {
        damage.multiplicative_modifier(multiplier)?;
    }
    for &additive in additives {
        damage.additive_modifier(additive);
    }
    println!("{}", damage.damage());
    Ok(())
}

fn cmd_region(cfg: &LaboratoryConfig, center: Position, radius: f64) -> Result<()> {
    let region = CircularRegion::new(center, radius)?;
    let storage: StorageHandler<CircularRegion> =
        StorageHandler::new(REGION_FILE, ".json", cfg.region_dir(), cfg.json_style());
    if cfg.backups {
        storage.save_and_backup(&region)?;
    } else {
        storage.save(&region)?;
    }

    let loaded = storage
        .load()?
        .with_context(|| format!("{} vanished after save", storage.path().display()))?;
    println!("{}", json::to_string(&loaded, JsonStyle::Compact)?);
    println!("outline: {} blocks", loaded.outer_block_positions().len());
    Ok(())
}

fn cmd_next_run(day: Option<Weekday>, at: Option<NaiveTime>, every: Duration) -> Result<()> {
    let now = Local::now().naive_local();
    let next = next_schedule_date(now, ScheduleSettings::every(every), day, at);
    let timestamp = next
        .and_local_timezone(Local)
        .earliest()
        .map(|local| local.timestamp())
        .context("next run falls in a skipped local time")?;
    println!("{} ({timestamp})", next.format("%Y-%m-%d %H:%M:%S"));
    Ok(())
}

fn load_translations(dir: PathBuf, global: &GlobalTranslator) -> Result<TranslationManager> {
    let mut manager = TranslationManager::new(dir);
    manager.reload(global)?;
    Ok(manager)
}

fn parse_variable(raw: &str) -> Result<(String, f64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing variable name in '{raw}'"));
    }
    let value = value
        .trim()
        .parse()
        .map_err(|err| format!("invalid value for {name}: {err}"))?;
    Ok((name.to_string(), value))
}

fn parse_weekday(raw: &str) -> Result<Weekday, String> {
    raw.parse()
        .map_err(|_| format!("unknown weekday '{raw}'"))
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M").map_err(|err| format!("invalid time '{raw}': {err}"))
}

fn parse_period(raw: &str) -> Result<Duration, String> {
    let period = parse_duration(raw).map_err(|err| err.to_string())?;
    if period.is_zero() {
        return Err("period must be greater than zero".to_string());
    }
    Ok(period)
}
