use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use food_inspector::{
    Confidence, Criteria, DataKind, Inspector, InspectorConfig, LabelRecord, ScoringConfig,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Screen ingredient labels for allergens and score food inspections
#[derive(Parser, Debug)]
#[command(name = "food-inspector")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// YAML configuration file; bundled data and defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan ingredient text for allergens
    Scan {
        text: String,
        /// Only report synonyms of this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Show the allergen category of an ingredient
    Lookup { ingredient: String },
    /// List the synonyms of a category
    Synonyms { category: String },
    /// Show known cross-reactions of an allergen
    Cross {
        allergen: String,
        #[arg(long, default_value = "low")]
        min_confidence: Confidence,
    },
    /// Calculate an inspection score
    Score(ScoreArgs),
    /// Write the loaded reference data as versioned JSON files
    #[command(disable_version_flag = true)]
    ExportData(ExportArgs),
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Major version stamped into file names and documents
    #[arg(long = "version", default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    data_version: u32,
    /// Output directory, created if missing
    #[arg(long, default_value = ".")]
    output: PathBuf,
    /// Data set to export
    #[arg(long = "type", value_enum, default_value_t = ExportType::All)]
    kind: ExportType,
    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ExportType {
    All,
    Synonyms,
    CrossReactivity,
    ScoringPolicy,
}

impl ExportType {
    /// `None` selects every data set.
    fn data_kind(self) -> Option<DataKind> {
        match self {
            ExportType::All => None,
            ExportType::Synonyms => Some(DataKind::Synonyms),
            ExportType::CrossReactivity => Some(DataKind::CrossReactivity),
            ExportType::ScoringPolicy => Some(DataKind::ScoringPolicy),
        }
    }
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Food safety score (0-100)
    #[arg(long)]
    food_safety: f64,
    /// Cleanliness score (0-100)
    #[arg(long)]
    cleanliness: f64,
    /// Temperature control score (0-100)
    #[arg(long)]
    temperature_control: f64,
    /// Employee hygiene score (0-100)
    #[arg(long)]
    employee_hygiene: f64,
    /// Base priority escalated when flare mode triggers
    #[arg(long, default_value_t = 5)]
    base_priority: u32,
    /// JSON scoring policy; replaces the configured scoring sections
    #[arg(long)]
    policy: Option<PathBuf>,
    /// Report flare-mode status
    #[arg(long)]
    check_flare: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json);

    let cfg = match &cli.config {
        Some(path) => InspectorConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => InspectorConfig::default(),
    };
    let inspector = match &cli.command {
        Command::Score(ScoreArgs {
            policy: Some(policy),
            ..
        }) => {
            let scoring_cfg = ScoringConfig::from_path(policy)
                .with_context(|| format!("loading scoring policy {}", policy.display()))?;
            Inspector::from_config_with_scoring(&cfg, scoring_cfg)?
        }
        _ => Inspector::from_config(&cfg)?,
    };

    match &cli.command {
        Command::Scan { text, category } => scan(&inspector, text, category.as_deref(), cli.json),
        Command::Lookup { ingredient } => lookup(&inspector, ingredient, cli.json),
        Command::Synonyms { category } => synonyms(&inspector, category, cli.json),
        Command::Cross {
            allergen,
            min_confidence,
        } => cross(&inspector, allergen, *min_confidence, cli.json),
        Command::Score(args) => score(&inspector, args, cli.json),
        Command::ExportData(args) => export_data(&inspector, args, cli.json),
    }
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn scan(inspector: &Inspector, text: &str, category: Option<&str>, json: bool) -> Result<()> {
    if let Some(category) = category {
        if !inspector.matcher().index().contains_category(category) {
            bail!("unknown allergen category `{category}`");
        }
        let hits = inspector.matcher().scan_category(text, category)?;
        if json {
            return print_json(&hits);
        }
        if hits.is_empty() {
            println!("No {category} synonyms found.");
        }
        for synonym in &hits.synonyms {
            print_occurrences(&synonym.synonym, &synonym.occurrences);
        }
        return Ok(());
    }

    let analysis = inspector.analyze_label(&LabelRecord::new("cli", text))?;
    if json {
        return print_json(&analysis);
    }
    if analysis.is_allergen_free() {
        println!("No allergens found.");
        return Ok(());
    }
    for category in analysis.allergens.iter() {
        println!("{}:", category.category);
        for synonym in &category.synonyms {
            print!("  ");
            print_occurrences(&synonym.synonym, &synonym.occurrences);
        }
    }
    let warnings = analysis.warnings();
    if !warnings.is_empty() {
        println!("Cross-reactivity:");
        for warning in warnings {
            println!("  {warning}");
        }
    }
    Ok(())
}

fn print_occurrences(synonym: &str, occurrences: &[food_inspector::MatchOccurrence]) {
    let spans: Vec<String> = occurrences
        .iter()
        .map(|o| format!("{}..{}", o.start, o.end))
        .collect();
    println!("{synonym} [{}]", spans.join(", "));
}

fn lookup(inspector: &Inspector, ingredient: &str, json: bool) -> Result<()> {
    let category = inspector.matcher().category_of(ingredient);
    if json {
        #[derive(Serialize)]
        struct Lookup<'a> {
            ingredient: &'a str,
            category: Option<&'a str>,
        }
        return print_json(&Lookup {
            ingredient,
            category,
        });
    }
    match category {
        Some(category) => println!("{ingredient}: {category}"),
        None => println!("{ingredient}: not a known allergen synonym"),
    }
    Ok(())
}

fn synonyms(inspector: &Inspector, category: &str, json: bool) -> Result<()> {
    let index = inspector.matcher().index();
    if !index.contains_category(category) {
        let known: Vec<&str> = index.category_names().collect();
        bail!(
            "unknown allergen category `{category}` (known: {})",
            known.join(", ")
        );
    }
    let synonyms = index.synonyms_of(category);
    if json {
        return print_json(&synonyms);
    }
    for synonym in synonyms {
        println!("{synonym}");
    }
    Ok(())
}

fn cross(inspector: &Inspector, allergen: &str, min_confidence: Confidence, json: bool) -> Result<()> {
    let checker = inspector.cross_reactivity();
    if json {
        return print_json(&checker.potential_reactions(allergen, min_confidence));
    }
    let warnings = checker.format_warnings(allergen, min_confidence);
    if warnings.is_empty() {
        println!("No known cross-reactions for {allergen} at {min_confidence} confidence or above.");
    }
    for warning in warnings {
        println!("{warning}");
    }
    Ok(())
}

fn score(inspector: &Inspector, args: &ScoreArgs, json: bool) -> Result<()> {
    let criteria: Criteria = [
        ("food_safety", args.food_safety),
        ("cleanliness", args.cleanliness),
        ("temperature_control", args.temperature_control),
        ("employee_hygiene", args.employee_hygiene),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value))
    .collect();

    let outcome = inspector.evaluate_inspection(&criteria, args.base_priority);
    if json {
        return if args.check_flare {
            print_json(&outcome)
        } else {
            print_json(&outcome.evaluation)
        };
    }

    println!("Score: {:.2}", outcome.evaluation.score);
    println!("Severity: {}", outcome.evaluation.severity);
    if args.check_flare {
        let flare = &outcome.flare;
        println!("Flare Triggered: {}", yes_no(flare.flare_triggered));
        println!("Alert Required: {}", yes_no(flare.alert_required));
        if flare.flare_triggered {
            println!(
                "Priority: {} -> {}",
                flare.base_priority, flare.escalated_priority
            );
        }
    }
    Ok(())
}

fn export_data(inspector: &Inspector, args: &ExportArgs, json: bool) -> Result<()> {
    let written = match args.kind.data_kind() {
        None => inspector.export_all(args.data_version, &args.output, args.pretty)?,
        Some(kind) => {
            vec![inspector.export_data(kind, args.data_version, &args.output, args.pretty)?]
        }
    };
    if json {
        return print_json(&written);
    }
    for path in written {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "YES" } else { "NO" }
}
