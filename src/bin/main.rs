//! Linked-Data Corpus CLI
//!
//! Command-line tool for building the dataset/publication corpus and for
//! computing entity identifiers during curation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use corpus_ld::config::CONFIG_FILE;
use corpus_ld::{entity_id, run, CorpusConfig, CorpusError, EntityKind};

#[derive(Parser)]
#[command(name = "corpus-ld")]
#[command(about = "Build a linked-data corpus of datasets and the publications that cite them")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the Turtle and JSON-LD corpus
    Build(BuildArgs),
    /// Print the identifier for an entity's identity fields
    Id(IdArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Configuration file
    #[arg(short, long, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Dataset list (overrides dataset_path)
    #[arg(long)]
    datasets: Option<PathBuf>,

    /// Publication stream (overrides stream_path)
    #[arg(long)]
    stream: Option<PathBuf>,

    /// Glob for override files (overrides override_glob)
    #[arg(long)]
    overrides: Option<String>,

    /// JSON-LD context (overrides vocab_path)
    #[arg(long)]
    vocab: Option<PathBuf>,

    /// Turtle output (overrides ttl_path)
    #[arg(long)]
    ttl: Option<PathBuf>,

    /// JSON-LD output (overrides jsonld_path)
    #[arg(long)]
    jsonld: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Dataset,
    Publication,
}

#[derive(Args)]
struct IdArgs {
    /// Entity kind, selects the identifier prefix
    #[arg(long, value_enum, conflicts_with = "prefix")]
    kind: Option<Kind>,

    /// Explicit identifier prefix
    #[arg(long)]
    prefix: Option<String>,

    /// Ordered identity fields (provider and title, or publisher and title)
    #[arg(required = true)]
    fields: Vec<String>,
}

fn init_logging(debug: bool) {
    let default = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the configuration file, or start from flags alone when it is absent
fn load_config(args: &BuildArgs) -> Result<CorpusConfig, CorpusError> {
    let mut config = if args.config.exists() {
        info!(path = %args.config.display(), "Loading configuration");
        CorpusConfig::load(&args.config)?
    } else if let Some(datasets) = &args.datasets {
        CorpusConfig::new(datasets.clone())
    } else {
        return Err(CorpusError::Config(format!(
            "{} not found and no --datasets given",
            args.config.display()
        )));
    };

    if let Some(p) = &args.datasets {
        config.dataset_path = p.clone();
    }
    if let Some(p) = &args.stream {
        config.stream_path = p.clone();
    }
    if let Some(g) = &args.overrides {
        config.override_glob = g.clone();
    }
    if let Some(p) = &args.vocab {
        config.vocab_path = p.clone();
    }
    if let Some(p) = &args.ttl {
        config.ttl_path = p.clone();
    }
    if let Some(p) = &args.jsonld {
        config.jsonld_path = p.clone();
    }
    Ok(config)
}

fn run_build(args: BuildArgs) -> Result<(), CorpusError> {
    let config = load_config(&args)?;
    let stats = run(&config)?;

    eprintln!(
        "Wrote {} datasets and {} publications ({} citations, {} skipped) to {} and {}",
        stats.datasets,
        stats.publications.publications_linked,
        stats.publications.citations,
        stats.publications.publications_skipped,
        config.ttl_path.display(),
        config.jsonld_path.display()
    );
    Ok(())
}

fn run_id(args: IdArgs) -> Result<(), CorpusError> {
    let id = match (args.kind, &args.prefix) {
        (Some(Kind::Dataset), _) => EntityKind::Dataset.id_for(&args.fields),
        (Some(Kind::Publication), _) => EntityKind::Publication.id_for(&args.fields),
        (None, Some(prefix)) => entity_id(&args.fields, prefix),
        (None, None) => entity_id(&args.fields, ""),
    };
    println!("{}", id);
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let result = match cli.command {
        Commands::Build(args) => run_build(args),
        Commands::Id(args) => run_id(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
