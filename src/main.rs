use clap::Parser;
use csvclean::config::{Config, KeepPolicy};
use csvclean::Options;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "csvclean", about = "CSV Cleaner — normalize and deduplicate rows in a CSV file")]
struct Cli {
    /// Input CSV path
    #[arg(short, long)]
    input: PathBuf,

    /// Output cleaned CSV path
    #[arg(short, long)]
    output: PathBuf,

    /// Column names to use as deduplication keys (space separated)
    #[arg(short, long, required = true, num_args = 1..)]
    keys: Vec<String>,

    /// Column names to normalize (case/punct/whitespace) prior to dedupe
    #[arg(short, long, num_args = 0..)]
    normalize: Option<Vec<String>>,

    /// Report text file path
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Keep first occurrence when deduping (default)
    #[arg(long, overrides_with = "no_keep_first")]
    keep_first: bool,

    /// Do not keep any duplicates (drop all duplicate groups)
    #[arg(long, overrides_with = "keep_first")]
    no_keep_first: bool,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

fn die(msg: &str) -> ! {
    eprintln!("error: {}", msg);
    process::exit(1);
}

fn load_config(path: &PathBuf) -> Config {
    let text = fs::read_to_string(path).unwrap_or_else(|e| die(&format!("cannot read config: {}", e)));
    serde_json::from_str(&text).unwrap_or_else(|e| die(&format!("invalid config JSON: {}", e)))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    // Load config
    let mut config = if let Some(ref config_path) = cli.config {
        load_config(config_path)
    } else {
        let defaults = ["csvclean.config.json", "config/csvclean.config.json"];
        let mut loaded = None;
        for p in &defaults {
            let path = PathBuf::from(p);
            if path.is_file() {
                loaded = Some(load_config(&path));
                break;
            }
        }
        loaded.unwrap_or_default()
    };

    // CLI overrides
    if let Some(fields) = cli.normalize {
        config.normalize = fields;
    }
    if cli.report.is_some() {
        config.report = cli.report;
    }
    if cli.keep_first {
        config.keep = KeepPolicy::KeepFirst;
    }
    if cli.no_keep_first {
        config.keep = KeepPolicy::DropAll;
    }

    let opts = Options::new(cli.input, cli.output, cli.keys, &config);
    let stats = csvclean::run(&opts).unwrap_or_else(|e| die(&e.to_string()));

    println!(
        "Rows before: {}, after: {}, duplicates removed: {}",
        stats.before, stats.after, stats.removed
    );
}
