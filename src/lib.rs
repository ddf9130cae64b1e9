pub mod config;
pub mod dedupe;
pub mod error;
pub mod normalize;
pub mod report;
pub mod table;

use config::{Config, KeepPolicy};
use dedupe::RunStats;
use error::Result;
use report::Report;
use std::path::PathBuf;
use table::Table;

#[derive(Debug, Clone)]
pub struct Options {
    pub input: PathBuf,
    pub output: PathBuf,
    pub keys: Vec<String>,
    pub normalize: Vec<String>,
    pub report: Option<PathBuf>,
    pub keep: KeepPolicy,
    pub top_groups: usize,
}

impl Options {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, keys: Vec<String>, config: &Config) -> Self {
        Options {
            input: input.into(),
            output: output.into(),
            keys,
            normalize: config.normalize.clone(),
            report: config.report.clone(),
            keep: config.keep,
            top_groups: config.top_groups,
        }
    }
}

pub fn run(opts: &Options) -> Result<RunStats> {
    // Load
    let mut table = Table::read_csv(&opts.input)?;
    tracing::info!(
        rows = table.len(),
        columns = table.width(),
        "loaded {}",
        opts.input.display()
    );

    // Normalize
    for field in normalize::normalize_columns(&mut table, &opts.normalize) {
        tracing::warn!("normalize field '{}' not in CSV columns, skipping", field);
    }

    // Deduplicate
    let stats = dedupe::deduplicate(&mut table, &opts.keys, &opts.normalize, opts.keep)?;

    // Write
    table.write_csv(&opts.output)?;
    tracing::info!(rows = stats.after, "wrote {}", opts.output.display());

    // Report
    if let Some(ref report_path) = opts.report {
        let report = Report {
            input: opts.input.clone(),
            output: opts.output.clone(),
            stats,
            keys: opts.keys.clone(),
            normalized: opts.normalize.clone(),
            top_groups: opts.top_groups,
            preview: report::preview_groups(&opts.input, &opts.keys, &opts.normalize, opts.top_groups),
        };
        report.write(report_path)?;
        tracing::info!("wrote report {}", report_path.display());
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use error::Error;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const VENDORS: &str = "Vendor,ID\nAcme Inc.,1\nacme inc,1\nOther,2\n";

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn setup(csv: &str) -> (TempDir, Options) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.csv");
        fs::write(&input, csv).unwrap();
        let opts = Options::new(input, dir.path().join("out.csv"), Vec::new(), &Config::default());
        (dir, opts)
    }

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_keep_first_run() {
        let (_dir, mut opts) = setup(VENDORS);
        opts.keys = strings(&["Vendor", "ID"]);
        opts.normalize = strings(&["Vendor"]);
        let stats = run(&opts).unwrap();
        assert_eq!(stats, RunStats::new(3, 2));
        assert_eq!(stats.removed, 1);
        assert_eq!(read(&opts.output), "Vendor,ID\nAcme Inc.,1\nOther,2\n");
    }

    #[test]
    fn test_drop_all_run() {
        let (_dir, mut opts) = setup(VENDORS);
        opts.keys = strings(&["Vendor", "ID"]);
        opts.normalize = strings(&["Vendor"]);
        opts.keep = KeepPolicy::DropAll;
        let stats = run(&opts).unwrap();
        assert_eq!(stats.after, 1);
        assert_eq!(read(&opts.output), "Vendor,ID\nOther,2\n");
    }

    #[test]
    fn test_no_keys_keeps_every_row() {
        let (_dir, opts) = setup(VENDORS);
        let stats = run(&opts).unwrap();
        assert_eq!(stats, RunStats::new(3, 3));
        assert_eq!(read(&opts.output), VENDORS);
    }

    #[test]
    fn test_missing_normalize_field_is_skipped() {
        let (_dir, mut opts) = setup("Name,ID\nx,1\ny,1\n");
        opts.keys = strings(&["ID"]);
        opts.normalize = strings(&["Vendor"]);
        let stats = run(&opts).unwrap();
        assert_eq!(stats.removed, 1);
        assert_eq!(read(&opts.output), "Name,ID\nx,1\n");
    }

    #[test]
    fn test_second_run_removes_nothing() {
        let (dir, mut opts) = setup(VENDORS);
        opts.keys = strings(&["Vendor", "ID"]);
        opts.normalize = strings(&["Vendor"]);
        run(&opts).unwrap();

        opts.input = opts.output.clone();
        opts.output = dir.path().join("again.csv");
        let stats = run(&opts).unwrap();
        assert_eq!(stats.removed, 0);
        assert_eq!(read(&opts.output), read(&opts.input));
    }

    #[test]
    fn test_missing_input_writes_nothing() {
        let (dir, mut opts) = setup(VENDORS);
        opts.input = dir.path().join("absent.csv");
        opts.report = Some(dir.path().join("report.txt"));
        let err = run(&opts).unwrap_err();
        assert!(matches!(err, Error::Input { .. }));
        assert!(!opts.output.exists());
        assert!(!dir.path().join("report.txt").exists());
    }

    #[test]
    fn test_unknown_key_writes_nothing() {
        let (_dir, mut opts) = setup(VENDORS);
        opts.keys = strings(&["Sku"]);
        let err = run(&opts).unwrap_err();
        assert!(matches!(err, Error::UnknownKeyColumn(_)));
        assert!(!opts.output.exists());
    }

    #[test]
    fn test_report_describes_original_data() {
        let (dir, mut opts) = setup("Vendor\nAcme\nACME.\n acme \nOther\n");
        let report_path = dir.path().join("report.txt");
        opts.keys = strings(&["Vendor"]);
        opts.normalize = strings(&["Vendor"]);
        opts.report = Some(report_path.clone());
        run(&opts).unwrap();

        let text = read(&report_path);
        assert!(text.contains("Rows before: 4\nRows after: 2\nDuplicates removed: 2"));
        assert!(text.contains("Deduplication keys: Vendor\nNormalized fields: Vendor"));
        assert!(text.ends_with("Top duplicate groups (up to 10):\nVendor__norm count\n        acme     3"));
    }

    #[test]
    fn test_report_without_duplicates() {
        let (dir, mut opts) = setup(VENDORS);
        let report_path = dir.path().join("report.txt");
        opts.keys = strings(&["Vendor", "ID"]);
        opts.report = Some(report_path.clone());
        let stats = run(&opts).unwrap();
        assert_eq!(stats.removed, 0);

        let text = read(&report_path);
        assert!(text.contains(&format!("Input file: {}", opts.input.display())));
        assert!(text.contains("Normalized fields: (none)"));
        assert!(text.ends_with("\n\nNo duplicate groups found in sample scan."));
    }
}
