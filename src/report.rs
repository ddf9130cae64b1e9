use crate::dedupe::{composite_key, key_column_names, resolve_key_columns, RunStats};
use crate::error::{Error, Result};
use crate::normalize::normalize_columns;
use crate::table::Table;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub key: Vec<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupPreview {
    Skipped,
    NoneFound,
    Found {
        columns: Vec<String>,
        groups: Vec<DuplicateGroup>,
    },
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct Report {
    pub input: PathBuf,
    pub output: PathBuf,
    pub stats: RunStats,
    pub keys: Vec<String>,
    pub normalized: Vec<String>,
    pub top_groups: usize,
    pub preview: GroupPreview,
}

pub fn duplicate_groups(table: &Table, columns: &[usize]) -> Vec<DuplicateGroup> {
    let mut counts: BTreeMap<Vec<&str>, usize> = BTreeMap::new();
    for row in table.rows() {
        *counts.entry(composite_key(row, columns)).or_insert(0) += 1;
    }

    let mut groups: Vec<DuplicateGroup> = counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(key, count)| DuplicateGroup {
            key: key.into_iter().map(str::to_string).collect(),
            count,
        })
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

// Counts come from a fresh read of the input, not the deduplicated table.
fn scan_groups(input: &Path, keys: &[String], normalized: &[String]) -> Result<Vec<DuplicateGroup>> {
    let mut table = Table::read_csv(input)?;
    normalize_columns(&mut table, normalized);
    let columns = resolve_key_columns(&table, keys, normalized)?;
    Ok(duplicate_groups(&table, &columns))
}

pub fn preview_groups(input: &Path, keys: &[String], normalized: &[String], limit: usize) -> GroupPreview {
    if keys.is_empty() {
        return GroupPreview::Skipped;
    }
    match scan_groups(input, keys, normalized) {
        Ok(groups) if groups.is_empty() => GroupPreview::NoneFound,
        Ok(mut groups) => {
            groups.truncate(limit);
            GroupPreview::Found {
                columns: key_column_names(keys, normalized),
                groups,
            }
        }
        Err(e) => {
            tracing::warn!("error generating groups preview: {}", e);
            GroupPreview::Failed(e.to_string())
        }
    }
}

fn render_groups(columns: &[String], groups: &[DuplicateGroup]) -> Vec<String> {
    let header: Vec<String> = columns
        .iter()
        .cloned()
        .chain(std::iter::once("count".to_string()))
        .collect();
    let body: Vec<Vec<String>> = groups
        .iter()
        .map(|g| {
            g.key
                .iter()
                .cloned()
                .chain(std::iter::once(g.count.to_string()))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    std::iter::once(&header)
        .chain(body.iter())
        .map(|cells| {
            cells
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| format!("{:>w$}", cell, w = w))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn iso_timestamp(at: DateTime<Utc>) -> String {
    if at.timestamp_subsec_micros() == 0 {
        at.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

impl Report {
    pub fn render(&self, generated_at: DateTime<Utc>) -> String {
        let mut lines = vec![
            format!("CSV Cleaner Report - {} UTC", iso_timestamp(generated_at)),
            format!("Input file: {}", self.input.display()),
            format!("Output file: {}", self.output.display()),
            format!("Rows before: {}", self.stats.before),
            format!("Rows after: {}", self.stats.after),
            format!("Duplicates removed: {}", self.stats.removed),
            String::new(),
            format!("Deduplication keys: {}", list_or_none(&self.keys)),
            format!("Normalized fields: {}", list_or_none(&self.normalized)),
        ];

        match &self.preview {
            GroupPreview::Skipped => {}
            GroupPreview::NoneFound => {
                lines.push(String::new());
                lines.push("No duplicate groups found in sample scan.".to_string());
            }
            GroupPreview::Found { columns, groups } => {
                lines.push(String::new());
                lines.push(format!("Top duplicate groups (up to {}):", self.top_groups));
                lines.extend(render_groups(columns, groups));
            }
            GroupPreview::Failed(msg) => {
                lines.push(String::new());
                lines.push(format!("Error generating groups preview: {}", msg));
            }
        }

        lines.join("\n")
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        let text = self.render(Utc::now());
        fs::write(path, text).map_err(|e| Error::output(path, e.into()))
    }
}
