use crate::config::KeepPolicy;
use crate::error::{Error, Result};
use crate::normalize::norm_column_name;
use crate::table::Table;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub before: usize,
    pub after: usize,
    pub removed: usize,
}

impl RunStats {
    pub fn new(before: usize, after: usize) -> Self {
        RunStats {
            before,
            after,
            removed: before.saturating_sub(after),
        }
    }
}

pub fn key_column_names(keys: &[String], normalized: &[String]) -> Vec<String> {
    keys.iter()
        .map(|k| {
            if normalized.contains(k) {
                norm_column_name(k)
            } else {
                k.clone()
            }
        })
        .collect()
}

pub fn resolve_key_columns(table: &Table, keys: &[String], normalized: &[String]) -> Result<Vec<usize>> {
    keys.iter()
        .zip(key_column_names(keys, normalized))
        .map(|(key, name)| {
            table
                .column_index(&name)
                .ok_or_else(|| Error::UnknownKeyColumn(key.clone()))
        })
        .collect()
}

pub fn composite_key<'a>(row: &'a [String], columns: &[usize]) -> Vec<&'a str> {
    columns.iter().map(|&i| row[i].as_str()).collect()
}

pub fn deduplicate(
    table: &mut Table,
    keys: &[String],
    normalized: &[String],
    policy: KeepPolicy,
) -> Result<RunStats> {
    let before = table.len();
    if keys.is_empty() {
        tracing::warn!("no keys provided for deduplication, skipping dedupe");
        return Ok(RunStats::new(before, before));
    }

    let columns = resolve_key_columns(table, keys, normalized)?;
    let keep = match policy {
        KeepPolicy::KeepFirst => {
            let mut seen: HashSet<Vec<&str>> = HashSet::new();
            table
                .rows()
                .iter()
                .map(|row| seen.insert(composite_key(row, &columns)))
                .collect::<Vec<bool>>()
        }
        KeepPolicy::DropAll => {
            let mut counts: HashMap<Vec<&str>, usize> = HashMap::new();
            for row in table.rows() {
                *counts.entry(composite_key(row, &columns)).or_insert(0) += 1;
            }
            table
                .rows()
                .iter()
                .map(|row| counts[&composite_key(row, &columns)] == 1)
                .collect::<Vec<bool>>()
        }
    };
    table.retain_rows(&keep);

    let stats = RunStats::new(before, table.len());
    tracing::debug!(?policy, before, after = stats.after, "deduplicated");
    Ok(stats)
}
