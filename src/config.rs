use serde::de::{self, Deserializer};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KeepPolicy {
    #[default]
    KeepFirst,
    DropAll,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub keep: KeepPolicy,

    #[serde(default)]
    pub normalize: Vec<String>,

    #[serde(default)]
    pub report: Option<PathBuf>,

    #[serde(default = "default_top_groups", deserialize_with = "positive_count")]
    pub top_groups: usize,
}

fn default_top_groups() -> usize {
    10
}

fn positive_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let n = usize::deserialize(deserializer)?;
    if n == 0 {
        return Err(de::Error::custom("top_groups must be at least 1"));
    }
    Ok(n)
}

impl Default for Config {
    fn default() -> Self {
        Config {
            keep: KeepPolicy::KeepFirst,
            normalize: Vec::new(),
            report: None,
            top_groups: 10,
        }
    }
}
