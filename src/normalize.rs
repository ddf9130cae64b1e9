use crate::table::Table;
use regex::Regex;
use std::sync::LazyLock;

pub const NORM_SUFFIX: &str = "__norm";

// Whitespace here also covers the separator controls U+001C..U+001F.
static RE_NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s\x1C-\x1F]").unwrap());
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s\x1C-\x1F]+").unwrap());

fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

pub fn normalize_text(value: &str) -> String {
    let s = value.to_lowercase();
    let s = RE_NON_WORD.replace_all(s.trim_matches(is_space), "");
    RE_WHITESPACE.replace_all(&s, " ").into_owned()
}

pub fn norm_column_name(field: &str) -> String {
    format!("{}{}", field, NORM_SUFFIX)
}

pub fn normalize_columns<'a>(table: &mut Table, fields: &'a [String]) -> Vec<&'a str> {
    let mut missing = Vec::new();
    for field in fields {
        match table.column_index(field) {
            Some(idx) => table.derive_column(idx, &norm_column_name(field), normalize_text),
            None => missing.push(field.as_str()),
        }
    }
    missing
}
