//! Query execution and result types.
//!
//! Provides the logic behind `list`, `get`, `url` and `items`, and the
//! `QueryResult` enum that callers use to display results.

use std::fmt;

use crate::config::Config;
use crate::error::VconfError;
use crate::types::{Query, ValueKind};
use crate::url::Url;

/// Result of a query. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Every field in document order, duplicates included.
    Listing { entries: Vec<(String, String)> },
    /// A single value, decoded and re-rendered.
    Value { key: String, value: String },
    /// The named URL components that are present.
    UrlParts {
        key: String,
        parts: Vec<(&'static str, String)>,
    },
    /// The elements of a list value.
    Items { key: String, items: Vec<String> },
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Listing { entries } => {
                write_lines(f, entries.iter().map(|(k, v)| (k.as_str(), v)))
            }
            QueryResult::Value { key, value } => write!(f, "{key} = {value}"),
            QueryResult::UrlParts { parts, .. } => {
                write_lines(f, parts.iter().map(|(k, v)| (*k, v)))
            }
            QueryResult::Items { key, items } => write_lines(
                f,
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (format!("{key}[{i}]"), v)),
            ),
        }
    }
}

fn write_lines<K: fmt::Display, V: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    lines: impl Iterator<Item = (K, V)>,
) -> fmt::Result {
    for (i, (key, value)) in lines.enumerate() {
        if i > 0 {
            writeln!(f)?;
        }
        write!(f, "{key} = {value}")?;
    }
    Ok(())
}

/// Run a query against a parsed configuration.
pub fn run(config: &Config, query: Query) -> Result<QueryResult, VconfError> {
    match query {
        Query::List => Ok(list_values(config)),
        Query::Get { key, kind } => get_value(config, key, kind),
        Query::Url { key } => url_parts(config, key),
        Query::Items { key } => list_items(config, key),
    }
}

fn list_values(config: &Config) -> QueryResult {
    let entries = config
        .iter()
        .map(|f| (f.key().to_string(), f.value().to_string()))
        .collect();
    QueryResult::Listing { entries }
}

fn get_value(config: &Config, key: String, kind: ValueKind) -> Result<QueryResult, VconfError> {
    let value = match kind {
        ValueKind::String => config.require(&key)?.to_string(),
        ValueKind::Bool => config.get_bool(&key)?.to_string(),
        ValueKind::I32 => config.get_i32(&key)?.to_string(),
        ValueKind::U32 => config.get_u32(&key)?.to_string(),
        ValueKind::I64 => config.get_i64(&key)?.to_string(),
        ValueKind::U64 => config.get_u64(&key)?.to_string(),
        ValueKind::F64 => config.get_f64(&key)?.to_string(),
    };
    Ok(QueryResult::Value { key, value })
}

fn url_parts(config: &Config, key: String) -> Result<QueryResult, VconfError> {
    let url = config.get_url(&key)?;
    Ok(QueryResult::UrlParts {
        parts: describe_url(&url),
        key,
    })
}

fn describe_url(url: &Url<'_>) -> Vec<(&'static str, String)> {
    let named = [
        ("scheme", url.scheme),
        ("user", url.user),
        ("password", url.password),
        ("host", url.host),
    ];
    let mut parts: Vec<(&'static str, String)> = named
        .into_iter()
        .filter_map(|(name, part)| part.map(|p| (name, p.to_string())))
        .collect();
    if let Some(port) = url.port {
        parts.push(("port", port.to_string()));
    }
    let tail = [
        ("path", url.path),
        ("query", url.query),
        ("fragment", url.fragment),
    ];
    parts.extend(
        tail.into_iter()
            .filter_map(|(name, part)| part.map(|p| (name, p.to_string()))),
    );
    parts
}

fn list_items(config: &Config, key: String) -> Result<QueryResult, VconfError> {
    let items = config
        .get_list(&key)?
        .iter()
        .filter_map(|element| element.get_str(&key).map(str::to_string))
        .collect();
    Ok(QueryResult::Items { key, items })
}

impl Config {
    /// Run a [`Query`] against this configuration.
    pub fn handle(&self, query: Query) -> Result<QueryResult, VconfError> {
        run(self, query)
    }
}
