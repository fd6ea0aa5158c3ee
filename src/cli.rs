//! Clap adapter for vconf.
//!
//! This module is the **optional integration layer** between vconf's
//! framework-agnostic core and the [clap](https://docs.rs/clap) CLI parser.
//! It is compiled only when the `clap` Cargo feature is enabled (on by
//! default).
//!
//! [`QueryArgs`] can be flattened into (or used as a subcommand of) an
//! application's clap derive to get `list|get|url|items` subcommands for
//! inspecting a configuration file. The only bridge to the core is
//! [`QueryArgs::into_query()`], which produces a [`Query`](crate::Query)
//! for [`Config::handle()`](crate::Config::handle).

use clap::{Args, Subcommand};

use crate::types::{Query, ValueKind};

/// Clap-derived args for the query subcommand group.
///
/// ```ignore
/// #[derive(Parser)]
/// struct Cli {
///     file: PathBuf,
///     #[command(flatten)]
///     query: QueryArgs,
/// }
/// ```
#[derive(Debug, Args)]
pub struct QueryArgs {
    #[command(subcommand)]
    pub action: Option<QuerySubcommand>,
}

/// Available query subcommands.
#[derive(Debug, Subcommand)]
pub enum QuerySubcommand {
    /// Show every key-value pair in document order.
    List,
    /// Show the value of a key, optionally decoded as a typed value.
    Get {
        /// Key to look up.
        key: String,
        /// Decode the value before printing it.
        #[arg(long = "as", value_enum, default_value_t = ValueKind::String)]
        kind: ValueKind,
    },
    /// Show the components of a URL value.
    Url {
        /// Key holding the URL.
        key: String,
    },
    /// Show the elements of a `;`-separated list value.
    Items {
        /// Key holding the list.
        key: String,
    },
}

impl QueryArgs {
    /// Convert clap-parsed args into a framework-agnostic `Query`.
    ///
    /// No subcommand and an explicit `list` both map to `Query::List`.
    pub fn into_query(self) -> Query {
        match self.action {
            None | Some(QuerySubcommand::List) => Query::List,
            Some(QuerySubcommand::Get { key, kind }) => Query::Get { key, kind },
            Some(QuerySubcommand::Url { key }) => Query::Url { key },
            Some(QuerySubcommand::Items { key }) => Query::Items { key },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    /// Wrapper so we can use `try_parse_from` on the subcommand.
    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        query: QueryArgs,
    }

    fn parse(args: &[&str]) -> Query {
        TestCli::try_parse_from(args).unwrap().query.into_query()
    }

    #[test]
    fn bare_is_list() {
        assert_eq!(parse(&["test"]), Query::List);
    }

    #[test]
    fn explicit_list() {
        assert_eq!(parse(&["test", "list"]), Query::List);
    }

    #[test]
    fn get_defaults_to_string() {
        assert_eq!(
            parse(&["test", "get", "server.port"]),
            Query::Get {
                key: "server.port".into(),
                kind: ValueKind::String,
            }
        );
    }

    #[test]
    fn get_as_kind() {
        assert_eq!(
            parse(&["test", "get", "server.port", "--as", "u32"]),
            Query::Get {
                key: "server.port".into(),
                kind: ValueKind::U32,
            }
        );
        assert_eq!(
            parse(&["test", "get", "debug", "--as", "bool"]),
            Query::Get {
                key: "debug".into(),
                kind: ValueKind::Bool,
            }
        );
    }

    #[test]
    fn get_unknown_kind_errors() {
        assert!(TestCli::try_parse_from(["test", "get", "a", "--as", "u128"]).is_err());
    }

    #[test]
    fn url_and_items() {
        assert_eq!(
            parse(&["test", "url", "database.url"]),
            Query::Url {
                key: "database.url".into()
            }
        );
        assert_eq!(
            parse(&["test", "items", "hosts"]),
            Query::Items {
                key: "hosts".into()
            }
        );
    }

    #[test]
    fn invalid_subcommand_errors() {
        assert!(TestCli::try_parse_from(["test", "nope"]).is_err());
    }
}
