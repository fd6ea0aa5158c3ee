/// How `Get` should decode a value before showing it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ValueKind {
    /// The raw string.
    #[default]
    String,
    /// `""`, `no`, `false`, `0` are false; anything else is true.
    Bool,
    I32,
    U32,
    I64,
    U64,
    F64,
}

/// A query against a parsed configuration, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    List,
    Get { key: String, kind: ValueKind },
    Url { key: String },
    Items { key: String },
}
