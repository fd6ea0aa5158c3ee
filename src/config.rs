//! The parsed field table and its typed getters.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::decode;
use crate::error::VconfError;
use crate::lexer;
use crate::list;
use crate::url::Url;

/// One decoded `key = value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    key: String,
    value: String,
    line: usize,
}

impl Field {
    pub(crate) fn new(key: &str, value: &str, line: usize) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
            line,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// 1-indexed line on which the key started.
    pub fn line(&self) -> usize {
        self.line
    }
}

/// An ordered collection of fields produced by one parse.
///
/// Fields are kept in document order. When a key is defined more than once,
/// lookups see the definition that appears last.
///
/// ```
/// let config = vconf::Config::parse("port = 0x1F90\nport = 8080\n").unwrap();
/// assert_eq!(config.get_u32("port").unwrap(), 8080);
/// assert_eq!(config.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    fields: Vec<Field>,
}

impl Config {
    /// Parse configuration text. Any syntax error rejects the whole input.
    pub fn parse(text: &str) -> Result<Self, VconfError> {
        match lexer::tokenize(text) {
            Ok(fields) => {
                tracing::debug!(fields = fields.len(), "parsed configuration");
                Ok(Self { fields })
            }
            Err(err) => {
                tracing::debug!(error = %err, "configuration rejected");
                Err(err)
            }
        }
    }

    /// Read and parse a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, VconfError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading configuration file");
        let content = fs::read_to_string(path).map_err(|e| VconfError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    pub(crate) fn from_field(field: Field) -> Self {
        Self {
            fields: vec![field],
        }
    }

    /// Fields in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Keys in document order, duplicates included.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(Field::key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The visible field for `key`: the last one parsed.
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().rev().find(|f| f.key == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.field(key).map(Field::value)
    }

    /// Like [`get_str`](Self::get_str) but a missing key is an error.
    pub fn require(&self, key: &str) -> Result<&str, VconfError> {
        self.get_str(key)
            .ok_or_else(|| VconfError::KeyNotFound(key.into()))
    }

    /// `""`, `"no"`, `"false"` and `"0"` are false (exact, case-sensitive).
    /// Any other value is true.
    pub fn get_bool(&self, key: &str) -> Result<bool, VconfError> {
        self.require(key).map(decode::decode_bool)
    }

    /// Integer getters accept C-style literals: `0x` hex, leading-`0` octal,
    /// otherwise decimal, with an optional sign.
    pub fn get_i32(&self, key: &str) -> Result<i32, VconfError> {
        self.decode_with(key, decode::parse_integer)
    }

    pub fn get_u32(&self, key: &str) -> Result<u32, VconfError> {
        self.decode_with(key, decode::parse_integer)
    }

    pub fn get_i64(&self, key: &str) -> Result<i64, VconfError> {
        self.decode_with(key, decode::parse_integer)
    }

    pub fn get_u64(&self, key: &str) -> Result<u64, VconfError> {
        self.decode_with(key, decode::parse_integer)
    }

    pub fn get_f64(&self, key: &str) -> Result<f64, VconfError> {
        self.decode_with(key, decode::parse_float)
    }

    /// Decompose the value of `key` as a URL.
    ///
    /// A missing key is [`VconfError::KeyNotFound`]; a present but empty value
    /// is [`VconfError::InvalidUrl`] with [`UrlError::Empty`](crate::UrlError::Empty).
    pub fn get_url(&self, key: &str) -> Result<Url<'_>, VconfError> {
        let value = self.require(key)?;
        Url::parse(value).map_err(|source| VconfError::InvalidUrl {
            key: key.into(),
            source,
        })
    }

    /// Split the value of `key` on `;` into single-field configs, each
    /// holding one trimmed element under the same key.
    ///
    /// A trailing `;` does not produce an extra empty element, and an empty
    /// value yields an empty list.
    pub fn get_list(&self, key: &str) -> Result<Vec<Config>, VconfError> {
        let field = self
            .field(key)
            .ok_or_else(|| VconfError::KeyNotFound(key.into()))?;
        Ok(list::items(field.value())
            .map(|item| Config::from_field(Field::new(&field.key, item, field.line)))
            .collect())
    }

    fn decode_with<T>(
        &self,
        key: &str,
        decode: impl FnOnce(&str) -> Result<T, &'static str>,
    ) -> Result<T, VconfError> {
        let value = self.require(key)?;
        decode(value).map_err(|reason| VconfError::InvalidValue {
            key: key.into(),
            reason: format!("{reason} ({value:?})"),
        })
    }
}

impl FromStr for Config {
    type Err = VconfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'a> IntoIterator for &'a Config {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
