//! Typed extraction: feed a parsed [`Config`] to a `serde::Deserialize` type.
//!
//! Values are plain strings, so the deserializer is type-driven: it decodes
//! each value according to what the target field asks for, using the same
//! rules as the [`Config`] getters.
//!
//! | Target                 | Decoding                                        |
//! |------------------------|-------------------------------------------------|
//! | `bool`                 | `""`, `no`, `false`, `0` are false              |
//! | integers               | C-style literal (`0x1f`, `017`, `-3`)           |
//! | `f32` / `f64`          | decimal or scientific                           |
//! | `String` / `&str`      | verbatim                                        |
//! | `Vec<T>`, tuples       | `;`-separated list, each element decoded as `T` |
//! | unit-only enums        | variant name                                    |
//! | `Option<T>`            | `None` when the key is absent or the value empty |
//! | nested structs         | dotted keys: `database.url` fills `database`    |
//!
//! When a key is defined more than once, the last definition is used.

use std::collections::HashMap;

use serde::de::value::BorrowedStrDeserializer;
use serde::de::{self, Deserialize, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde::forward_to_deserialize_any;

use crate::config::{Config, Field};
use crate::decode;
use crate::error::VconfError;
use crate::list::{self, Items};

/// Deserialize `T` from the fields of `config`. Keys `T` does not use are
/// ignored.
///
/// ```
/// #[derive(serde::Deserialize)]
/// struct Server {
///     host: String,
///     port: u16,
///     tags: Vec<String>,
/// }
///
/// let config = vconf::Config::parse("host = example.org\nport = 0x50\ntags = a; b\n").unwrap();
/// let server: Server = vconf::from_config(&config).unwrap();
/// assert_eq!(server.port, 80);
/// assert_eq!(server.tags, ["a", "b"]);
/// ```
pub fn from_config<'de, T: Deserialize<'de>>(config: &'de Config) -> Result<T, VconfError> {
    T::deserialize(SectionDeserializer::root(config))
}

/// Like [`from_config`], but every key that `T` does not consume is reported
/// as [`VconfError::UnknownKey`] (with its line number), collected into
/// [`VconfError::UnknownKeys`].
pub fn from_config_strict<'de, T: Deserialize<'de>>(
    config: &'de Config,
) -> Result<T, VconfError> {
    let mut unknown_keys: Vec<String> = Vec::new();
    let value = serde_ignored::deserialize(SectionDeserializer::root(config), |path| {
        unknown_keys.push(path.to_string());
    })?;

    if unknown_keys.is_empty() {
        return Ok(value);
    }

    let errors = unknown_keys
        .into_iter()
        .map(|path| {
            let section = format!("{path}.");
            let field = config
                .field(&path)
                .or_else(|| config.iter().find(|f| f.key().starts_with(&section)));
            match field {
                Some(field) => VconfError::UnknownKey {
                    key: field.key().to_string(),
                    line: field.line(),
                },
                None => VconfError::UnknownKey { key: path, line: 0 },
            }
        })
        .collect();
    Err(VconfError::UnknownKeys(errors))
}

/// All keys under `prefix` (empty at the root, `"database."` for a section).
struct SectionDeserializer<'de> {
    config: &'de Config,
    prefix: String,
}

impl<'de> SectionDeserializer<'de> {
    fn root(config: &'de Config) -> Self {
        Self {
            config,
            prefix: String::new(),
        }
    }
}

impl<'de> de::Deserializer<'de> for SectionDeserializer<'de> {
    type Error = VconfError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_map(SectionAccess::new(self.config, &self.prefix)?)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_some(self)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct enum
        identifier
    }
}

enum Entry<'de> {
    Value(&'de Field),
    Section(String),
}

struct SectionAccess<'de> {
    config: &'de Config,
    entries: std::vec::IntoIter<(&'de str, Entry<'de>)>,
    pending: Option<Entry<'de>>,
}

impl<'de> SectionAccess<'de> {
    /// One entry per distinct first segment under `prefix`. Walking the
    /// fields newest-first makes the last definition of a key win.
    ///
    /// A segment used both as a plain key and as a section is an error.
    fn new(config: &'de Config, prefix: &str) -> Result<Self, VconfError> {
        let mut seen: HashMap<&str, &Field> = HashMap::new();
        let mut entries = Vec::new();
        for field in config.fields().iter().rev() {
            let Some(rest) = field.key().strip_prefix(prefix) else {
                continue;
            };
            let (segment, entry) = match rest.split_once('.') {
                Some((segment, _)) => (segment, Entry::Section(format!("{prefix}{segment}."))),
                None => (rest, Entry::Value(field)),
            };
            match seen.get(segment) {
                None => {
                    seen.insert(segment, field);
                    entries.push((segment, entry));
                }
                Some(other) if is_section(other, prefix) != matches!(entry, Entry::Section(_)) => {
                    return Err(section_conflict(other, field, prefix));
                }
                Some(_) => {}
            }
        }
        entries.reverse();

        Ok(Self {
            config,
            entries: entries.into_iter(),
            pending: None,
        })
    }
}

fn is_section(field: &Field, prefix: &str) -> bool {
    field.key()[prefix.len()..].contains('.')
}

/// Reports the plain key and points at the dotted key that shadows it.
fn section_conflict(a: &Field, b: &Field, prefix: &str) -> VconfError {
    let (value, section) = if is_section(a, prefix) { (b, a) } else { (a, b) };
    VconfError::InvalidValue {
        key: value.key().to_string(),
        reason: format!(
            "also used as a section by '{}' (line {})",
            section.key(),
            section.line()
        ),
    }
}

impl<'de> MapAccess<'de> for SectionAccess<'de> {
    type Error = VconfError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, Self::Error> {
        let Some((segment, entry)) = self.entries.next() else {
            return Ok(None);
        };
        self.pending = Some(entry);
        seed.deserialize(BorrowedStrDeserializer::new(segment)).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(
        &mut self,
        seed: V,
    ) -> Result<V::Value, Self::Error> {
        match self.pending.take() {
            Some(Entry::Value(field)) => {
                seed.deserialize(ValueDeserializer::new(field.key(), field.value()))
            }
            Some(Entry::Section(prefix)) => seed.deserialize(SectionDeserializer {
                config: self.config,
                prefix,
            }),
            None => Err(de::Error::custom("value requested before key")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// A single string value, decoded on demand.
struct ValueDeserializer<'de> {
    key: &'de str,
    value: &'de str,
}

impl<'de> ValueDeserializer<'de> {
    fn new(key: &'de str, value: &'de str) -> Self {
        Self { key, value }
    }

    fn invalid(&self, reason: &str) -> VconfError {
        VconfError::InvalidValue {
            key: self.key.to_string(),
            reason: format!("{reason} ({:?})", self.value),
        }
    }

    fn integer<T: TryFrom<i128>>(&self) -> Result<T, VconfError> {
        decode::parse_integer(self.value).map_err(|reason| self.invalid(reason))
    }

    fn float<T: std::str::FromStr>(&self) -> Result<T, VconfError> {
        decode::parse_float(self.value).map_err(|reason| self.invalid(reason))
    }
}

macro_rules! deserialize_integer {
    ($($method:ident => $visit:ident,)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
                visitor.$visit(self.integer()?)
            }
        )*
    };
}

impl<'de> de::Deserializer<'de> for ValueDeserializer<'de> {
    type Error = VconfError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_borrowed_str(self.value)
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_bool(decode::decode_bool(self.value))
    }

    deserialize_integer! {
        deserialize_i8 => visit_i8,
        deserialize_i16 => visit_i16,
        deserialize_i32 => visit_i32,
        deserialize_i64 => visit_i64,
        deserialize_i128 => visit_i128,
        deserialize_u8 => visit_u8,
        deserialize_u16 => visit_u16,
        deserialize_u32 => visit_u32,
        deserialize_u64 => visit_u64,
        deserialize_u128 => visit_u128,
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_f32(self.float()?)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_f64(self.float()?)
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        let mut chars = self.value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(self.invalid("expected a single character")),
        }
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_borrowed_bytes(self.value.as_bytes())
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        if self.value.is_empty() {
            visitor.visit_none()
        } else {
            visitor.visit_some(self)
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_seq(ListAccess {
            key: self.key,
            items: list::items(self.value),
        })
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error> {
        visitor.visit_enum(BorrowedStrDeserializer::<VconfError>::new(self.value))
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        str string map struct identifier
    }
}

struct ListAccess<'de> {
    key: &'de str,
    items: Items<'de>,
}

impl<'de> SeqAccess<'de> for ListAccess<'de> {
    type Error = VconfError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, Self::Error> {
        self.items
            .next()
            .map(|item| seed.deserialize(ValueDeserializer::new(self.key, item)))
            .transpose()
    }
}
