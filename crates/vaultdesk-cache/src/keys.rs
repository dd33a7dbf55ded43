//! Deterministic cache key derivation.
//!
//! Every cached response is stored under a key with the layout
//!
//! ```text
//! {root}:{namespace}|{actor}|{params}
//! ```
//!
//! - `root` is the configured key prefix (`vaultdesk` by default).
//! - `namespace` identifies the resource or query shape (`admins`, `card:17`).
//! - `actor` is `a{id}` for actor-scoped results and `-` otherwise.
//! - `params` is the canonical `name=value&name=value` encoding of the query
//!   parameters, sorted by name. Optionally replaced by its SHA-256 digest.
//!
//! The namespace section is always terminated by `|`, so the prefix
//! `{root}:{namespace}|` selects every key of one namespace and nothing else.

use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use sha2::{Digest, Sha256};

const SECTION_DELIMITER: char = '|';
const PAIR_DELIMITER: char = '&';
const ASSIGN: char = '=';
const ABSENT: &str = "~";
const NO_ACTOR: &str = "-";

/// A single query parameter value.
///
/// Each variant has its own canonical encoding so that, for example, the
/// string `"1"` and the integer `1` never collide.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Absent,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    /// Enum values are keyed by their underlying wire value.
    Enum(String),
}

impl ParamValue {
    /// Wraps the wire value of an enum.
    pub fn enumeration(value: impl Into<String>) -> Self {
        Self::Enum(value.into())
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Canonical, delimiter-safe encoding of the value.
    pub fn canonical(&self) -> String {
        match self {
            Self::Absent => ABSENT.to_string(),
            Self::Bool(value) => format!("b:{value}"),
            Self::Int(value) => format!("i:{value}"),
            Self::Float(value) => format!("f:{}", canonical_float(*value)),
            Self::Str(value) => format!("s:{}", escape(value)),
            Self::Date(value) => format!("d:{}", value.format("%Y-%m-%d")),
            Self::DateTime(value) => {
                format!("t:{}", value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Self::Enum(value) => format!("e:{}", escape(value)),
        }
    }
}

fn canonical_float(value: f64) -> String {
    if value == 0.0 {
        // -0.0 and 0.0 compare equal and must share a key
        "0".to_string()
    } else {
        format!("{value}")
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<NaiveDate> for ParamValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<DateTime<Utc>> for ParamValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl<T> From<Option<T>> for ParamValue
where
    T: Into<ParamValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// Query parameters of a cached request, ordered by name.
///
/// Backed by a `BTreeMap`, so the order in which parameters are inserted
/// never influences the derived key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams(BTreeMap<String, ParamValue>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts a parameter, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Canonical `name=value&...` encoding, names in lexicographic order.
    pub fn canonical(&self) -> String {
        let mut out = String::new();
        for (index, (name, value)) in self.0.iter().enumerate() {
            if index > 0 {
                out.push(PAIR_DELIMITER);
            }
            out.push_str(&escape(name));
            out.push(ASSIGN);
            out.push_str(&value.canonical());
        }
        out
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

/// Implemented by filter/sort/pagination structs of cached routes.
pub trait ToQueryParams {
    fn to_query_params(&self) -> QueryParams;
}

/// A derived cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds cache keys and namespace prefixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDeriver {
    root: String,
    hash_params: bool,
}

impl Default for KeyDeriver {
    fn default() -> Self {
        Self::new("vaultdesk")
    }
}

impl KeyDeriver {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            hash_params: false,
        }
    }

    /// Replace the parameter section with its SHA-256 digest to bound key length.
    #[must_use]
    pub fn with_hashed_params(mut self, enabled: bool) -> Self {
        self.hash_params = enabled;
        self
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Derives the key for `(namespace, actor, params)`.
    pub fn derive(&self, namespace: &str, actor: Option<i64>, params: &QueryParams) -> CacheKey {
        let mut key = self.namespace_prefix(namespace);

        match actor {
            Some(id) => {
                // Writing into a String cannot fail.
                let _ = write!(key, "a{id}");
            }
            None => key.push_str(NO_ACTOR),
        }
        key.push(SECTION_DELIMITER);

        if !params.is_empty() {
            let canonical = params.canonical();
            if self.hash_params {
                key.push_str(&hex::encode(Sha256::digest(canonical.as_bytes())));
            } else {
                key.push_str(&canonical);
            }
        }

        CacheKey(key)
    }

    /// Prefix shared by every key of exactly `namespace`.
    pub fn namespace_prefix(&self, namespace: &str) -> String {
        format!(
            "{}:{}{}",
            self.root,
            escape_namespace(namespace),
            SECTION_DELIMITER
        )
    }

    /// Prefix shared by every key of the child namespaces `namespace:*`.
    pub fn children_prefix(&self, namespace: &str) -> String {
        format!("{}:{}:", self.root, escape_namespace(namespace))
    }
}

/// Percent-escapes the characters the key layout reserves.
fn escape(raw: &str) -> String {
    escape_chars(raw, &['%', SECTION_DELIMITER, PAIR_DELIMITER, ASSIGN])
}

/// Namespaces keep `:` as their hierarchy separator.
fn escape_namespace(raw: &str) -> String {
    escape_chars(raw, &['%', SECTION_DELIMITER])
}

fn escape_chars(raw: &str, reserved: &[char]) -> String {
    if !raw.contains(reserved) {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len() + 8);
    for c in raw.chars() {
        if reserved.contains(&c) {
            let _ = write!(out, "%{:02X}", c as u32);
        } else {
            out.push(c);
        }
    }
    out
}
