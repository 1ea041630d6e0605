//! `AttributeValue`, the typed scalar/document value stored in an item.
//!
//! The JSON wire format is a single-key object naming the type, e.g.
//! `{"S": "hello"}` or `{"N": "42"}`.

use std::collections::HashMap;
use std::fmt;
use std::fmt::Write as _;

use base64::Engine;
use serde::{Deserialize, Serialize};

/// A document store attribute value.
///
/// Exactly one variant is present. Numbers are kept string-encoded so that
/// arbitrary precision survives a round trip through the store. Serde's
/// external tagging yields the wire shape directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    /// String.
    S(String),
    /// Number, as its decimal text.
    N(String),
    /// Opaque bytes.
    B(#[serde(with = "blob")] bytes::Bytes),
    /// Set of strings.
    #[serde(rename = "SS")]
    Ss(Vec<String>),
    /// Set of numbers.
    #[serde(rename = "NS")]
    Ns(Vec<String>),
    /// Set of byte strings.
    #[serde(rename = "BS")]
    Bs(#[serde(with = "blob::set")] Vec<bytes::Bytes>),
    /// Boolean.
    #[serde(rename = "BOOL")]
    Bool(bool),
    /// Explicit null; the flag is always `true` on the wire.
    #[serde(rename = "NULL")]
    Null(bool),
    /// Ordered list.
    L(Vec<AttributeValue>),
    /// Nested document.
    M(HashMap<String, AttributeValue>),
}

impl AttributeValue {
    /// Build a number value from anything that displays as a number.
    #[must_use]
    pub fn number(n: impl fmt::Display) -> Self {
        Self::N(n.to_string())
    }

    /// Returns the string value if this is an `S` variant.
    #[must_use]
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Self::S(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number string if this is an `N` variant.
    #[must_use]
    pub fn as_n(&self) -> Option<&str> {
        match self {
            Self::N(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the map if this is an `M` variant.
    #[must_use]
    pub fn as_m(&self) -> Option<&HashMap<String, AttributeValue>> {
        match self {
            Self::M(m) => Some(m),
            _ => None,
        }
    }

    /// Returns the list if this is an `L` variant.
    #[must_use]
    pub fn as_l(&self) -> Option<&[AttributeValue]> {
        match self {
            Self::L(l) => Some(l),
            _ => None,
        }
    }

    /// Returns `true` for values that are neither lists, maps nor sets.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Self::S(_) | Self::N(_) | Self::B(_) | Self::Bool(_) | Self::Null(_)
        )
    }

    /// Returns the type descriptor string (e.g. "S", "N", "BOOL").
    #[must_use]
    pub fn type_descriptor(&self) -> &'static str {
        match self {
            Self::S(_) => "S",
            Self::N(_) => "N",
            Self::B(_) => "B",
            Self::Ss(_) => "SS",
            Self::Ns(_) => "NS",
            Self::Bs(_) => "BS",
            Self::Bool(_) => "BOOL",
            Self::Null(_) => "NULL",
            Self::L(_) => "L",
            Self::M(_) => "M",
        }
    }

    /// Canonical string encoding of this value.
    ///
    /// Two values that are structurally equal always produce the same
    /// encoding: map entries and set members are emitted sorted, and every
    /// leaf carries its type descriptor, so `{"N":"1"}` and `{"S":"1"}` never
    /// collide. Lists keep their order.
    #[must_use]
    pub fn canonical_key(&self) -> String {
        let mut out = String::new();
        self.write_canonical(&mut out);
        out
    }

    fn write_canonical(&self, out: &mut String) {
        out.push_str(self.type_descriptor());
        out.push(':');
        match self {
            Self::S(s) | Self::N(s) => {
                let _ = write!(out, "{s:?}");
            }
            Self::B(b) => out.push_str(&base64::engine::general_purpose::STANDARD.encode(b)),
            Self::Ss(v) | Self::Ns(v) => {
                let mut members: Vec<&String> = v.iter().collect();
                members.sort();
                let _ = write!(out, "{members:?}");
            }
            Self::Bs(v) => {
                let mut members: Vec<String> = v
                    .iter()
                    .map(|b| base64::engine::general_purpose::STANDARD.encode(b))
                    .collect();
                members.sort();
                let _ = write!(out, "{members:?}");
            }
            Self::Bool(b) | Self::Null(b) => {
                let _ = write!(out, "{b}");
            }
            Self::L(list) => {
                out.push('[');
                for (i, v) in list.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    v.write_canonical(out);
                }
                out.push(']');
            }
            Self::M(m) => {
                let mut pairs: Vec<_> = m.iter().collect();
                pairs.sort_by_key(|(k, _)| *k);
                out.push('{');
                for (i, (k, v)) in pairs.into_iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    let _ = write!(out, "{k:?}=");
                    v.write_canonical(out);
                }
                out.push('}');
            }
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::S(s.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::S(s)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for AttributeValue {
    fn from(n: i64) -> Self {
        Self::number(n)
    }
}

impl From<i32> for AttributeValue {
    fn from(n: i32) -> Self {
        Self::number(n)
    }
}

impl From<u64> for AttributeValue {
    fn from(n: u64) -> Self {
        Self::number(n)
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        Self::number(n)
    }
}

impl<T: Into<AttributeValue>> From<Vec<T>> for AttributeValue {
    fn from(v: Vec<T>) -> Self {
        Self::L(v.into_iter().map(Into::into).collect())
    }
}

impl From<HashMap<String, AttributeValue>> for AttributeValue {
    fn from(m: HashMap<String, AttributeValue>) -> Self {
        Self::M(m)
    }
}

impl Eq for AttributeValue {}

impl std::hash::Hash for AttributeValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.canonical_key().hash(state);
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.type_descriptor();
        match self {
            Self::S(v) | Self::N(v) => write!(f, "{t}({v})"),
            Self::Bool(b) | Self::Null(b) => write!(f, "{t}({b})"),
            Self::Ss(v) | Self::Ns(v) => write!(f, "{t}{v:?}"),
            Self::B(b) => write!(f, "{t}(<{} bytes>)", b.len()),
            Self::Bs(v) => write!(f, "{t}(<{} blobs>)", v.len()),
            Self::L(v) => write!(f, "{t}(<{} values>)", v.len()),
            Self::M(m) => write!(f, "{t}(<{} entries>)", m.len()),
        }
    }
}

/// Binary payloads travel as standard base64 strings.
mod blob {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub(crate) fn serialize<S: Serializer>(b: &Bytes, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(b))
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Bytes, D::Error> {
        let text = String::deserialize(d)?;
        STANDARD
            .decode(text)
            .map(Bytes::from)
            .map_err(de::Error::custom)
    }

    pub(crate) mod set {
        use super::{Bytes, Deserialize, Deserializer, Engine, STANDARD, Serializer, de};
        use serde::ser::SerializeSeq;

        pub(crate) fn serialize<S: Serializer>(
            blobs: &[Bytes],
            s: S,
        ) -> Result<S::Ok, S::Error> {
            let mut seq = s.serialize_seq(Some(blobs.len()))?;
            for b in blobs {
                seq.serialize_element(&STANDARD.encode(b))?;
            }
            seq.end()
        }

        pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Vec<Bytes>, D::Error> {
            Vec::<String>::deserialize(d)?
                .into_iter()
                .map(|text| STANDARD.decode(text).map(Bytes::from))
                .collect::<Result<_, _>>()
                .map_err(de::Error::custom)
        }
    }
}
