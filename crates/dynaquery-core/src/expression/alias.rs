//! Alias registries for expression attribute names and values.
//!
//! Expressions sent to the store never mention a raw attribute name or a
//! literal value inline. Each one is registered here and referenced through a
//! short placeholder instead: `#n0`, `#n1`, ... for names and `:v0`, `:v1`,
//! ... for values. The two prefixes never overlap, so a names registry and a
//! values registry can feed the same request.
//!
//! Aliases are handed out from a counter in registration order, so replaying
//! the same sequence of registrations always yields the same aliases.

use std::borrow::{Borrow, Cow};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;

use dynaquery_model::AttributeValue;

use crate::error::RegistryError;

/// The symbol space of a registry: its alias prefix, the type it stores and
/// how that type is keyed for reverse lookup.
pub trait AliasKind {
    /// Prefix shared by every alias this kind produces.
    const PREFIX: &'static str;

    /// The registered value.
    type Value: Borrow<Self::Lookup> + Clone + fmt::Debug;

    /// The borrowed form used for reverse lookup.
    type Lookup: ?Sized;

    /// Key under which `value` is stored in the reverse mapping.
    fn lookup_key(value: &Self::Lookup) -> Cow<'_, str>;
}

/// Attribute-name aliases (`#n0`, `#n1`, ...).
#[derive(Debug, Clone, Copy, Default)]
pub struct Names;

impl AliasKind for Names {
    const PREFIX: &'static str = "#n";
    type Value = String;
    type Lookup = str;

    fn lookup_key(value: &str) -> Cow<'_, str> {
        Cow::Borrowed(value)
    }
}

/// Attribute-value aliases (`:v0`, `:v1`, ...).
///
/// Values are reverse-indexed by their canonical encoding, so structurally
/// equal lists and maps resolve to the same alias.
#[derive(Debug, Clone, Copy, Default)]
pub struct Values;

impl AliasKind for Values {
    const PREFIX: &'static str = ":v";
    type Value = AttributeValue;
    type Lookup = AttributeValue;

    fn lookup_key(value: &AttributeValue) -> Cow<'_, str> {
        Cow::Owned(value.canonical_key())
    }
}

/// Registry of attribute-name aliases.
pub type NameRegistry = AliasRegistry<Names>;

/// Registry of attribute-value aliases.
pub type ValueRegistry = AliasRegistry<Values>;

/// Append-only, bidirectional map between aliases and the values they stand
/// for. One registry belongs to exactly one command.
#[derive(Debug, Clone)]
pub struct AliasRegistry<K: AliasKind> {
    /// Registered values in alias order; entry `i` is aliased `PREFIX + i`.
    entries: Vec<K::Value>,
    /// Lookup key -> alias of the latest registration of that value.
    value_to_alias: HashMap<String, String>,
    /// Set by `seal`; later registrations fail.
    sealed: bool,
    kind: PhantomData<K>,
}

impl<K: AliasKind> Default for AliasRegistry<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            value_to_alias: HashMap::new(),
            sealed: false,
            kind: PhantomData,
        }
    }
}

impl<K: AliasKind> AliasRegistry<K> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `value` and return its new alias.
    ///
    /// Registering a value that is already present creates a second alias;
    /// the reverse lookup then resolves to the newer one.
    pub fn register(&mut self, value: impl Into<K::Value>) -> Result<String, RegistryError> {
        if self.sealed {
            return Err(RegistryError::Sealed);
        }
        Ok(self.push(value.into()))
    }

    fn push(&mut self, value: K::Value) -> String {
        let alias = format!("{}{}", K::PREFIX, self.entries.len());
        let key = K::lookup_key(<K::Value as Borrow<K::Lookup>>::borrow(&value)).into_owned();
        self.value_to_alias.insert(key, alias.clone());
        self.entries.push(value);
        alias
    }

    /// Reverse lookup: the alias registered for `value`.
    #[must_use]
    pub fn alias_of(&self, value: &K::Lookup) -> Option<&str> {
        self.value_to_alias
            .get(K::lookup_key(value).as_ref())
            .map(String::as_str)
    }

    /// Forward lookup: the value an alias stands for.
    #[must_use]
    pub fn value_of(&self, alias: &str) -> Option<&K::Value> {
        let index = alias.strip_prefix(K::PREFIX)?;
        // Reject "#n01" and "#n+1": only the exact spelling we generate.
        if (index.len() > 1 && index.starts_with('0')) || index.starts_with('+') {
            return None;
        }
        self.entries.get(index.parse::<usize>().ok()?)
    }

    /// Rebuild a registry from an alias mapping previously produced by one.
    ///
    /// The aliases must be exactly `PREFIX + 0 .. PREFIX + (n - 1)`; anything
    /// else could make later registrations collide with existing aliases and
    /// is rejected.
    pub fn from_existing<'a, I>(mapping: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (&'a String, &'a K::Value)>,
        K::Value: 'a,
    {
        let mut indexed: Vec<(usize, &K::Value)> = Vec::new();
        for (alias, value) in mapping {
            let index = alias
                .strip_prefix(K::PREFIX)
                .and_then(|i| i.parse::<usize>().ok())
                .filter(|i| format!("{}{i}", K::PREFIX) == *alias)
                .ok_or_else(|| RegistryError::WrongPrefix {
                    alias: alias.clone(),
                    prefix: K::PREFIX,
                })?;
            indexed.push((index, value));
        }
        indexed.sort_by_key(|(i, _)| *i);

        let mut registry = Self::new();
        for (expected, (found, value)) in indexed.into_iter().enumerate() {
            if expected != found {
                return Err(RegistryError::NonContiguous {
                    expected: format!("{}{expected}", K::PREFIX),
                    found: format!("{}{found}", K::PREFIX),
                });
            }
            registry.push(value.clone());
        }
        Ok(registry)
    }

    /// Ordered view of every alias and the value it stands for.
    pub fn iter(&self) -> impl Iterator<Item = (String, &K::Value)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, v)| (format!("{}{i}", K::PREFIX), v))
    }

    /// The alias mapping in the shape expected on a request payload.
    #[must_use]
    pub fn expression(&self) -> HashMap<String, K::Value> {
        self.iter().map(|(alias, v)| (alias, v.clone())).collect()
    }

    /// Number of aliases handed out so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reject all further registrations.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    /// Returns `true` once [`seal`](Self::seal) has been called.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }
}

impl NameRegistry {
    /// Registry seeded with attribute names, skipping repeats.
    ///
    /// Names receive aliases in the order of their first occurrence.
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        let mut seen = HashSet::new();
        for name in names {
            let name = name.into();
            if seen.insert(name.clone()) {
                registry.push(name);
            }
        }
        registry
    }
}

impl ValueRegistry {
    /// Registry seeded with attribute values, one alias per value.
    ///
    /// Unlike [`NameRegistry::with_names`], equal values are not collapsed.
    pub fn with_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttributeValue>,
    {
        let mut registry = Self::new();
        for value in values {
            registry.push(value.into());
        }
        registry
    }
}
