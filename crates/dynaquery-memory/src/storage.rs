//! Item storage for a single table.
//!
//! ```text
//! DashMap<PartitionKey, BTreeMap<SortKey, Item>>
//! ```
//!
//! Tables without a sort key store each partition's single item under a
//! sentinel sort key.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use dynaquery_model::{AttributeValue, Item, Key};
use thiserror::Error;
use tracing::debug;

/// Errors raised while addressing items by key.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A key attribute is absent.
    #[error("missing required key attribute: {attr}")]
    MissingKeyAttribute {
        /// The attribute name.
        attr: String,
    },
    /// A key attribute has the wrong type.
    #[error("key attribute '{attr}' has wrong type: expected {expected}, got {actual}")]
    InvalidKeyType {
        /// The attribute name.
        attr: String,
        /// The declared type.
        expected: &'static str,
        /// The type found.
        actual: &'static str,
    },
}

/// Scalar types a key attribute may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    /// String.
    S,
    /// Number.
    N,
    /// Binary.
    B,
}

impl KeyType {
    /// The type descriptor.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::S => "S",
            Self::N => "N",
            Self::B => "B",
        }
    }

    fn matches(self, value: &AttributeValue) -> bool {
        matches!(
            (self, value),
            (Self::S, AttributeValue::S(_))
                | (Self::N, AttributeValue::N(_))
                | (Self::B, AttributeValue::B(_))
        )
    }
}

/// A key attribute definition.
#[derive(Debug, Clone)]
pub struct KeyAttribute {
    /// The attribute name.
    pub name: String,
    /// The scalar type.
    pub attr_type: KeyType,
}

impl KeyAttribute {
    /// A key attribute named `name` of type `attr_type`.
    pub fn new(name: impl Into<String>, attr_type: KeyType) -> Self {
        Self {
            name: name.into(),
            attr_type,
        }
    }
}

/// Key schema of a table: a hash key and an optional range key.
#[derive(Debug, Clone)]
pub struct KeySchema {
    /// Partition (hash) key.
    pub partition_key: KeyAttribute,
    /// Sort (range) key, if any.
    pub sort_key: Option<KeyAttribute>,
}

impl KeySchema {
    /// Schema with a hash key only.
    pub fn hash(name: impl Into<String>, attr_type: KeyType) -> Self {
        Self {
            partition_key: KeyAttribute::new(name, attr_type),
            sort_key: None,
        }
    }

    /// Schema with a hash and a range key.
    pub fn composite(
        hash: impl Into<String>,
        hash_type: KeyType,
        range: impl Into<String>,
        range_type: KeyType,
    ) -> Self {
        Self {
            partition_key: KeyAttribute::new(hash, hash_type),
            sort_key: Some(KeyAttribute::new(range, range_type)),
        }
    }

    /// Names of the key attributes, hash key first.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.partition_key.name.as_str())
            .chain(self.sort_key.as_ref().map(|k| k.name.as_str()))
    }
}

/// A primary key: partition value plus optional sort value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrimaryKey {
    /// The partition key value.
    pub partition_key: AttributeValue,
    /// The sort key value.
    pub sort_key: Option<SortableAttributeValue>,
}

/// Key-eligible attribute values with the store's ordering: strings and
/// binaries bytewise, numbers numerically.
#[derive(Debug, Clone)]
pub enum SortableAttributeValue {
    /// String.
    S(String),
    /// Number, kept in its string form.
    N(String),
    /// Binary.
    B(bytes::Bytes),
    /// Placeholder for tables without a sort key.
    Sentinel,
}

impl SortableAttributeValue {
    fn from_attribute_value(attr: &str, value: &AttributeValue) -> Result<Self, StorageError> {
        match value {
            AttributeValue::S(s) => Ok(Self::S(s.clone())),
            AttributeValue::N(n) => Ok(Self::N(n.clone())),
            AttributeValue::B(b) => Ok(Self::B(b.clone())),
            other => Err(StorageError::InvalidKeyType {
                attr: attr.to_owned(),
                expected: "S, N, or B",
                actual: other.type_descriptor(),
            }),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::S(_) => 0,
            Self::N(_) => 1,
            Self::B(_) => 2,
            Self::Sentinel => 3,
        }
    }
}

impl PartialEq for SortableAttributeValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortableAttributeValue {}

impl PartialOrd for SortableAttributeValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortableAttributeValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::S(a), Self::S(b)) => a.as_bytes().cmp(b.as_bytes()),
            (Self::N(a), Self::N(b)) => {
                let fa = a.parse::<f64>().unwrap_or(f64::NAN);
                let fb = b.parse::<f64>().unwrap_or(f64::NAN);
                fa.partial_cmp(&fb).unwrap_or(Ordering::Equal)
            }
            (Self::B(a), Self::B(b)) => a.as_ref().cmp(b.as_ref()),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl std::hash::Hash for SortableAttributeValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.rank().hash(state);
        match self {
            Self::S(s) => s.hash(state),
            // Numerically equal numbers must hash alike.
            Self::N(n) => n.parse::<f64>().unwrap_or(f64::NAN).to_bits().hash(state),
            Self::B(b) => b.hash(state),
            Self::Sentinel => {}
        }
    }
}

/// Extract and validate the primary key of `item` (or of a bare key).
pub fn extract_primary_key(schema: &KeySchema, item: &Item) -> Result<PrimaryKey, StorageError> {
    let partition_key = key_value(&schema.partition_key, item)?.clone();
    let sort_key = match &schema.sort_key {
        Some(def) => Some(SortableAttributeValue::from_attribute_value(
            &def.name,
            key_value(def, item)?,
        )?),
        None => None,
    };
    Ok(PrimaryKey {
        partition_key,
        sort_key,
    })
}

fn key_value<'a>(def: &KeyAttribute, item: &'a Item) -> Result<&'a AttributeValue, StorageError> {
    let value = item
        .get(&def.name)
        .ok_or_else(|| StorageError::MissingKeyAttribute {
            attr: def.name.clone(),
        })?;
    if def.attr_type.matches(value) {
        Ok(value)
    } else {
        Err(StorageError::InvalidKeyType {
            attr: def.name.clone(),
            expected: def.attr_type.as_str(),
            actual: value.type_descriptor(),
        })
    }
}

/// Approximate stored size of an item in bytes: attribute name lengths plus
/// value sizes.
#[must_use]
pub fn calculate_item_size(item: &Item) -> u64 {
    item.iter()
        .map(|(name, value)| name.len() as u64 + value_size(value))
        .sum()
}

fn value_size(value: &AttributeValue) -> u64 {
    match value {
        AttributeValue::S(s) => s.len() as u64,
        AttributeValue::N(n) => (n.len().div_ceil(2) + 1) as u64,
        AttributeValue::B(b) => b.len() as u64,
        AttributeValue::Bool(_) | AttributeValue::Null(_) => 1,
        AttributeValue::Ss(v) => v.iter().map(|s| s.len() as u64).sum(),
        AttributeValue::Ns(v) => v.iter().map(|n| (n.len().div_ceil(2) + 1) as u64).sum(),
        AttributeValue::Bs(v) => v.iter().map(|b| b.len() as u64).sum(),
        AttributeValue::L(list) => 3 + list.iter().map(|e| 1 + value_size(e)).sum::<u64>(),
        AttributeValue::M(map) => {
            3 + map
                .iter()
                .map(|(k, v)| k.len() as u64 + 1 + value_size(v))
                .sum::<u64>()
        }
    }
}

/// Items of one table.
#[derive(Debug)]
pub struct TableStorage {
    data: DashMap<AttributeValue, BTreeMap<SortableAttributeValue, Item>>,
    key_schema: KeySchema,
}

impl TableStorage {
    /// Empty storage for `key_schema`.
    #[must_use]
    pub fn new(key_schema: KeySchema) -> Self {
        Self {
            data: DashMap::new(),
            key_schema,
        }
    }

    /// The table's key schema.
    #[must_use]
    pub fn key_schema(&self) -> &KeySchema {
        &self.key_schema
    }

    /// Primary key of `item` under this table's schema.
    pub fn primary_key(&self, item: &Item) -> Result<PrimaryKey, StorageError> {
        extract_primary_key(&self.key_schema, item)
    }

    /// Insert or replace an item. Returns the replaced item, if any.
    pub fn put_item(&self, item: Item) -> Result<Option<Item>, StorageError> {
        self.put_item_if(item, |_| Ok(()))
    }

    /// Insert or replace an item if `check`, given the item currently stored
    /// under the same key, accepts. The partition stays locked in between, and
    /// a rejected write leaves no trace.
    pub fn put_item_if<E>(
        &self,
        item: Item,
        check: impl FnOnce(Option<&Item>) -> Result<(), E>,
    ) -> Result<Option<Item>, E>
    where
        E: From<StorageError>,
    {
        let key = self.primary_key(&item)?;
        let sort_key = key.sort_key.unwrap_or(SortableAttributeValue::Sentinel);
        let size = calculate_item_size(&item);

        let old = match self.data.entry(key.partition_key) {
            Entry::Occupied(mut partition) => {
                check(partition.get().get(&sort_key))?;
                partition.get_mut().insert(sort_key, item)
            }
            Entry::Vacant(slot) => {
                check(None)?;
                slot.insert(BTreeMap::from([(sort_key, item)]));
                None
            }
        };

        if old.is_some() {
            debug!(size, "replaced existing item");
        } else {
            debug!(size, "inserted new item");
        }
        Ok(old)
    }

    /// The item stored under `key`, if any.
    #[must_use]
    pub fn get_item(&self, key: &PrimaryKey) -> Option<Item> {
        let sort_key = key
            .sort_key
            .as_ref()
            .unwrap_or(&SortableAttributeValue::Sentinel);
        self.data
            .get(&key.partition_key)
            .and_then(|partition| partition.get(sort_key).cloned())
    }

    /// The item stored under a bare key map.
    pub fn get_by_key(&self, key: &Key) -> Result<Option<Item>, StorageError> {
        Ok(self.get_item(&self.primary_key(key)?))
    }

    /// Remove every item.
    pub fn clear(&self) {
        self.data.clear();
    }
}
