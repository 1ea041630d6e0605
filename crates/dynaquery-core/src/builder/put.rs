//! Single-item insert with a conflict policy.

use std::sync::Arc;

use async_trait::async_trait;
use dynaquery_model::{GetItemInput, Item, Key, PutItemInput, PutItemOutput, StoreOperation};
use tracing::{debug, warn};

use super::{QueryBuilder, WriteOptions};
use crate::client::DocumentClient;
use crate::error::{QueryError, QueryResult, RegistryError};
use crate::expression::NameRegistry;
use crate::expression::condition;

/// What an insert does when an item already exists under its key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Overwrite the stored item. The store's native behavior.
    #[default]
    Replace,
    /// Leave the stored item untouched.
    DoNothing,
    /// Merge into the stored item. Not supported yet; selecting it changes
    /// nothing.
    Update,
}

/// Result of an insert.
#[derive(Debug, Clone, PartialEq)]
pub enum PutOutcome {
    /// The item was written.
    Written(PutItemOutput),
    /// `DoNothing` was requested and an item already existed under the key.
    AlreadyExists,
}

impl PutOutcome {
    /// Returns `true` if the item was written.
    #[must_use]
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }

    /// The store's response, if the item was written.
    #[must_use]
    pub fn output(&self) -> Option<&PutItemOutput> {
        match self {
            Self::Written(output) => Some(output),
            Self::AlreadyExists => None,
        }
    }
}

/// Insert (or replace) one item.
///
/// The key attributes are always merged into the item. Every attribute of the
/// merged item gets a name alias up front, key attributes first, so a
/// condition can refer to any of them; only aliases actually used end up on
/// the request.
pub struct Insert<C: ?Sized> {
    client: Arc<C>,
    /// Key attribute names, sorted.
    key_names: Vec<String>,
    names: NameRegistry,
    input: PutItemInput,
    /// Whether a DO NOTHING guard is part of the condition.
    guarded: bool,
}

impl<C: ?Sized> std::fmt::Debug for Insert<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Insert")
            .field("key_names", &self.key_names)
            .field("names", &self.names)
            .field("input", &self.input)
            .field("guarded", &self.guarded)
            .finish_non_exhaustive()
    }
}

impl<C: DocumentClient + ?Sized> Insert<C> {
    pub(crate) fn new(
        client: Arc<C>,
        table: String,
        key: Key,
        item: Item,
        options: WriteOptions,
    ) -> Self {
        let mut key_names: Vec<String> = key.keys().cloned().collect();
        key_names.sort();

        let mut merged = item;
        merged.extend(key);

        let names = NameRegistry::with_names(seed_order(&key_names, &merged));
        Self {
            client,
            key_names,
            names,
            input: PutItemInput {
                table_name: table,
                item: merged,
                return_consumed_capacity: options.return_consumed_capacity,
                return_item_collection_metrics: options.return_item_collection_metrics,
                ..Default::default()
            },
            guarded: false,
        }
    }

    /// Rebuild a builder from a previously assembled request.
    ///
    /// `key_names` names the table's key attributes, which the request alone
    /// does not identify. The request's attribute-name aliases must have been
    /// produced by a name registry.
    pub fn from_input<I, S>(client: Arc<C>, key_names: I, input: PutItemInput) -> QueryResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut key_names: Vec<String> = key_names.into_iter().map(Into::into).collect();
        key_names.sort();
        key_names.dedup();

        let mut names = NameRegistry::from_existing(&input.expression_attribute_names)?;
        for name in seed_order(&key_names, &input.item) {
            if names.alias_of(&name).is_none() {
                names.register(name)?;
            }
        }

        let guarded = match (key_names.first(), input.condition_expression.as_deref()) {
            (Some(first), Some(existing)) => names
                .alias_of(first)
                .is_some_and(|alias| existing.contains(&condition::attribute_not_exists(alias))),
            _ => false,
        };

        Ok(Self {
            client,
            key_names,
            names,
            input,
            guarded,
        })
    }

    /// Choose what happens when an item already exists under the key.
    #[must_use]
    pub fn on_conflict(mut self, policy: ConflictPolicy) -> Self {
        match policy {
            ConflictPolicy::Replace => {}
            ConflictPolicy::DoNothing => self.guard_against_existing(),
            ConflictPolicy::Update => {
                warn!(
                    table = %self.input.table_name,
                    "ON CONFLICT UPDATE is not supported; insert left unchanged"
                );
            }
        }
        debug!(table = %self.input.table_name, ?policy, "conflict policy set");
        self
    }

    /// Conjoin a caller-written condition onto the request.
    ///
    /// Attribute names in `expr` should be aliases obtained from
    /// [`alias`](Self::alias).
    #[must_use]
    pub fn condition(mut self, expr: &str) -> Self {
        self.and_condition(expr);
        self
    }

    /// The alias for `field`, registering it if needed, and attach it to the
    /// request.
    pub fn alias(&mut self, field: &str) -> Result<String, RegistryError> {
        let alias = match self.names.alias_of(field) {
            Some(alias) => alias.to_owned(),
            None => self.names.register(field)?,
        };
        self.input
            .expression_attribute_names
            .insert(alias.clone(), field.to_owned());
        Ok(alias)
    }

    /// The name aliases known to this builder.
    #[must_use]
    pub fn names(&self) -> &NameRegistry {
        &self.names
    }

    fn guard_against_existing(&mut self) {
        if self.guarded {
            return;
        }
        // Any key attribute is present on every stored item, so its absence
        // means there is no item under the key.
        let Some(first) = self.key_names.first().cloned() else {
            return;
        };
        let Some(alias) = self.names.alias_of(&first).map(str::to_owned) else {
            return;
        };
        self.input
            .expression_attribute_names
            .insert(alias.clone(), first);
        self.and_condition(&condition::attribute_not_exists(&alias));
        self.guarded = true;
    }

    /// The DO NOTHING guard term, when the key allows one.
    fn guard_expression(&self) -> Option<String> {
        let first = self.key_names.first()?;
        self.names
            .alias_of(first)
            .map(condition::attribute_not_exists)
    }

    /// The key attributes of the item being written.
    fn key(&self) -> Key {
        self.key_names
            .iter()
            .filter_map(|name| {
                self.input
                    .item
                    .get(name)
                    .map(|value| (name.clone(), value.clone()))
            })
            .collect()
    }

    fn and_condition(&mut self, expr: &str) {
        self.input.condition_expression = Some(condition::and(
            self.input.condition_expression.as_deref(),
            expr,
        ));
    }
}

/// Key attributes first, then the remaining item attributes, each sorted.
fn seed_order(key_names: &[String], item: &Item) -> Vec<String> {
    let mut rest: Vec<&String> = item
        .keys()
        .filter(|name| !key_names.contains(name))
        .collect();
    rest.sort();
    key_names
        .iter()
        .chain(rest)
        .cloned()
        .collect()
}

/// Whether anything is stored under `key`, read consistently.
async fn item_exists<C: DocumentClient + ?Sized>(
    client: &C,
    table: &str,
    key: Key,
) -> QueryResult<bool> {
    let input = GetItemInput {
        table_name: table.to_owned(),
        key,
        consistent_read: Some(true),
        ..Default::default()
    };
    let output = client
        .get_item(input)
        .await
        .map_err(|e| QueryError::store(StoreOperation::GetItem, e))?;
    debug!(table = %table, exists = output.item.is_some(), "checked key after rejected insert");
    Ok(output.item.is_some())
}

#[async_trait]
impl<C: DocumentClient + ?Sized> QueryBuilder for Insert<C> {
    type Input = PutItemInput;
    type Output = PutOutcome;

    fn input(&self) -> &PutItemInput {
        &self.input
    }

    async fn send(self) -> QueryResult<PutOutcome> {
        let table = self.input.table_name.clone();
        if self.key_names.is_empty() {
            return Err(QueryError::MissingKey { table });
        }
        // With a caller condition conjoined, a rejection alone does not say
        // which term failed.
        let guard_only = self.guarded
            && self.guard_expression().as_deref() == self.input.condition_expression.as_deref();
        let key = self.key();

        match self.client.put_item(self.input).await {
            Ok(output) => {
                debug!(table = %table, "insert written");
                Ok(PutOutcome::Written(output))
            }
            Err(e) if e.is_conditional_check_failed() && self.guarded => {
                if !guard_only && !item_exists(self.client.as_ref(), &table, key).await? {
                    return Err(QueryError::ConditionFailed { table, source: e });
                }
                debug!(table = %table, "item already exists; nothing written");
                Ok(PutOutcome::AlreadyExists)
            }
            Err(e) if e.is_conditional_check_failed() => {
                Err(QueryError::ConditionFailed { table, source: e })
            }
            Err(e) => Err(QueryError::store(StoreOperation::PutItem, e)),
        }
    }
}
