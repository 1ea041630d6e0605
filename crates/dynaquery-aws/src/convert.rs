//! Conversions between model types and SDK types.

use std::collections::HashMap;

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types as sdk;
use dynaquery_model::{
    AttributeValue, ConsumedCapacity, Item, ItemCollectionMetrics, KeysAndAttributes,
    ReturnConsumedCapacity, ReturnItemCollectionMetrics, StoreError, StoreErrorCode,
};

/// Model value to SDK value.
#[must_use]
pub fn to_sdk_value(value: AttributeValue) -> sdk::AttributeValue {
    match value {
        AttributeValue::S(s) => sdk::AttributeValue::S(s),
        AttributeValue::N(n) => sdk::AttributeValue::N(n),
        AttributeValue::B(b) => sdk::AttributeValue::B(Blob::new(b.to_vec())),
        AttributeValue::Ss(v) => sdk::AttributeValue::Ss(v),
        AttributeValue::Ns(v) => sdk::AttributeValue::Ns(v),
        AttributeValue::Bs(v) => {
            sdk::AttributeValue::Bs(v.into_iter().map(|b| Blob::new(b.to_vec())).collect())
        }
        AttributeValue::Bool(b) => sdk::AttributeValue::Bool(b),
        AttributeValue::Null(b) => sdk::AttributeValue::Null(b),
        AttributeValue::L(list) => {
            sdk::AttributeValue::L(list.into_iter().map(to_sdk_value).collect())
        }
        AttributeValue::M(map) => sdk::AttributeValue::M(to_sdk_item(map)),
    }
}

/// SDK value to model value.
///
/// Fails on value kinds this SDK version does not know.
pub fn from_sdk_value(value: sdk::AttributeValue) -> Result<AttributeValue, StoreError> {
    Ok(match value {
        sdk::AttributeValue::S(s) => AttributeValue::S(s),
        sdk::AttributeValue::N(n) => AttributeValue::N(n),
        sdk::AttributeValue::B(b) => AttributeValue::B(bytes::Bytes::from(b.into_inner())),
        sdk::AttributeValue::Ss(v) => AttributeValue::Ss(v),
        sdk::AttributeValue::Ns(v) => AttributeValue::Ns(v),
        sdk::AttributeValue::Bs(v) => AttributeValue::Bs(
            v.into_iter()
                .map(|b| bytes::Bytes::from(b.into_inner()))
                .collect(),
        ),
        sdk::AttributeValue::Bool(b) => AttributeValue::Bool(b),
        sdk::AttributeValue::Null(b) => AttributeValue::Null(b),
        sdk::AttributeValue::L(list) => AttributeValue::L(
            list.into_iter()
                .map(from_sdk_value)
                .collect::<Result<_, _>>()?,
        ),
        sdk::AttributeValue::M(map) => AttributeValue::M(from_sdk_item(map)?),
        other => {
            return Err(StoreError::with_message(
                StoreErrorCode::SerializationException,
                format!("unsupported attribute value: {other:?}"),
            ));
        }
    })
}

/// Model item to SDK item.
#[must_use]
pub fn to_sdk_item(item: Item) -> HashMap<String, sdk::AttributeValue> {
    item.into_iter()
        .map(|(k, v)| (k, to_sdk_value(v)))
        .collect()
}

/// SDK item to model item.
pub fn from_sdk_item(item: HashMap<String, sdk::AttributeValue>) -> Result<Item, StoreError> {
    item.into_iter()
        .map(|(k, v)| Ok((k, from_sdk_value(v)?)))
        .collect()
}

/// Model batch request entry to SDK entry.
pub fn to_sdk_keys_and_attributes(
    ka: KeysAndAttributes,
) -> Result<sdk::KeysAndAttributes, StoreError> {
    sdk::KeysAndAttributes::builder()
        .set_keys(Some(ka.keys.into_iter().map(to_sdk_item).collect()))
        .set_projection_expression(ka.projection_expression)
        .set_expression_attribute_names(non_empty(ka.expression_attribute_names))
        .set_consistent_read(ka.consistent_read)
        .build()
        .map_err(|e| StoreError::validation(e.to_string()).with_source(e))
}

/// SDK batch request entry to model entry.
pub fn from_sdk_keys_and_attributes(
    ka: &sdk::KeysAndAttributes,
) -> Result<KeysAndAttributes, StoreError> {
    Ok(KeysAndAttributes {
        keys: ka
            .keys()
            .iter()
            .cloned()
            .map(from_sdk_item)
            .collect::<Result<_, _>>()?,
        projection_expression: ka.projection_expression().map(str::to_owned),
        expression_attribute_names: ka
            .expression_attribute_names()
            .cloned()
            .unwrap_or_default(),
        consistent_read: ka.consistent_read(),
    })
}

/// SDK capacity report to model report.
#[must_use]
pub fn from_sdk_capacity(cc: &sdk::ConsumedCapacity) -> ConsumedCapacity {
    ConsumedCapacity {
        table_name: cc.table_name().map(str::to_owned),
        capacity_units: cc.capacity_units(),
        read_capacity_units: cc.read_capacity_units(),
        write_capacity_units: cc.write_capacity_units(),
    }
}

/// SDK collection metrics to model metrics.
pub fn from_sdk_metrics(
    m: &sdk::ItemCollectionMetrics,
) -> Result<ItemCollectionMetrics, StoreError> {
    Ok(ItemCollectionMetrics {
        item_collection_key: m
            .item_collection_key()
            .cloned()
            .map(from_sdk_item)
            .transpose()?
            .unwrap_or_default(),
        size_estimate_range_gb: m.size_estimate_range_gb().to_vec(),
    })
}

/// Model capacity option to SDK option.
#[must_use]
pub fn to_sdk_return_capacity(r: ReturnConsumedCapacity) -> sdk::ReturnConsumedCapacity {
    sdk::ReturnConsumedCapacity::from(r.as_str())
}

/// Model metrics option to SDK option.
#[must_use]
pub fn to_sdk_return_metrics(r: ReturnItemCollectionMetrics) -> sdk::ReturnItemCollectionMetrics {
    sdk::ReturnItemCollectionMetrics::from(r.as_str())
}

/// `None` for an empty map, so the SDK omits the field.
#[must_use]
pub fn non_empty<V>(map: HashMap<String, V>) -> Option<HashMap<String, V>> {
    (!map.is_empty()).then_some(map)
}

/// Classify an SDK failure by its error code.
///
/// Service errors keep their category; anything that failed before a
/// service response arrived is a transport error.
pub fn store_error<E, R>(err: SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: std::fmt::Debug + Send + Sync + 'static,
{
    let (code, message) = match err.as_service_error() {
        Some(service) => (
            service
                .code()
                .and_then(StoreErrorCode::from_code)
                .unwrap_or(StoreErrorCode::InternalServerError),
            service.message().unwrap_or("service error").to_owned(),
        ),
        None => (
            StoreErrorCode::TransportError,
            aws_sdk_dynamodb::error::DisplayErrorContext(&err).to_string(),
        ),
    };
    StoreError::with_message(code, message).with_source(err)
}
