//! Projection and condition evaluation.
//!
//! Only the expression forms the query builders emit are understood:
//! comma-separated projections of plain or `#`-aliased names, and conditions
//! made of `attribute_exists(..)` / `attribute_not_exists(..)` joined by `and`.

use std::collections::HashMap;

use dynaquery_model::{Item, StoreError};

/// Resolve an operand to an attribute name through `names` when aliased.
fn resolve<'a>(
    operand: &'a str,
    names: &'a HashMap<String, String>,
) -> Result<&'a str, StoreError> {
    if operand.starts_with('#') {
        names.get(operand).map(String::as_str).ok_or_else(|| {
            StoreError::validation(format!(
                "An expression attribute name used in the document path is not defined; attribute name: {operand}"
            ))
        })
    } else if operand.is_empty() {
        Err(StoreError::validation("Invalid expression: empty attribute name"))
    } else {
        Ok(operand)
    }
}

/// Keep only the projected attributes of `item`. Attributes the item lacks
/// are simply absent from the result.
pub fn apply_projection(
    item: &Item,
    projection: &str,
    names: &HashMap<String, String>,
) -> Result<Item, StoreError> {
    let mut projected = Item::new();
    for operand in projection.split(',').map(str::trim) {
        let name = resolve(operand, names)?;
        if let Some(value) = item.get(name) {
            projected.insert(name.to_owned(), value.clone());
        }
    }
    Ok(projected)
}

/// Evaluate `condition` against the currently stored item, if any.
pub fn evaluate_condition(
    existing: Option<&Item>,
    condition: &str,
    names: &HashMap<String, String>,
) -> Result<bool, StoreError> {
    let mut result = true;
    for term in split_and(condition) {
        let (function, operand) = parse_call(term)?;
        let name = resolve(operand, names)?;
        let present = existing.is_some_and(|item| item.contains_key(name));
        result &= match function {
            "attribute_exists" => present,
            "attribute_not_exists" => !present,
            other => {
                return Err(StoreError::validation(format!(
                    "Invalid ConditionExpression: unsupported function: {other}"
                )));
            }
        };
    }
    Ok(result)
}

fn split_and(condition: &str) -> Vec<&str> {
    let mut terms = Vec::new();
    let mut rest = condition;
    loop {
        let lower = rest.to_ascii_lowercase();
        match lower.find(" and ") {
            Some(at) => {
                terms.push(rest[..at].trim());
                rest = &rest[at + 5..];
            }
            None => {
                terms.push(rest.trim());
                return terms;
            }
        }
    }
}

fn parse_call(term: &str) -> Result<(&str, &str), StoreError> {
    let invalid = || StoreError::validation(format!("Invalid ConditionExpression: {term}"));
    let open = term.find('(').ok_or_else(invalid)?;
    let inner = term[open + 1..].strip_suffix(')').ok_or_else(invalid)?;
    Ok((term[..open].trim(), inner.trim()))
}
