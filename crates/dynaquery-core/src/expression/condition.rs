//! Condition expression fragments.

/// `attribute_not_exists(<alias>)`.
#[must_use]
pub fn attribute_not_exists(alias: &str) -> String {
    format!("attribute_not_exists({alias})")
}

/// `attribute_exists(<alias>)`.
#[must_use]
pub fn attribute_exists(alias: &str) -> String {
    format!("attribute_exists({alias})")
}

/// Conjoin `condition` onto an existing condition expression, if any.
#[must_use]
pub fn and(existing: Option<&str>, condition: &str) -> String {
    match existing {
        Some(existing) if !existing.trim().is_empty() => format!("{existing} and {condition}"),
        _ => condition.to_owned(),
    }
}
