//! Projection expressions for field selection.
//!
//! Every selected field is aliased, whether or not its name would be legal
//! inline, so reserved words and odd characters never reach the expression.
//! Aliases are `#` plus the field's first character; later fields sharing that
//! character get an increasing numeric suffix.
//!
//! Field names are opaque: `a.b` and `a[0]` alias the whole literal string,
//! not a nested path.

use std::collections::HashMap;

use serde::Serialize;

/// A projection expression and the attribute-name aliases it references.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProjectionExpression {
    /// Comma-separated aliases, e.g. `#f, #f1, #f2`.
    pub projection_expression: String,
    /// Alias -> field name.
    pub expression_attribute_names: HashMap<String, String>,
}

impl ProjectionExpression {
    /// Build the projection for `fields`, in order.
    ///
    /// Returns `None` when no fields are given, meaning "all attributes".
    #[must_use]
    pub fn build<I, S>(fields: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // Leading alias -> collisions seen so far.
        let mut used: HashMap<String, u32> = HashMap::new();
        let mut projection = Self::default();

        for field in fields {
            let field = field.as_ref();
            let mut alias = String::from("#");
            if let Some(first) = field.chars().next() {
                alias.push(first);
            }

            match used.get_mut(&alias) {
                Some(count) => {
                    *count += 1;
                    alias.push_str(&count.to_string());
                }
                None => {
                    used.insert(alias.clone(), 0);
                }
            }

            if !projection.projection_expression.is_empty() {
                projection.projection_expression.push_str(", ");
            }
            projection.projection_expression.push_str(&alias);
            projection
                .expression_attribute_names
                .insert(alias, field.to_owned());
        }

        if projection.expression_attribute_names.is_empty() {
            None
        } else {
            Some(projection)
        }
    }

    /// The aliases in expression order.
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.projection_expression.split(", ")
    }
}
