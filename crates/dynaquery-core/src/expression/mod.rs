//! Expression building blocks.
//!
//! - [`alias`]: registries mapping attribute names and values to placeholders.
//! - [`projection`]: projection expressions for field selection.
//! - [`condition`]: condition expression fragments for conditional writes.

pub mod alias;
pub mod condition;
pub mod projection;

pub use alias::{AliasKind, AliasRegistry, NameRegistry, Names, ValueRegistry, Values};
pub use projection::ProjectionExpression;
