//! The public GQL syntax tree.
//!
//! Parsing produces these types: [`Query`] and [`AggregationQuery`] for
//! full queries, [`Condition`] for standalone conditions, and [`Key`]
//! for standalone entity keys.

mod condition;
mod query;
mod value;

pub use condition::{BackwardComparator, Condition, EitherComparator, ForwardComparator};
pub use query::{
    Aggregation, AggregationQuery, Key, KeyPath, KeyPathId, Limit, Offset, OrderBy, Property,
    Query,
};
pub use value::Value;
