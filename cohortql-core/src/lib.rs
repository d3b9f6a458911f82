//! Shared data model for cohortql: filter states, compiled filters and the
//! workspace of named filter-sets.

mod error;
mod decode;
mod field_filter;
mod filter_state;
mod gql_filter;
mod mode;
mod workspace;

pub use error::FilterError;
pub use field_filter::{AnchoredFilter, FieldFilter, OptionFilter, RangeFilter};
pub use filter_state::{FilterRef, FilterState};
pub use gql_filter::GqlFilter;
pub use mode::{CombineMode, FilterMode};
pub use workspace::{FilterSet, Workspace};

pub type Value = serde_json::Value;
