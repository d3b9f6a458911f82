//! Cohort filter compilation: filter states in, backend filter expressions
//! and aggregation plans out.

pub mod prelude;

pub use cohortql_core::{
    AnchoredFilter, CombineMode, FieldFilter, FilterError, FilterMode, FilterRef, FilterSet,
    FilterState, GqlFilter, OptionFilter, RangeFilter, Workspace,
};

#[cfg(feature = "gql")]
pub use cohortql_gql as gql;

#[cfg(feature = "aggregation")]
pub use cohortql_aggregation as aggregation;
