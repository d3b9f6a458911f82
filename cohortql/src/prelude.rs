// Import commonly used items with: `use cohortql::prelude::*;`

pub use cohortql_core::{
    CombineMode, FieldFilter, FilterError, FilterMode, FilterSet, FilterState, GqlFilter,
    OptionFilter, RangeFilter, Workspace,
};

#[cfg(feature = "gql")]
pub use cohortql_gql::{dereference, get_gql_filter, get_gql_filter_json, resolve_and_compile};

#[cfg(feature = "aggregation")]
pub use cohortql_aggregation::{build_query_info, AnchorConfig, FilterTab, QueryInfo, QueryInfoArgs};
