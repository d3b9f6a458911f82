//! Splits filter-tab fields into aggregation groups and picks the filter each
//! group's aggregation request runs with.

mod query_info;
mod tabs;

pub use query_info::{build_query_info, filter_key, QueryInfo, QueryInfoArgs, MAIN_GROUP};
pub use tabs::{AnchorConfig, FilterTab};
