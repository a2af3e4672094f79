//! mtlverde Query - Joined statistics and on-demand territory/station queries
//!
//! [`Atlas`] bundles everything loaded at startup. The territory statistics table is
//! computed once; territory filters and station series are answered from memory on each
//! interaction, with unknown ids yielding an empty result.

pub mod air;
pub mod atlas;
pub mod join;
pub mod selection;

pub use air::{daily_series, AirQualityIndex, StationSummary};
pub use atlas::{Atlas, AtlasOptions, AtlasSources};
pub use join::{left_join, territory_stats, JoinReport, StatsJoinReport, TerritoryStatsRow};
pub use selection::{filter_green_space, GreenSpaceFilter, TerritorySelection};
