pub mod client;
pub mod endpoints;
pub mod metrics;
pub mod region;
pub mod types;

pub use client::{ApiRequest, HttpTransport, RiotClient};
pub use endpoints::account::account_url;
pub use metrics::RequestMetrics;
pub use region::{Platform, Region, resolve_platform_host, resolve_routing_host};
pub use types::{
    AccountRef, LeagueEntryDto, MatchDto, ParticipantRecord, RankedStanding, RiotApiError,
    RiotApiResponse,
};
