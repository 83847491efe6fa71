// Core algorithm exports
pub mod distance;
pub mod matcher;
pub mod requests;

pub use distance::{haversine_distance, round_km};
pub use matcher::{Matcher, RankResult};
pub use requests::{DonationStore, RequestError, RequestService};
