use crate::core::distance::{haversine_distance, round_km};
use crate::models::{Coordinate, Donor, RankedDonor};
use std::collections::HashSet;

/// Result of a ranking pass over the donor pool
#[derive(Debug)]
pub struct RankResult {
    pub donors: Vec<RankedDonor>,
    pub total_pool: usize,
}

/// Ranks the donor pool by proximity to a querying origin
///
/// # Pipeline Stages
/// 1. Exclusion filter (donors the receiver already has a request for)
/// 2. Distance annotation via the haversine engine
/// 3. Stable nearest-first sort
#[derive(Debug, Clone, Default)]
pub struct Matcher;

impl Matcher {
    pub fn new() -> Self {
        Self
    }

    /// Rank donors by distance from `origin`, nearest first
    ///
    /// Donors whose id appears in `exclude` are dropped before ranking.
    /// Receiver dashboards pass the set of donors they already requested,
    /// regardless of request status; hospital dashboards pass an empty
    /// set and see the full pool.
    ///
    /// Ties at equal distance keep their relative order from the input
    /// pool (the sort is stable).
    pub fn rank_donors(
        &self,
        origin: Coordinate,
        pool: Vec<Donor>,
        exclude: &HashSet<i64>,
    ) -> RankResult {
        let total_pool = pool.len();

        let mut ranked: Vec<RankedDonor> = pool
            .into_iter()
            // Stage 1: drop donors this receiver already requested
            .filter(|donor| !exclude.contains(&donor.id))
            // Stage 2: annotate with rounded great-circle distance
            .map(|donor| {
                let distance_km = round_km(haversine_distance(origin, donor.coordinate()));

                RankedDonor {
                    id: donor.id,
                    name: donor.name,
                    email: donor.email,
                    contact: donor.contact,
                    blood_group: donor.blood_group,
                    age: donor.age,
                    last_donation_month: donor.last_donation_month,
                    distance_km,
                }
            })
            .collect();

        // Stage 3: nearest first; Vec::sort_by is stable so equal
        // distances retain pool order
        ranked.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        RankResult {
            donors: ranked,
            total_pool,
        }
    }
}
