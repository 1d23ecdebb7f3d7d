//! Nearest-idle-taxi matching
//!
//! Candidates are compared by straight-line distance from their current node
//! to the pickup node; road distance is not consulted.

use super::layout::NodeLayout;
use super::taxi::Taxi;
use super::types::{NodeId, TaxiId};

/// Picks the available taxi closest to `pickup`.
///
/// Ties go to the taxi listed first. Taxis whose node has no coordinate are
/// skipped. O(n) in the number of taxis.
pub fn match_idle_taxi(pickup: NodeId, taxis: &[Taxi], layout: &NodeLayout) -> Option<TaxiId> {
    let target = layout.position(pickup)?;

    let mut best: Option<(TaxiId, f32)> = None;
    for taxi in taxis.iter().filter(|taxi| taxi.is_available()) {
        let Some(position) = layout.position(taxi.node) else {
            continue;
        };
        let distance = position.distance(&target);
        match best {
            Some((_, best_distance)) if best_distance <= distance => {}
            _ => best = Some((taxi.id, distance)),
        }
    }

    best.map(|(id, _)| id)
}
