//! Route ranking: avoid-filtering plus preference-driven ordering (§4.9).

use crate::domain::{FeasibleRoute, UserPreference};

fn feature_key(row: &FeasibleRoute, feature: &str) -> f64 {
    match feature {
        "edges" => row.edges as f64,
        "total_distance" => row.total_distance_m,
        "total_duration" => row.total_duration_s,
        "total_cost" => row.total_cost as f64,
        "walk_count" => row.walk_count as f64,
        "walk_distance" => row.walk_distance_m,
        "car_count" => row.car_count as f64,
        "car_distance" => row.car_distance_m,
        "escooter_count" => row.escooter_count as f64,
        "escooter_distance" => row.escooter_distance_m,
        "sea_vessel_count" => row.sea_vessel_count as f64,
        "sea_vessel_distance" => row.sea_vessel_distance_m,
        other => unreachable!("feature {other} is outside the validated vocabulary"),
    }
}

fn avoid_count(row: &FeasibleRoute, avoid: &str) -> u32 {
    match avoid {
        "walk" => row.walk_count,
        "car" => row.car_count,
        "escooter" => row.escooter_count,
        "sea_vessel" => row.sea_vessel_count,
        other => unreachable!("avoid {other} is outside the validated vocabulary"),
    }
}

fn sort_by_total_duration(routes: &mut [FeasibleRoute]) {
    routes.sort_by(|a, b| a.total_duration_s.partial_cmp(&b.total_duration_s).expect("durations are finite"));
}

/// Filters and orders feasible routes for one request.
///
/// With preferences: drops routes using any avoided mode at all (nonzero
/// per-mode count), then stably sorts ascending, lexicographically, by
/// `preferences.features` in the order given. Empty `features` leaves the
/// surviving rows in their original (enumeration) order, matching the
/// reference behavior of skipping the sort entirely.
///
/// Without preferences, falls back to ascending `total_duration` — the
/// reference engine's other ranking path is an ML model hook this crate
/// does not implement (§4.9 Non-goals; DESIGN.md).
pub fn filter_order_routes(mut routes: Vec<FeasibleRoute>, preferences: Option<&UserPreference>) -> Vec<FeasibleRoute> {
    if routes.is_empty() {
        return routes;
    }

    let Some(prefs) = preferences else {
        sort_by_total_duration(&mut routes);
        return routes;
    };

    if !prefs.avoids.is_empty() {
        routes.retain(|r| prefs.avoids.iter().all(|a| avoid_count(r, a) == 0));
    }

    if !prefs.features.is_empty() {
        routes.sort_by(|a, b| {
            for f in &prefs.features {
                let ord = feature_key(a, f).partial_cmp(&feature_key(b, f)).expect("feature values are finite");
                if ord != std::cmp::Ordering::Equal {
                    return ord;
                }
            }
            std::cmp::Ordering::Equal
        });
    }

    routes
}

/// Derives the three engine exclusion flags from a preference's `avoids`.
pub fn preference_exclusion_flags(preferences: Option<&UserPreference>) -> (bool, bool, bool) {
    let Some(p) = preferences else {
        return (false, false, false);
    };
    (
        p.avoids.iter().any(|a| a == "car"),
        p.avoids.iter().any(|a| a == "escooter"),
        p.avoids.iter().any(|a| a == "sea_vessel"),
    )
}
