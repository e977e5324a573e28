//! Property-style checks for the seven invariants in §8, exercised over a
//! handful of representative scenarios rather than an exhaustive grid.

use multimodal_router::domain::{Node, PointName, StopType, TransportType, UserPreference, WeatherConditions};
use multimodal_router::geo::Location;
use multimodal_router::oracle::StubOracle;
use multimodal_router::orchestrator::get_possible_routes;
use multimodal_router::rank::filter_order_routes;

fn loc(lat: f64, lng: f64) -> Location {
    Location::new(lat, lng).unwrap()
}

fn sample_scenarios() -> Vec<(Vec<Node>, WeatherConditions)> {
    vec![
        (
            vec![
                Node::Point { name: PointName::Start, loc: loc(41.00948, 28.9772) },
                Node::Point { name: PointName::End, loc: loc(41.01868, 28.9692) },
            ],
            WeatherConditions::default(),
        ),
        (
            vec![
                Node::Point { name: PointName::Start, loc: loc(41.009477, 28.977335) },
                Node::Point { name: PointName::End, loc: loc(41.04853, 28.93369) },
                Node::Vehicle { id: 1, kind: TransportType::Scooter, loc: loc(41.02583, 28.97383), available: true },
                Node::Stop { id: 1, name: "lot".into(), kind: StopType::CarStop, loc: loc(41.03066, 28.9789) },
                Node::Vehicle { id: 2, kind: TransportType::Car, loc: loc(41.03066, 28.9789), available: true },
            ],
            WeatherConditions::default(),
        ),
    ]
}

#[test]
fn distance_symmetry_floor() {
    for (nodes, weather) in sample_scenarios() {
        let start = nodes.iter().find(|n| n.is_start_point()).unwrap();
        let end = nodes.iter().find(|n| n.is_end_point()).unwrap();
        let floor = start.loc().distance_to(&end.loc());

        let result = get_possible_routes(&nodes, &weather, &Default::default(), true, false, false, false, &StubOracle);
        for r in &result.routes {
            assert!(r.total_distance_m + 1e-6 >= floor, "row {:?} total_distance below great-circle floor", r.pattern);
        }
    }
}

#[test]
fn mode_accounting_sums_to_total_distance() {
    for (nodes, weather) in sample_scenarios() {
        let result = get_possible_routes(&nodes, &weather, &Default::default(), true, false, false, false, &StubOracle);
        for r in &result.routes {
            let sum = r.walk_distance_m + r.car_distance_m + r.escooter_distance_m + r.sea_vessel_distance_m;
            let rel_err = (sum - r.total_distance_m).abs() / r.total_distance_m.max(1.0);
            assert!(rel_err < 1e-6, "pattern {} mode sum {} != total {}", r.pattern, sum, r.total_distance_m);
        }
    }
}

#[test]
fn pattern_legality_never_contains_forbidden_substrings() {
    const FORBIDDEN: [&str; 4] = ["F*F", "C*C", "V*V", "S*F"];
    for (nodes, weather) in sample_scenarios() {
        let result = get_possible_routes(&nodes, &weather, &Default::default(), true, false, false, false, &StubOracle);
        for r in &result.routes {
            for f in FORBIDDEN {
                assert!(!r.pattern.contains(f), "pattern {} contains forbidden substring {}", r.pattern, f);
            }
        }
    }
}

#[test]
fn expected_intermediate_time_is_monotone_and_matches_path_length() {
    for (nodes, weather) in sample_scenarios() {
        let result = get_possible_routes(&nodes, &weather, &Default::default(), true, false, false, false, &StubOracle);
        for r in &result.routes {
            assert_eq!(r.expected_intermediate_time_s.len(), r.path.len());
            for w in r.expected_intermediate_time_s.windows(2) {
                assert!(w[1] + 1e-9 >= w[0], "timeline not monotone in pattern {}", r.pattern);
            }
        }
    }
}

#[test]
fn weather_gating_excludes_scooter_and_sea_vessel() {
    let (nodes, _) = &sample_scenarios()[1];
    let raining = WeatherConditions { is_raining: true, is_windy: false };
    let result = get_possible_routes(nodes, &raining, &Default::default(), true, false, false, false, &StubOracle);
    assert!(result.routes.iter().all(|r| r.escooter_count == 0));

    let windy = WeatherConditions { is_raining: false, is_windy: true };
    let result = get_possible_routes(nodes, &windy, &Default::default(), true, false, false, false, &StubOracle);
    assert!(result.routes.iter().all(|r| r.sea_vessel_count == 0));
}

#[test]
fn reranking_the_same_table_is_stable() {
    let (nodes, weather) = &sample_scenarios()[1];
    let result = get_possible_routes(nodes, weather, &Default::default(), true, false, false, false, &StubOracle);
    let prefs = UserPreference::try_new(vec!["total_duration".to_string()], vec![]).unwrap();

    let first = filter_order_routes(result.routes.clone(), Some(&prefs));
    let second = filter_order_routes(result.routes.clone(), Some(&prefs));

    let first_patterns: Vec<&str> = first.iter().map(|r| r.pattern.as_str()).collect();
    let second_patterns: Vec<&str> = second.iter().map(|r| r.pattern.as_str()).collect();
    assert_eq!(first_patterns, second_patterns);
}
