//! End-to-end checks of round pairing
//!
//! Random leagues are paired and compared against an exhaustive search
//! over every perfect matching, then the whole JSON -> SQLite -> pairing
//! path is exercised once.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use league_pairings::config::{AppConfig, PairingSettings};
use league_pairings::domain::{GameRecord, History, Pairing, Roster, RosterRecord};
use league_pairings::errors::PairingError;
use league_pairings::pairing::{CompatibilityGraph, RoundPlanner};
use league_pairings::services::pairing::board_records;
use league_pairings::services::{ImportService, PairingOptions, PairingService};
use league_pairings::tables::{JsonTables, SqliteTables, TableSource};

// =============================================================================
// Helpers
// =============================================================================

struct League {
    roster: Vec<RosterRecord>,
    history: Vec<GameRecord>,
}

fn random_league(rng: &mut StdRng) -> League {
    let n = 2 * rng.gen_range(1..=4);
    let roster: Vec<RosterRecord> = (0..n)
        .map(|i| {
            RosterRecord::new(
                format!("p{}", i),
                rng.gen_range(1200..1800) as f64,
                rng.gen_range(-2..=2) as f64,
            )
        })
        .collect();

    let mut history = Vec::new();
    for round in 1..=rng.gen_range(0..=5) {
        for _ in 0..rng.gen_range(0..=n) {
            let a = rng.gen_range(0..n);
            let b = rng.gen_range(0..n);
            if a == b {
                continue;
            }
            let result = if rng.gen_bool(0.15) { None } else { Some("1-0") };
            history.push(GameRecord::new(
                &format!("p{}", a),
                &format!("p{}", b),
                round,
                result,
            ));
        }
    }

    League { roster, history }
}

/// Cheapest perfect matching over the graph's edges, by exhaustive search
fn brute_force_minimum(graph: &CompatibilityGraph, free: &[usize]) -> Option<f64> {
    let Some((&first, rest)) = free.split_first() else {
        return Some(0.0);
    };

    let mut best: Option<f64> = None;
    for (idx, &other) in rest.iter().enumerate() {
        let Some(weight) = graph.weight(first, other) else {
            continue;
        };
        let remaining: Vec<usize> = rest
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != idx)
            .map(|(_, &node)| node)
            .collect();
        if let Some(cost) = brute_force_minimum(graph, &remaining) {
            let total = weight + cost;
            if best.is_none_or(|b| total < b) {
                best = Some(total);
            }
        }
    }
    best
}

/// Opponents in the last `k` games of `player`, computed straight from the rows
fn recent_from_rows(history: &[GameRecord], player: &str, k: usize) -> Vec<String> {
    let mut rows: Vec<(usize, &GameRecord)> = history.iter().enumerate().collect();
    rows.sort_by_key(|(row, record)| std::cmp::Reverse((record.round, *row)));

    rows.into_iter()
        .filter_map(|(_, record)| {
            let white = record.white.as_deref()?;
            let black = record.black.as_deref()?;
            if white == player {
                Some(black.to_string())
            } else if black == player {
                Some(white.to_string())
            } else {
                None
            }
        })
        .take(k)
        .collect()
}

fn is_active_between(history: &[GameRecord], a: &str, b: &str) -> bool {
    history.iter().any(|record| {
        record.result.is_none()
            && matches!(
                (record.white.as_deref(), record.black.as_deref()),
                (Some(w), Some(bl)) if (w == a && bl == b) || (w == b && bl == a)
            )
    })
}

fn pairs(plan: &[Pairing]) -> Vec<(&str, &str)> {
    plan.iter()
        .map(|p| (p.white.as_str(), p.black.as_str()))
        .collect()
}

// =============================================================================
// Randomized Properties
// =============================================================================

#[test]
fn test_random_leagues_match_exhaustive_search() {
    let mut rng = StdRng::seed_from_u64(0x1ea9);

    for _ in 0..200 {
        let league = random_league(&mut rng);
        let window = rng.gen_range(0..=3);
        let settings = PairingSettings {
            recency_window: window,
            ..PairingSettings::default()
        };

        let roster = Roster::from_records(&league.roster).unwrap();
        let history = History::from_records(&league.history, &settings);
        let planner = RoundPlanner::new(&settings);
        let graph = planner.build_graph(&roster, &history);

        let nodes: Vec<usize> = (0..graph.node_count()).collect();
        let expected = brute_force_minimum(&graph, &nodes);

        match (planner.plan_on(&graph, &history), expected) {
            (Ok(plan), Some(best)) => {
                assert!(
                    (plan.total_rating_gap - best).abs() < 1e-6,
                    "got {} but the cheapest matching costs {}",
                    plan.total_rating_gap,
                    best
                );

                let mut seen = HashSet::new();
                for pairing in &plan.pairings {
                    assert!(seen.insert(pairing.white.clone()));
                    assert!(seen.insert(pairing.black.clone()));

                    let (w, b) = (pairing.white.as_str(), pairing.black.as_str());
                    assert!(!is_active_between(&league.history, w, b));
                    let mutual = recent_from_rows(&league.history, w, window)
                        .iter()
                        .any(|o| o == b)
                        && recent_from_rows(&league.history, b, window)
                            .iter()
                            .any(|o| o == w);
                    assert!(!mutual, "{} and {} met too recently", w, b);
                }
                assert_eq!(seen.len(), roster.len());
            }
            (Err(PairingError::Unmatchable { .. }), None) => {}
            (got, expected) => panic!("planner gave {:?}, search gave {:?}", got, expected),
        }
    }
}

#[test]
fn test_planning_is_deterministic() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..50 {
        let league = random_league(&mut rng);
        let settings = PairingSettings::default();
        let roster = Roster::from_records(&league.roster).unwrap();
        let history = History::from_records(&league.history, &settings);
        let planner = RoundPlanner::new(&settings);

        let first = planner.plan(&roster, &history);
        let second = planner.plan(&roster, &history);
        assert_eq!(first, second);
    }
}

#[test]
fn test_previous_meeting_colors_repeat() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..100 {
        let league = random_league(&mut rng);
        let settings = PairingSettings {
            recency_window: 0,
            active_results: Vec::new(),
            ..PairingSettings::default()
        };
        let roster = Roster::from_records(&league.roster).unwrap();
        let history = History::from_records(&league.history, &settings);

        let Ok(plan) = RoundPlanner::new(&settings).plan(&roster, &history) else {
            continue;
        };

        for pairing in &plan.pairings {
            if let Some(last) = history.last_meeting(&pairing.white, &pairing.black) {
                assert_eq!(last.white, pairing.white);
                assert_eq!(last.black, pairing.black);
            }
        }
    }
}

// =============================================================================
// League Scenarios
// =============================================================================

#[test]
fn test_six_player_league() {
    let roster = vec![
        RosterRecord::new("p1", 1000.0, 0.0),
        RosterRecord::new("p2", 1005.0, 0.0),
        RosterRecord::new("p3", 1010.0, 0.0),
        RosterRecord::new("p4", 1015.0, 0.0),
        RosterRecord::new("p5", 1020.0, 0.0),
        RosterRecord::new("p6", 1025.0, 0.0),
    ];
    let history = vec![
        GameRecord::new("p3", "p4", 1, Some("1-0")),
        GameRecord::new("p5", "p6", 1, Some("0-1")),
    ];
    let settings = PairingSettings::default();

    let plan = RoundPlanner::new(&settings)
        .plan(
            &Roster::from_records(&roster).unwrap(),
            &History::from_records(&history, &settings),
        )
        .unwrap();

    assert_eq!(
        pairs(&plan.pairings),
        vec![("p1", "p2"), ("p3", "p5"), ("p4", "p6")]
    );
    assert_eq!(plan.total_rating_gap, 20.0);
}

#[test]
fn test_odd_roster_is_invalid_input() {
    let roster = vec![
        RosterRecord::new("a", 1500.0, 0.0),
        RosterRecord::new("b", 1500.0, 0.0),
        RosterRecord::new("c", 1500.0, 0.0),
    ];

    let err: PairingError = Roster::from_records(&roster).unwrap_err().into();
    assert!(matches!(err, PairingError::InvalidInput(_)));
}

#[test]
fn test_only_possible_opponent_played_recently() {
    let roster = vec![
        RosterRecord::new("a", 1500.0, 0.0),
        RosterRecord::new("b", 1600.0, 0.0),
    ];
    let history = vec![GameRecord::new("a", "b", 3, Some("1/2-1/2"))];
    let settings = PairingSettings::default();

    let err = RoundPlanner::new(&settings)
        .plan(
            &Roster::from_records(&roster).unwrap(),
            &History::from_records(&history, &settings),
        )
        .unwrap_err();

    assert_eq!(
        err,
        PairingError::Unmatchable {
            isolated: vec!["a".to_string(), "b".to_string()],
            unplaced: vec!["a".to_string(), "b".to_string()],
        }
    );
}

// =============================================================================
// Storage Round Trip
// =============================================================================

#[test]
fn test_import_then_pair_from_database() {
    let dir = std::env::temp_dir().join("league_pairings_round_trip");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let roster_path = dir.join("roster.json");
    let history_path = dir.join("history.json");
    let db_path = dir.join("league.db").to_string_lossy().to_string();

    JsonTables::save(
        &roster_path,
        &vec![
            RosterRecord::new("a", 1500.0, 0.0),
            RosterRecord::new("b", 1520.0, 0.0),
            RosterRecord::new("c", 1700.0, 0.0),
            RosterRecord::new("d", 1710.0, 0.0),
        ],
    )
    .unwrap();
    JsonTables::save(
        &history_path,
        &vec![
            GameRecord::new("c", "a", 1, Some("1-0")),
            GameRecord::new("b", "d", 1, None),
        ],
    )
    .unwrap();

    let mut config = AppConfig::new();
    config.storage.database_path = db_path.clone();
    ImportService::new(config.clone())
        .run(&roster_path, &history_path)
        .unwrap();

    let tables = SqliteTables::open(&db_path).unwrap();
    assert_eq!(tables.load_roster().unwrap().len(), 4);
    assert_eq!(tables.load_history().unwrap().len(), 2);

    let service = PairingService::new(config);
    let plan = service.run(&tables, &PairingOptions::default()).unwrap();

    // b-d is still being played, a-c met last round
    assert_eq!(pairs(&plan.pairings), vec![("a", "b"), ("c", "d")]);

    service.save_round(&tables, 2, &plan).unwrap();
    assert_eq!(tables.load_pairings(2).unwrap(), board_records(&plan));

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_import_rejects_roster_the_pairing_would_reject() {
    let dir = std::env::temp_dir().join("league_pairings_duplicate_import");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();

    let roster_path = dir.join("roster.json");
    let history_path = dir.join("history.json");
    let db_path = dir.join("league.db");

    let roster = vec![
        RosterRecord::new("a", 1500.0, 0.0),
        RosterRecord::new("b", 1510.0, 0.0),
        RosterRecord::new("c", 1600.0, 0.0),
        RosterRecord::new("d", 1610.0, 0.0),
        RosterRecord::new("a", 1900.0, 0.0),
    ];
    JsonTables::save(&roster_path, &roster).unwrap();
    JsonTables::save(&history_path, &Vec::<GameRecord>::new()).unwrap();

    let mut config = AppConfig::new();
    config.storage.database_path = db_path.to_string_lossy().to_string();

    let from_json = PairingService::new(config.clone()).run(
        &JsonTables::new(&roster_path, &history_path),
        &PairingOptions::default(),
    );
    assert!(from_json.is_err());

    let err = ImportService::new(config)
        .run(&roster_path, &history_path)
        .unwrap_err();
    assert!(format!("{:#}", err).contains("appears more than once"));
    assert!(!db_path.exists());

    std::fs::remove_dir_all(&dir).unwrap();
}
