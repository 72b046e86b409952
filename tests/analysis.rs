mod common;

use matchstats::{
    descriptive::{self, GoalsOutcome, Mode, TendencyOutcome},
    filter::{self, Criterion, CriterionOutcome},
    inference::{self, Alternative, Estimate},
    loader,
};
use proptest::prelude::*;

use common::{TestWorkspace, fixture_path};

const FIXTURE: &str = "matches.csv";

fn load_fixture() -> matchstats::frame::RecordTable {
    let path = fixture_path(FIXTURE);
    loader::load(&path, &path).expect("load fixture")
}

#[test]
fn applying_no_criteria_returns_an_equal_view() {
    let table = load_fixture();
    let (view, outcomes) = filter::apply(&table, &[]);
    assert_eq!(view, table);
    assert!(outcomes.is_empty());
}

#[test]
fn all_sentinel_criteria_leave_the_view_unchanged() {
    let table = load_fixture();
    let criteria = vec![Criterion::all("tournament"), Criterion::all("home_or_away")];
    let (view, _) = filter::apply(&table, &criteria);
    assert_eq!(view, table);
}

#[test]
fn missing_column_filter_is_skipped_and_reported() {
    let table = load_fixture();
    let criteria = vec![
        Criterion::equals("stadium", "Novelli Junior"),
        Criterion::equals("tournament", "Paulista"),
    ];
    let (view, outcomes) = filter::apply(&table, &criteria);
    assert_eq!(
        outcomes[0],
        CriterionOutcome::Skipped {
            column: "stadium".to_string()
        }
    );
    assert_eq!(view.row_count(), 6);
}

#[test]
fn goals_aggregate_over_fixture_excludes_scoreless_players() {
    let table = load_fixture();
    let GoalsOutcome::Scored(report) = descriptive::goals_by_player(&table) else {
        panic!("expected scored outcome");
    };
    assert_eq!(report.total, 6.0);
    assert_eq!(report.top.player, "Gabriel Barros");
    assert_eq!(report.top.goals, 4.0);
    // Jean and Miguel never score, so they never appear.
    assert!(report.entries.iter().all(|e| e.player != "Jean"));
    assert!(report.entries.iter().all(|e| e.player != "Miguel"));
}

#[test]
fn goals_aggregate_handles_filters_that_remove_all_goals() {
    let table = load_fixture();
    let criteria = vec![
        Criterion::equals("tournament", "Serie B"),
        Criterion::equals("home_or_away", "home"),
    ];
    let (view, _) = filter::apply(&table, &criteria);
    assert_eq!(descriptive::goals_by_player(&view), GoalsOutcome::NoGoals);
}

#[test]
fn goals_aggregate_example_from_scratch_table() {
    let workspace = TestWorkspace::new();
    let path = workspace.write(
        "goals.csv",
        "player_name,statistics_goals\nA,2\nB,0\nA,3\n",
    );
    let table = loader::load(&path, &path).expect("load scratch table");
    let GoalsOutcome::Scored(report) = descriptive::goals_by_player(&table) else {
        panic!("expected scored outcome");
    };
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].player, "A");
    assert_eq!(report.entries[0].goals, 5.0);
    assert_eq!(report.total, 5.0);
    assert_eq!(report.top.player, "A");
}

#[test]
fn central_tendency_over_filtered_fixture() {
    let table = load_fixture();
    let (view, _) = filter::apply(&table, &[Criterion::equals("tournament", "Paulista")]);
    let TendencyOutcome::Summary(summary) =
        descriptive::central_tendency(&view, "statistics_total_passes")
    else {
        panic!("expected summary outcome");
    };
    assert_eq!(summary.count, 6);
    // 30, 22, 41, 28, 33, 24 over the Paulista rows.
    assert!((summary.mean - 29.666666).abs() < 1e-4);
    assert_eq!(summary.median, 29.0);
    assert!(matches!(summary.mode, Mode::Undefined { .. }));
}

#[test]
fn t_test_at_the_sample_mean_never_rejects() {
    let table = load_fixture();
    let values = table
        .numeric_column("statistics_accurate_passes")
        .expect("accurate passes");
    let sample_mean = descriptive::mean(&values);
    let Estimate::Computed(test) =
        inference::one_sample_t_test(&values, sample_mean, Alternative::TwoSided)
            .expect("t-test")
    else {
        panic!("expected computed test");
    };
    assert!((test.p_value - 1.0).abs() < 1e-9);
    assert!(!test.reject_null);
}

fn tournament_name(idx: u8) -> &'static str {
    if idx == 0 { "Paulista" } else { "Serie B" }
}

fn venue_name(idx: u8) -> &'static str {
    if idx == 0 { "home" } else { "away" }
}

proptest! {
    #[test]
    fn filter_order_never_changes_the_result(
        rows in proptest::collection::vec((0u8..2, 0u8..2), 0..40),
        tournament_pick in 0u8..2,
        venue_pick in 0u8..2,
    ) {
        let workspace = TestWorkspace::new();
        let mut csv = String::from("tournament,home_or_away\n");
        for (t, v) in &rows {
            csv.push_str(tournament_name(*t));
            csv.push(',');
            csv.push_str(venue_name(*v));
            csv.push('\n');
        }
        let path = workspace.write("games.csv", &csv);
        let table = loader::load(&path, &path).expect("load generated table");

        let by_tournament = Criterion::equals("tournament", tournament_name(tournament_pick));
        let by_venue = Criterion::equals("home_or_away", venue_name(venue_pick));

        let (forward, _) = filter::apply(&table, &[by_tournament.clone(), by_venue.clone()]);
        let (reverse, _) = filter::apply(&table, &[by_venue, by_tournament]);
        prop_assert_eq!(forward, reverse);
    }

    #[test]
    fn confidence_interval_always_brackets_the_sample_mean(
        sample in proptest::collection::vec(-1000.0f64..1000.0, 2..30),
        confidence in 0.01f64..0.99,
    ) {
        let Estimate::Computed(interval) =
            inference::confidence_interval(&sample, confidence).expect("interval")
        else {
            panic!("expected computed interval for n >= 2");
        };
        prop_assert!(interval.lower <= interval.sample_mean + 1e-9);
        prop_assert!(interval.sample_mean <= interval.upper + 1e-9);
    }

    #[test]
    fn t_test_against_own_mean_fails_to_reject(
        sample in proptest::collection::vec(-1000.0f64..1000.0, 2..30),
    ) {
        let sample_mean = descriptive::mean(&sample);
        let Estimate::Computed(test) =
            inference::one_sample_t_test(&sample, sample_mean, Alternative::TwoSided)
                .expect("t-test")
        else {
            panic!("expected computed test for n >= 2");
        };
        prop_assert!((test.p_value - 1.0).abs() < 1e-9);
        prop_assert!(!test.reject_null);
    }
}
