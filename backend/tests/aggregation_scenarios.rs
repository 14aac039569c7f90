//! End-to-end aggregation scenarios through the unified snapshot contract.

mod support;

use huddle_engine::api::{
    BoardKind, BoardSnapshot, BoardView, ContributionId, ItemBoardSettings, ItemId, OptionId,
    PollSettings, PulseContribution, PulseScale, ViewerContext,
};
use huddle_engine::config::EngineConfig;
use huddle_engine::services::aggregate::{
    aggregate, Aggregate, AvailabilitySnapshot, ItemBoardSnapshot, PollSnapshot, PulseSnapshot,
};
use huddle_engine::services::windows::describe_window;

use support::*;

fn view_of(snapshot: BoardSnapshot) -> BoardView {
    aggregate(&snapshot, &EngineConfig::default())
}

#[test]
fn test_two_participant_availability() {
    // 09:00-11:00 in hourly slots; P1 picks both, P2 only the first
    let settings = utc_grid(1, 9, 11, 60);
    let snapshot = BoardSnapshot::Availability(AvailabilitySnapshot {
        settings: settings.clone(),
        contributions: vec![availability(1, "P1", &[0, 1]), availability(2, "P2", &[0])],
    });

    let BoardView::Availability(view) = view_of(snapshot) else {
        panic!("expected availability view");
    };
    assert_eq!(view.heatmap, vec![2, 1]);
    assert_eq!(view.participant_count, 2);
    assert_eq!(view.max_count, 2);

    let best = view.best_windows[0];
    assert_eq!(best.start_slot_index, 0);
    assert_eq!(best.end_slot_index, 1);
    assert_eq!(best.available_count, 2);

    let span = describe_window(&best, &settings);
    assert_eq!(span.date, "2025-06-02");
    assert_eq!(span.start_time, "09:00");
    assert_eq!(span.end_time, "10:00");

    // Every reported window is fully inside the grid
    assert!(view
        .best_windows
        .iter()
        .all(|w| w.end_slot_index as usize <= view.heatmap.len()));
}

#[test]
fn test_half_hour_grid_requires_an_hour() {
    let settings = utc_grid(2, 9, 12, 30);
    let contributions = vec![
        availability(1, "A", &[0, 1, 2, 3, 6, 7]),
        availability(2, "B", &[1, 2, 3, 6, 7, 8]),
        availability(3, "C", &[2, 3, 7, 8]),
    ];
    let snapshot = BoardSnapshot::Availability(AvailabilitySnapshot {
        settings,
        contributions,
    });

    let BoardView::Availability(view) = view_of(snapshot) else {
        panic!("expected availability view");
    };
    // Slots 2-3 (10:00-11:00 on day one) are the only two-slot run everyone shares
    let best = view.best_windows[0];
    assert_eq!(best.available_count, 3);
    assert_eq!((best.start_slot_index, best.end_slot_index), (2, 4));
    assert!(view.best_windows.iter().all(|w| w.window_length >= 2));
}

#[test]
fn test_empty_availability_board() {
    let snapshot = BoardSnapshot::Availability(AvailabilitySnapshot {
        settings: utc_grid(3, 9, 17, 60),
        contributions: vec![],
    });
    let BoardView::Availability(view) = view_of(snapshot) else {
        panic!("expected availability view");
    };
    assert_eq!(view.heatmap.len(), 24);
    assert!(view.heatmap.iter().all(|&c| c == 0));
    assert!(view.best_windows.is_empty());
}

#[test]
fn test_poll_three_to_one() {
    let snapshot = BoardSnapshot::Poll(PollSnapshot {
        settings: PollSettings::default(),
        options: vec![poll_option(1, "A"), poll_option(2, "B")],
        votes: vec![
            poll_vote(1, "v1"),
            poll_vote(1, "v2"),
            poll_vote(1, "v3"),
            poll_vote(2, "v4"),
        ],
        viewer: ViewerContext::anonymous(),
    });

    let BoardView::Poll(view) = view_of(snapshot) else {
        panic!("expected poll view");
    };
    let results = view.results.expect("results are visible immediately");
    assert_eq!(results.total_votes, 4);
    assert_eq!(results.voter_count, 4);
    assert_eq!(results.option(OptionId(1)).unwrap().percentage, 75);
    assert_eq!(results.option(OptionId(2)).unwrap().percentage, 25);
}

#[test]
fn test_poll_without_votes() {
    let snapshot = BoardSnapshot::Poll(PollSnapshot {
        settings: PollSettings::default(),
        options: vec![poll_option(1, "A"), poll_option(2, "B")],
        votes: vec![],
        viewer: ViewerContext::anonymous(),
    });
    let BoardView::Poll(view) = view_of(snapshot) else {
        panic!("expected poll view");
    };
    let results = view.results.unwrap();
    assert_eq!(results.total_votes, 0);
    assert!(results.per_option.iter().all(|t| t.percentage == 0));
}

#[test]
fn test_board_ranking_scenarios() {
    // X: net 2, Y: net 1 -> [X, Y]
    let mut votes = item_votes(1, 2, 0);
    votes.extend(item_votes(2, 3, 2));
    let snapshot = BoardSnapshot::Board(ItemBoardSnapshot {
        settings: ItemBoardSettings::default(),
        items: vec![board_item(1, 0, None, "a"), board_item(2, 5, None, "b")],
        votes,
        viewer: ViewerContext::anonymous(),
    });
    let BoardView::Board(view) = view_of(snapshot) else {
        panic!("expected board view");
    };
    let order: Vec<ItemId> = view.items.iter().map(|i| i.id).collect();
    assert_eq!(order, vec![ItemId(1), ItemId(2)]);

    // Equal net score: newer B before older A
    let mut votes = item_votes(1, 3, 0);
    votes.extend(item_votes(2, 3, 0));
    let snapshot = BoardSnapshot::Board(ItemBoardSnapshot {
        settings: ItemBoardSettings::default(),
        items: vec![board_item(1, 0, None, "a"), board_item(2, 30, None, "b")],
        votes,
        viewer: ViewerContext::anonymous(),
    });
    let BoardView::Board(view) = view_of(snapshot) else {
        panic!("expected board view");
    };
    let order: Vec<ItemId> = view.items.iter().map(|i| i.id).collect();
    assert_eq!(order, vec![ItemId(2), ItemId(1)]);
}

#[test]
fn test_pulse_summary() {
    let contributions = [2.0, 4.0, 4.0, 5.0]
        .iter()
        .enumerate()
        .map(|(i, &value)| PulseContribution {
            id: ContributionId(i as i64 + 1),
            name: None,
            value,
        })
        .collect();
    let snapshot = BoardSnapshot::Pulse(PulseSnapshot {
        scale: PulseScale::default(),
        contributions,
    });
    assert_eq!(snapshot.kind(), BoardKind::Pulse);

    let BoardView::Pulse(summary) = view_of(snapshot) else {
        panic!("expected pulse view");
    };
    assert_eq!(summary.count, 4);
    assert_eq!(summary.average, 3.75);
    assert_eq!(summary.median, 4.0);
    assert_eq!(summary.min, 2.0);
    assert_eq!(summary.max, 5.0);
    assert_eq!(summary.buckets.iter().map(|b| b.count).sum::<u32>(), 4);
}

#[test]
fn test_snapshot_json_round_trip_is_stable() {
    let json = r#"{
        "kind": "poll",
        "settings": {"multiSelect": true, "resultsVisibility": "after_vote"},
        "options": [
            {"id": 1, "text": "Tacos", "order": 0},
            {"id": 2, "text": "Ramen", "order": 1}
        ],
        "votes": [
            {"optionId": 1, "voterKeyHash": "h1"},
            {"optionId": 2, "voterKeyHash": "h1"}
        ],
        "viewer": {"participantToken": "p", "hasVoted": true}
    }"#;

    let snapshot: BoardSnapshot = serde_json::from_str(json).unwrap();
    let first = serde_json::to_value(view_of(snapshot.clone())).unwrap();
    let second = serde_json::to_value(view_of(snapshot)).unwrap();
    assert_eq!(first, second);

    assert_eq!(first["kind"], "poll");
    assert_eq!(first["view"]["resultsVisible"], true);
    assert_eq!(first["view"]["results"]["totalVotes"], 2);
    assert_eq!(first["view"]["results"]["voterCount"], 1);
    assert_eq!(first["view"]["results"]["perOption"][0]["percentage"], 50);
}

#[test]
fn test_hidden_results_are_omitted_from_json() {
    let json = r#"{
        "kind": "poll",
        "settings": {"resultsVisibility": "after_close"},
        "options": [{"id": 1, "text": "Yes", "order": 0}],
        "votes": [{"optionId": 1, "voterKeyHash": "h1"}]
    }"#;
    let snapshot: BoardSnapshot = serde_json::from_str(json).unwrap();
    let value = serde_json::to_value(view_of(snapshot)).unwrap();
    assert_eq!(value["view"]["resultsVisible"], false);
    assert!(value["view"].get("results").is_none());
}

#[test]
fn test_untrusted_snapshot_is_validated_before_aggregation() {
    // Same path huddle-view takes: parse, validate, then aggregate
    let json = r#"{
        "kind": "availability",
        "settings": {
            "timezone": "UTC",
            "startDate": "2025-06-02",
            "dayCount": 1,
            "dayStartHour": 17,
            "dayEndHour": 9,
            "slotMinutes": 60
        },
        "contributions": [{"id": 1, "selectedSlotIndexes": [0]}]
    }"#;
    let config = EngineConfig::default();
    let snapshot: BoardSnapshot = serde_json::from_str(json).unwrap();
    let err = snapshot.validate(&config.limits).unwrap_err();
    assert!(err.to_string().contains("day_end_hour"));

    let valid = BoardSnapshot::Availability(AvailabilitySnapshot {
        settings: utc_grid(1, 9, 17, 60),
        contributions: vec![availability(1, "P1", &[0])],
    });
    assert!(valid.validate(&config.limits).is_ok());
    assert!(matches!(aggregate(&valid, &config), BoardView::Availability(_)));
}
