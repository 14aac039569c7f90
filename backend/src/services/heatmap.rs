//! Heatmap aggregation for availability boards.
//!
//! The heatmap is recomputed from the full contribution list on every read.
//! Folding is commutative: the order of contributions never affects the
//! result.

use crate::config::WindowSettings;
use crate::models::{AvailabilityContribution, SlotGridSettings, SlotIndex};
use crate::routes::availability::{AvailabilityView, SlotParticipants};
use crate::services::windows::best_windows;

/// Count, per slot, the contributions that selected it.
///
/// Indexes outside `[0, slot_count)` are skipped individually; the rest of
/// the contribution still counts.
pub fn aggregate(slot_count: usize, contributions: &[AvailabilityContribution]) -> Vec<u32> {
    let mut heatmap = vec![0u32; slot_count];
    let mut ignored = 0usize;

    for contribution in contributions {
        for &index in &contribution.selected_slot_indexes {
            match heatmap.get_mut(index as usize) {
                Some(cell) => *cell += 1,
                None => ignored += 1,
            }
        }
    }

    if ignored > 0 {
        log::debug!(
            "Ignored {} out-of-range slot selections (slot_count={})",
            ignored,
            slot_count
        );
    }

    heatmap
}

/// Names of the contributors free in slot `index`.
///
/// Names are sorted so repeated calls on the same snapshot agree.
pub fn participants_at(
    index: SlotIndex,
    contributions: &[AvailabilityContribution],
) -> SlotParticipants {
    let mut names = Vec::new();
    let mut anonymous_count = 0;

    for contribution in contributions
        .iter()
        .filter(|c| c.selected_slot_indexes.contains(&index))
    {
        match contribution.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => names.push(name.to_string()),
            _ => anonymous_count += 1,
        }
    }
    names.sort();

    SlotParticipants {
        slot_index: index,
        names,
        anonymous_count,
    }
}

/// Build the complete availability view: heatmap, totals and best windows.
pub fn availability_view(
    settings: &SlotGridSettings,
    contributions: &[AvailabilityContribution],
    windows: &WindowSettings,
) -> AvailabilityView {
    let heatmap = aggregate(settings.total_slots(), contributions);
    let max_count = heatmap.iter().copied().max().unwrap_or(0);
    let best_windows = best_windows(&heatmap, settings, windows);

    AvailabilityView {
        heatmap,
        participant_count: contributions.len(),
        max_count,
        best_windows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn contribution(id: i64, name: Option<&str>, slots: &[SlotIndex]) -> AvailabilityContribution {
        AvailabilityContribution::new(id, name, slots.iter().copied())
    }

    #[test]
    fn test_aggregate_empty() {
        assert_eq!(aggregate(4, &[]), vec![0, 0, 0, 0]);
        assert!(aggregate(0, &[]).is_empty());
    }

    #[test]
    fn test_aggregate_counts_per_slot() {
        let contributions = vec![
            contribution(1, Some("P1"), &[0, 1]),
            contribution(2, Some("P2"), &[0]),
        ];
        assert_eq!(aggregate(2, &contributions), vec![2, 1]);
    }

    #[test]
    fn test_aggregate_ignores_out_of_range_per_index() {
        let contributions = vec![contribution(1, None, &[1, 5, 99])];
        assert_eq!(aggregate(3, &contributions), vec![0, 1, 0]);
    }

    #[test]
    fn test_participants_at() {
        let contributions = vec![
            contribution(1, Some("Zoe"), &[0, 1]),
            contribution(2, Some("Ada"), &[1]),
            contribution(3, None, &[1]),
            contribution(4, Some("  "), &[1]),
        ];

        let slot = participants_at(1, &contributions);
        assert_eq!(slot.names, vec!["Ada".to_string(), "Zoe".to_string()]);
        assert_eq!(slot.anonymous_count, 2);

        let empty = participants_at(7, &contributions);
        assert!(empty.names.is_empty());
        assert_eq!(empty.anonymous_count, 0);
    }

    #[test]
    fn test_availability_view() {
        let settings = SlotGridSettings {
            timezone: "UTC".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            day_count: 1,
            day_start_hour: 9,
            day_end_hour: 11,
            slot_minutes: 60,
        };
        let contributions = vec![
            contribution(1, Some("P1"), &[0, 1]),
            contribution(2, Some("P2"), &[0]),
        ];

        let view = availability_view(&settings, &contributions, &WindowSettings::default());
        assert_eq!(view.heatmap, vec![2, 1]);
        assert_eq!(view.participant_count, 2);
        assert_eq!(view.max_count, 2);
        assert_eq!(view.best_windows[0].available_count, 2);
    }
}
