//! Best-window search over an availability heatmap.
//!
//! A window is a contiguous run of slots inside one day. Its quality is the
//! number of people free for the *entire* run, i.e. the minimum heatmap value
//! over its slots; a window is only as good as its worst slot.
//!
//! ## Ranking
//! 1. `available_count` descending
//! 2. `window_length` descending (prefer longer blocks)
//! 3. `day_index` ascending
//! 4. `start_slot_index` ascending
//!
//! The last two keys make the order total, so identical snapshots always
//! produce identical results.
//!
//! ## Complexity
//! Every `(start, end)` pair of a day is visited with a running minimum,
//! O(days × slots_per_day²). The scan from a given start stops at the first
//! empty slot since every longer window would also be empty. With the
//! enforced `total_slots <= 1000` this stays well below a millisecond.

use std::cmp::Ordering;

use crate::config::WindowSettings;
use crate::models::grid::{day_label, format_clock, minutes_of_slot};
use crate::models::{SlotGridSettings, SlotIndex};
use crate::routes::availability::{Window, WindowSpan};

/// Number of windows returned when no configuration is supplied.
pub const DEFAULT_TOP_K: usize = 3;

/// Top-K windows for `heatmap` under `settings`.
pub fn best_windows(
    heatmap: &[u32],
    settings: &SlotGridSettings,
    windows: &WindowSettings,
) -> Vec<Window> {
    let min_window_slots = settings.min_window_slots(windows.min_window_minutes);
    top_windows(
        heatmap,
        settings.slots_per_day(),
        min_window_slots,
        windows.top_k,
    )
}

/// Top-K windows for a heatmap laid out as consecutive days of
/// `slots_per_day` slots.
pub fn top_windows(
    heatmap: &[u32],
    slots_per_day: usize,
    min_window_slots: usize,
    top_k: usize,
) -> Vec<Window> {
    if top_k == 0 {
        return Vec::new();
    }

    let mut candidates = candidate_windows(heatmap, slots_per_day, min_window_slots);
    if candidates.len() > top_k {
        candidates.select_nth_unstable_by(top_k - 1, compare_windows);
        candidates.truncate(top_k);
    }
    candidates.sort_unstable_by(compare_windows);
    candidates
}

/// Every window of at least `min_window_slots` slots with a non-zero joint
/// availability, in enumeration order.
///
/// A trailing partial day (heatmap length not a multiple of
/// `slots_per_day`) is ignored.
pub fn candidate_windows(
    heatmap: &[u32],
    slots_per_day: usize,
    min_window_slots: usize,
) -> Vec<Window> {
    let mut candidates = Vec::new();
    if slots_per_day == 0 {
        return candidates;
    }
    let min_len = min_window_slots.max(1);

    for (day_index, day) in heatmap.chunks_exact(slots_per_day).enumerate() {
        let day_offset = day_index * slots_per_day;

        for start in 0..slots_per_day {
            let mut available = u32::MAX;

            for end in (start + 1)..=slots_per_day {
                available = available.min(day[end - 1]);
                if available == 0 {
                    break;
                }

                let length = end - start;
                if length >= min_len {
                    candidates.push(Window {
                        day_index: day_index as u32,
                        start_slot_index: (day_offset + start) as SlotIndex,
                        end_slot_index: (day_offset + end) as SlotIndex,
                        available_count: available,
                        window_length: length as u32,
                    });
                }
            }
        }
    }

    candidates
}

/// Total display order of windows, best first.
pub fn compare_windows(a: &Window, b: &Window) -> Ordering {
    b.available_count
        .cmp(&a.available_count)
        .then_with(|| b.window_length.cmp(&a.window_length))
        .then_with(|| a.day_index.cmp(&b.day_index))
        .then_with(|| a.start_slot_index.cmp(&b.start_slot_index))
}

/// Calendar date and local clock range of a window.
pub fn describe_window(window: &Window, settings: &SlotGridSettings) -> WindowSpan {
    let per_day = settings.slots_per_day().max(1) as u32;
    let start_minutes = minutes_of_slot(window.start_slot_index % per_day, settings);
    let end_minutes = start_minutes + window.window_length * settings.slot_minutes;

    WindowSpan {
        date: day_label(window.day_index, settings),
        start_time: format_clock(start_minutes),
        end_time: format_clock(end_minutes),
    }
}
