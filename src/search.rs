use std::cmp::Ordering;
use log::debug;

use crate::errors::SubtitleError;
use crate::subtitle_processor::{SubtitleCollection, SubtitleEntry};

// @module: Nearest-in-time subtitle lookup with text constraints

/// Index of the cue whose on-time is closest to `target_ms`.
///
/// Bisects assuming on-times ascend, then settles on the nearest of the
/// converged index and its two neighbours (the lower index wins ties).
/// Unsorted input still yields some in-range index. Returns `None` only for
/// an empty collection.
pub fn closest(subtitles: &SubtitleCollection, target_ms: u32) -> Option<usize> {
    let entries = subtitles.entries();
    if entries.is_empty() {
        return None;
    }

    let last = entries.len() as isize - 1;
    let mut lo: isize = 0;
    let mut hi: isize = last;
    loop {
        let mid = (lo + hi) / 2;
        match entries[mid as usize].start_time_ms.cmp(&target_ms) {
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid - 1,
            Ordering::Equal => return Some(mid as usize),
        }
        if lo >= hi {
            break;
        }
    }

    let converged = lo.clamp(0, last) as usize;
    let nearest = (converged.saturating_sub(1)..=converged + 1)
        .filter(|&i| i < entries.len())
        .min_by_key(|&i| entries[i].start_time_ms.abs_diff(target_ms))
        .unwrap_or(converged);
    Some(nearest)
}

/// Whether every term occurs in the cue text, in the given order.
///
/// Each term is looked up from the position where the previous one was
/// found, so a later term may overlap an earlier match but never precede it.
pub fn contains<S: AsRef<str>>(entry: &SubtitleEntry, terms: &[S]) -> bool {
    let mut rest = entry.text.as_str();
    for term in terms {
        match rest.find(term.as_ref()) {
            Some(pos) => rest = &rest[pos..],
            None => return false,
        }
    }
    true
}

/// Visits indices outward from a center: `c, c-1, c+1, c-2, c+2, ...`,
/// continuing on one side alone once the other runs out.
#[derive(Debug, Clone)]
pub struct ExpansionOrder {
    center: usize,
    len: usize,
    radius: usize,
    left_next: bool,
    started: bool,
}

impl ExpansionOrder {
    pub fn new(center: usize, len: usize) -> Self {
        ExpansionOrder {
            center,
            len,
            radius: 1,
            left_next: true,
            started: false,
        }
    }
}

impl Iterator for ExpansionOrder {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if !self.started {
            self.started = true;
            return (self.center < self.len).then_some(self.center);
        }

        loop {
            let left_done = self.radius > self.center;
            let right_done = self.center.saturating_add(self.radius) >= self.len;
            if left_done && right_done {
                return None;
            }

            let candidate = if self.left_next {
                self.left_next = false;
                self.center.checked_sub(self.radius)
            } else {
                self.left_next = true;
                let right = self.center + self.radius;
                self.radius += 1;
                (right < self.len).then_some(right)
            };

            if candidate.is_some() {
                return candidate;
            }
        }
    }
}

/// Find the 0-based index of the cue nearest `target_ms` whose text contains
/// all `terms`, searching outward from the closest cue.
pub fn search<S: AsRef<str>>(
    subtitles: &SubtitleCollection,
    target_ms: u32,
    terms: &[S],
) -> Result<usize, SubtitleError> {
    let center = closest(subtitles, target_ms).ok_or(SubtitleError::NotFound { target_ms })?;
    debug!("Searching outward from subtitle {} for {}ms", center + 1, target_ms);

    let entries = subtitles.entries();
    ExpansionOrder::new(center, entries.len())
        .find(|&i| contains(&entries[i], terms))
        .ok_or(SubtitleError::NotFound { target_ms })
}
