//! Longest-span search of the original buffer.
//!
//! The search is exhaustive: every [`ALIGNMENT`]-aligned offset of the
//! original is probed, and each probe extends in [`ALIGNMENT`]-byte steps
//! until the bytes differ, either buffer runs out, or `max_len` is reached.
//! Work per scan position is proportional to `original.len() * max_len`.

use crate::config::ALIGNMENT;

/// A span of the original buffer that matches the final buffer at the
/// scan position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    /// Offset of the span in the original buffer. Always aligned.
    pub origin_offset: usize,
    /// Length of the span. Always a positive multiple of [`ALIGNMENT`].
    pub length: usize,
}

/// Find the longest span of `original` matching `final_buf` at `final_pos`.
///
/// Only aligned origin offsets and aligned lengths are considered, and no
/// length exceeds `max_len`. When several offsets reach the same length the
/// lowest one wins. Returns `None` when no offset matches at least
/// [`ALIGNMENT`] bytes, including when fewer than [`ALIGNMENT`] bytes of
/// `final_buf` remain at `final_pos`.
pub fn find_best_match(
    original: &[u8],
    final_buf: &[u8],
    final_pos: usize,
    max_len: usize,
) -> Option<Match> {
    if original.is_empty() || final_pos.saturating_add(ALIGNMENT) > final_buf.len() {
        return None;
    }
    let tail = &final_buf[final_pos..];

    // No offset can do better than this, so stop at the first one that gets there.
    let ceiling = align_down(max_len.min(tail.len()));

    let mut best: Option<Match> = None;
    for origin_offset in (0..original.len()).step_by(ALIGNMENT) {
        let length = probe(&original[origin_offset..], tail, max_len);
        if length > best.map_or(0, |m| m.length) {
            best = Some(Match {
                origin_offset,
                length,
            });
            if length == ceiling {
                break;
            }
        }
    }
    best
}

/// Length of the common aligned prefix of `origin` and `tail`, capped at `max_len`.
fn probe(origin: &[u8], tail: &[u8], max_len: usize) -> usize {
    let limit = max_len.min(origin.len()).min(tail.len());
    let mut matched = 0;
    while matched + ALIGNMENT <= limit
        && origin[matched..matched + ALIGNMENT] == tail[matched..matched + ALIGNMENT]
    {
        matched += ALIGNMENT;
    }
    matched
}

fn align_down(n: usize) -> usize {
    n - n % ALIGNMENT
}
