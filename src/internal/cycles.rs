//! Circular dependency detection.
//!
//! The check runs immediately before any factory is invoked, against the
//! resolution-path stack with the entry under construction on top. It
//! compares stringified `key#name` tags.
//!
//! Known limitation, preserved deliberately: apart from the period-1
//! self-reference (caught at once), a repeating cycle is declared only after
//! its full period has replayed twice on the stack. A two-party mutual cycle
//! therefore does not fire on its first repetition, only one lap later at
//! greater stack depth, and replays that never line up to an even-length
//! segment are not caught here at all; those run into the depth guard
//! instead.

use crate::context::Frame;

pub(crate) const MAX_DEPTH: usize = 1024;

/// Examines the resolution stack (current entry last) and returns the
/// rendered path if a circular dependency is declared.
pub(crate) fn find_cycle(stack: &[Frame]) -> Option<Vec<String>> {
    let (current, path) = stack.split_last()?;
    let first = path.iter().position(|frame| frame.tag == current.tag)?;
    let segment = &path[first..];

    // Nothing between the two occurrences: a direct self-repeat.
    if segment.len() == 1 {
        return Some(render(stack));
    }
    if segment.len() % 2 != 0 {
        return None;
    }
    let (left, right) = segment.split_at(segment.len() / 2);
    if left.iter().zip(right).all(|(a, b)| a.tag == b.tag) {
        Some(render(stack))
    } else {
        None
    }
}

fn render(stack: &[Frame]) -> Vec<String> {
    stack.iter().map(|frame| frame.tag.clone()).collect()
}
