// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Per-session management sequence counter.

/// Sequence number source for outgoing management messages.
///
/// The counter starts at 0, meaning nothing has been sent yet. Every call to
/// [`next`](SequenceCounter::next) pre-increments and returns the new value, so the
/// first request carries sequence 1. After 65535 the counter wraps to 1 and never
/// hands out 0 again.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SequenceCounter {
    current: u16,
}

impl SequenceCounter {
    /// Create a counter that has not handed out any value.
    pub const fn new() -> Self {
        SequenceCounter { current: 0 }
    }

    /// Advance and return the sequence number for the next request.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> u16 {
        self.current = match self.current.checked_add(1) {
            Some(v) => v,
            None => 1,
        };
        self.current
    }

    /// The last value handed out, or 0 before the first request.
    pub const fn current(&self) -> u16 {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_value_is_one() {
        let mut seq = SequenceCounter::new();
        assert_eq!(seq.current(), 0);
        assert_eq!(seq.next(), 1);
        assert_eq!(seq.next(), 2);
        assert_eq!(seq.current(), 2);
    }

    #[test]
    fn test_wraps_to_one() {
        let mut seq = SequenceCounter { current: u16::MAX - 1 };
        assert_eq!(seq.next(), u16::MAX);
        assert_eq!(seq.next(), 1);
    }
}
