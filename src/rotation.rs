//! The featured-story carousel.
//!
//! Cycles a "current featured index" over the first three articles of the
//! list.  Time is passed in explicitly (`now: Instant`) rather than read from
//! the clock, so the main loop drives it from its tick and tests drive it
//! with synthetic instants.
//!
//! The auto-advance timer is just a deadline owned by the rotation: it is
//! armed by [`reset`](FeaturedRotation::reset) only when the list has more
//! than three articles, and it goes away whenever the rotation is reset,
//! disarmed, or dropped.  There is no background task to leak.

use std::time::{Duration, Instant};

/// How many leading articles take part in the rotation.
pub const FEATURED_SLOTS: usize = 3;

/// Time between automatic advances.
pub const ROTATION_INTERVAL: Duration = Duration::from_secs(8);

/// How long the "sliding" presentation flag stays up after a transition.
pub const SLIDE_DURATION: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeaturedRotation {
    index: usize,
    slots: usize,
    next_advance: Option<Instant>,
    sliding_until: Option<Instant>,
}

impl FeaturedRotation {
    /// Start over for a freshly loaded list of `article_count` articles.
    pub fn reset(&mut self, article_count: usize, now: Instant) {
        self.index = 0;
        self.slots = article_count.min(FEATURED_SLOTS);
        self.sliding_until = None;
        self.next_advance = (article_count > FEATURED_SLOTS).then(|| now + ROTATION_INTERVAL);
    }

    /// Index of the featured article, or `None` for an empty list.
    pub fn current(&self) -> Option<usize> {
        (self.slots > 0).then_some(self.index)
    }

    /// Number of articles taking part in the rotation.
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Presentation-only flag; never affects [`current`](Self::current).
    pub fn is_sliding(&self, now: Instant) -> bool {
        self.sliding_until.is_some_and(|until| now < until)
    }

    /// Manual advance, wrapping after the last slot.
    pub fn next(&mut self, now: Instant) {
        if self.slots == 0 {
            return;
        }
        self.transition_to((self.index + 1) % self.slots, now);
        self.rearm(now);
    }

    /// Jump straight to `index`.  Out-of-range indices are ignored.
    pub fn jump(&mut self, index: usize, now: Instant) -> bool {
        if index >= self.slots {
            return false;
        }
        if index != self.index {
            self.transition_to(index, now);
        }
        self.rearm(now);
        true
    }

    /// Advance the clock.  Returns `true` if the featured index changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.sliding_until.is_some_and(|until| now >= until) {
            self.sliding_until = None;
        }

        match self.next_advance {
            Some(deadline) if now >= deadline => {
                self.transition_to((self.index + 1) % self.slots, now);
                self.next_advance = Some(now + ROTATION_INTERVAL);
                true
            }
            _ => false,
        }
    }

    /// Stop the auto-advance timer.
    pub fn disarm(&mut self) {
        self.next_advance = None;
    }

    fn transition_to(&mut self, index: usize, now: Instant) {
        self.index = index;
        self.sliding_until = Some(now + SLIDE_DURATION);
    }

    // A manual move restarts the countdown so the story the user picked
    // stays up for a full interval.
    fn rearm(&mut self, now: Instant) {
        if self.next_advance.is_some() {
            self.next_advance = Some(now + ROTATION_INTERVAL);
        }
    }
}
