//! Tick-checked timers on the encounter clock.
//! Both kinds are cancelable at any time, including after they fired or were already canceled.

use crate::types::Millis;

/// Fires every `period` after being armed, until canceled.
#[derive(Clone, Debug)]
pub struct RepeatingTimer {
    period: Millis,
    next_due: Option<Millis>,
}

impl RepeatingTimer {
    pub fn new(period: Millis) -> Self {
        Self { period: period.max(1), next_due: None }
    }

    pub fn arm(&mut self, now: Millis) {
        self.next_due = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Returns every fire time up to and including `now`, oldest first.
    pub fn drain_due(&mut self, now: Millis) -> Vec<Millis> {
        let mut fired = Vec::new();
        while let Some(due) = self.next_due
            && due <= now
        {
            fired.push(due);
            self.next_due = Some(due + self.period);
        }
        fired
    }
}

/// Fires once at a deadline, then disarms itself.
#[derive(Clone, Debug, Default)]
pub struct Deadline {
    at: Option<Millis>,
}

impl Deadline {
    pub fn schedule(&mut self, at: Millis) {
        self.at = Some(at);
    }

    pub fn cancel(&mut self) {
        self.at = None;
    }

    pub fn is_pending(&self) -> bool {
        self.at.is_some()
    }

    /// True exactly once, on the first check at or after the deadline.
    pub fn fire(&mut self, now: Millis) -> bool {
        match self.at {
            Some(at) if now >= at => {
                self.at = None;
                true
            }
            _ => false,
        }
    }
}
