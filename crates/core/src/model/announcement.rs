/// The named spoken prompts a session can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Announcement {
    Start,
    Halfway,
    Completion,
}

/// One-shot gates guarding each announcement.
///
/// A gate fires at most once between resets, so no prompt is ever spoken
/// twice within the same session instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnouncementGates {
    start: bool,
    halfway: bool,
    completion: bool,
}

impl AnnouncementGates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the gate if `condition` holds and it has not fired yet.
    ///
    /// Returns true exactly when the caller should speak now.
    pub fn fire_once(&mut self, which: Announcement, condition: bool) -> bool {
        if !condition {
            return false;
        }
        let slot = match which {
            Announcement::Start => &mut self.start,
            Announcement::Halfway => &mut self.halfway,
            Announcement::Completion => &mut self.completion,
        };
        if *slot {
            false
        } else {
            *slot = true;
            true
        }
    }

    /// Whether the gate has already fired.
    #[must_use]
    pub fn has_fired(&self, which: Announcement) -> bool {
        match which {
            Announcement::Start => self.start,
            Announcement::Halfway => self.halfway,
            Announcement::Completion => self.completion,
        }
    }

    /// Re-arms every gate. Part of the full session reset.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
