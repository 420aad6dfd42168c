use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::text::is_printable_ascii;

/// How often the cursor toggles while no key is pressed.
pub const BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// A keystroke reduced to what the typing test cares about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Char(char),
    Backspace,
    Cancel,
    Ignored,
}

impl From<KeyEvent> for KeyAction {
    fn from(key: KeyEvent) -> Self {
        if key.kind == KeyEventKind::Release {
            return KeyAction::Ignored;
        }
        match key.code {
            KeyCode::Esc => KeyAction::Cancel,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                KeyAction::Cancel
            }
            KeyCode::Backspace => KeyAction::Backspace,
            KeyCode::Char(c)
                if is_printable_ascii(c)
                    && !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                KeyAction::Char(c)
            }
            _ => KeyAction::Ignored,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerState {
    Active,
    Complete,
}

/// What applying a [`KeyAction`] did to the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    /// A character was appended or removed.
    Changed,
    /// The event was valid but had no effect (full input, empty backspace, ignored key).
    Unchanged,
    Cancelled,
}

/// Typed characters of one attempt. The cursor always equals the typed length.
#[derive(Debug, Clone)]
pub struct InputState {
    typed: Vec<char>,
    target_len: usize,
    started_at: Instant,
}

impl InputState {
    pub fn new(target_len: usize, started_at: Instant) -> Self {
        Self {
            typed: Vec::with_capacity(target_len),
            target_len,
            started_at,
        }
    }

    pub fn typed(&self) -> &[char] {
        &self.typed
    }

    pub fn cursor(&self) -> usize {
        self.typed.len()
    }

    pub fn target_len(&self) -> usize {
        self.target_len
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    pub fn state(&self) -> TrackerState {
        if self.typed.len() >= self.target_len {
            TrackerState::Complete
        } else {
            TrackerState::Active
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state() == TrackerState::Complete
    }

    pub fn push(&mut self, c: char) -> bool {
        if self.is_complete() {
            return false;
        }
        self.typed.push(c);
        true
    }

    pub fn backspace(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.typed.pop().is_some()
    }

    pub fn apply(&mut self, action: KeyAction) -> Applied {
        let changed = match action {
            KeyAction::Cancel => return Applied::Cancelled,
            KeyAction::Char(c) => self.push(c),
            KeyAction::Backspace => self.backspace(),
            KeyAction::Ignored => false,
        };
        if changed {
            Applied::Changed
        } else {
            Applied::Unchanged
        }
    }
}

/// Cursor blink bookkeeping.
#[derive(Debug, Clone, Copy)]
pub struct BlinkState {
    last_toggle: Instant,
    visible: bool,
}

impl BlinkState {
    pub fn new(now: Instant) -> Self {
        Self {
            last_toggle: now,
            visible: true,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Toggle visibility once [`BLINK_INTERVAL`] has elapsed. Returns true on toggle.
    pub fn tick(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_toggle) >= BLINK_INTERVAL {
            self.visible = !self.visible;
            self.last_toggle = now;
            true
        } else {
            false
        }
    }

    /// Force the cursor on after a keystroke and restart the interval.
    pub fn touch(&mut self, now: Instant) {
        self.visible = true;
        self.last_toggle = now;
    }

    /// Time left until the next toggle is due.
    pub fn until_next(&self, now: Instant) -> Duration {
        BLINK_INTERVAL.saturating_sub(now.saturating_duration_since(self.last_toggle))
    }
}
