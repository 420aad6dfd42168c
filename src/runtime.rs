use std::cell::Cell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Unified event type consumed by the controller
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource {
    /// Wait up to `timeout` for an event. `Ok(None)` means the timeout expired.
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<AppEvent>>;
}

/// Production event source: polls crossterm on the calling thread.
#[derive(Debug, Default)]
pub struct CrosstermEventSource;

impl CrosstermEventSource {
    pub fn new() -> Self {
        Self
    }
}

impl EventSource for CrosstermEventSource {
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<AppEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            CtEvent::Key(key) => Ok(Some(AppEvent::Key(key))),
            CtEvent::Resize(_, _) => Ok(Some(AppEvent::Resize)),
            // mouse, focus and paste events only wake the loop
            _ => Ok(Some(AppEvent::Tick)),
        }
    }
}

/// Source of the current time, injectable so runs can be replayed.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    base: Instant,
    offset: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }
}

/// Replays a fixed script of events against a [`ManualClock`].
///
/// Each step advances the clock by its delay before yielding; `None` steps
/// play out as poll timeouts. Running past the end is an `UnexpectedEof`
/// error so a stuck loop fails instead of hanging.
#[derive(Debug)]
pub struct ScriptedEventSource {
    clock: ManualClock,
    steps: VecDeque<(Duration, Option<AppEvent>)>,
}

impl ScriptedEventSource {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            steps: VecDeque::new(),
        }
    }

    pub fn push_event(&mut self, after: Duration, event: AppEvent) -> &mut Self {
        self.steps.push_back((after, Some(event)));
        self
    }

    pub fn push_key(&mut self, after: Duration, key: KeyEvent) -> &mut Self {
        self.push_event(after, AppEvent::Key(key))
    }

    pub fn push_timeout(&mut self, after: Duration) -> &mut Self {
        self.steps.push_back((after, None));
        self
    }

    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl EventSource for ScriptedEventSource {
    fn poll_event(&mut self, _timeout: Duration) -> io::Result<Option<AppEvent>> {
        match self.steps.pop_front() {
            Some((after, event)) => {
                self.clock.advance(after);
                Ok(event)
            }
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "event script exhausted",
            )),
        }
    }
}

/// Configurable ticker interface
pub trait Ticker {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Advances the application one event/tick at a time
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to the tick interval and returns the next event, or Tick on timeout
    pub fn step(&mut self) -> io::Result<AppEvent> {
        self.step_within(self.ticker.interval())
    }

    /// Like [`Runner::step`] but never waits longer than `limit`.
    pub fn step_within(&mut self, limit: Duration) -> io::Result<AppEvent> {
        let timeout = limit.min(self.ticker.interval());
        Ok(self
            .event_source
            .poll_event(timeout)?
            .unwrap_or(AppEvent::Tick))
    }
}
