use crossterm::event::KeyEventKind;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{backend::Backend, layout::Position, Frame, Terminal};
use tracing::{debug, info, warn};

use crate::{
    error::Result,
    render::{fits, paint_results, paint_test, paint_too_small, TestView, TrackedFrame},
    runtime::{AppEvent, Clock, EventSource, FixedTicker, Runner},
    source::TextSource,
    stats::{Metrics, TestResult},
    text::{prepare, PreparedText},
    tracker::{Applied, BlinkState, InputState, KeyAction, BLINK_INTERVAL},
};

/// How a whole session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    GoalMet,
    Cancelled,
}

/// How a single attempt ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttemptEnd {
    Finished(TestResult),
    /// Terminal too small; nothing was typed.
    Aborted,
    Cancelled,
}

enum Ack {
    Key,
    Cancel,
}

/// Runs attempts until the goal is met or the user cancels.
///
/// Owns every piece of per-attempt state; input polling and the blink timer
/// share one thread through [`Runner::step_within`].
pub struct Session<B: Backend, E: EventSource, C: Clock> {
    terminal: Terminal<B>,
    runner: Runner<E, FixedTicker>,
    clock: C,
    source: Box<dyn TextSource>,
    rng: StdRng,
    goal: u32,
    cursor: Option<Position>,
}

impl<B: Backend, E: EventSource, C: Clock> Session<B, E, C> {
    pub fn new(
        terminal: Terminal<B>,
        events: E,
        clock: C,
        source: Box<dyn TextSource>,
        goal: u32,
    ) -> Self {
        Self {
            terminal,
            runner: Runner::new(events, FixedTicker::new(BLINK_INTERVAL)),
            clock,
            source,
            rng: StdRng::from_entropy(),
            goal,
            cursor: None,
        }
    }

    /// Replace the fallback-sentence randomness, e.g. with a seeded rng.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn into_terminal(self) -> Terminal<B> {
        self.terminal
    }

    /// Cursor cell of the last frame drawn, `None` while it is hidden or a
    /// non-typing view is up.
    pub fn cursor(&self) -> Option<Position> {
        self.cursor
    }

    pub fn run(&mut self) -> Result<SessionEnd> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.run_attempt()? {
                AttemptEnd::Cancelled => {
                    info!(attempt, "session cancelled");
                    return Ok(SessionEnd::Cancelled);
                }
                AttemptEnd::Finished(result) if result.passed => {
                    info!(attempt, wpm = result.wpm, "goal met");
                    return Ok(SessionEnd::GoalMet);
                }
                AttemptEnd::Finished(_) | AttemptEnd::Aborted => {}
            }
        }
    }

    pub fn run_attempt(&mut self) -> Result<AttemptEnd> {
        let raw = self.source.fetch().unwrap_or_default();
        let text = prepare(&raw, &mut self.rng);
        info!(len = text.len(), lines = text.lines().len(), "attempt started");

        let size = self.terminal.size()?;
        if !fits(size.width, size.height) {
            warn!(cols = size.width, rows = size.height, "terminal too small");
            self.draw(|f| paint_too_small(f));
            return Ok(match self.wait_for_key(|f| paint_too_small(f))? {
                Ack::Cancel => AttemptEnd::Cancelled,
                Ack::Key => AttemptEnd::Aborted,
            });
        }

        let Some(result) = self.type_text(&text)? else {
            return Ok(AttemptEnd::Cancelled);
        };
        info!(
            wpm = result.wpm,
            accuracy = result.accuracy,
            passed = result.passed,
            "attempt finished"
        );

        self.draw(|f| paint_results(f, &result));
        Ok(match self.wait_for_key(|f| paint_results(f, &result))? {
            Ack::Cancel => AttemptEnd::Cancelled,
            Ack::Key => AttemptEnd::Finished(result),
        })
    }

    /// The typing loop. `None` when the user cancels.
    fn type_text(&mut self, text: &PreparedText) -> Result<Option<TestResult>> {
        let start = self.clock.now();
        let mut input = InputState::new(text.len(), start);
        let mut blink = BlinkState::new(start);
        self.draw_test(text, &input, &blink);

        while !input.is_complete() {
            let wait = blink.until_next(self.clock.now());
            let event = self.runner.step_within(wait)?;
            let now = self.clock.now();

            let mut dirty = match event {
                AppEvent::Key(key) => match input.apply(KeyAction::from(key)) {
                    Applied::Cancelled => return Ok(None),
                    Applied::Changed => {
                        blink.touch(now);
                        true
                    }
                    Applied::Unchanged => false,
                },
                AppEvent::Resize | AppEvent::Tick => true,
            };
            dirty |= blink.tick(now);

            if dirty {
                self.draw_test(text, &input, &blink);
            }
        }

        let metrics = Metrics::compute(
            text.flat(),
            input.typed(),
            input.elapsed(self.clock.now()),
        );
        Ok(Some(TestResult::new(&metrics, self.goal)))
    }

    fn draw_test(&mut self, text: &PreparedText, input: &InputState, blink: &BlinkState) {
        let elapsed = input.elapsed(self.clock.now());
        let metrics = Metrics::compute(text.flat(), input.typed(), elapsed);
        let view = TestView {
            text,
            input,
            blink,
            metrics: &metrics,
            goal: self.goal,
        };
        let mut cursor = None;
        self.draw(|f| {
            let mut frame = TrackedFrame::new(f);
            paint_test(&mut frame, &view);
            cursor = frame.cursor;
        });
        self.cursor = cursor;
    }

    /// Block until any key press, repainting on resize.
    fn wait_for_key<F: Fn(&mut Frame)>(&mut self, repaint: F) -> Result<Ack> {
        loop {
            match self.runner.step()? {
                AppEvent::Key(key) if key.kind == KeyEventKind::Release => {}
                AppEvent::Key(key) => {
                    return Ok(match KeyAction::from(key) {
                        KeyAction::Cancel => Ack::Cancel,
                        _ => Ack::Key,
                    });
                }
                AppEvent::Resize => self.draw(&repaint),
                AppEvent::Tick => {}
            }
        }
    }

    // A failed draw must not end the attempt.
    fn draw<F: FnOnce(&mut Frame)>(&mut self, paint: F) {
        self.cursor = None;
        if let Err(err) = self.terminal.draw(paint) {
            debug!(%err, "draw failed");
        }
    }
}
