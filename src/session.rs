use crate::metrics::{calculate_wpm, format_time, StatusIndicator};
use crate::reconcile::{reconcile, Position, Reconciliation};
use crate::snippet::Snippet;
use crate::viewport::Viewport;
use itertools::Itertools;
use std::time::{Duration, SystemTime};

/// No input for this long while running auto-pauses the clock.
pub const IDLE_TIMEOUT: Duration = Duration::from_millis(3000);

/// Interval between live WPM samples while running.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(1000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Paused,
    Completed,
}

/// One practice run against a single snippet.
///
/// All state lives here and changes only through the editing operations and
/// `on_tick`; the rendering layer reads it through the accessor methods.
/// Every edit runs the same pipeline: apply to the raw input, reconcile,
/// re-window the viewport, then check for completion.
///
/// The two asynchronous triggers (idle auto-pause, 1 s WPM sampler) are
/// modeled as re-armable deadlines checked from the event-loop tick. Both are
/// cleared on every transition out of `Running`, so a deadline armed before a
/// pause or reset can never fire into the new state.
#[derive(Debug)]
pub struct Session {
    pub snippet: Snippet,
    raw_input: String,
    caret: usize,
    reconciliation: Reconciliation,
    viewport: Viewport,
    phase: Phase,
    accumulated_secs: f64,
    run_start: Option<SystemTime>,
    last_input: Option<SystemTime>,
    idle_deadline: Option<SystemTime>,
    next_sample: Option<SystemTime>,
    wpm: u32,
}

impl Session {
    pub fn new(snippet: Snippet, visible_lines: usize) -> Self {
        let reconciliation = reconcile(&snippet.code, "", 0, &Default::default());
        Self {
            snippet,
            raw_input: String::new(),
            caret: 0,
            reconciliation,
            viewport: Viewport::new(visible_lines),
            phase: Phase::Idle,
            accumulated_secs: 0.0,
            run_start: None,
            last_input: None,
            idle_deadline: None,
            next_sample: None,
            wpm: 0,
        }
    }

    /// Swap in a new target and start over. Typing state, maps, viewport,
    /// and the clock all reset together.
    pub fn replace_snippet(&mut self, snippet: Snippet) {
        self.snippet = snippet;
        self.reset();
    }

    /// Back to a pristine idle session on the current snippet. Clears both
    /// deadlines, so nothing armed before the reset can fire afterwards.
    pub fn reset(&mut self) {
        self.raw_input.clear();
        self.caret = 0;
        self.reconciliation = reconcile(&self.snippet.code, "", 0, &Default::default());
        self.viewport.reset();
        self.phase = Phase::Idle;
        self.accumulated_secs = 0.0;
        self.run_start = None;
        self.last_input = None;
        self.idle_deadline = None;
        self.next_sample = None;
        self.wpm = 0;
    }

    pub fn type_char(&mut self, c: char) {
        self.type_char_at(c, SystemTime::now());
    }

    pub fn type_char_at(&mut self, c: char, now: SystemTime) {
        self.insert_at_caret(&c.to_string());
        self.after_edit(now);
    }

    /// Enter inserts the line break into the raw input before reconciling,
    /// so all line/caret math runs on the post-edit string.
    pub fn enter(&mut self) {
        self.enter_at(SystemTime::now());
    }

    pub fn enter_at(&mut self, now: SystemTime) {
        self.insert_at_caret("\n");
        self.after_edit(now);
    }

    /// Tab is four spaces at the caret.
    pub fn tab(&mut self) {
        self.tab_at(SystemTime::now());
    }

    pub fn tab_at(&mut self, now: SystemTime) {
        self.insert_at_caret("    ");
        self.after_edit(now);
    }

    pub fn backspace(&mut self) {
        self.backspace_at(SystemTime::now());
    }

    pub fn backspace_at(&mut self, now: SystemTime) {
        if self.caret == 0 {
            return;
        }
        let start = byte_offset(&self.raw_input, self.caret - 1);
        let end = byte_offset(&self.raw_input, self.caret);
        self.raw_input.replace_range(start..end, "");
        self.caret -= 1;
        self.after_edit(now);
    }

    pub fn on_tick(&mut self) {
        self.on_tick_at(SystemTime::now());
    }

    /// Drives the idle deadline and the WPM sampler. Only a running session
    /// has anything to do on a tick.
    pub fn on_tick_at(&mut self, now: SystemTime) {
        if self.phase != Phase::Running {
            return;
        }

        if self.idle_deadline.is_some_and(|d| now >= d) {
            self.pause_at(now);
            return;
        }

        if self.next_sample.is_some_and(|s| now >= s) {
            self.wpm = calculate_wpm(self.correct_char_count(), self.elapsed_at(now));
            self.next_sample = Some(now + SAMPLE_INTERVAL);
        }
    }

    fn after_edit(&mut self, now: SystemTime) {
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::Running;
                self.run_start = Some(now);
                self.accumulated_secs = 0.0;
            }
            Phase::Paused => {
                self.phase = Phase::Running;
                self.run_start = Some(now);
            }
            Phase::Running | Phase::Completed => {}
        }

        let next = reconcile(
            &self.snippet.code,
            &self.raw_input,
            self.caret,
            &self.reconciliation.errors,
        );
        self.reconciliation = next;

        self.viewport
            .observe_cursor(self.target_line_count(), self.reconciliation.cursor.line);

        if self.is_exact_match() {
            if self.phase == Phase::Running {
                self.complete_at(now);
            }
        } else if self.phase == Phase::Completed {
            // Edited away from the finished text: the run continues.
            self.phase = Phase::Running;
            self.run_start = Some(now);
        }

        self.last_input = Some(now);
        if self.phase == Phase::Running {
            self.idle_deadline = Some(now + IDLE_TIMEOUT);
            if self.next_sample.is_none() {
                self.next_sample = Some(now + SAMPLE_INTERVAL);
            }
        }
    }

    fn pause_at(&mut self, now: SystemTime) {
        self.accumulated_secs = self.elapsed_at(now);
        self.run_start = None;
        self.phase = Phase::Paused;
        self.idle_deadline = None;
        self.next_sample = None;
    }

    fn complete_at(&mut self, now: SystemTime) {
        self.accumulated_secs = self.elapsed_at(now);
        self.run_start = None;
        self.phase = Phase::Completed;
        self.idle_deadline = None;
        self.next_sample = None;

        // Final figure covers the whole target, newlines excluded.
        let typed_chars = self.snippet.code.chars().filter(|c| *c != '\n').count();
        self.wpm = calculate_wpm(typed_chars, self.accumulated_secs);
    }

    /// Joined typed lines equal the target and no error is outstanding.
    pub fn is_exact_match(&self) -> bool {
        self.reconciliation.errors.is_empty()
            && self.reconciliation.typed_lines.iter().join("\n") == self.snippet.code
    }

    /// Correct characters for the live WPM sample: completed prior lines
    /// that match their target and carry no error count in full (+1 for the
    /// newline), plus correct chars on the cursor line up to the caret.
    fn correct_char_count(&self) -> usize {
        let target_lines: Vec<&str> = self.snippet.code.split('\n').collect();
        let cursor = self.reconciliation.cursor;
        let mut count = 0;

        for (i, typed) in self.reconciliation.typed_lines.iter().enumerate() {
            let target = target_lines.get(i).copied().unwrap_or("");
            if i < cursor.line {
                let line_has_error = self.reconciliation.errors.iter().any(|p| p.line == i);
                if typed == target && !line_has_error {
                    count += target.chars().count() + 1;
                }
            } else if i == cursor.line {
                let typed_chars: Vec<char> = typed.chars().collect();
                let expected: Vec<char> = target.chars().collect();
                for col in 0..cursor.col {
                    let pos = Position::new(i, col);
                    if typed_chars.get(col).is_some()
                        && typed_chars.get(col) == expected.get(col)
                        && !self.reconciliation.errors.contains(&pos)
                    {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed_at(SystemTime::now())
    }

    /// Accumulated seconds plus the currently running interval, if any.
    pub fn elapsed_at(&self, now: SystemTime) -> f64 {
        let running = self
            .run_start
            .map(|start| now.duration_since(start).unwrap_or_default().as_secs_f64())
            .unwrap_or(0.0);
        self.accumulated_secs + running
    }

    pub fn formatted_time(&self) -> String {
        self.formatted_time_at(SystemTime::now())
    }

    pub fn formatted_time_at(&self, now: SystemTime) -> String {
        format_time(self.elapsed_at(now))
    }

    pub fn indicator(&self) -> StatusIndicator {
        StatusIndicator::from_state(
            self.wpm,
            self.phase == Phase::Paused,
            self.phase == Phase::Completed,
        )
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_input(&self) -> Option<SystemTime> {
        self.last_input
    }

    pub fn wpm(&self) -> u32 {
        self.wpm
    }

    pub fn reconciliation(&self) -> &Reconciliation {
        &self.reconciliation
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn raw_input(&self) -> &str {
        &self.raw_input
    }

    pub fn target_lines(&self) -> Vec<&str> {
        self.snippet.code.split('\n').collect()
    }

    pub fn target_line_count(&self) -> usize {
        self.snippet.code.split('\n').count()
    }

    fn insert_at_caret(&mut self, text: &str) {
        let at = byte_offset(&self.raw_input, self.caret);
        self.raw_input.insert_str(at, text);
        self.caret += text.chars().count();
    }
}

/// Byte index of the `char_offset`-th char, clamped to the end of the string.
fn byte_offset(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}
