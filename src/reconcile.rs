use std::collections::HashSet;

/// A character slot in the target/typed grid. Column indices are char
/// (not byte) offsets within a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Display class of a single character slot, derived from the error/fixed
/// maps plus how far the user has typed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharClass {
    Correct,
    Error,
    Fixed,
    Pending,
}

/// Full per-character state recomputed from one input event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub typed_lines: Vec<String>,
    pub cursor: Position,
    pub errors: HashSet<Position>,
    pub fixed: HashSet<Position>,
}

impl Reconciliation {
    /// How `pos` should render right now. Error and fixed slots are carried
    /// in the maps; anything else is correct if typed, pending if not.
    pub fn classify(&self, pos: Position) -> CharClass {
        if self.errors.contains(&pos) {
            CharClass::Error
        } else if self.fixed.contains(&pos) {
            CharClass::Fixed
        } else if self
            .typed_lines
            .get(pos.line)
            .is_some_and(|line| pos.col < line.chars().count())
        {
            CharClass::Correct
        } else {
            CharClass::Pending
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Recomputes typed lines, cursor position, and the error/fixed maps from the
/// raw input. Pure: same inputs always produce the same output, and nothing
/// is patched incrementally. `previous_errors` is only consulted to detect
/// slots that were wrong before and are typed correctly now.
///
/// `caret_offset` counts chars into `raw_input`, with each newline consuming
/// one position. An offset past the end of the input clamps to the end of the
/// last line instead of panicking.
pub fn reconcile(
    target: &str,
    raw_input: &str,
    caret_offset: usize,
    previous_errors: &HashSet<Position>,
) -> Reconciliation {
    let typed_lines: Vec<String> = raw_input.split('\n').map(str::to_string).collect();
    let target_lines: Vec<&str> = target.split('\n').collect();

    let cursor = locate_caret(&typed_lines, caret_offset);

    let mut errors = HashSet::new();
    let mut fixed = HashSet::new();

    let line_count = typed_lines.len().max(target_lines.len());
    for line in 0..line_count {
        let typed: Vec<char> = typed_lines
            .get(line)
            .map(|l| l.chars().collect())
            .unwrap_or_default();
        let expected: Vec<char> = target_lines
            .get(line)
            .map(|l| l.chars().collect())
            .unwrap_or_default();

        for col in 0..typed.len().max(expected.len()) {
            let pos = Position::new(line, col);
            match (typed.get(col), expected.get(col)) {
                (Some(t), Some(e)) if t == e => {
                    if previous_errors.contains(&pos) {
                        fixed.insert(pos);
                    }
                }
                (Some(_), Some(_)) => {
                    errors.insert(pos);
                }
                // Typed past the end of the target line: always an error,
                // never pending.
                (Some(_), None) => {
                    errors.insert(pos);
                }
                // Target char not reached yet: pending, no entry.
                (None, _) => {}
            }
        }
    }

    Reconciliation {
        typed_lines,
        cursor,
        errors,
        fixed,
    }
}

/// Walks the typed lines accumulating consumed length (+1 per newline) until
/// the caret offset lands inside one of them.
fn locate_caret(typed_lines: &[String], caret_offset: usize) -> Position {
    let mut consumed = 0usize;
    for (line, content) in typed_lines.iter().enumerate() {
        let len = content.chars().count();
        if caret_offset <= consumed + len {
            return Position::new(line, caret_offset - consumed);
        }
        consumed += len + 1;
    }

    // Out-of-range caret: clamp to the end of the last line.
    let last = typed_lines.len().saturating_sub(1);
    let last_len = typed_lines
        .last()
        .map(|l| l.chars().count())
        .unwrap_or_default();
    Position::new(last, last_len)
}
