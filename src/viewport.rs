/// Number of snippet lines shown at once unless overridden by config/CLI.
pub const DEFAULT_VISIBLE_LINES: usize = 10;

/// Computes the first visible line for a window of `window_size` lines over
/// `total_lines`, given where the cursor is and where the window was.
///
/// The window never jumps: it advances by at most one line, and only when the
/// cursor is at or past the last visible row. It never scrolls backward on
/// its own; returning to the top takes an explicit reset.
pub fn compute_window(
    total_lines: usize,
    window_size: usize,
    cursor_line: usize,
    previous_first_line: usize,
) -> usize {
    let max_first = total_lines.saturating_sub(window_size);
    let clamped = previous_first_line.min(max_first);

    if window_size > 0 && cursor_line + 1 >= clamped + window_size {
        (clamped + 1).min(max_first)
    } else {
        clamped
    }
}

/// The contiguous slice of target lines currently displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub first_line: usize,
    pub size: usize,
}

impl Viewport {
    pub fn new(size: usize) -> Self {
        Self {
            first_line: 0,
            size,
        }
    }

    /// Re-evaluates the window after the cursor moved.
    pub fn observe_cursor(&mut self, total_lines: usize, cursor_line: usize) {
        self.first_line = compute_window(total_lines, self.size, cursor_line, self.first_line);
    }

    /// Back to the top; used on snippet change and explicit reset.
    pub fn reset(&mut self) {
        self.first_line = 0;
    }

    /// Line index range `[first, end)` to display, bounded by the target.
    pub fn visible_range(&self, total_lines: usize) -> std::ops::Range<usize> {
        let first = self.first_line.min(total_lines.saturating_sub(self.size));
        first..total_lines.min(first + self.size)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_VISIBLE_LINES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_stays_put_when_cursor_inside() {
        assert_eq!(compute_window(50, 10, 0, 0), 0);
        assert_eq!(compute_window(50, 10, 5, 0), 0);
        // row 9 (first + N - 1) triggers the advance; 8 is still inside
        assert_eq!(compute_window(50, 10, 8, 0), 0);
    }

    #[test]
    fn test_window_advances_one_line_at_last_visible_row() {
        // cursor reaching row first+N-1 advances the window by one
        assert_eq!(compute_window(50, 10, 9, 0), 1);
        assert_eq!(compute_window(50, 10, 10, 1), 2);
    }

    #[test]
    fn test_window_clamps_at_bottom() {
        // 12 lines, window of 10: max first line is 2
        assert_eq!(compute_window(12, 10, 11, 2), 2);
        assert_eq!(compute_window(12, 10, 11, 5), 2);
    }

    #[test]
    fn test_window_with_fewer_lines_than_size() {
        assert_eq!(compute_window(3, 10, 2, 0), 0);
        assert_eq!(compute_window(3, 10, 2, 7), 0);
        assert_eq!(compute_window(0, 10, 0, 0), 0);
    }

    #[test]
    fn test_window_never_scrolls_backward() {
        // cursor back at the top leaves the window where it was
        assert_eq!(compute_window(50, 10, 0, 5), 5);
    }

    #[test]
    fn test_window_bound_invariant() {
        for total in 0..30 {
            for size in 1..12 {
                for cursor in 0..30 {
                    for prev in 0..30 {
                        let first = compute_window(total, size, cursor, prev);
                        assert!(first <= total.saturating_sub(size));
                    }
                }
            }
        }
    }

    #[test]
    fn test_viewport_observe_and_reset() {
        let mut vp = Viewport::new(10);
        vp.observe_cursor(50, 9);
        assert_eq!(vp.first_line, 1);
        vp.observe_cursor(50, 10);
        assert_eq!(vp.first_line, 2);
        vp.reset();
        assert_eq!(vp.first_line, 0);
    }

    #[test]
    fn test_visible_range() {
        let vp = Viewport {
            first_line: 2,
            size: 10,
        };
        assert_eq!(vp.visible_range(50), 2..12);
        assert_eq!(vp.visible_range(5), 0..5);

        let top = Viewport::new(10);
        assert_eq!(top.visible_range(3), 0..3);
    }
}
