use std::fmt;

/// Formats elapsed seconds as MM:SS (minutes unpadded, seconds zero-padded).
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    let mins = total / 60;
    let secs = total % 60;
    format!("{mins}:{secs:02}")
}

/// Standard WPM: words (chars / 5) per elapsed minute, rounded to nearest.
/// Returns 0 for non-positive elapsed time rather than dividing by zero.
pub fn calculate_wpm(char_count: usize, time_in_seconds: f64) -> u32 {
    if time_in_seconds <= 0.0 {
        return 0;
    }
    let minutes = time_in_seconds / 60.0;
    ((char_count as f64 / 5.0) / minutes).round() as u32
}

/// Header indicator shown next to the WPM figure. Paused and completed take
/// priority; otherwise the indicator is a speed band derived from the live WPM.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusIndicator {
    Paused,
    Completed,
    Blazing,
    Fast,
    Quick,
    Steady,
    WarmingUp,
}

impl StatusIndicator {
    pub fn from_state(wpm: u32, paused: bool, completed: bool) -> Self {
        if paused {
            Self::Paused
        } else if completed {
            Self::Completed
        } else if wpm > 80 {
            Self::Blazing
        } else if wpm > 60 {
            Self::Fast
        } else if wpm > 40 {
            Self::Quick
        } else if wpm > 20 {
            Self::Steady
        } else {
            Self::WarmingUp
        }
    }
}

impl fmt::Display for StatusIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Paused => "paused",
            Self::Completed => "done!",
            Self::Blazing => "blazing",
            Self::Fast => "fast",
            Self::Quick => "quick",
            Self::Steady => "steady",
            Self::WarmingUp => "warming up",
        };
        write!(f, "{label}")
    }
}
