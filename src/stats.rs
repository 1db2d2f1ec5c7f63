/// Live statistics derived from a typing session.
///
/// Always recomputed from the target/input pair; never stored as an
/// independent source of truth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TypingStats {
    pub wpm: u64,
    /// 0-100, rounded
    pub accuracy: u64,
    pub errors: usize,
    /// seconds
    pub time_elapsed: u64,
    /// 0-100, unrounded
    pub progress: f64,
}

impl TypingStats {
    /// Compute stats for `input` typed against `target` in `elapsed_secs`.
    ///
    /// A word is the standard 5 characters, not a lexical word. All
    /// positions are counted in chars, since passages are multilingual.
    pub fn compute(target: &str, input: &str, elapsed_secs: u64) -> Self {
        let typed = input.chars().count();
        let target_len = target.chars().count();

        let errors = input
            .chars()
            .zip(target.chars())
            .filter(|(typed, expected)| typed != expected)
            .count();

        let wpm = if elapsed_secs == 0 {
            0
        } else {
            let words = typed as f64 / 5.0;
            let minutes = elapsed_secs as f64 / 60.0;
            (words / minutes).round() as u64
        };

        let accuracy = if typed == 0 {
            100
        } else {
            let pct = ((typed - errors) as f64 / typed as f64) * 100.0;
            pct.round().max(0.0) as u64
        };

        let progress = if target_len == 0 {
            0.0
        } else {
            (typed as f64 / target_len as f64) * 100.0
        };

        Self {
            wpm,
            accuracy,
            errors,
            time_elapsed: elapsed_secs,
            progress,
        }
    }
}
