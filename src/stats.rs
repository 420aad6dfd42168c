use std::time::Duration;

/// Minimum accuracy (as a fraction) required to pass.
pub const PASS_ACCURACY: f64 = 0.95;

/// Characters per "word" in the WPM formula.
const CHARS_PER_WORD: f64 = 5.0;

/// Words per minute for `typed_len` characters over `elapsed_secs`.
/// Zero when no time has passed.
pub fn wpm(typed_len: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    (typed_len as f64 / CHARS_PER_WORD) / (elapsed_secs / 60.0)
}

/// Fraction of typed positions matching the target, relative to what has been
/// typed so far (not to the whole target). `None` for empty input.
pub fn accuracy(target: &str, typed: &[char]) -> Option<f64> {
    if typed.is_empty() {
        return None;
    }
    let matches = target
        .chars()
        .zip(typed.iter())
        .filter(|(expected, actual)| expected == *actual)
        .count();
    Some(matches as f64 / typed.len() as f64)
}

/// Live statistics derived from the input; never stored between redraws.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub wpm: f64,
    pub accuracy: Option<f64>,
    pub typed_len: usize,
    pub elapsed: Duration,
}

impl Metrics {
    pub fn compute(target: &str, typed: &[char], elapsed: Duration) -> Self {
        Self {
            wpm: wpm(typed.len(), elapsed.as_secs_f64()),
            accuracy: accuracy(target, typed),
            typed_len: typed.len(),
            elapsed,
        }
    }

    /// Accuracy as a percentage string, or a placeholder before the first keystroke.
    pub fn accuracy_label(&self) -> String {
        match self.accuracy {
            Some(acc) => format!("{:.1}%", acc * 100.0),
            None => "--".to_string(),
        }
    }
}

/// Final outcome of one attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TestResult {
    pub wpm: f64,
    pub accuracy: f64,
    pub goal: u32,
    pub passed: bool,
}

impl TestResult {
    pub fn new(metrics: &Metrics, goal: u32) -> Self {
        let accuracy = metrics.accuracy.unwrap_or(0.0);
        Self {
            wpm: metrics.wpm,
            accuracy,
            goal,
            passed: metrics.wpm >= goal as f64 && accuracy >= PASS_ACCURACY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_wpm_zero_elapsed() {
        assert_eq!(wpm(0, 0.0), 0.0);
        assert_eq!(wpm(250, 0.0), 0.0);
        assert_eq!(wpm(250, -1.0), 0.0);
    }

    #[test]
    fn test_wpm_formula() {
        assert_eq!(wpm(200, 60.0), 40.0);
        assert_eq!(wpm(100, 30.0), 40.0);
        assert_eq!(wpm(50, 120.0), 5.0);
    }

    #[test]
    fn test_accuracy_partial_mismatch() {
        let acc = accuracy("abc", &chars("abd")).unwrap();
        assert!((acc - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_accuracy_is_prefix_relative() {
        assert_eq!(accuracy("abcdef", &chars("ab")), Some(1.0));
    }

    #[test]
    fn test_accuracy_empty_input() {
        assert_eq!(accuracy("abc", &[]), None);
    }

    #[test]
    fn test_metrics_accuracy_label() {
        let empty = Metrics::compute("abc", &[], Duration::from_secs(1));
        assert_eq!(empty.accuracy_label(), "--");

        let half = Metrics::compute("ab", &chars("ax"), Duration::from_secs(1));
        assert_eq!(half.accuracy_label(), "50.0%");
    }

    #[test]
    fn test_pass_on_wpm_boundary() {
        let target = "a".repeat(200);
        let typed = chars(&target);
        let metrics = Metrics::compute(&target, &typed, Duration::from_secs(60));
        assert_eq!(metrics.wpm, 40.0);

        let result = TestResult::new(&metrics, 40);
        assert!(result.passed);
    }

    #[test]
    fn test_fail_on_accuracy_at_goal_wpm() {
        let target = "a".repeat(200);
        let mut typed = chars(&target);
        for c in typed.iter_mut().take(11) {
            *c = 'b';
        }
        let metrics = Metrics::compute(&target, &typed, Duration::from_secs(60));
        let result = TestResult::new(&metrics, 40);
        assert!(result.accuracy < PASS_ACCURACY);
        assert!(!result.passed);
    }

    #[test]
    fn test_accuracy_threshold_inclusive() {
        let target = "a".repeat(200);
        let mut typed = chars(&target);
        for c in typed.iter_mut().take(10) {
            *c = 'b';
        }
        let metrics = Metrics::compute(&target, &typed, Duration::from_secs(60));
        let result = TestResult::new(&metrics, 40);
        assert_eq!(result.accuracy, 0.95);
        assert!(result.passed);
    }

    #[test]
    fn test_fail_below_goal() {
        let target = "a".repeat(200);
        let typed = chars(&target);
        let metrics = Metrics::compute(&target, &typed, Duration::from_secs(61));
        assert!(!TestResult::new(&metrics, 40).passed);
    }
}
