//! Value-level enforcement of the no-correction policy.
//!
//! Every change to the typed buffer arrives here as a full candidate
//! string and is either accepted as a literal prefix-extension of what
//! was already accepted, or rejected outright. Deletion and navigation
//! keys are intercepted before they can produce a candidate (see
//! `keyboard::is_blocked`), but this check stays authoritative because
//! input surfaces can mutate a buffer through other paths.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// Candidate is shorter than the accepted input: a deletion attempt.
    Shrink,
    /// Candidate does not extend the accepted input as a literal prefix:
    /// a mid-text edit attempt.
    Divergence,
    /// Candidate is longer than the target text. Callers must clamp
    /// input production; the guard refuses rather than truncates.
    Overshoot,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Verdict {
    Accept {
        input: String,
        /// One entry per character appended beyond the old length,
        /// in order.
        outcomes: Vec<Outcome>,
    },
    Reject(RejectReason),
}

/// Validate `candidate` as the next accepted input, given the current
/// `accepted` buffer and the `target` text.
///
/// A candidate identical to `accepted` is an empty accept: a
/// zero-length extension producing no outcomes.
pub fn validate(accepted: &str, candidate: &str, target: &str) -> Verdict {
    let accepted_len = accepted.chars().count();
    let candidate_len = candidate.chars().count();

    if candidate_len < accepted_len {
        return Verdict::Reject(RejectReason::Shrink);
    }

    if !candidate.starts_with(accepted) {
        return Verdict::Reject(RejectReason::Divergence);
    }

    if candidate_len > target.chars().count() {
        return Verdict::Reject(RejectReason::Overshoot);
    }

    let outcomes = candidate
        .chars()
        .zip(target.chars())
        .skip(accepted_len)
        .map(|(typed, expected)| {
            if typed == expected {
                Outcome::Correct
            } else {
                Outcome::Incorrect
            }
        })
        .collect();

    Verdict::Accept {
        input: candidate.to_string(),
        outcomes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_accepts_single_char_extension() {
        let verdict = validate("ca", "cat", "cat");
        assert_eq!(
            verdict,
            Verdict::Accept {
                input: "cat".to_string(),
                outcomes: vec![Outcome::Correct],
            }
        );
    }

    #[test]
    fn test_accepts_from_empty() {
        let verdict = validate("", "c", "cat");
        assert_matches!(verdict, Verdict::Accept { ref input, ref outcomes }
            if input == "c" && outcomes == &[Outcome::Correct]);
    }

    #[test]
    fn test_classifies_wrong_char() {
        let verdict = validate("ca", "cax", "cat");
        assert_matches!(verdict, Verdict::Accept { ref outcomes, .. }
            if outcomes == &[Outcome::Incorrect]);
    }

    #[test]
    fn test_multi_char_extension_orders_outcomes() {
        // paste-like extension of three chars, middle one wrong
        let verdict = validate("c", "cxt", "cat");
        assert_matches!(verdict, Verdict::Accept { ref outcomes, .. }
            if outcomes == &[Outcome::Incorrect, Outcome::Correct]);
    }

    #[test]
    fn test_identical_candidate_is_empty_accept() {
        let verdict = validate("ca", "ca", "cat");
        assert_eq!(
            verdict,
            Verdict::Accept {
                input: "ca".to_string(),
                outcomes: vec![],
            }
        );
    }

    #[test]
    fn test_rejects_shrink() {
        assert_eq!(
            validate("cat", "ca", "cat"),
            Verdict::Reject(RejectReason::Shrink)
        );
        assert_eq!(
            validate("c", "", "cat"),
            Verdict::Reject(RejectReason::Shrink)
        );
    }

    #[test]
    fn test_rejects_divergence() {
        assert_eq!(
            validate("ca", "cx", "cat"),
            Verdict::Reject(RejectReason::Divergence)
        );
        // same length, different content
        assert_eq!(
            validate("ca", "xa", "cat"),
            Verdict::Reject(RejectReason::Divergence)
        );
    }

    #[test]
    fn test_rejects_overshoot() {
        assert_eq!(
            validate("cat", "cats", "cat"),
            Verdict::Reject(RejectReason::Overshoot)
        );
        // empty target never accepts content
        assert_eq!(
            validate("", "x", ""),
            Verdict::Reject(RejectReason::Overshoot)
        );
    }

    #[test]
    fn test_monotone_extension_sequence() {
        let target = "hello";
        let steps = ["h", "he", "hel", "hell", "hello"];
        let mut accepted = String::new();
        for step in steps {
            match validate(&accepted, step, target) {
                Verdict::Accept { input, outcomes } => {
                    assert_eq!(outcomes.len(), 1);
                    accepted = input;
                }
                verdict => panic!("expected accept, got {verdict:?}"),
            }
        }
        assert_eq!(accepted, "hello");
    }

    #[test]
    fn test_wrong_chars_still_accepted_in_order() {
        // the policy forbids corrections, not mistakes
        let verdict = validate("", "hxllo", "hello");
        assert_matches!(verdict, Verdict::Accept { ref outcomes, .. }
            if outcomes
                == &[
                    Outcome::Correct,
                    Outcome::Incorrect,
                    Outcome::Correct,
                    Outcome::Correct,
                    Outcome::Correct,
                ]);
    }

    #[test]
    fn test_multibyte_prefix_extension() {
        let verdict = validate("caf", "café", "café");
        assert_matches!(verdict, Verdict::Accept { ref outcomes, .. }
            if outcomes == &[Outcome::Correct]);

        assert_eq!(
            validate("café", "cafe", "café"),
            Verdict::Reject(RejectReason::Divergence)
        );
    }
}
