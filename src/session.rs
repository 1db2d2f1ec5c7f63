//! The session state machine.
//!
//! A `Session` is an immutable value; `apply` is a reducer producing
//! the next value plus the sound cues the step emitted. The binary's
//! event loop replaces its session with the reducer output on every
//! event, which keeps the machine testable without a terminal.

use std::time::SystemTime;

use crate::guard::{self, Outcome, RejectReason, Verdict};
use crate::sound::CueKind;
use crate::stats::TypingStats;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Playing,
    Finished,
}

/// External events the machine reacts to. `Input` carries the full
/// candidate buffer, not a delta; the guard decides what it means.
#[derive(Clone, Debug)]
pub enum Event {
    RequestText,
    TextResolved(String),
    Input(String),
    Tick,
    Finish,
    Restart,
}

#[derive(Clone, Debug)]
pub struct Session {
    pub phase: Phase,
    pub target_text: String,
    pub accepted_input: String,
    pub started_at: Option<SystemTime>,
    pub elapsed_secs: u64,
}

/// Reducer output: the next session value and the cues this step
/// produced, in order.
#[derive(Clone, Debug)]
pub struct Transition {
    pub session: Session,
    pub cues: Vec<CueKind>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            target_text: String::new(),
            accepted_input: String::new(),
            started_at: None,
            elapsed_secs: 0,
        }
    }
}

impl Session {
    /// Apply one event, yielding the next session value. Events that
    /// make no sense in the current phase are no-ops, never errors.
    pub fn apply(&self, event: Event) -> Transition {
        match event {
            Event::RequestText => self.on_request_text(),
            Event::TextResolved(text) => self.on_text_resolved(text),
            Event::Input(candidate) => self.on_input(candidate),
            Event::Tick => self.on_tick(),
            Event::Finish => self.on_finish(),
            Event::Restart => self.on_restart(),
        }
    }

    fn on_request_text(&self) -> Transition {
        match self.phase {
            Phase::Idle | Phase::Finished => Transition::silent(Session {
                phase: Phase::Loading,
                target_text: self.target_text.clone(),
                accepted_input: String::new(),
                started_at: None,
                elapsed_secs: 0,
            }),
            Phase::Loading | Phase::Playing => Transition::silent(self.clone()),
        }
    }

    fn on_text_resolved(&self, text: String) -> Transition {
        match self.phase {
            Phase::Loading => Transition::silent(Session {
                phase: Phase::Idle,
                target_text: text,
                accepted_input: String::new(),
                started_at: None,
                elapsed_secs: 0,
            }),
            // A resolution arriving outside Loading is stale; drop it.
            _ => Transition::silent(self.clone()),
        }
    }

    fn on_input(&self, candidate: String) -> Transition {
        match self.phase {
            Phase::Idle | Phase::Playing => {}
            // Loading: keystrokes are no-ops. Finished: input channel
            // is disabled entirely.
            Phase::Loading | Phase::Finished => return Transition::silent(self.clone()),
        }

        match guard::validate(&self.accepted_input, &candidate, &self.target_text) {
            Verdict::Accept { input, outcomes } => {
                let cues = outcomes
                    .iter()
                    .map(|outcome| match outcome {
                        Outcome::Correct => CueKind::Correct,
                        Outcome::Incorrect => CueKind::Error,
                    })
                    .collect();

                let started = self.phase == Phase::Playing || !input.is_empty();
                let started_at = match self.started_at {
                    Some(at) => Some(at),
                    None if started => Some(SystemTime::now()),
                    None => None,
                };

                let complete = !self.target_text.is_empty()
                    && input.chars().count() == self.target_text.chars().count();

                let phase = if complete {
                    Phase::Finished
                } else if started {
                    Phase::Playing
                } else {
                    Phase::Idle
                };

                Transition {
                    session: Session {
                        phase,
                        target_text: self.target_text.clone(),
                        accepted_input: input,
                        started_at,
                        elapsed_secs: self.elapsed_secs,
                    },
                    cues,
                }
            }
            Verdict::Reject(RejectReason::Shrink) | Verdict::Reject(RejectReason::Divergence) => {
                Transition {
                    session: self.clone(),
                    cues: vec![CueKind::Error],
                }
            }
            // Overshoot is the caller failing to clamp; discard quietly.
            Verdict::Reject(RejectReason::Overshoot) => Transition::silent(self.clone()),
        }
    }

    fn on_tick(&self) -> Transition {
        match self.phase {
            Phase::Playing => {
                let mut next = self.clone();
                next.elapsed_secs += 1;
                Transition::silent(next)
            }
            _ => Transition::silent(self.clone()),
        }
    }

    fn on_finish(&self) -> Transition {
        match self.phase {
            Phase::Playing => {
                let mut next = self.clone();
                next.phase = Phase::Finished;
                Transition::silent(next)
            }
            _ => Transition::silent(self.clone()),
        }
    }

    fn on_restart(&self) -> Transition {
        match self.phase {
            Phase::Idle | Phase::Finished => Transition::silent(Session {
                phase: Phase::Idle,
                target_text: self.target_text.clone(),
                accepted_input: String::new(),
                started_at: None,
                elapsed_secs: 0,
            }),
            Phase::Loading | Phase::Playing => Transition::silent(self.clone()),
        }
    }

    /// The character the user is expected to type next, if any.
    pub fn next_expected_char(&self) -> Option<char> {
        let pos = self.accepted_input.chars().count();
        self.target_text.chars().nth(pos)
    }

    pub fn stats(&self) -> TypingStats {
        TypingStats::compute(&self.target_text, &self.accepted_input, self.elapsed_secs)
    }

    pub fn is_complete(&self) -> bool {
        !self.target_text.is_empty()
            && self.accepted_input.chars().count() == self.target_text.chars().count()
    }
}

impl Transition {
    fn silent(session: Session) -> Self {
        Self {
            session,
            cues: Vec::new(),
        }
    }
}
