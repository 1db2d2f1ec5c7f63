use std::io::{self, Write};

/// Three-way classification of an input event, consumed by the audio
/// collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CueKind {
    Correct,
    Error,
    /// A blocked deletion or navigation attempt.
    Delete,
}

/// Fire-and-forget audio feedback. Implementations must swallow their
/// own failures; an unavailable audio path is never the core's problem.
pub trait SoundCue {
    fn play(&self, kind: CueKind);
}

/// No feedback at all.
pub struct Silent;

impl SoundCue for Silent {
    fn play(&self, _kind: CueKind) {}
}

/// Terminal-bell feedback: silent on correct keystrokes, BEL on errors
/// and blocked attempts.
pub struct TerminalBell;

impl SoundCue for TerminalBell {
    fn play(&self, kind: CueKind) {
        match kind {
            CueKind::Correct => {}
            CueKind::Error | CueKind::Delete => {
                let mut stdout = io::stdout();
                let _ = stdout.write_all(b"\x07");
                let _ = stdout.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_accepts_every_kind() {
        let sound = Silent;
        sound.play(CueKind::Correct);
        sound.play(CueKind::Error);
        sound.play(CueKind::Delete);
    }

    #[test]
    fn test_bell_never_panics() {
        let sound = TerminalBell;
        sound.play(CueKind::Correct);
        sound.play(CueKind::Error);
        sound.play(CueKind::Delete);
    }
}
