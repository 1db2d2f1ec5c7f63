use polytype::session::{Event, Phase, Session};
use polytype::sound::CueKind;

fn typed(session: Session, c: char) -> Session {
    let mut candidate = session.accepted_input.clone();
    candidate.push(c);
    session.apply(Event::Input(candidate)).session
}

fn load(text: &str) -> Session {
    Session::default()
        .apply(Event::RequestText)
        .session
        .apply(Event::TextResolved(text.to_string()))
        .session
}

#[test]
fn full_session_lifecycle() {
    // load -> type through -> auto finish -> restart -> new text
    let mut session = load("cat");
    assert_eq!(session.phase, Phase::Idle);
    assert_eq!(session.target_text, "cat");

    for c in "cat".chars() {
        session = typed(session, c);
    }
    assert_eq!(session.phase, Phase::Finished);
    assert_eq!(session.stats().progress, 100.0);
    assert_eq!(session.stats().accuracy, 100);

    let session = session.apply(Event::Restart).session;
    assert_eq!(session.phase, Phase::Idle);
    assert_eq!(session.target_text, "cat");
    assert!(session.accepted_input.is_empty());

    let session = session.apply(Event::RequestText).session;
    assert_eq!(session.phase, Phase::Loading);
    let session = session.apply(Event::TextResolved("dog".to_string())).session;
    assert_eq!(session.target_text, "dog");
}

#[test]
fn manual_finish_keeps_partial_stats() {
    let mut session = load("cat");
    session = typed(session, 'c');
    session = session.apply(Event::Tick).session;
    session = session.apply(Event::Tick).session;

    let finished = session.apply(Event::Finish).session;
    assert_eq!(finished.phase, Phase::Finished);

    let stats = finished.stats();
    assert!((stats.progress - 100.0 / 3.0).abs() < 1e-9);
    assert_eq!(stats.time_elapsed, 2);
    assert_eq!(stats.errors, 0);

    // no further ticking counts
    let after = finished.apply(Event::Tick).session;
    assert_eq!(after.elapsed_secs, 2);
}

#[test]
fn rejections_never_mutate_the_buffer() {
    let mut session = load("hello");
    for c in "hel".chars() {
        session = typed(session, c);
    }

    let candidates = ["he", "", "hex", "xel", "hello world"];
    for candidate in candidates {
        let step = session.apply(Event::Input(candidate.to_string()));
        assert_eq!(step.session.accepted_input, "hel", "candidate {candidate:?}");
        assert_eq!(step.session.phase, Phase::Playing);
    }
}

#[test]
fn mistakes_are_permanent_but_session_completes() {
    let mut session = load("abc");
    session = typed(session, 'a');
    session = typed(session, 'x');

    // no way back: the wrong char stays
    let fix = session.apply(Event::Input("ab".to_string()));
    assert_eq!(fix.session.accepted_input, "ax");
    assert_eq!(fix.cues, vec![CueKind::Error]);

    session = typed(session, 'c');
    assert_eq!(session.phase, Phase::Finished);
    assert_eq!(session.stats().errors, 1);
    assert_eq!(session.stats().accuracy, 67);
}

#[test]
fn loading_ignores_keystrokes_and_commands() {
    let loading = Session::default().apply(Event::RequestText).session;

    let step = loading.apply(Event::Input("x".to_string()));
    assert_eq!(step.session.phase, Phase::Loading);
    assert!(step.cues.is_empty());

    assert_eq!(loading.apply(Event::Finish).session.phase, Phase::Loading);
    assert_eq!(loading.apply(Event::Restart).session.phase, Phase::Loading);
    assert_eq!(loading.apply(Event::Tick).session.elapsed_secs, 0);
}

#[test]
fn empty_target_defines_progress_zero_and_never_finishes() {
    let session = load("");
    assert_eq!(session.stats().progress, 0.0);

    let step = session.apply(Event::Input("anything".to_string()));
    assert_eq!(step.session.phase, Phase::Idle);
    assert!(step.session.accepted_input.is_empty());
}

#[test]
fn fallback_message_is_typeable_content() {
    use polytype::generator::{fallback_text, Language};

    let fallback = fallback_text(Language::German);
    let mut session = load(&fallback);
    assert_eq!(session.phase, Phase::Idle);

    for c in fallback.chars().take(5) {
        session = typed(session, c);
    }
    assert_eq!(session.phase, Phase::Playing);
    assert_eq!(session.stats().errors, 0);
}

#[test]
fn multibyte_passage_roundtrip() {
    let target = "père noël";
    let mut session = load(target);
    for c in target.chars() {
        session = typed(session, c);
    }
    assert_eq!(session.phase, Phase::Finished);
    assert_eq!(session.stats().errors, 0);
    assert_eq!(session.stats().accuracy, 100);
}
