use std::fs;

use regex::Regex;
use tempfile::TempDir;
use tracing::Level;

use reordr::config::Config;
use reordr::content::RoundSet;
use reordr::engine::pointer::DropSlot;
use reordr::engine::tokenize::tokenize;
use reordr::engine::{DragStyle, Granularity, MoveRequest, Point, Rect};
use reordr::error::{GestureError, SessionError, ValidationError};
use reordr::session::game::{Phase, Rules, Session};
use reordr::session::result::{Advance, FeedbackKind};
use reordr::session::round::Verdict;

const PARAGRAPH: &str = "A Terra é o terceiro planeta. Ela gira em torno do Sol! Você sabia disso? A Lua é o seu satélite.";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::DEBUG)
        .try_init();
}

/// Moves each truth unit into place from left to right.
fn solve(session: &mut Session) {
    let truth = session.current_round().unwrap().truth.clone();
    for (target, unit) in truth.iter().enumerate() {
        let live = session.state().live;
        let from = target + live[target..].iter().position(|u| u == unit).unwrap();
        if from != target {
            session.move_unit(from, target).unwrap();
        }
    }
}

/// Unit rectangles for a stacked sentence board: one row each, a row apart.
fn stacked_bounds(count: usize) -> Vec<Rect> {
    (0..count)
        .map(|i| Rect::new(0.0, i as f32 * 2.0, 60.0, 1.0))
        .collect()
}

#[test]
fn sentence_tokenizer_matches_regex_split() {
    let boundary = Regex::new(r"[.?!]\s+").unwrap();
    let texts = [
        PARAGRAPH,
        "  Leading space. Trailing space!   ",
        "No terminal punctuation at all",
        "Wait... what?  Two  spaces.\nNew line!",
        "Version 1.5 is out. Really",
    ];
    for text in texts {
        let trimmed = text.trim();
        let mut expected = Vec::new();
        let mut last = 0;
        for m in boundary.find_iter(trimmed) {
            expected.push(trimmed[last..m.start() + 1].to_string());
            last = m.end();
        }
        if last < trimmed.len() {
            expected.push(trimmed[last..].to_string());
        }
        assert_eq!(tokenize(text, Granularity::Sentence), expected, "text: {text:?}");
    }
}

#[test]
fn full_single_text_game() {
    init_tracing();
    let mut session = Session::with_seed(Rules::default(), 2024);
    assert_eq!(session.phase(), Phase::Input);

    let started = session.submit_text(PARAGRAPH, Granularity::Sentence).unwrap();
    assert_eq!(started.round_count, 1);
    let state = session.state();
    assert_eq!(state.phase, Phase::Playing);
    assert_eq!(state.live.len(), 4);
    let truth = session.current_round().unwrap().truth.clone();
    assert_ne!(state.live, truth.as_slice());

    let wrong = session.verify_current().unwrap();
    assert!(!wrong.correct);
    assert_eq!(session.state().feedback.unwrap().kind, FeedbackKind::Incorrect);

    solve(&mut session);
    assert!(session.verify_current().unwrap().correct);
    assert_eq!(session.score(), 1);
    assert_eq!(session.state().verdict, Verdict::Correct);

    let Advance::Finished(summary) = session.advance_round().unwrap() else {
        panic!("a single text is one round");
    };
    assert_eq!((summary.score, summary.total), (1, 1));
    assert_eq!(summary.attempts, vec![2]);
    assert_eq!(summary.first_try(), 0);
    assert_eq!(session.phase(), Phase::Finished);

    session.restart().unwrap();
    assert_eq!(session.score(), 0);
    session.exit().unwrap();
    assert_eq!(session.phase(), Phase::Input);
    assert_eq!(session.last_text(), PARAGRAPH);
}

#[test]
fn bundled_phrase_set_plays_every_round() {
    init_tracing();
    let set = RoundSet::bundled("proverbs").unwrap();
    assert_eq!(set.granularity, Granularity::Word);

    let mut session = Session::with_seed(Rules::default(), 1);
    let started = session.submit_set(&set).unwrap();
    assert_eq!(started.round_count, set.texts.len());

    let mut finished = None;
    for round in 0..set.texts.len() {
        assert_eq!(session.state().round_index, round);
        solve(&mut session);
        assert!(session.verify_current().unwrap().correct);
        match session.advance_round().unwrap() {
            Advance::Started(next) => assert_eq!(next.round_index, round + 1),
            Advance::Finished(summary) => finished = Some(summary),
        }
    }
    let summary = finished.expect("game should finish after the last round");
    assert_eq!(summary.score, set.texts.len());
    assert_eq!(summary.percent(), 100.0);
    assert_eq!(
        session.state().feedback.unwrap().message,
        format!("Game over! Final score: {0}/{0}", set.texts.len())
    );
}

#[test]
fn tracked_gesture_moves_first_unit_to_third() {
    init_tracing();
    let mut session = Session::with_seed(Rules::default(), 8);
    session.submit_text(PARAGRAPH, Granularity::Sentence).unwrap();
    let before = session.state().live.to_vec();
    let bounds = stacked_bounds(before.len());
    let container = Point::new(0.0, 0.0);

    session
        .begin_drag(DragStyle::Tracked, 0, Point::new(5.0, 0.5), bounds[0], container)
        .unwrap();
    let feedback = session.update_drag(Point::new(20.0, 4.5), &bounds).unwrap();
    assert_eq!(feedback.slot, Some(DropSlot::At(2)));
    assert_eq!(feedback.visual_offset, Some(Point::new(15.0, 4.0)));

    let request = session.end_drag(Point::new(20.0, 4.5), &bounds).unwrap();
    assert_eq!(request, Some(MoveRequest { from: 0, to: 2 }));

    let live = session.state().live;
    assert_eq!(live[2], before[0]);
    assert_eq!(live[0], before[1]);
    assert_eq!(live[1], before[2]);
    assert_eq!(live[3], before[3]);
    assert_eq!(session.state().dragging, None);
}

#[test]
fn release_past_the_last_unit_appends() {
    let mut session = Session::with_seed(Rules::default(), 8);
    session
        .submit_text("one two three four five", Granularity::Word)
        .unwrap();
    let before = session.state().live.to_vec();
    let bounds: Vec<Rect> = (0..5)
        .map(|i| Rect::new(i as f32 * 8.0, 0.0, 7.0, 1.0))
        .collect();

    session
        .begin_drag(DragStyle::Tracked, 1, Point::new(9.0, 0.5), bounds[1], Point::default())
        .unwrap();
    // Below the row, right of the last chip.
    let request = session.end_drag(Point::new(50.0, 3.0), &bounds).unwrap();
    assert_eq!(request, Some(MoveRequest { from: 1, to: 4 }));
    assert_eq!(session.state().live[4], before[1]);
}

#[test]
fn release_nowhere_and_cancel_leave_order_alone() {
    let mut session = Session::with_seed(Rules::default(), 8);
    session.submit_text(PARAGRAPH, Granularity::Sentence).unwrap();
    let before = session.state().live.to_vec();
    let bounds = stacked_bounds(before.len());

    session
        .begin_drag(DragStyle::Tracked, 1, Point::new(1.0, 2.5), bounds[1], Point::default())
        .unwrap();
    // Between rows and left of the last rect's right edge: no slot.
    assert_eq!(session.end_drag(Point::new(10.0, 1.5), &bounds).unwrap(), None);
    assert_eq!(session.state().live, before.as_slice());

    session
        .begin_drag(DragStyle::Tracked, 3, Point::new(1.0, 6.5), bounds[3], Point::default())
        .unwrap();
    assert!(session.cancel_drag());
    assert!(!session.cancel_drag());
    assert_eq!(session.state().live, before.as_slice());
    assert_eq!(
        session.end_drag(Point::default(), &bounds).unwrap_err(),
        SessionError::Gesture(GestureError::NotActive)
    );
}

#[test]
fn second_drag_is_refused_while_one_is_active() {
    let mut session = Session::with_seed(Rules::default(), 8);
    session.submit_text(PARAGRAPH, Granularity::Sentence).unwrap();
    let bounds = stacked_bounds(4);
    session
        .begin_drag(DragStyle::Direct, 0, Point::default(), bounds[0], Point::default())
        .unwrap();
    let err = session
        .begin_drag(DragStyle::Direct, 1, Point::default(), bounds[1], Point::default())
        .unwrap_err();
    assert_eq!(err, SessionError::Gesture(GestureError::AlreadyActive));
    assert_eq!(session.state().dragging, Some(0));
}

#[test]
fn rejected_input_reports_and_stays_in_input() {
    let mut session = Session::with_seed(Rules::default(), 3);
    let err = session.submit_text("   ", Granularity::Sentence).unwrap_err();
    assert_eq!(
        err,
        SessionError::Validation(ValidationError::TooShort { len: 0, min: 20 })
    );
    assert_eq!(session.phase(), Phase::Input);
    let feedback = session.state().feedback.unwrap();
    assert_eq!(feedback.kind, FeedbackKind::Error);
    assert!(feedback.message.contains("too short"));
}

#[test]
fn config_file_drives_rules() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "min_chars = 5\nmax_rounds = 3\nshuffle_policy = \"uniform\"\n",
    )
    .unwrap();
    let config = Config::load_from(&path).unwrap();
    let rules = config.rules();
    assert_eq!(rules.min_chars, 5);
    assert_eq!(rules.max_rounds, 3);

    let mut session = Session::with_seed(rules, 4);
    assert!(session.submit_text("Hi. Yo.", Granularity::Sentence).is_ok());
    session.exit().unwrap();

    let err = session
        .submit_rounds(&["a b", "c d", "e f", "g h"], Granularity::Word)
        .unwrap_err();
    assert_eq!(
        err,
        SessionError::Validation(ValidationError::TooManyRounds { found: 4, max: 3 })
    );
}

#[test]
fn user_set_file_plays() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("mine.json"),
        r#"{"granularity": "word", "texts": ["red green blue", "one two three"]}"#,
    )
    .unwrap();
    let set = RoundSet::resolve("mine", Some(dir.path())).unwrap();
    assert_eq!(set.name, "mine");

    let mut session = Session::with_seed(Rules::default(), 6);
    assert_eq!(session.submit_set(&set).unwrap().round_count, 2);
    assert_eq!(session.state().live.len(), 3);
}
