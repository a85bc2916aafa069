use std::sync::mpsc;
use std::time::Duration;

use assert_matches::assert_matches;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use devtype::runtime::{AppEvent, Runner, TestEventSource};
use devtype::session::{Phase, Session};
use devtype::snippet::Snippet;

fn snippet(code: &str) -> Snippet {
    Snippet {
        id: "t1".into(),
        name: "test".into(),
        code: code.into(),
    }
}

fn key(code: KeyCode) -> AppEvent {
    AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

// Headless integration using the internal runtime + Session without a TTY.
// Verifies that a minimal typing flow completes via Runner/TestEventSource.
#[test]
fn headless_typing_flow_completes() {
    let mut session = Session::new(snippet("hi"), 10);

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let runner = Runner::new(es, Duration::from_millis(5));

    tx.send(key(KeyCode::Char('h'))).unwrap();
    tx.send(key(KeyCode::Char('i'))).unwrap();

    for _ in 0..100u32 {
        match runner.step() {
            AppEvent::Tick => session.on_tick(),
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if let KeyCode::Char(c) = key.code {
                    session.type_char(c);
                    if session.phase() == Phase::Completed {
                        break;
                    }
                }
            }
        }
    }

    assert_eq!(session.phase(), Phase::Completed);
    assert!(session.is_exact_match());
}

#[test]
fn headless_multiline_flow_with_enter_and_tab() {
    // target uses a tab-width indent on the second line
    let mut session = Session::new(snippet("if x:\n    y"), 10);

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let runner = Runner::new(es, Duration::from_millis(5));

    for c in "if x:".chars() {
        tx.send(key(KeyCode::Char(c))).unwrap();
    }
    tx.send(key(KeyCode::Enter)).unwrap();
    tx.send(key(KeyCode::Tab)).unwrap();
    tx.send(key(KeyCode::Char('y'))).unwrap();

    for _ in 0..100u32 {
        match runner.step() {
            AppEvent::Tick => session.on_tick(),
            AppEvent::Resize => {}
            AppEvent::Key(key) => match key.code {
                KeyCode::Char(c) => session.type_char(c),
                KeyCode::Enter => session.enter(),
                KeyCode::Tab => session.tab(),
                _ => {}
            },
        }
        if session.phase() == Phase::Completed {
            break;
        }
    }

    assert_eq!(session.phase(), Phase::Completed);
    assert!(session.reconciliation().errors.is_empty());
}

#[test]
fn headless_error_and_fix_cycle() {
    let mut session = Session::new(snippet("ab"), 10);

    session.type_char('a');
    session.type_char('x');
    assert_eq!(session.phase(), Phase::Running);
    assert_eq!(session.reconciliation().errors.len(), 1);

    session.backspace();
    session.type_char('b');

    assert_eq!(session.phase(), Phase::Completed);
    assert!(session.reconciliation().errors.is_empty());
    assert_eq!(session.reconciliation().fixed.len(), 1);
}

#[test]
fn runner_times_out_to_tick_with_no_events() {
    let (_tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    let runner = Runner::new(es, Duration::from_millis(1));

    assert_matches!(runner.step(), AppEvent::Tick);
}

#[test]
fn uploaded_file_drives_a_full_session() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "let x = 1;").unwrap();

    let uploaded = Snippet::from_file(file.path()).unwrap();
    assert!(uploaded.id.starts_with("custom-"));

    let mut session = Session::new(uploaded, 10);
    for c in "let x = 1;".chars() {
        session.type_char(c);
    }

    assert_eq!(session.phase(), Phase::Completed);
}
