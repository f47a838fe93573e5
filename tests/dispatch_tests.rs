use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use niii::core::state::RunState;
use niii::core::watcher::WatchEvent;
use niii::tui::event::TuiEvent;
use niii::tui::theme::Palette;
use niii::{Dispatcher, Outcome, ResolvedConfig, Session, parse_line};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

/// Creates `<tmp>/irc.example.net/#rust/{in,out}` with the given history
fn session_dir(history: &str) -> (TempDir, PathBuf) {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join("irc.example.net").join("#rust");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("out"), history).unwrap();
    fs::write(dir.join("in"), "").unwrap();
    (root, dir)
}

fn config() -> ResolvedConfig {
    ResolvedConfig {
        colors: false,
        status_bar: true,
        escape_command: "/CLOSE".to_string(),
        ..ResolvedConfig::default()
    }
}

fn dispatcher(dir: &Path, width: u16, height: u16) -> Dispatcher {
    let session = Session::open(dir.to_path_buf()).unwrap();
    Dispatcher::new(
        session,
        &config(),
        Palette::plain(),
        Rect::new(0, 0, width, height),
    )
    .unwrap()
}

fn render(dispatcher: &mut Dispatcher, width: u16, height: u16) -> Buffer {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| dispatcher.draw(f)).unwrap();
    terminal.backend().buffer().clone()
}

fn row(buffer: &Buffer, y: u16) -> String {
    (0..buffer.area.width)
        .map(|x| buffer[(x, y)].symbol().to_string())
        .collect::<String>()
        .trim_end()
        .to_string()
}

fn type_line(dispatcher: &mut Dispatcher, line: &str) {
    for c in line.chars() {
        dispatcher.on_terminal_event(TuiEvent::InputChar(c)).unwrap();
    }
    dispatcher.on_terminal_event(TuiEvent::Submit).unwrap();
}

fn append_out(dir: &Path, lines: &[&str]) {
    let mut out = OpenOptions::new().append(true).open(dir.join("out")).unwrap();
    for line in lines {
        writeln!(out, "{line}").unwrap();
    }
}

fn backend_input(dir: &Path) -> String {
    fs::read_to_string(dir.join("in")).unwrap()
}

// ============================================================================
// Parser examples
// ============================================================================

#[test]
fn test_plain_record_fields() {
    let msg = parse_line("2024-01-01 10:00:00 <alice> hello world\n").unwrap();
    assert_eq!(msg.date, "2024-01-01");
    assert_eq!(msg.time, "10:00:00");
    assert_eq!(msg.nick, "alice");
    assert_eq!(msg.body, "hello world");
}

#[test]
fn test_action_record_fields() {
    let msg = parse_line("2024-01-01 10:00:00 <bob> \u{1}ACTION waves\u{1}\n").unwrap();
    assert_eq!(msg.nick, "*");
    assert_eq!(msg.body, "bob waves");
}

// ============================================================================
// Submissions
// ============================================================================

#[test]
fn test_escape_command_terminates_without_writing() {
    let (_root, dir) = session_dir("");
    let mut d = dispatcher(&dir, 60, 10);

    type_line(&mut d, "/CLOSE");

    assert_eq!(d.app().run_state, RunState::Terminating);
    assert!(!d.is_running());
    assert_eq!(backend_input(&dir), "");
    assert_eq!(d.into_outcome(), Outcome::Closed);
}

#[test]
fn test_escape_command_as_substring_is_sent() {
    let (_root, dir) = session_dir("");
    let mut d = dispatcher(&dir, 60, 10);

    type_line(&mut d, "type /CLOSE to quit");

    assert!(d.is_running());
    assert_eq!(backend_input(&dir), "type /CLOSE to quit\n");
}

#[test]
fn test_empty_submission_writes_nothing_and_clears_prompt() {
    let (_root, dir) = session_dir("");
    let mut d = dispatcher(&dir, 60, 10);

    type_line(&mut d, "");

    assert!(d.is_running());
    assert_eq!(backend_input(&dir), "");
    let screen = render(&mut d, 60, 10);
    assert_eq!(row(&screen, 9), "[#rust]");
}

#[test]
fn test_lines_are_forwarded_in_order() {
    let (_root, dir) = session_dir("");
    let mut d = dispatcher(&dir, 60, 10);

    type_line(&mut d, "hello");
    type_line(&mut d, "/j #other");

    assert_eq!(backend_input(&dir), "hello\n/j #other\n");
    assert_eq!(d.windows().input.buffer, "");
}

#[test]
fn test_quit_key_terminates() {
    let (_root, dir) = session_dir("");
    let mut d = dispatcher(&dir, 60, 10);
    d.on_terminal_event(TuiEvent::Quit).unwrap();
    assert!(!d.is_running());
}

// ============================================================================
// Rendering and redraw
// ============================================================================

#[test]
fn test_startup_replays_history_and_draws_surfaces() {
    let (_root, dir) = session_dir(
        "2024-01-01 10:00:00 <alice> hello world\n\
         2024-01-01 10:00:05 <bob> \u{1}ACTION waves\u{1}\n",
    );
    let mut d = dispatcher(&dir, 60, 6);
    let screen = render(&mut d, 60, 6);

    assert_eq!(row(&screen, 0), "2024-01-01 10:00:00        alice | hello world");
    assert_eq!(row(&screen, 1), "2024-01-01 10:00:05            * | bob waves");
    assert_eq!(row(&screen, 4), "[irc.example.net] [#rust]");
    assert_eq!(row(&screen, 5), "[#rust]");
}

#[test]
fn test_backend_lines_arrive_incrementally() {
    let (_root, dir) = session_dir("d t <a> one\n");
    let mut d = dispatcher(&dir, 40, 6);

    append_out(&dir, &["d t <b> two"]);
    d.on_watch_event(WatchEvent::Changed).unwrap();
    // A spurious wake must not duplicate anything
    d.on_watch_event(WatchEvent::Changed).unwrap();

    assert_eq!(d.windows().transcript().len(), 2);
    let screen = render(&mut d, 40, 6);
    assert!(row(&screen, 0).ends_with("a | one"));
    assert!(row(&screen, 1).ends_with("b | two"));
    assert_eq!(row(&screen, 2), "");
}

#[test]
fn test_redraw_matches_sequential_replay() {
    let (_root, dir) = session_dir("");
    let (width, height) = (30, 8);
    let mut live = dispatcher(&dir, width, height);

    // Feed the history one line at a time, including a malformed one and a
    // body long enough to wrap
    let lines = [
        "2024-01-01 10:00 <alice> hi",
        "broken",
        "2024-01-01 10:01 <bob> \u{1}ACTION waves\u{1}",
        "2024-01-01 10:02 <carol> a rather long message that wraps",
        "2024-01-01 10:03 <dave> x",
        "2024-01-01 10:04 <erin> y",
        "2024-01-01 10:05 <frank> z",
    ];
    for line in lines {
        append_out(&dir, &[line]);
        live.on_watch_event(WatchEvent::Changed).unwrap();
    }
    let incremental = render(&mut live, width, height);

    // Resize to the same size: full replay from byte 0
    live.on_terminal_event(TuiEvent::Resize(width, height)).unwrap();
    let redrawn = render(&mut live, width, height);
    assert_eq!(incremental, redrawn);

    // A fresh session over the same file shows the same thing
    let mut fresh = dispatcher(&dir, width, height);
    assert_eq!(render(&mut fresh, width, height), redrawn);
}

#[test]
fn test_resize_recreates_layout_and_keeps_draft() {
    let (_root, dir) = session_dir("d t <a> one\nd t <a> two\nd t <a> three\n");
    let mut d = dispatcher(&dir, 40, 10);

    for c in "draft".chars() {
        d.on_terminal_event(TuiEvent::InputChar(c)).unwrap();
    }
    d.on_terminal_event(TuiEvent::Resize(40, 4)).unwrap();

    assert_eq!(d.windows().layout().transcript.height, 2);
    assert_eq!(d.windows().transcript().len(), 2);
    let screen = render(&mut d, 40, 4);
    assert!(row(&screen, 0).ends_with("| two"));
    assert!(row(&screen, 1).ends_with("| three"));
    assert_eq!(row(&screen, 3), "[#rust] draft");
}

#[test]
fn test_truncated_out_file_is_replayed() {
    let (_root, dir) = session_dir("d t <a> one\nd t <a> two\n");
    let mut d = dispatcher(&dir, 40, 6);

    fs::write(dir.join("out"), "d t <z> fresh\n").unwrap();
    d.on_watch_event(WatchEvent::Changed).unwrap();

    assert!(d.is_running());
    assert_eq!(d.windows().transcript().len(), 1);
    let screen = render(&mut d, 40, 6);
    assert!(row(&screen, 0).ends_with("z | fresh"));
}

// ============================================================================
// Backend disappearance
// ============================================================================

#[test]
fn test_removed_out_file_terminates_with_notice() {
    let (_root, dir) = session_dir("d t <a> one\n");
    let mut d = dispatcher(&dir, 40, 6);

    fs::remove_file(dir.join("out")).unwrap();
    d.on_watch_event(WatchEvent::Changed).unwrap();

    assert!(!d.is_running());
    match d.into_outcome() {
        Outcome::BackendLost(notice) => assert!(notice.contains("out")),
        other => panic!("expected BackendLost, got {other:?}"),
    }
}

#[test]
fn test_removal_event_terminates() {
    let (_root, dir) = session_dir("");
    let mut d = dispatcher(&dir, 40, 6);
    d.on_watch_event(WatchEvent::Removed).unwrap();
    assert_eq!(d.app().run_state, RunState::Terminating);
    assert!(d.app().notice.is_some());
}

// ============================================================================
// Backend replacement and configuration
// ============================================================================

#[cfg(unix)]
#[test]
fn test_out_file_replaced_by_rename_is_followed() {
    let (_root, dir) = session_dir("d t <a> one\n");
    let mut d = dispatcher(&dir, 40, 6);

    let fresh = dir.join("out.new");
    fs::write(&fresh, "d t <a> one\nd t <b> two\n").unwrap();
    fs::rename(&fresh, dir.join("out")).unwrap();
    d.on_watch_event(WatchEvent::Changed).unwrap();

    assert!(d.is_running());
    assert_eq!(d.windows().transcript().len(), 2);
    let screen = render(&mut d, 40, 6);
    assert!(row(&screen, 0).ends_with("a | one"));
    assert!(row(&screen, 1).ends_with("b | two"));

    // Later appends land in the new file and keep arriving
    append_out(&dir, &["d t <c> three"]);
    d.on_watch_event(WatchEvent::Changed).unwrap();
    assert_eq!(d.windows().transcript().len(), 3);
}

#[cfg(unix)]
#[test]
fn test_resize_after_rename_replays_new_file() {
    let (_root, dir) = session_dir("d t <a> one\n");
    let mut d = dispatcher(&dir, 40, 6);

    let fresh = dir.join("out.new");
    fs::write(&fresh, "d t <z> replaced\n").unwrap();
    fs::rename(&fresh, dir.join("out")).unwrap();
    d.on_terminal_event(TuiEvent::Resize(40, 6)).unwrap();

    assert_eq!(d.windows().transcript().len(), 1);
    let screen = render(&mut d, 40, 6);
    assert!(row(&screen, 0).ends_with("z | replaced"));
}

#[test]
fn test_empty_escape_command_config_keeps_empty_submit_harmless() {
    let (_root, dir) = session_dir("");
    let config = niii::core::config::resolve_with_env(
        &niii::core::config::NiiiConfig {
            input: niii::core::config::InputConfig {
                escape_command: Some(String::new()),
                ..Default::default()
            },
            ..Default::default()
        },
        &niii::core::config::CliOverrides::default(),
        |_| None,
    );
    let session = Session::open(dir.clone()).unwrap();
    let mut d = Dispatcher::new(session, &config, Palette::plain(), Rect::new(0, 0, 40, 6)).unwrap();

    type_line(&mut d, "");

    assert!(d.is_running());
    assert_eq!(backend_input(&dir), "");
}
