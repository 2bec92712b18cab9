//! End-to-end editor tests
//!
//! Each test feeds a scripted key byte stream through the application, the
//! same way the interactive loop does, and checks the resulting session,
//! messages and exported files.

use std::fs;
use std::path::Path;

use qeike::{App, Config, Screen};
use qeike_core::{Coord, Dimensions, Snapshot};
use qeike_map::{decode, ExportFormat};

const RIGHT: &[u8] = b"\x1b[C";
const DOWN: &[u8] = b"\x1b[B";

fn config_in(dir: &Path) -> Config {
    let mut config = Config::default();
    config.export.directory = Some(dir.to_path_buf());
    config
}

fn run_script(config: Config, script: &[&[u8]]) -> App {
    let mut app = App::new(config).unwrap();
    for chunk in script {
        app.handle_input(chunk);
    }
    app.flush_input();
    app
}

fn snapshot(app: &App) -> Snapshot {
    app.session().expect("editor session").snapshot()
}

#[test]
fn test_full_session_export() {
    let dir = tempfile::tempdir().unwrap();
    let app = run_script(
        config_in(dir.path()),
        &[
            b"1\r",
            b"4 4 4\r",
            b"z",
            RIGHT,
            DOWN,
            b"kz",
            b"ecastle\r",
            b"q",
        ],
    );

    assert!(app.is_done());
    let path = dir.path().join("castle.qkm");
    assert_eq!(app.last_export(), Some(path.as_path()));

    let grid = decode(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(grid.dimensions(), Dimensions::new(4, 4, 4));
    let coords: Vec<Coord> = grid.occupied().collect();
    assert_eq!(coords, vec![Coord::new(0, 0, 0), Coord::new(1, 1, 1)]);
}

#[test]
fn test_dimension_prompt_scenarios() {
    let mut app = run_script(Config::default(), &[b"n\r", b"abc\r"]);
    assert_eq!(app.screen(), Screen::Dimensions);
    assert!(app.message().is_some());

    app.handle_input(b"4 4\r");
    assert_eq!(app.screen(), Screen::Dimensions);
    assert!(app.message().unwrap().contains("three numbers"));

    app.handle_input(b"4 4 4\r");
    assert_eq!(app.screen(), Screen::Editing);
    assert_eq!(snapshot(&app).dimensions, Dimensions::new(4, 4, 4));
}

#[test]
fn test_empty_filename_defaults_to_level() {
    let dir = tempfile::tempdir().unwrap();
    let app = run_script(config_in(dir.path()), &[b"1\r", b"3 2 1\r", b"te\r"]);

    assert_eq!(app.screen(), Screen::Editing);
    let path = dir.path().join("level.qkm");
    assert!(path.exists());
    assert_eq!(fs::read(&path).unwrap().len(), 19 + 3);
}

#[test]
fn test_too_wide_grid_writes_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let app = run_script(config_in(dir.path()), &[b"1\r", b"300 1 1\r", b"ze\r"]);

    assert_eq!(app.screen(), Screen::Editing);
    assert!(app.last_export().is_none());
    assert!(app.message().unwrap().contains("300"));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);

    // Editing continues with the grid intact
    assert_eq!(snapshot(&app).occupied, vec![Coord::new(0, 0, 0)]);
}

#[test]
fn test_failed_export_keeps_editing() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(&dir.path().join("missing"));
    config.export.atomic_write = false;
    let mut app = run_script(config, &[b"1\r", b"2 2 1\r", b"ze\r"]);

    assert_eq!(app.screen(), Screen::Editing);
    assert!(app.message().unwrap().starts_with("Error opening file"));

    app.handle_input(RIGHT);
    app.handle_input(b"z");
    assert_eq!(snapshot(&app).occupied.len(), 2);
}

#[test]
fn test_text_export() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.export.format = ExportFormat::Vxl;
    run_script(config, &[b"1\r", b"2 2 2\r", b"k", DOWN, b"z", b"emap\r"]);

    let text = fs::read_to_string(dir.path().join("map.vxl")).unwrap();
    assert_eq!(
        text,
        "# Automatically generated by level_editor\n\nv 0 1 1\n"
    );
}

#[test]
fn test_cancelled_export_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let app = run_script(config_in(dir.path()), &[b"1\r", b"2 2 1\r", b"zeabc", b"\x1b"]);

    assert_eq!(app.screen(), Screen::Editing);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn test_chunk_boundaries_do_not_matter() {
    let parts: [&[u8]; 7] = [b"1\r4 3 2\r", RIGHT, RIGHT, DOWN, b"kt", RIGHT, b"jz"];
    let script = parts.concat();

    let whole = run_script(Config::default(), &[script.as_slice()]);
    let mut app = App::new(Config::default()).unwrap();
    for byte in &script {
        app.handle_input(std::slice::from_ref(byte));
    }

    assert_eq!(snapshot(&app), snapshot(&whole));
    assert_eq!(
        snapshot(&whole).occupied,
        vec![Coord::new(3, 1, 0), Coord::new(2, 1, 1)]
    );
}

#[test]
fn test_ctrl_c_quits_everywhere() {
    let app = run_script(Config::default(), &[b"\x03"]);
    assert!(app.is_done());

    let app = run_script(Config::default(), &[b"1\r2 2 2\r", b"\x03"]);
    assert!(app.is_done());
    assert!(snapshot(&app).finished);
}

#[test]
fn test_keys_after_quit_are_ignored() {
    let app = run_script(Config::default(), &[b"1\r2 2 2\r", b"q", b"z", RIGHT]);
    let snap = snapshot(&app);
    assert!(snap.occupied.is_empty());
    assert_eq!(snap.cursor.column, 0);
}
