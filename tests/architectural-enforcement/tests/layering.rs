//! Integration Test: Layering Rules
//!
//! The journal core is headless: every rule of the garden lives in
//! `garden/core`, which never touches the terminal, never sleeps, and
//! propagates errors instead of panicking. The terminal surface may only
//! sleep for its frame tick.

use architectural_enforcement::{assert_clean, find_violations, workspace_root};

#[test]
fn test_core_has_no_terminal_dependencies() {
    let violations = find_violations(&workspace_root().join("garden/core/src"), |_, code| {
        code.contains("ratatui") || code.contains("crossterm")
    });
    assert_clean("garden/core must not depend on the terminal surface", &violations);

    let manifest = std::fs::read_to_string(workspace_root().join("garden/core/Cargo.toml"))
        .expect("core manifest");
    assert!(!manifest.contains("ratatui"));
    assert!(!manifest.contains("crossterm"));
}

#[test]
fn test_no_sleep_in_core() {
    let violations = find_violations(&workspace_root().join("garden/core/src"), |_, code| {
        code.contains("::sleep(") || code.contains(".sleep(")
    });
    assert_clean(
        "garden/core schedules deadlines instead of sleeping",
        &violations,
    );
}

#[test]
fn test_tui_sleeps_only_for_frame_tick() {
    let violations = find_violations(&workspace_root().join("tui/src"), |path, code| {
        let sleeps = code.contains("::sleep(") || code.contains(".sleep(");
        let frame_tick = path.ends_with("app.rs") && code.contains("FRAME_DURATION");
        sleeps && !frame_tick
    });
    assert_clean(
        "the terminal surface may only sleep for the frame tick",
        &violations,
    );
}

#[test]
fn test_no_panicking_unwraps_in_core() {
    let violations = find_violations(&workspace_root().join("garden/core/src"), |_, code| {
        code.contains(".unwrap()") || code.contains(".expect(")
    });
    assert_clean("garden/core propagates errors instead of panicking", &violations);
}

#[test]
fn test_core_never_blocks_on_std_threads() {
    let violations = find_violations(&workspace_root().join("garden/core/src"), |_, code| {
        code.contains("std::thread::") || code.contains("thread::spawn")
    });
    assert_clean("garden/core is driven by its host, not its own threads", &violations);
}
