//! End-to-end tests for the console core
//!
//! These drive the public API the way the client does: route messages in,
//! poll geometry, scroll, and read back the render views.

use conch::{
    dump_lines, ChannelBuffer, ChannelKind, ChannelSnapshot, Console, ConsoleConfig, Viewport,
    NOTIFY_FADE_TIME_MS,
};

/// A console sized so the active channel gets 10 columns, 10 lines, and
/// a 4-row visible page
fn small_console() -> Console {
    let mut config = ConsoleConfig::default();
    config.set_scale(1.0);
    let mut console = Console::with_capacity(config, 100);
    // 24px glyphs: 288/24 - 2 = 10 columns, 480/96 - 1 = 4 rows
    console.set_font_factor(3.0);
    console
        .check_resize(Viewport {
            width: 288,
            height: 480,
        })
        .unwrap();
    console
}

fn line_string(cells: &[conch::Cell]) -> String {
    cells.iter().map(|c| c.ch).collect()
}

#[test]
fn wrap_scenario_hello_world_foobar() {
    let mut console = small_console();
    assert_eq!(console.active_channel().buffer().line_width(), 10);

    console.print("hello world foobar\n", 100);

    let buffer = console.active_channel().buffer();
    let last = buffer.current_line();
    // "hello " fits; "hello world" would not, so the wrap lands after the
    // space and never inside a word
    assert_eq!(buffer.line_text(last - 2), "hello");
    assert_eq!(buffer.line_text(last - 1), "world");
    assert_eq!(buffer.line_text(last), "foobar");

    let first = buffer.line_cells(last - 2).unwrap();
    assert_eq!(line_string(first), "hello     ");
}

#[test]
fn appended_content_reads_back() {
    let mut buffer = ChannelBuffer::with_capacity(400);
    buffer.init_size(20, 4);
    for i in 0..10 {
        buffer.append(&format!("message number {}\n", i), 50, false);
    }
    assert!(buffer.filled_lines() <= buffer.total_lines());
    assert_eq!(
        buffer.line_text(buffer.current_line()),
        "message number 9"
    );
}

#[test]
fn capacity_is_never_exceeded() {
    let mut buffer = ChannelBuffer::with_capacity(100);
    buffer.init_size(10, 4);
    for i in 0..100 {
        buffer.append(&format!("msg {:02}\n", i), 50, false);
    }
    assert_eq!(buffer.filled_lines(), buffer.total_lines());
    assert_eq!(buffer.total_lines() * buffer.line_width(), 100);
    assert_eq!(buffer.line_text(buffer.current_line()), "msg 99");
}

#[test]
fn resize_round_trip_preserves_recent_lines() {
    let mut buffer = ChannelBuffer::with_capacity(100);
    buffer.init_size(4, 4);
    buffer.append("AAAA\nBBBB\nCCCC", 100, false);

    buffer.resize(8, 4);
    buffer.resize(4, 4);

    assert_eq!(buffer.line_text(buffer.current_line()), "CCCC");
    let texts: Vec<String> = (0..=buffer.current_line())
        .map(|l| buffer.line_text(l))
        .collect();
    assert!(texts.contains(&"BBBB".to_string()));
}

#[test]
fn resize_twice_is_a_no_op() {
    let mut buffer = ChannelBuffer::with_capacity(100);
    buffer.init_size(10, 4);
    buffer.append("stable content\n", 100, false);

    buffer.resize(5, 3);
    let current = buffer.current_line();
    let display = buffer.display_line();
    let rows: Vec<String> = (0..=current).map(|l| buffer.line_text(l)).collect();

    buffer.resize(5, 3);
    assert_eq!(buffer.current_line(), current);
    assert_eq!(buffer.display_line(), display);
    let rows_again: Vec<String> = (0..=current).map(|l| buffer.line_text(l)).collect();
    assert_eq!(rows, rows_again);
}

#[test]
fn page_up_clamps_and_bottom_restores() {
    let mut console = small_console();
    for i in 0..40 {
        console.print(&format!("row {}\n", i), 100);
    }

    for _ in 0..1000 {
        console.page_up(None);
    }
    let buffer = console.active_channel().buffer();
    let floor = buffer.current_line() - buffer.filled_lines() as i64 + buffer.vis_page() as i64;
    assert_eq!(buffer.display_line(), floor);
    assert!(console.is_backscrolled());

    console.scroll_bottom();
    let buffer = console.active_channel().buffer();
    assert_eq!(buffer.display_line(), buffer.current_line());
    assert!(!console.is_backscrolled());
}

#[test]
fn scroll_top_lands_on_oldest_page() {
    let mut console = small_console();
    for i in 0..40 {
        console.print(&format!("row {}\n", i), 100);
    }
    console.scroll_top();
    let buffer = console.active_channel().buffer();
    let floor = buffer.current_line() - buffer.filled_lines() as i64 + buffer.vis_page() as i64;
    assert_eq!(buffer.display_line(), floor);
}

#[test]
fn notify_lifetime_and_fade_window() {
    let mut console = small_console();
    let t0 = 10_000;
    console.print("ping\n", t0);

    let notify_ms = console.config().notify_time_ms();

    // visible for the whole notify time
    assert_eq!(console.notify_overlay(t0 + notify_ms - 1).len(), 1);
    // still listed while fading, transparent by the final interval
    let fading = console.notify_overlay(t0 + notify_ms + NOTIFY_FADE_TIME_MS);
    assert_eq!(fading.len(), 1);
    assert_eq!(fading[0].alpha, 0.0);
    // gone entirely after two fade intervals
    assert!(console
        .notify_overlay(t0 + notify_ms + 2 * NOTIFY_FADE_TIME_MS)
        .is_empty());
}

#[test]
fn suppressed_message_never_reaches_overlay() {
    let mut console = small_console();
    console.print("[skipnotify]silent\n", 500);
    assert!(console.notify_overlay(501).is_empty());

    // the text itself still lands in the scrollback
    let buffer = console.active_channel().buffer();
    assert_eq!(buffer.line_text(buffer.current_line()), "silent");
}

#[test]
fn tell_routes_to_tell_and_all_only() {
    let mut console = small_console();
    console.print_tagged(Some("tell \"hi\""), "friend: hi\n", 100);

    let tell = console.channel(ChannelKind::Tell);
    let all = console.channel(ChannelKind::All);
    assert_eq!(
        tell.buffer().line_text(tell.buffer().current_line()),
        "friend: hi"
    );
    assert_eq!(
        all.buffer().line_text(all.buffer().current_line()),
        "friend: hi"
    );
    for kind in [ChannelKind::System, ChannelKind::Chat, ChannelKind::Team] {
        assert_eq!(console.channel(kind).buffer().current_line(), 0);
    }

    // the unseen flag lands on tell (all is the active tab), never on all
    assert!(tell.has_notify());
    assert!(!all.has_notify());
}

#[test]
fn tab_switch_clears_flag_but_keeps_scrollback() {
    let mut console = small_console();
    console.print_tagged(Some("chat \"x\""), "player: yo\n", 100);
    assert!(console.channel(ChannelKind::Chat).has_notify());

    console.switch_to_tab(ChannelKind::Chat.index());
    let chat = console.channel(ChannelKind::Chat);
    assert!(!chat.has_notify());
    assert_eq!(
        chat.buffer().line_text(chat.buffer().current_line()),
        "player: yo"
    );
}

#[test]
fn color_escapes_span_wrapped_lines() {
    let mut console = small_console();
    console.print("^2greenish text\n", 100);

    let buffer = console.active_channel().buffer();
    let last = buffer.current_line();
    let first = buffer.line_cells(last - 1).unwrap();
    let second = buffer.line_cells(last).unwrap();
    // color persists across the wrap without re-escaping
    assert_eq!(first[0].color, conch::ColorIndex::GREEN);
    assert_eq!(second[0].color, conch::ColorIndex::GREEN);
}

#[test]
fn dump_matches_scrollback() {
    let mut console = small_console();
    console.print("first\n", 100);
    console.print("second\n", 100);

    let mut out = Vec::new();
    dump_lines(console.active_channel().buffer(), &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.ends_with("first\nsecond\n"));
    assert!(!text.contains(' '));
}

#[test]
fn snapshot_round_trip_through_json() {
    let mut console = small_console();
    console.print("state of play\n", 100);

    let snapshot = ChannelSnapshot::from_channel(console.active_channel());
    let restored = ChannelSnapshot::from_json(&snapshot.to_json()).unwrap();
    assert_eq!(restored, snapshot);
    assert!(restored.text().contains("state of"));
}

#[test]
fn reflow_after_viewport_change_keeps_content() {
    let mut config = ConsoleConfig::default();
    config.set_scale(1.0);
    let mut console = Console::with_capacity(config, 2000);
    console
        .check_resize(Viewport {
            width: 96,
            height: 480,
        })
        .unwrap();

    console.print("alpha beta gamma delta\n", 100);

    // widen: 48 columns
    console
        .check_resize(Viewport {
            width: 400,
            height: 480,
        })
        .unwrap();
    let buffer = console.active_channel().buffer();
    assert_eq!(buffer.line_width(), 48);
    let texts: Vec<String> = (0..=buffer.current_line())
        .map(|l| buffer.line_text(l))
        .collect();
    assert!(texts.iter().any(|t| t.contains("delta")));
}
