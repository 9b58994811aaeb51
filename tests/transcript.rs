
use std::fs::File;
use std::sync::Arc;

use fixture::ScriptDevice;
use linegate::{ansi_style, Channel, FileLog, Log, MemoryLog, Msg, PromptOptions};
use pretty_assertions::assert_eq;

#[test]
fn delegates_see_everything_the_user_saw_and_typed() {
    let device = ScriptDevice::new();
    device.push_input("n");
    let log = Arc::new(MemoryLog::plain());
    let channel = Channel::new(device.clone()).delegate(Arc::clone(&log) as Arc<dyn Log>);

    channel.status("starting up").expect("output failed");
    channel
        .prompt("Continue", &PromptOptions::new(["y", "n"]))
        .expect("prompt failed");
    channel.error("shutting down").expect("output failed");

    assert_eq!(log.contents(), device.transcript());
    assert_eq!(
        log.contents(),
        "starting up\nContinue (y/n): n\nshutting down\n"
    );
}

#[test]
fn device_style_does_not_leak_into_delegates() {
    let device = ScriptDevice::new();
    let log = Arc::new(MemoryLog::plain());
    let channel = Channel::new(device.clone())
        .delegate(Arc::clone(&log) as Arc<dyn Log>)
        .style(Box::new(ansi_style));

    channel.error("boom").expect("output failed");

    assert!(device.transcript().contains("\x1b[31m"));
    assert_eq!(log.contents(), "boom\n");
}

#[test]
fn html_file_log_brackets_the_whole_session() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("session.html");
    let file = File::create(&path).expect("create log file");

    let device = ScriptDevice::new();
    let log = Arc::new(FileLog::html(Box::new(file)));
    let channel = Channel::new(device.clone()).delegate(Arc::clone(&log) as Arc<dyn Log>);

    channel.print("hello & <goodbye>").expect("output failed");
    channel.close().expect("close failed");

    let contents = std::fs::read_to_string(&path).expect("read log file");
    assert!(contents.starts_with("<!DOCTYPE html>\n<html>\n<body>\n<pre>\n"));
    assert!(contents.ends_with("</pre>\n</body>\n</html>\n"));
    assert!(contents.contains("hello &amp; &lt;goodbye&gt;\n"));
}

#[test]
fn output_list_aligns_columns_within_the_terminal() {
    let device = ScriptDevice::with_size(14, 24);
    let channel = Channel::new(device.clone());

    let msgs: Vec<Msg> = ["one", "two", "three", "four", "five"]
        .into_iter()
        .map(|text| Msg::new().plain(text))
        .collect();
    channel.output_list(&msgs, "  ").expect("output_list failed");

    let transcript = device.transcript();
    let lines: Vec<&str> = transcript.lines().collect();
    assert_eq!(lines, vec!["  one    four", "  two    five", "  three"]);
    assert!(lines.iter().all(|line| line.len() <= 14));
}

#[test]
fn output_list_uses_one_row_when_everything_fits() {
    let device = ScriptDevice::with_size(60, 24);
    let channel = Channel::new(device.clone());

    let msgs: Vec<Msg> = ["one", "two", "three"]
        .into_iter()
        .map(|text| Msg::new().plain(text))
        .collect();
    channel.output_list(&msgs, "  ").expect("output_list failed");

    assert_eq!(device.transcript(), "  one  two  three\n");
}

#[test]
fn output_list_falls_back_on_embedded_newlines() {
    let device = ScriptDevice::with_size(120, 24);
    let channel = Channel::new(device.clone());

    let msgs = vec![
        Msg::new().plain("plain"),
        Msg::new().plain("two\nlines"),
        Msg::new().plain("tail"),
    ];
    channel.output_list(&msgs, "  ").expect("output_list failed");

    assert_eq!(
        device.transcript(),
        "plain\n\ntwo\nlines\n\ntail\n\n"
    );
}

#[test]
fn output_list_falls_back_when_width_is_unknown() {
    let device = ScriptDevice::new();
    let channel = Channel::new(device.clone());

    let msgs = vec![Msg::new().plain("a"), Msg::new().plain("b")];
    channel.output_list(&msgs, "  ").expect("output_list failed");

    assert_eq!(device.transcript(), "a\n\nb\n\n");
}

#[test]
fn output_list_falls_back_when_nothing_fits() {
    let device = ScriptDevice::with_size(5, 24);
    let channel = Channel::new(device.clone());

    let msgs = vec![
        Msg::new().plain("stretched-out"),
        Msg::new().plain("elongated"),
    ];
    channel.output_list(&msgs, "  ").expect("output_list failed");

    assert_eq!(device.transcript(), "stretched-out\n\nelongated\n\n");
}

#[test]
fn output_list_mirrors_every_cell_to_delegates() {
    let device = ScriptDevice::with_size(60, 24);
    let log = Arc::new(MemoryLog::plain());
    let channel = Channel::new(device.clone()).delegate(Arc::clone(&log) as Arc<dyn Log>);

    let msgs: Vec<Msg> = ["a", "b"]
        .into_iter()
        .map(|text| Msg::new().plain(text))
        .collect();
    channel.output_list(&msgs, "  ").expect("output_list failed");

    assert_eq!(log.contents(), device.transcript());
}

#[test]
fn bordered_output_is_one_atomic_message() {
    let device = ScriptDevice::with_size(30, 24);
    let log = Arc::new(MemoryLog::plain());
    let channel = Channel::new(device.clone()).delegate(Arc::clone(&log) as Arc<dyn Log>);

    channel
        .error_bordered("panic and despair")
        .expect("bordered output failed");

    let writes = device.writes();
    assert_eq!(writes.len(), 1, "the box must be a single write");

    let lines: Vec<&str> = writes[0].lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "*".repeat(21));
    assert_eq!(lines[1], "* panic and despair *");
    assert_eq!(lines[2], "*".repeat(21));
    assert_eq!(log.contents(), writes[0]);
}

#[test]
fn bordered_output_wraps_long_text_to_the_terminal() {
    let device = ScriptDevice::with_size(16, 24);
    let channel = Channel::new(device.clone());

    channel
        .print_bordered("a collection of rather long words")
        .expect("bordered output failed");

    let transcript = device.transcript();
    let lines: Vec<&str> = transcript.lines().collect();
    assert!(lines.len() > 3);
    assert!(lines.iter().all(|line| line.len() <= 16));
    assert!(lines[0].chars().all(|ch| ch == '*'));
    assert!(lines.last().expect("no lines").chars().all(|ch| ch == '*'));
}

#[test]
fn paused_delegate_misses_output_until_resumed() {
    let device = ScriptDevice::new();
    let log = Arc::new(MemoryLog::plain());
    let channel = Channel::new(device.clone()).delegate(Arc::clone(&log) as Arc<dyn Log>);

    channel.print("one").expect("output failed");
    log.pause();
    channel.print("two").expect("output failed");
    log.resume();
    channel.print("three").expect("output failed");

    assert_eq!(log.contents(), "one\nthree\n");
    assert_eq!(device.transcript(), "one\ntwo\nthree\n");
}
