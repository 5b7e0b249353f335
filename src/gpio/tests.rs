use super::*;
use crate::error::GpioError;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

fn fake_sysfs_line(root: &std::path::Path, line: u32, value: &str) {
    let dir = root.join(format!("gpio{}", line));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("direction"), "in").unwrap();
    fs::write(dir.join("value"), value).unwrap();
}

#[test]
fn test_edge_between_levels() {
    assert_eq!(Edge::between(Level::Low, Level::High), Some(Edge::Rising));
    assert_eq!(Edge::between(Level::High, Level::Low), Some(Edge::Falling));
    assert_eq!(Edge::between(Level::High, Level::High), None);
    assert_eq!(Edge::Rising.level_after(), Level::High);
}

#[test]
fn test_level_parse() {
    assert_eq!(Level::parse(5, "1\n").unwrap(), Level::High);
    assert_eq!(Level::parse(5, "0").unwrap(), Level::Low);
    assert!(matches!(
        Level::parse(5, "x"),
        Err(GpioError::InvalidValue { line: 5, .. })
    ));
}

#[test]
fn test_mock_missing_line_is_unavailable() {
    let gpio = MockGpio::without_lines(&[6]);

    assert!(matches!(
        gpio.open_output(6, Level::High),
        Err(GpioError::LineUnavailable { line: 6 })
    ));
    assert!(gpio.open_input(5).is_ok());
}

#[test]
fn test_mock_input_delivers_edges() {
    let gpio = MockGpio::new();
    let input = gpio.open_input(5).unwrap();
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    input
        .on_edge(Box::new(move |edge| sink.lock().push(edge)))
        .unwrap();

    let handle = gpio.input(5).unwrap();
    handle.trigger(Edge::Rising);
    handle.trigger(Edge::Falling);

    assert_eq!(*seen.lock(), vec![Edge::Rising, Edge::Falling]);
    assert_eq!(input.read().unwrap(), Level::Low);
}

#[test]
fn test_mock_output_records_history() {
    let gpio = MockGpio::new();
    let led = gpio.open_output(6, Level::High).unwrap();
    led.write(Level::Low).unwrap();

    let handle = gpio.output(6).unwrap();
    assert_eq!(handle.history(), vec![Level::High, Level::Low]);
    assert_eq!(handle.level(), Level::Low);
}

#[test]
fn test_sysfs_unexported_line_without_export_is_unavailable() {
    let root = tempfile::tempdir().unwrap();
    let gpio = SysfsGpio::new(root.path().join("missing"), Duration::from_millis(5));

    assert!(matches!(
        gpio.open_input(5),
        Err(GpioError::LineUnavailable { line: 5 })
    ));
}

#[test]
fn test_sysfs_output_sets_initial_level_and_writes() {
    let root = tempfile::tempdir().unwrap();
    fake_sysfs_line(root.path(), 6, "0");
    let gpio = SysfsGpio::new(root.path(), Duration::from_millis(5));

    let led = gpio.open_output(6, Level::High).unwrap();
    let direction = fs::read_to_string(root.path().join("gpio6/direction")).unwrap();
    assert_eq!(direction, "high");

    led.write(Level::Low).unwrap();
    let value = fs::read_to_string(root.path().join("gpio6/value")).unwrap();
    assert_eq!(value, "0");
}

#[tokio::test]
async fn test_sysfs_input_reports_edges() {
    let root = tempfile::tempdir().unwrap();
    fake_sysfs_line(root.path(), 5, "0");
    let gpio = SysfsGpio::new(root.path(), Duration::from_millis(5));

    let input = gpio.open_input(5).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    input
        .on_edge(Box::new(move |edge| {
            let _ = tx.send(edge);
        }))
        .unwrap();

    // Let the watcher sample the initial level first
    tokio::time::sleep(Duration::from_millis(30)).await;
    fs::write(root.path().join("gpio5/value"), "1").unwrap();

    let edge = tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("edge not reported")
        .unwrap();
    assert_eq!(edge, Edge::Rising);
    assert_eq!(input.read().unwrap(), Level::High);
}
