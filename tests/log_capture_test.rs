//! Tests for capturing tracing output

mod common;

use common::contract::assert_capture_contract;
use std::io::Write;
use syscap::{Capturable, LogCapture, capture_during};
use tracing::{error, info};
use tracing_subscriber::fmt::MakeWriter;

#[test]
fn satisfies_capture_contract() {
    let logs = LogCapture::new();
    assert_capture_contract(&logs, |text| {
        let mut writer = logs.make_writer();
        writer.write_all(text.as_bytes()).unwrap();
    });
}

#[test]
fn records_formatted_events() {
    let logs = LogCapture::new();

    let data = capture_during(&logs, || {
        tracing::subscriber::with_default(logs.subscriber(), || {
            info!("Deleted {} files", 3);
            error!("Cannot remove '{}'", "locked.txt");
        });
    })
    .unwrap();

    let lines: Vec<&str> = data.lines().collect();
    assert_eq!(lines.len(), 2, "Unexpected log output: {}", data);
    assert!(lines[0].contains("INFO") && lines[0].contains("Deleted 3 files"));
    assert!(lines[1].contains("ERROR") && lines[1].contains("Cannot remove 'locked.txt'"));
}

#[test]
fn clones_share_one_buffer() {
    let logs = LogCapture::new();
    let reader = logs.clone();
    logs.capture().unwrap();

    tracing::subscriber::with_default(logs.subscriber(), || {
        info!("shared");
    });

    assert!(reader.captured_data().unwrap().contains("shared"));
}

#[test]
fn capture_inside_subscriber_scope_records_only_later_events() {
    let logs = LogCapture::new();

    tracing::subscriber::with_default(logs.subscriber(), || {
        logs.capture().unwrap();
        info!("T");
    });

    assert_eq!(logs.captured_lines().unwrap(), vec![" INFO T"]);
}

#[test]
fn restart_inside_subscriber_scope_starts_clean() {
    let logs = LogCapture::new();

    tracing::subscriber::with_default(logs.subscriber(), || {
        logs.capture().unwrap();
        info!("first");
        logs.capture().unwrap();
        info!("second");
    });

    assert_eq!(logs.captured_data().unwrap(), " INFO second\n");
}
