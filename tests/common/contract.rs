//! Checks every `Capturable` implementation must pass

use syscap::{Capturable, CaptureError};

/// Runs the shared capture scenario against `capturable`, writing through `write`.
pub fn assert_capture_contract<C, F>(capturable: &C, mut write: F)
where
    C: Capturable + ?Sized,
    F: FnMut(&str),
{
    for _ in 0..2 {
        assert!(
            matches!(
                capturable.captured_data(),
                Err(CaptureError::NotCapturing { .. })
            ),
            "Reading before capture should fail every time"
        );
    }

    capturable.capture().unwrap();
    assert_eq!(capturable.captured_data().unwrap(), "");

    write("hello");
    assert_eq!(capturable.captured_data().unwrap(), "hello");
    assert_eq!(
        capturable.captured_data().unwrap(),
        "hello",
        "Reading twice without writes should return the same data"
    );

    write("world");
    assert_eq!(capturable.captured_data().unwrap(), "helloworld");

    capturable.capture().unwrap();
    assert_eq!(
        capturable.captured_data().unwrap(),
        "",
        "Capturing again should restart with an empty buffer"
    );
    write("again");
    assert_eq!(capturable.captured_data().unwrap(), "again");
}
