//! Mock of a byte sink, used to inject I/O failures into writers.
use mockall::mock;

use std::{
    io::{self, Write},
    sync::{Arc, Mutex},
};

mock! {
    pub Sink {}
    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
        fn flush(&mut self) -> io::Result<()>;
    }
}

/// Bytes a sink accepted, shared with the test that owns the sink.
pub type Accepted = Arc<Mutex<Vec<u8>>>;

/// Sink accepting the first `accepted` writes, failing every later one.
///
/// Accepted bytes are recorded in the returned buffer.
pub fn failing_after(accepted: usize) -> (MockSink, Accepted) {
    let written = Accepted::default();
    let recorder = Arc::clone(&written);

    let mut sink = MockSink::new();
    let mut calls = 0;
    sink.expect_write().returning(move |buf| {
        calls += 1;
        if calls > accepted {
            Err(io::Error::other("disk full"))
        } else {
            recorder.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
    });
    sink.expect_flush().returning(|| Ok(()));
    (sink, written)
}
