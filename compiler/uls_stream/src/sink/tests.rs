use std::sync::Arc;
use std::thread;

use super::*;
use pretty_assertions::assert_eq;

/// Writer whose contents stay readable after it is handed to a sink.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().clone()).unwrap()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn closed_sink_rejects_writes() {
    let sink = OutputSink::new();
    assert!(!sink.is_open());
    assert!(matches!(sink.write_str("x"), Err(StreamError::SinkClosed)));

    let out = Captured::default();
    sink.open(Box::new(out.clone())).unwrap();
    sink.write_str("hello\n").unwrap();
    sink.close().unwrap();
    sink.close().unwrap();

    assert!(matches!(sink.write_str("late"), Err(StreamError::SinkClosed)));
    assert!(matches!(sink.flush(), Err(StreamError::SinkClosed)));
    assert_eq!(out.text(), "hello\n");
}

#[test]
fn reopening_switches_writers() {
    let sink = OutputSink::default();
    let first = Captured::default();
    let second = Captured::default();
    sink.open(Box::new(first.clone())).unwrap();
    sink.write_str("a").unwrap();
    sink.open(Box::new(second.clone())).unwrap();
    sink.write_str("b").unwrap();
    assert_eq!(first.text(), "a");
    assert_eq!(second.text(), "b");
}

#[test]
fn lines_from_many_threads_stay_whole() {
    static SINK: OutputSink = OutputSink::new();
    let out = Captured::default();
    SINK.open(Box::new(out.clone())).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|t| {
            thread::spawn(move || {
                for i in 0..100 {
                    SINK.write_str(&format!("thread {t} line {i}\n")).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    SINK.close().unwrap();

    let text = out.text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 800);
    assert!(lines
        .iter()
        .all(|l| l.starts_with("thread ") && l.contains(" line ")));
    for t in 0..8 {
        let own: Vec<&str> = lines
            .iter()
            .copied()
            .filter(|l| l.starts_with(&format!("thread {t} ")))
            .collect();
        let expected: Vec<String> = (0..100).map(|i| format!("thread {t} line {i}")).collect();
        assert_eq!(own, expected);
    }
}
