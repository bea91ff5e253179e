//! Shared output target for token dumps.

use std::io::Write;

use parking_lot::Mutex;

use crate::StreamError;

/// Process-wide sink, opened by the command-line driver.
pub static SYSTEM_SINK: OutputSink = OutputSink::new();

/// A writer behind one mutex, with an explicit open/close lifecycle.
///
/// Each `write_*` call holds the lock for the whole write, so lines from
/// different threads never interleave. Writing to a closed sink fails
/// with [`StreamError::SinkClosed`].
pub struct OutputSink {
    inner: Mutex<Option<Box<dyn Write + Send>>>,
}

impl OutputSink {
    pub const fn new() -> Self {
        Self {
            inner: parking_lot::const_mutex(None),
        }
    }

    /// Direct output to `writer`, closing any previous writer first.
    pub fn open(&self, writer: Box<dyn Write + Send>) -> Result<(), StreamError> {
        let mut inner = self.inner.lock();
        if let Some(mut old) = inner.replace(writer) {
            old.flush()?;
        }
        Ok(())
    }

    /// Flush and drop the writer. Closing a closed sink does nothing.
    pub fn close(&self) -> Result<(), StreamError> {
        let old = self.inner.lock().take();
        if let Some(mut old) = old {
            old.flush()?;
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.inner.lock().is_some()
    }

    pub fn write_bytes(&self, bytes: &[u8]) -> Result<(), StreamError> {
        let mut inner = self.inner.lock();
        let writer = inner.as_mut().ok_or(StreamError::SinkClosed)?;
        writer.write_all(bytes)?;
        Ok(())
    }

    pub fn write_str(&self, text: &str) -> Result<(), StreamError> {
        self.write_bytes(text.as_bytes())
    }

    pub fn flush(&self) -> Result<(), StreamError> {
        match self.inner.lock().as_mut() {
            Some(writer) => writer.flush().map_err(StreamError::from),
            None => Err(StreamError::SinkClosed),
        }
    }
}

impl Default for OutputSink {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OutputSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputSink")
            .field("open", &self.is_open())
            .finish()
    }
}

#[cfg(test)]
mod tests;
