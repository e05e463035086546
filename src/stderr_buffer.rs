use std::io::{self, Write};
use std::sync::Mutex;

use tracing_subscriber::fmt::MakeWriter;

static BUFFER: Mutex<Option<Vec<u8>>> = Mutex::new(None);

/// Activate buffering. While active, log output is held in memory instead
/// of being written to stderr, so it cannot tear the TUI's alternate screen.
pub fn activate() {
    if let Ok(mut guard) = BUFFER.lock() {
        *guard = Some(Vec::new());
    }
}

/// Deactivate buffering and return all collected lines.
pub fn drain() -> Vec<String> {
    let bytes = BUFFER
        .lock()
        .ok()
        .and_then(|mut guard| guard.take())
        .unwrap_or_default();
    String::from_utf8_lossy(&bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

/// Writer handed to the tracing fmt layer. Each write lands in the buffer
/// when it is active and on stderr otherwise.
#[derive(Debug, Default, Clone, Copy)]
pub struct BufferedStderr;

impl Write for BufferedStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut guard) = BUFFER.lock() {
            if let Some(held) = guard.as_mut() {
                held.extend_from_slice(buf);
                return Ok(buf.len());
            }
        }
        io::stderr().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

impl<'a> MakeWriter<'a> for BufferedStderr {
    type Writer = BufferedStderr;

    fn make_writer(&'a self) -> Self::Writer {
        BufferedStderr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The buffer is process-global; keep everything in one test.
    #[test]
    fn test_buffer_collects_until_drained() {
        activate();
        let mut writer = BufferedStderr;
        writer.write_all(b"first line\nsecond line\n").unwrap();
        assert_eq!(drain(), vec!["first line", "second line"]);
        assert!(drain().is_empty());
    }
}
