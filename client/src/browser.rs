//! Glue to the browser: session storage, navigation, alerts and a console
//! sink for `tracing`.

use std::io;

use common::create_user::SessionStore;
use common::error::{ClientError, Result};
use gloo::storage::{SessionStorage, Storage};
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

pub struct BrowserSession;

impl SessionStore for BrowserSession {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        SessionStorage::raw()
            .set_item(key, value)
            .map_err(|e| ClientError::Storage(format!("{e:?}")))
    }
}

pub fn alert(message: &str) {
    gloo::dialogs::alert(message);
}

pub fn navigate(path: &str) -> Result<()> {
    gloo::utils::window()
        .location()
        .set_href(path)
        .map_err(|e| ClientError::Navigation(format!("{path}: {e:?}")))
}

pub fn current_path() -> String {
    gloo::utils::window()
        .location()
        .pathname()
        .unwrap_or_else(|_| "/".to_string())
}

pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(ConsoleWriter)
        .without_time()
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();
}

struct ConsoleWriter;

impl<'a> MakeWriter<'a> for ConsoleWriter {
    type Writer = ConsoleLine;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleLine::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleLine::new(*meta.level())
    }
}

/// Buffers one formatted event and hands it to the console when dropped.
struct ConsoleLine {
    level: Level,
    buf: Vec<u8>,
}

impl ConsoleLine {
    fn new(level: Level) -> Self {
        Self { level, buf: vec![] }
    }
}

impl io::Write for ConsoleLine {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleLine {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buf).trim_end().to_string();
        match self.level {
            Level::ERROR => gloo::console::error!(line),
            Level::WARN => gloo::console::warn!(line),
            _ => gloo::console::log!(line),
        }
    }
}
