//! Terminal logging setup.
//!
//! Events carry URLs, catalog paths and error messages, and a status error's
//! message holds the server's response body. The fmt layer writes through
//! [`TruncatingStderr`], which buffers each event and caps it before it
//! reaches the terminal:
//!
//! ```text
//! tracing::debug!(...)
//!        |
//!        v
//!   tracing_subscriber::registry()
//!        |
//!        +-- EnvFilter (RUST_LOG, else from -v count)
//!        |
//!        \-- fmt::layer().with_writer(TruncatingStderr)
//!                \-- stderr, at most `max_bytes` per event
//! ```

use std::borrow::Cow;
use std::io::{self, Write};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;

/// Default maximum bytes per tracing event written to the terminal.
pub(crate) const TERMINAL_MAX_EVENT_BYTES: usize = 500;

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbosity` picks the level for this
/// crate (0 = warn, 1 = info, 2 = debug, 3+ = trace).
pub fn init_tracing(verbosity: u8, config: &LoggingConfig) -> anyhow::Result<()> {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("discovery_registry={level},discovery={level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(TruncatingStderr::new(config.max_event_bytes)),
        )
        .try_init()?;

    Ok(())
}

/// `MakeWriter` handing out one [`EventBuffer`] per event.
#[derive(Debug, Clone)]
pub struct TruncatingStderr {
    max_bytes: usize,
}

impl TruncatingStderr {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }
}

impl Default for TruncatingStderr {
    fn default() -> Self {
        Self::new(TERMINAL_MAX_EVENT_BYTES)
    }
}

impl<'a> MakeWriter<'a> for TruncatingStderr {
    type Writer = EventBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        EventBuffer {
            buf: Vec::with_capacity(256),
            max_bytes: self.max_bytes,
        }
    }
}

/// Accumulates one event; writes it (capped) to stderr on drop.
pub struct EventBuffer {
    buf: Vec<u8>,
    max_bytes: usize,
}

impl Write for EventBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for EventBuffer {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let _ = io::stderr().write_all(&truncate_event(&self.buf, self.max_bytes));
    }
}

/// Cap `event` at `max_bytes`, cutting on a UTF-8 character boundary and
/// appending a `...[<n>B total]` marker.
fn truncate_event(event: &[u8], max_bytes: usize) -> Cow<'_, [u8]> {
    if event.len() <= max_bytes {
        return Cow::Borrowed(event);
    }

    let cut = utf8_floor(event, max_bytes);
    let kept = event[..cut].strip_suffix(b"\n").unwrap_or(&event[..cut]);

    let mut out = Vec::with_capacity(kept.len() + 24);
    out.extend_from_slice(kept);
    out.extend_from_slice(format!("...[{}B total]\n", event.len()).as_bytes());
    Cow::Owned(out)
}

/// Largest char boundary at or before `pos`. UTF-8 continuation bytes look
/// like `10xxxxxx`.
fn utf8_floor(bytes: &[u8], pos: usize) -> usize {
    let mut i = pos.min(bytes.len());
    while i > 0 && i < bytes.len() && bytes[i] & 0xC0 == 0x80 {
        i -= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_event_borrowed() {
        let out = truncate_event(b"fetched drive:v3\n", 500);
        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(&*out, b"fetched drive:v3\n");
    }

    #[test]
    fn test_exactly_at_limit_not_truncated() {
        assert_eq!(&*truncate_event(b"hello", 5), b"hello");
    }

    #[test]
    fn test_long_event_truncated_with_total() {
        let event = br#"{"kind":"discovery#restDescription","resources":{}}"#;
        let out = truncate_event(event, 20);
        let s = String::from_utf8(out.into_owned()).unwrap();
        assert!(s.starts_with(r#"{"kind":"discovery#r"#), "got: {s}");
        assert!(s.ends_with(&format!("...[{}B total]\n", event.len())), "got: {s}");
    }

    #[test]
    fn test_trailing_newline_not_doubled() {
        let out = truncate_event(b"abcd\nefgh\n", 5);
        assert_eq!(&*out, b"abcd...[10B total]\n");
    }

    #[test]
    fn test_cut_respects_utf8_boundaries() {
        // "é" is two bytes; a cut at 6 would split it.
        let out = truncate_event("Helloé world".as_bytes(), 6);
        let s = String::from_utf8(out.into_owned()).expect("valid UTF-8");
        assert!(s.starts_with("Hello..."), "got: {s}");

        // 4-byte character starting at offset 2.
        let out = truncate_event("AB𝄞CD".as_bytes(), 4);
        let s = String::from_utf8(out.into_owned()).expect("valid UTF-8");
        assert!(s.starts_with("AB..."), "got: {s}");
    }

    #[test]
    fn test_utf8_floor() {
        assert_eq!(utf8_floor(b"hello", 3), 3);
        assert_eq!(utf8_floor(b"hello", 10), 5);
        assert_eq!(utf8_floor("Hé".as_bytes(), 2), 1);
        assert_eq!(utf8_floor("aあ".as_bytes(), 3), 1);
    }

    #[test]
    fn test_writer_defaults() {
        assert_eq!(TruncatingStderr::default().max_bytes, TERMINAL_MAX_EVENT_BYTES);
        assert_eq!(TruncatingStderr::new(64).max_bytes, 64);
    }
}
