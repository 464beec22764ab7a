use std::io::{self, Write};
use std::time::{Duration, Instant};

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// How long the "Copied!" acknowledgment stays up.
pub const COPY_ACK_DURATION: Duration = Duration::from_secs(2);

pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "Copied!";

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> io::Result<()>;
}

/// Sets the system clipboard through the terminal (OSC 52 escape sequence).
pub struct Osc52Clipboard<W> {
    out: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn set_text(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "\x1b]52;c;{}\x07", STANDARD.encode(text))?;
        self.out.flush()
    }
}

/// Transient acknowledgment after a copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyFeedback {
    copied_at: Option<Instant>,
}

impl CopyFeedback {
    pub fn mark(&mut self, now: Instant) {
        self.copied_at = Some(now);
    }

    pub fn clear(&mut self) {
        self.copied_at = None;
    }

    pub fn is_showing(&self, now: Instant) -> bool {
        self.copied_at
            .map(|at| now.saturating_duration_since(at) < COPY_ACK_DURATION)
            .unwrap_or(false)
    }

    pub fn label(&self, now: Instant) -> &'static str {
        if self.is_showing(now) {
            COPIED_LABEL
        } else {
            COPY_LABEL
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osc52_payload() {
        let mut clipboard = Osc52Clipboard::new(Vec::new());
        clipboard.set_text("hi").unwrap();
        let written = String::from_utf8(clipboard.into_inner()).unwrap();
        assert_eq!(written, "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn test_copied_label_reverts_after_two_seconds() {
        let t0 = Instant::now();
        let mut feedback = CopyFeedback::default();
        assert_eq!(feedback.label(t0), COPY_LABEL);

        feedback.mark(t0);
        assert_eq!(feedback.label(t0), COPIED_LABEL);
        assert_eq!(feedback.label(t0 + Duration::from_millis(1999)), COPIED_LABEL);
        assert_eq!(feedback.label(t0 + COPY_ACK_DURATION), COPY_LABEL);
    }

    #[test]
    fn test_clear_hides_ack() {
        let t0 = Instant::now();
        let mut feedback = CopyFeedback::default();
        feedback.mark(t0);
        feedback.clear();
        assert!(!feedback.is_showing(t0));
    }
}
