//! Early-stage debug diagnostics
//!
//! Cache reclamation typically runs from an archive preamble, before the
//! hosting process has installed any logging subscriber. `DebugSink` always
//! feeds `tracing`, and additionally mirrors each line to stderr when the
//! mirror flag is set, so those early lines are not lost.

use std::fmt::Display;

/// Environment variable whose presence enables the stderr mirror.
///
/// Only presence is checked, never the value; read it once at startup and
/// pass the result into [`DebugSink::new`].
pub const STDERR_DEBUG_ENV: &str = "PYZPACK_STDERR_DEBUG";

/// Debug-line sink with an optional stderr mirror
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugSink {
    mirror_stderr: bool,
}

impl DebugSink {
    /// Create a sink; `mirror_stderr` is typically the presence of
    /// [`STDERR_DEBUG_ENV`] in the process environment
    pub fn new(mirror_stderr: bool) -> Self {
        Self { mirror_stderr }
    }

    /// A sink that only forwards to `tracing`
    pub fn quiet() -> Self {
        Self {
            mirror_stderr: false,
        }
    }

    /// Whether lines are mirrored to stderr
    pub fn mirrors_stderr(&self) -> bool {
        self.mirror_stderr
    }

    /// Emit one debug line
    pub fn debug(&self, msg: impl Display) {
        let msg = msg.to_string();
        tracing::debug!("{msg}");
        if self.mirror_stderr {
            eprintln!("{msg}");
        }
    }
}
