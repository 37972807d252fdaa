//! Process plumbing shared by the `logtweak` and `logtag` binaries.

use anyhow::Error;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Send diagnostics to stderr, filtered by `RUST_LOG` (default `warn`).
///
/// Must be called once, before any tracing macro is used.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

/// Check if the error chain contains a broken pipe error.
#[inline(always)]
pub fn is_broken_pipe(err: &Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|io_err| io_err.kind() == io::ErrorKind::BrokenPipe)
}

/// Turn the outcome of a run into the process exit code, reporting fatal
/// errors on stderr.
pub fn exit_code(result: anyhow::Result<()>) -> ExitCode {
    let err = match result {
        Ok(()) => return ExitCode::SUCCESS,
        Err(err) => err,
    };

    // A closed pipe on stdout is how `| head` ends a run
    if is_broken_pipe(&err) {
        return ExitCode::SUCCESS;
    }

    if std::env::var("RUST_BACKTRACE").is_ok_and(|v| v == "1")
        && std::env::var("RUST_LIB_BACKTRACE").map_or(true, |v| v == "1")
    {
        let _ = writeln!(io::stderr(), "error: {:?}", err);
    } else {
        let _ = writeln!(io::stderr(), "error: {:#}", err);
    }

    ExitCode::FAILURE
}
