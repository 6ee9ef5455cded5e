//! Knot CLI library half: the commands behind the `knot` binary.
//!
//! Each command returns its output instead of printing, so the binary owns
//! stdout, stderr and the exit code.

use std::path::Path;
use std::sync::Once;

use knot_eval::{EvalError, Runner, RunnerConfig};
use knot_syntax::{parse, render, Location, SyntaxError, SyntaxErrorKind};

static TRACING_INIT: Once = Once::new();

/// Env var that switches log output to an indented span tree.
pub const LOG_TREE_VAR: &str = "KNOT_LOG_TREE";

/// Initialize tracing once, and only when `RUST_LOG` is set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let filter = EnvFilter::from_default_env();
        if std::env::var_os(LOG_TREE_VAR).is_some() {
            tracing_subscriber::registry()
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .with(filter)
                .init();
        } else {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// A failed command, displayed the way the binary reports it.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot find file '{path}'")]
    NotFound { path: String },
    #[error("permission denied reading '{path}'")]
    PermissionDenied { path: String },
    #[error("'{path}' contains invalid UTF-8 data")]
    InvalidUtf8 { path: String },
    #[error("error reading '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{line}:{column}: {reason}")]
    Syntax {
        path: String,
        line: usize,
        column: usize,
        reason: SyntaxErrorKind,
        #[source]
        error: SyntaxError,
    },
    #[error("error: {0}")]
    Eval(#[from] EvalError),
}

fn syntax_error(path: &str, error: SyntaxError) -> CliError {
    let Location { line, column } = error.location();
    CliError::Syntax {
        path: path.to_owned(),
        line,
        column,
        reason: error.kind,
        error,
    }
}

/// Read a source file, mapping IO failures to user-facing messages.
pub fn read_file(path: &Path) -> Result<String, CliError> {
    let display = path.display().to_string();
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CliError::NotFound { path: display },
        std::io::ErrorKind::PermissionDenied => CliError::PermissionDenied { path: display },
        std::io::ErrorKind::InvalidData => CliError::InvalidUtf8 { path: display },
        _ => CliError::Io {
            path: display,
            source: e,
        },
    })
}

/// `knot run <file>`: evaluate the file and return the printed result.
pub fn run_file(path: &Path) -> Result<String, CliError> {
    let source = read_file(path)?;
    eval_named(&path.display().to_string(), &source)
}

/// `knot eval <source>`: evaluate inline source.
pub fn eval_source(source: &str) -> Result<String, CliError> {
    eval_named("<eval>", source)
}

/// `knot fmt <file>`: the file's tree in canonical indented form.
pub fn format_file(path: &Path) -> Result<String, CliError> {
    let source = read_file(path)?;
    let name = path.display().to_string();
    let parsed = parse(&source).map_err(|error| syntax_error(&name, error))?;
    Ok(parsed.map_or_else(String::new, |parsed| render(&parsed.tree, parsed.root)))
}

fn eval_named(name: &str, source: &str) -> Result<String, CliError> {
    let mut runner = Runner::from_source(source)
        .map_err(|error| syntax_error(name, error))?
        .with_config(RunnerConfig::from_env());
    tracing::debug!(file = name, nodes = runner.tree().node_count(), "parsed source");
    runner.install_builtins();
    // An unassigned result prints as the empty string.
    Ok(runner.run()?.to_string())
}
