use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::token::Token;

static HAD_ERROR: AtomicBool = AtomicBool::new(false);
static HAD_RUNTIME_ERROR: AtomicBool = AtomicBool::new(false);

pub fn did_error() -> bool {
    HAD_ERROR.load(Ordering::SeqCst)
}

pub fn did_runtime_error() -> bool {
    HAD_RUNTIME_ERROR.load(Ordering::SeqCst)
}

pub fn reset() {
    HAD_ERROR.store(false, Ordering::SeqCst);
    HAD_RUNTIME_ERROR.store(false, Ordering::SeqCst);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    LexicalError,
    SyntaxError,
    ResolverError,
    RuntimeError,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::LexicalError => "LexicalError",
            Kind::SyntaxError => "SyntaxError",
            Kind::ResolverError => "ResolverError",
            Kind::RuntimeError => "RuntimeError",
        };
        write!(f, "{s}")
    }
}

/// Reports a diagnostic on stderr as `KIND on LINE: MESSAGE` and marks the matching flag
/// so the driver can halt the pipeline between stages.
fn report(kind: Kind, line: usize, message: &str) {
    eprintln!("{kind} on {line}: {message}");
    match kind {
        Kind::RuntimeError => HAD_RUNTIME_ERROR.store(true, Ordering::SeqCst),
        _ => HAD_ERROR.store(true, Ordering::SeqCst),
    }
}

/// Every diagnostic type implements this, the same way the teacher's four error structs
/// do - `throw()` prints the diagnostic and flips the flag the driver polls between
/// pipeline stages.
pub trait Error {
    fn throw(&self);
}

#[derive(Debug, Clone)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Error for ScanError {
    fn throw(&self) {
        report(Kind::LexicalError, self.line, &self.message);
    }
}

#[derive(Debug, Clone)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl Error for ParseError {
    fn throw(&self) {
        report(Kind::SyntaxError, self.line, &self.message);
    }
}

#[derive(Debug, Clone)]
pub struct ResolveError {
    pub line: usize,
    pub message: String,
}

impl Error for ResolveError {
    fn throw(&self) {
        report(Kind::ResolverError, self.line, &self.message);
    }
}

/// Raised by operator type-checks, undefined names, bad arity, non-callables, and
/// `break`/`continue` that escape every enclosing loop.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub line: usize,
    pub message: String,
}

impl RuntimeError {
    pub fn new(token: &Token, message: impl Into<String>) -> Self {
        RuntimeError { line: token.line, message: message.into() }
    }

    pub fn at_line(line: usize, message: impl Into<String>) -> Self {
        RuntimeError { line, message: message.into() }
    }
}

impl Error for RuntimeError {
    fn throw(&self) {
        report(Kind::RuntimeError, self.line, &self.message);
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for RuntimeError {}

/// The flags above are global, so tests across this crate's `#[cfg(test)]` modules that
/// read or reset them must not run concurrently with each other.
#[cfg(test)]
pub(crate) static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
