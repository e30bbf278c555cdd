#![allow(clippy::needless_return)]

//! Flint is a small, dynamically typed, C-syntax scripting language, implemented here as a
//! tree-walking interpreter. It has numbers, strings, booleans, nil, global and block-scoped
//! variables, first-class functions with lexical closures, anonymous functions, classes with
//! single inheritance, instance fields, methods, `self`/`super`, `print`, the usual control
//! flow (`if`, `while`, C-style `for`, `break`, `continue`, `return`), short-circuiting
//! `and`/`or`, and a single built-in `clock()`.
//!
//! ## Scanning
//! The first step in the interpreter is scanning. Scanning is the process of converting a
//! string of characters into a list of tokens. A token is a single unit of the language's
//! grammar. For example, the string `1 + 2` is converted into the following tokens:
//! ```text
//! [Number(1), Plus, Number(2)]
//! ```
//! The scanner is implemented in the [`scanner`] module. It reports lexical errors through
//! [`error::ScanError`] - unknown characters and unterminated strings - and keeps scanning
//! past them so the user sees every problem in a source file at once, not just the first.
//!
//! ## Parsing
//! The second step is parsing: turning the token list into an abstract syntax tree. The
//! parser is implemented in the [`parser`] module as a hand-written recursive-descent
//! parser over [`expr::Expr`] (value-producing nodes) and [`stmt::Stmt`] (side-effecting
//! nodes). It reports syntax errors through [`error::ParseError`] and recovers from them
//! with panic-mode synchronization, so one malformed declaration doesn't swallow the rest
//! of the file.
//!
//! ## Resolving
//! The third step is resolving: a static pass over the AST that binds every variable
//! reference to a lexical distance ahead of time, so the interpreter never has to search an
//! environment chain at runtime and closures over shadowed names stay lexically correct.
//! The resolver is implemented in [`resolver`] and reports semantic errors (redeclared
//! names, `self`/`super`/`return` used where they don't belong) through
//! [`error::ResolveError`].
//!
//! ## Interpreting
//! The final step is interpreting: walking the resolved AST and producing effects. The
//! interpreter is implemented in [`interpreter`] over the runtime value model in
//! [`value`], [`function`] and [`class`], and reports [`error::RuntimeError`] for type
//! mismatches, arity mismatches, undefined names and the like. Environments
//! ([`environment`]) form a chain of name-to-value maps; blocks and calls push a fresh one
//! and restore the caller's on every exit path, including an in-flight error or
//! `return`/`break`/`continue` signal.

use std::fs;
use std::io::{self, Write};
use std::process;
use std::rc::Rc;
use std::cell::RefCell;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;
pub mod value;

use error::Error as _;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// Exit code for a syntax or resolution failure (the pipeline never reached evaluation).
pub const EX_DATAERR: i32 = 64;
/// Exit code for a runtime failure (evaluation started and aborted partway through).
pub const EX_SOFTWARE: i32 = 70;

/// Thin driver that owns one [`Interpreter`] across an entire run and feeds it source text
/// through the scan -> parse -> resolve -> interpret pipeline. Named to match the crate, in
/// the same spirit as the teacher repo's own lowercase driver struct.
#[allow(non_camel_case_types)]
pub struct flint {
    interpreter: Interpreter,
}

impl flint {
    /// `output` is where `print` statements write. Production code passes real stdout;
    /// tests pass an in-memory buffer so they can assert on it without spawning a process.
    pub fn new(output: Rc<RefCell<dyn Write>>) -> Self {
        flint { interpreter: Interpreter::new(output) }
    }

    /// Reads `path`, runs it, and exits the process with the code the spec assigns to the
    /// pipeline's outcome. Does not return when an error occurred; returns normally on
    /// success, which is what lets the same method run safely inside a test harness that
    /// expects success.
    pub fn run_file(&mut self, path: &str) {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => {
                eprintln!("Could not read file '{path}': {err}");
                process::exit(74);
            }
        };

        self.run(&contents);

        if error::did_error() {
            process::exit(EX_DATAERR);
        }
        if error::did_runtime_error() {
            process::exit(EX_SOFTWARE);
        }
    }

    /// A line-editing REPL with persistent history. Each line runs through the full
    /// pipeline independently; a bad line reports its error and the session continues.
    pub fn run_prompt(&mut self) {
        let history_path = home::home_dir().map(|home| home.join(".flint_history"));

        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(err) => {
                eprintln!("Could not start the line editor: {err}");
                process::exit(74);
            }
        };

        if let Some(path) = &history_path {
            let _ = editor.load_history(path);
        }

        loop {
            match editor.readline(">> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    self.run(&line);
                    error::reset();
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Readline error: {err}");
                    break;
                }
            }
        }

        if let Some(path) = &history_path {
            let _ = editor.save_history(path);
        }
    }

    /// Runs one chunk of source through the pipeline without touching the filesystem or
    /// the process exit code. Used by the REPL and by in-process integration tests that
    /// want to assert on captured output; `error::did_error()`/`did_runtime_error()` after
    /// the call report whether anything went wrong.
    pub fn run_str(&mut self, source: &str) {
        self.run(source);
    }

    fn run(&mut self, source: &str) {
        let (tokens, scan_errors) = Scanner::new(source).scan_tokens();
        for scan_error in &scan_errors {
            scan_error.throw();
        }
        if error::did_error() {
            return;
        }

        let statements = Parser::new(tokens).parse();
        if error::did_error() {
            return;
        }

        let mut resolver = Resolver::new(&mut self.interpreter);
        resolver.resolve(&statements);
        if error::did_error() {
            return;
        }

        self.interpreter.interpret(&statements);
    }
}

/// Convenience constructor wiring `print` output to real stdout, for the CLI binary.
pub fn stdout_flint() -> flint {
    flint::new(Rc::new(RefCell::new(io::stdout())))
}
