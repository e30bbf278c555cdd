/// Serializes access to the pipeline's process-global error flags (see `flint::error`).
/// Integration tests in a single binary run on separate threads by default; without this
/// lock two tests could stomp on each other's `HAD_ERROR`/`HAD_RUNTIME_ERROR` state.
pub static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Runs `$source` through the full pipeline in-process and asserts its stdout against
/// `$expected` lines. Mirrors the teacher repo's fixture-driven `tests!` macro, but embeds
/// the source directly instead of reading a companion file, since each scenario here is a
/// handful of lines rather than a full program.
#[macro_export]
macro_rules! run_ok {
    ($name:ident, $source:expr, [$($expected:expr),* $(,)?]) => {
        #[test]
        fn $name() {
            use std::cell::RefCell;
            use std::io::Write;
            use std::rc::Rc;

            use flint::error;
            use flint::flint;

            let _guard = $crate::common::TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            error::reset();

            let output = Rc::new(RefCell::new(Vec::new()));
            let mut vm = flint::new(Rc::clone(&output) as Rc<RefCell<dyn Write>>);
            vm.run_str($source);

            assert!(!error::did_error(), "unexpected syntax/resolution error for {}", stringify!($name));
            assert!(!error::did_runtime_error(), "unexpected runtime error for {}", stringify!($name));

            let expected_lines: Vec<&str> = vec![$($expected),*];
            let expected = if expected_lines.is_empty() {
                String::new()
            } else {
                let mut joined = expected_lines.join("\n");
                joined.push('\n');
                joined
            };

            let got = String::from_utf8(output.borrow().clone()).unwrap();
            assert_eq!(got, expected);

            error::reset();
        }
    };
}

/// Runs `$source` through the pipeline and asserts that it halts with an error, without
/// pinning the exact diagnostic text (message wording is an implementation detail).
#[macro_export]
macro_rules! run_err {
    ($name:ident, $source:expr) => {
        #[test]
        fn $name() {
            use std::cell::RefCell;
            use std::io::Write;
            use std::rc::Rc;

            use flint::error;
            use flint::flint;

            let _guard = $crate::common::TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            error::reset();

            let output = Rc::new(RefCell::new(Vec::new()));
            let mut vm = flint::new(Rc::clone(&output) as Rc<RefCell<dyn Write>>);
            vm.run_str($source);

            assert!(
                error::did_error() || error::did_runtime_error(),
                "expected {} to report an error",
                stringify!($name)
            );

            error::reset();
        }
    };
}
