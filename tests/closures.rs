#[macro_use]
mod common;

run_ok!(
    counter_closure_retains_state_across_calls,
    "def makeCounter() { var i = 0; def count() { i = i + 1; return i; } return count; } \
     var c = makeCounter(); print c(); print c(); print c();",
    ["1", "2", "3"]
);

run_ok!(
    two_closures_over_the_same_function_do_not_share_state,
    "def makeCounter() { var i = 0; def count() { i = i + 1; return i; } return count; } \
     var a = makeCounter(); var b = makeCounter(); print a(); print a(); print b();",
    ["1", "2", "1"]
);

run_ok!(
    variable_resolution_is_lexical_not_dynamic,
    "var a = \"global\"; { def show() { print a; } show(); var a = \"local\"; show(); }",
    ["global", "global"]
);

run_ok!(
    anonymous_function_closes_over_its_environment,
    "var x = \"captured\"; var f = def() { print x; }; f();",
    ["captured"]
);

run_ok!(
    anonymous_function_is_callable_with_arguments,
    "var add = def(a, b) { return a + b; }; print add(2, 3);",
    ["5"]
);

run_ok!(
    closure_over_loop_variable_observes_the_block_scoped_value,
    "var fns = nil; { var i = 0; def get() { return i; } fns = get; i = 99; } print fns();",
    ["99"]
);
