#[macro_use]
mod common;

run_ok!(
    if_else_picks_a_branch,
    "if (1 < 2) { print \"yes\"; } else { print \"no\"; }",
    ["yes"]
);

run_ok!(
    if_without_else_is_optional,
    "if (false) { print \"unreachable\"; }",
    []
);

run_ok!(
    while_loop_counts_up,
    "var i = 0; while (i < 3) { print i; i = i + 1; }",
    ["0", "1", "2"]
);

run_ok!(
    break_exits_the_nearest_loop,
    "for (var i = 0; i < 5; i = i + 1) { if (i == 3) break; print i; }",
    ["0", "1", "2"]
);

run_ok!(
    continue_skips_the_rest_of_the_body,
    "var out = \"\"; for (var i = 0; i < 5; i = i + 1) { if (i == 2) continue; out = out + i; } print out;",
    ["0134"]
);

run_ok!(
    nested_loops_break_only_the_inner_one,
    "for (var i = 0; i < 2; i = i + 1) { for (var j = 0; j < 3; j = j + 1) { if (j == 1) break; print i; } }",
    ["0", "1"]
);

run_ok!(
    and_short_circuits_without_evaluating_the_right_operand,
    "def boom() { print \"boom\"; return true; } print false and boom();",
    ["false"]
);

run_ok!(
    or_short_circuits_without_evaluating_the_right_operand,
    "def boom() { print \"boom\"; return true; } print true or boom();",
    ["true"]
);

run_ok!(
    logical_operators_return_the_operand_not_a_bool,
    "print nil or \"fallback\"; print 1 and 2;",
    ["fallback", "2"]
);

run_err!(break_outside_a_loop_is_a_runtime_error, "break;");

run_err!(continue_outside_a_loop_is_a_runtime_error, "continue;");

run_err!(return_outside_a_function_is_a_resolver_error, "return 1;");
