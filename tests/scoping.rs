#[macro_use]
mod common;

run_ok!(
    block_scoped_variable_shadows_and_restores,
    "var a = \"outer\"; { var a = \"inner\"; print a; } print a;",
    ["inner", "outer"]
);

run_ok!(
    assignment_does_not_create_a_new_binding,
    "var a = 1; { a = 2; } print a;",
    ["2"]
);

run_ok!(
    global_variable_without_initializer_defaults_to_nil,
    "var a; print a;",
    ["nil"]
);

run_ok!(
    for_loop_variable_is_scoped_to_the_loop,
    "for (var i = 0; i < 1; i = i + 1) {} var i = \"outer\"; print i;",
    ["outer"]
);

run_err!(redeclaring_a_name_in_the_same_block_is_a_resolver_error, "{ var a = 1; var a = 2; }");

run_err!(reading_a_variable_in_its_own_initializer_is_a_resolver_error, "{ var a = a; }");

run_err!(reading_an_undefined_global_is_a_runtime_error, "print undefined;");

run_err!(self_outside_a_class_is_a_resolver_error, "print self;");
