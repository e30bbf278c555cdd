#[macro_use]
mod common;

run_ok!(
    subclass_overrides_and_calls_super,
    "class A { speak() { print \"A\"; } } class B : A { speak() { super.speak(); print \"B\"; } } \
     B().speak();",
    ["A", "B"]
);

run_ok!(
    subclass_inherits_unoverridden_methods,
    "class A { greet() { print \"hello\"; } } class B : A {} B().greet();",
    ["hello"]
);

run_ok!(
    subclass_inherits_init_when_it_defines_none,
    "class A { init(v) { self.v = v; } } class B : A {} print B(5).v;",
    ["5"]
);

run_ok!(
    super_call_binds_self_to_the_calling_instance,
    "class A { who() { return self.name; } } \
     class B : A { init(name) { self.name = name; } who() { return super.who(); } } \
     print B(\"b\").who();",
    ["b"]
);

run_err!(a_class_cannot_inherit_from_itself, "class A : A {}");

run_err!(inheriting_from_a_non_class_is_a_runtime_error, "var NotAClass = 1; class A : NotAClass {}");

run_err!(super_outside_a_subclass_is_a_resolver_error, "class A { m() { super.m(); } }");
