#[macro_use]
mod common;

run_ok!(
    init_sets_fields_and_methods_read_them,
    "class Greeter { init(name) { self.name = name; } hi() { print \"hi \" + self.name; } } \
     Greeter(\"world\").hi();",
    ["hi world"]
);

run_ok!(
    bare_return_in_an_initializer_yields_self,
    "class Box { init(v) { self.v = v; return; } } var b = Box(1); print b.v;",
    ["1"]
);

run_ok!(
    instance_fields_shadow_methods_with_the_same_name,
    "class C { m() { return \"method\"; } } var c = C(); c.m = \"field\"; print c.m;",
    ["field"]
);

run_ok!(
    a_class_without_init_has_zero_arity,
    "class Empty {} print Empty();",
    ["Empty instance"]
);

run_ok!(
    methods_bind_self_independently_per_instance,
    "class Counter { init() { self.n = 0; } bump() { self.n = self.n + 1; return self.n; } } \
     var a = Counter(); var b = Counter(); print a.bump(); print a.bump(); print b.bump();",
    ["1", "2", "1"]
);

run_ok!(
    a_method_value_read_off_an_instance_is_a_bound_function,
    "class C { greet() { print \"hi\"; } } var c = C(); var m = c.greet; m();",
    ["hi"]
);

run_err!(getting_an_undefined_property_is_a_runtime_error, "class C {} print C().missing;");

run_err!(calling_a_non_callable_value_is_a_runtime_error, "var x = 1; x();");

run_err!(arity_mismatch_is_a_runtime_error, "def f(a, b) { return a; } f(1);");
