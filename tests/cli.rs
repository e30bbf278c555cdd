use assert_cmd::Command;

#[test]
fn a_well_formed_program_exits_zero_and_prints_its_output() {
    Command::cargo_bin("flint")
        .unwrap()
        .arg("tests/fixtures/ok.flint")
        .assert()
        .success()
        .stdout("hi world\n");
}

#[test]
fn a_syntax_error_exits_64_and_does_not_run_anything() {
    Command::cargo_bin("flint")
        .unwrap()
        .arg("tests/fixtures/syntax_error.flint")
        .assert()
        .code(64)
        .stdout("");
}

#[test]
fn a_resolver_error_exits_64_and_does_not_run_anything() {
    Command::cargo_bin("flint")
        .unwrap()
        .arg("tests/fixtures/resolver_error.flint")
        .assert()
        .code(64)
        .stdout("");
}

#[test]
fn a_runtime_error_exits_70() {
    Command::cargo_bin("flint")
        .unwrap()
        .arg("tests/fixtures/runtime_error.flint")
        .assert()
        .code(70);
}

#[test]
fn more_than_one_argument_prints_usage_and_exits_64() {
    Command::cargo_bin("flint")
        .unwrap()
        .arg("tests/fixtures/ok.flint")
        .arg("extra")
        .assert()
        .code(64);
}
