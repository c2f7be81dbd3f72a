use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const HELLO: &str = r#"package main

func main() {
b0:
    %t0 = call $println("hi")
    ret
}
"#;

const HELLO_LL: &str = r#"; ModuleID = 'main'

@.str = global [2 x i8] c"hi"

declare void @printf(...)

define void @main() {
b0:
  call void (...) @printf(ptr @.str)
  ret void
}
"#;

fn lowir() -> Command {
    Command::cargo_bin("lowir").unwrap()
}

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_compile_hello_world_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "hello.ssa", HELLO);

    lowir()
        .arg("compile")
        .arg(&input)
        .assert()
        .success()
        .stdout(HELLO_LL);
}

#[test]
fn test_compile_to_output_file() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "hello.ssa", HELLO);
    let output = dir.path().join("hello.ll");

    lowir()
        .arg("compile")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(fs::read_to_string(&output).unwrap(), HELLO_LL);
}

#[test]
fn test_compile_json_output() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "hello.ssa", HELLO);

    let assert = lowir()
        .args(["compile", "--emit", "json"])
        .arg(&input)
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["name"], "main");
    assert_eq!(json["functions"][0]["name"], "printf");
}

#[test]
fn test_unknown_builtin_fails() {
    let dir = TempDir::new().unwrap();
    let input = write(
        dir.path(),
        "len.ssa",
        "package main\n\nfunc main() {\nb0:\n    %t0 = call $len(\"x\")\n    ret\n}\n",
    );

    lowir()
        .arg("compile")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unimplemented builtin: len"));
}

#[test]
fn test_unsupported_instruction_fails() {
    let dir = TempDir::new().unwrap();
    let input = write(
        dir.path(),
        "neg.ssa",
        "package main\n\nfunc main() {\nb0:\n    %t0 = neg 1\n    ret\n}\n",
    );

    lowir()
        .arg("compile")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unimplemented instruction kind: unop"));
}

#[test]
fn test_entry_selection() {
    let dir = TempDir::new().unwrap();
    let input = write(
        dir.path(),
        "two.ssa",
        "package main\n\nfunc main() {\nb0:\n    ret\n}\n\nfunc start() {\nb0:\n    %t0 = add 1, 2\n    ret\n}\n",
    );

    lowir()
        .args(["compile", "--entry", "start"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("define void @start()"))
        .stdout(predicate::str::contains("%t0 = add i64 1, 2"))
        .stdout(predicate::str::contains("@main").not());

    lowir()
        .args(["compile", "--all-functions"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("define void @main()"))
        .stdout(predicate::str::contains("define void @start()"));
}

#[test]
fn test_flags_override_config_file() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "hello.ssa", HELLO);
    let config = write(
        dir.path(),
        "lowir.json",
        r#"{ "lower": { "output_function": "puts" }, "emit": { "include_header": false } }"#,
    );

    lowir()
        .arg("compile")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("declare void @puts(...)"))
        .stdout(predicate::str::contains("ModuleID").not());

    lowir()
        .arg("compile")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .args(["--output-function", "rt_print", "--nul-terminate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("declare void @rt_print(...)"))
        .stdout(predicate::str::contains(r#"c"hi\00""#));
}

#[test]
fn test_directory_and_json_inputs() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    fs::create_dir(&src).unwrap();
    write(&src, "main.ssa", HELLO);

    lowir()
        .arg("compile")
        .arg(&src)
        .assert()
        .success()
        .stdout(HELLO_LL);

    let program = lowir_parser::parse_program(HELLO).unwrap();
    let json = write(
        dir.path(),
        "hello.json",
        &serde_json::to_string(&program).unwrap(),
    );
    lowir()
        .arg("compile")
        .arg(&json)
        .assert()
        .success()
        .stdout(HELLO_LL);
}

#[test]
fn test_check() {
    let dir = TempDir::new().unwrap();
    let good = write(dir.path(), "good.ssa", HELLO);
    let bad = write(dir.path(), "bad.ssa", "package main\n\nfunc main( {\n");

    lowir()
        .arg("check")
        .arg(&good)
        .assert()
        .success()
        .stdout(predicate::str::contains("VALID"));

    lowir()
        .arg("check")
        .arg(&bad)
        .assert()
        .failure()
        .stdout(predicate::str::contains("INVALID"));
}

#[test]
fn test_dump_prints_textual_ssa() {
    let dir = TempDir::new().unwrap();
    let input = write(dir.path(), "hello.ssa", HELLO);

    lowir()
        .arg("dump")
        .arg(&input)
        .assert()
        .success()
        .stdout(HELLO);
}
