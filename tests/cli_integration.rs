//! CLI integration tests for nativelink.
//!
//! These tests run the binary against manifests written to temporary
//! directories and check the printed command lines.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the nativelink binary command, isolated from the user's config.
fn nativelink(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("nativelink").unwrap();
    cmd.env("NATIVELINK_HOME", home)
        .env_remove("NATIVELINK_FAMILY")
        .env_remove("LIBRARY_PATH")
        .env_remove("LIB");
    cmd
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

fn write_project(root: &Path, manifest: &str, files: &[&str]) {
    fs::write(root.join("nativelink.toml"), manifest).unwrap();
    for file in files {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }
}

const GCC_PROJECT: &str = r#"
inputs = ["obj/main.o", "obj/util.o"]
output = "bin/app"

[toolchain]
family = "gcc-linker"

[link]
debug = true

[[library]]
libs = ["z"]
type = "static"

[[library]]
libs = ["m"]

[[search_path]]
dirs = ["lib"]

[[arg]]
value = "-DTRACE"
if = "trace"

[[arg]]
value = "-Wl,--as-needed"
location = "mid"
"#;

// ============================================================================
// nativelink args
// ============================================================================

#[test]
fn test_args_gcc_linker() {
    let tmp = temp_dir();
    write_project(tmp.path(), GCC_PROJECT, &["lib/libz.a"]);

    nativelink(tmp.path())
        .arg("args")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("gcc -g "))
        .stdout(predicate::str::contains("obj/main.o"))
        .stdout(predicate::str::contains(
            "-Wl,-Bstatic -lz -Wl,-Bdynamic -lm -Wl,--as-needed -o ",
        ))
        .stdout(predicate::str::contains("bin/app"))
        .stdout(predicate::str::contains("-DTRACE").not());
}

#[test]
fn test_args_define_switches_argument_on() {
    let tmp = temp_dir();
    write_project(tmp.path(), GCC_PROJECT, &[]);

    nativelink(tmp.path())
        .args(["args", "-D", "trace"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("gcc -DTRACE -g "));
}

#[test]
fn test_args_misleading_define_fails() {
    let tmp = temp_dir();
    write_project(tmp.path(), GCC_PROJECT, &[]);

    nativelink(tmp.path())
        .args(["args", "-D", "trace=false"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("trace"));
}

#[test]
fn test_args_family_override() {
    let tmp = temp_dir();
    write_project(tmp.path(), GCC_PROJECT, &["lib/libz.a"]);

    nativelink(tmp.path())
        .args(["args", "--family", "msvc-linker"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("link /NOLOGO /DEBUG"))
        .stdout(predicate::str::contains("z.lib m.lib"))
        .stdout(predicate::str::contains("/OUT:"));
}

#[test]
fn test_args_unknown_family_rejected() {
    let tmp = temp_dir();
    write_project(tmp.path(), GCC_PROJECT, &[]);

    nativelink(tmp.path())
        .args(["args", "--family", "borland-linker"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("borland-linker"));
}

#[test]
fn test_args_json() {
    let tmp = temp_dir();
    write_project(tmp.path(), GCC_PROJECT, &["lib/libz.a"]);

    let output = nativelink(tmp.path())
        .args(["args", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["family"], "gcc-linker");
    assert_eq!(report["invocations"].as_array().unwrap().len(), 1);
    assert_eq!(report["invocations"][0]["program"], "gcc");
    assert!(report["response_files"].as_array().unwrap().is_empty());
}

#[test]
fn test_args_require_files() {
    let tmp = temp_dir();
    write_project(tmp.path(), GCC_PROJECT, &["lib/libz.a"]);

    nativelink(tmp.path())
        .args(["args", "--require-files"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no file matching libm.so, libm.a"));
}

#[test]
fn test_args_alias_cycle_fails() {
    let tmp = temp_dir();
    write_project(
        tmp.path(),
        r#"
[toolchain]
family = "gcc-linker"

[[library]]
id = "a"
refid = "b"

[[library]]
id = "b"
refid = "a"
"#,
        &[],
    );

    nativelink(tmp.path())
        .arg("args")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("alias cycle"));
}

#[test]
fn test_args_one_invocation_per_input() {
    let tmp = temp_dir();
    write_project(
        tmp.path(),
        r#"
inputs = ["src/a.c", "src/b.c", "src/a.h"]

[toolchain]
family = "os400-icc-compiler"
"#,
        &[],
    );

    let output = nativelink(tmp.path())
        .arg("args")
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("icc -c ") && lines[0].ends_with("a.c"));
    assert!(lines[1].starts_with("icc -c ") && lines[1].ends_with("b.c"));
}

#[test]
fn test_args_response_file_for_long_command() {
    let tmp = temp_dir();
    let inputs: Vec<String> = (0..2000)
        .map(|i| format!("\"objects/module/object_{:04}.obj\"", i))
        .collect();
    let manifest = format!(
        "inputs = [{}]\noutput = \"app.exe\"\n[toolchain]\nfamily = \"msvc-linker\"\n",
        inputs.join(", ")
    );
    write_project(tmp.path(), &manifest, &[]);
    let rsp_dir = tmp.path().join("rsp");

    nativelink(tmp.path())
        .args(["args", "--response-dir"])
        .arg(&rsp_dir)
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("link @"));

    let files: Vec<_> = fs::read_dir(&rsp_dir).unwrap().collect();
    assert_eq!(files.len(), 1);
    let contents = fs::read_to_string(files[0].as_ref().unwrap().path()).unwrap();
    assert_eq!(contents.lines().next(), Some("/NOLOGO"));
    assert!(contents.contains("object_1999.obj"));
    assert!(contents.trim_end().ends_with("app.exe"));
}

#[test]
fn test_args_family_from_project_config() {
    let tmp = temp_dir();
    write_project(tmp.path(), "inputs = [\"main.c\"]\n", &[]);
    fs::create_dir_all(tmp.path().join(".nativelink")).unwrap();
    fs::write(
        tmp.path().join(".nativelink/config.toml"),
        "[toolchain]\nfamily = \"msvc-compiler\"\n",
    )
    .unwrap();

    nativelink(tmp.path())
        .arg("args")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("cl /nologo /c /O2"));
}

#[test]
fn test_args_manifest_found_from_subdirectory() {
    let tmp = temp_dir();
    write_project(tmp.path(), GCC_PROJECT, &[]);
    let nested = tmp.path().join("src/deep");
    fs::create_dir_all(&nested).unwrap();

    nativelink(tmp.path())
        .arg("args")
        .current_dir(&nested)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("gcc "));
}

#[test]
fn test_args_without_manifest_fails() {
    let tmp = temp_dir();

    nativelink(tmp.path())
        .arg("args")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("nativelink.toml"));
}

// ============================================================================
// nativelink libs
// ============================================================================

#[test]
fn test_libs_lists_matches() {
    let tmp = temp_dir();
    write_project(tmp.path(), GCC_PROJECT, &["lib/libz.a", "lib/libz.so"]);

    nativelink(tmp.path())
        .arg("libs")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Libraries for `gcc-linker`"))
        .stdout(predicate::str::contains("libz.a"))
        .stdout(predicate::str::contains("libz.so").not())
        .stdout(predicate::str::contains("m: unresolved"))
        .stderr(predicate::str::contains("warning"))
        .stderr(predicate::str::contains("no file matching libm.so, libm.a for library `m`"));
}

// ============================================================================
// nativelink families / completions
// ============================================================================

#[test]
fn test_families_lists_all() {
    let tmp = temp_dir();

    let assert = nativelink(tmp.path()).arg("families").assert().success();
    for id in [
        "msvc-linker",
        "intel-win-linker",
        "msvc-compiler",
        "gcc-linker",
        "gcc-compiler",
        "intel-linux64-compiler",
        "os400-icc-compiler",
    ] {
        assert!(String::from_utf8_lossy(&assert.get_output().stdout).contains(id));
    }
}

#[test]
fn test_families_json() {
    let tmp = temp_dir();

    let output = nativelink(tmp.path())
        .args(["families", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 7);
    let icc = rows.iter().find(|r| r["id"] == "os400-icc-compiler").unwrap();
    assert_eq!(icc["max_inputs_per_invocation"], 1);
    assert_eq!(icc["response_files"], false);
}

#[test]
fn test_completions_bash() {
    let tmp = temp_dir();

    nativelink(tmp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nativelink"));
}
