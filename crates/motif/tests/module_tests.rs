use std::fs;

use motif::{CollectIo, Interp, parse};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Runs a program with the module root pointed at a temp directory.
fn run_with_root(dir: &TempDir, src: &str) -> (String, String) {
    let io = CollectIo::default();
    let mut interp = Interp::with_io(Box::new(io.clone()));
    interp.set_module_root(dir.path());
    let program = parse(src).expect("program should parse");
    interp.run(&program).expect("program should run");
    (io.stdout(), io.stderr())
}

fn write_module(dir: &TempDir, rel: &str, contents: &str) {
    let path = dir.path().join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create module directory");
    }
    fs::write(path, contents).expect("write module file");
}

#[test]
fn import_binds_module_under_last_segment() {
    let dir = TempDir::new().expect("tempdir");
    write_module(&dir, "mathx.lang", "pub fn double(n) { return n * 2 }\nvar base = 21\n");
    let (stdout, stderr) = run_with_root(&dir, "import mathx\nprintln(mathx.double(mathx.base))");
    assert_eq!(stdout, "42\n");
    assert_eq!(stderr, "");
}

#[test]
fn import_with_alias() {
    let dir = TempDir::new().expect("tempdir");
    write_module(&dir, "mathx.lang", "var answer = 42\n");
    let (stdout, _) = run_with_root(&dir, "import mathx as m\nprintln(m.answer)");
    assert_eq!(stdout, "42\n");
}

#[test]
fn import_of_items_with_aliases() {
    let dir = TempDir::new().expect("tempdir");
    write_module(&dir, "toolbox.lang", "fn triple(n) { return n * 3 }\nvar k = 2\n");
    let (stdout, _) = run_with_root(&dir, "import toolbox of { triple as t, k }\nprintln(t(k))");
    assert_eq!(stdout, "6\n");
}

#[test]
fn dotted_names_resolve_into_subdirectories() {
    let dir = TempDir::new().expect("tempdir");
    write_module(&dir, "a/b/c.lang", "var deep = \"found\"\n");
    let (stdout, _) = run_with_root(&dir, "import a.b.c\nprintln(c.deep)");
    assert_eq!(stdout, "found\n");
}

#[test]
fn second_import_shares_the_cached_module() {
    let dir = TempDir::new().expect("tempdir");
    write_module(&dir, "state.lang", "var counter = 0\n");
    let src = "import state as s1\nimport state as s2\ns1.counter = 5\nprintln(s2.counter)";
    let (stdout, _) = run_with_root(&dir, src);
    assert_eq!(stdout, "5\n");
}

#[test]
fn module_functions_close_over_their_module_environment() {
    let dir = TempDir::new().expect("tempdir");
    write_module(&dir, "counterlib.lang", "var hits = 0\nfn bump() { hits = hits + 1\n return hits }\n");
    let src = "import counterlib of bump\nbump()\nbump()\nprintln(bump())";
    let (stdout, _) = run_with_root(&dir, src);
    assert_eq!(stdout, "3\n");
}

#[test]
fn missing_module_reports_and_binds_null() {
    let dir = TempDir::new().expect("tempdir");
    let (stdout, stderr) = run_with_root(&dir, "import nope\nprintln(is_null(nope))");
    assert_eq!(stdout, "true\n");
    assert!(stderr.contains("Module not found"), "stderr: {stderr}");
}

#[test]
fn module_parse_error_reports_and_binds_null() {
    let dir = TempDir::new().expect("tempdir");
    write_module(&dir, "broken.lang", "var = = =\n");
    let (stdout, stderr) = run_with_root(&dir, "import broken\nprintln(is_null(broken))");
    assert_eq!(stdout, "true\n");
    assert!(stderr.contains("Parse error in module"), "stderr: {stderr}");
}

#[test]
fn module_runtime_error_reports_and_binds_null() {
    let dir = TempDir::new().expect("tempdir");
    write_module(&dir, "explodes.lang", "var x = 1 / 0\n");
    let (stdout, stderr) = run_with_root(&dir, "import explodes\nprintln(is_null(explodes))");
    assert_eq!(stdout, "true\n");
    assert!(
        stderr.contains("Runtime error in module") && stderr.contains("division by zero"),
        "stderr: {stderr}"
    );
}

#[test]
fn circular_imports_short_circuit_instead_of_recursing() {
    let dir = TempDir::new().expect("tempdir");
    write_module(&dir, "alpha.lang", "import beta\nvar a = 1\n");
    write_module(&dir, "beta.lang", "import alpha\nvar b = 2\n");
    let (stdout, stderr) = run_with_root(&dir, "import alpha\nprintln(alpha.a)");
    assert_eq!(stdout, "1\n");
    assert!(stderr.contains("Circular import"), "stderr: {stderr}");
}

#[test]
fn failed_load_is_retried_after_the_failure_is_fixed() {
    let dir = TempDir::new().expect("tempdir");
    write_module(&dir, "flaky.lang", "var x = 1 / 0\n");

    let io = CollectIo::default();
    let mut interp = Interp::with_io(Box::new(io.clone()));
    interp.set_module_root(dir.path());

    let program = parse("import flaky\nprintln(is_null(flaky))").expect("parse");
    interp.run(&program).expect("run");
    assert_eq!(io.stdout(), "true\n");

    // same interpreter, fixed file: the sentinel must not linger
    write_module(&dir, "flaky.lang", "var x = 7\n");
    let program = parse("import flaky\nprintln(flaky.x)").expect("parse");
    interp.run(&program).expect("run");
    assert!(io.stdout().ends_with("7\n"), "stdout: {}", io.stdout());
}

#[test]
fn pattern_declarations_are_importable() {
    let dir = TempDir::new().expect("tempdir");
    write_module(&dir, "shapes.lang", "pat Point { var x\n var y }\n");
    let src = "import shapes of Point\nvar p = Point(3, 4)\nprintln(p.x + p.y)";
    let (stdout, _) = run_with_root(&dir, src);
    assert_eq!(stdout, "7\n");
}
