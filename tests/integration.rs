//! End-to-end scenarios driving the compiled binary as a subprocess (§8).
use std::str;

use test_utils::{run_and_check, run_dump, Expected, SourceFile};

fn tmp(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("why-interp-test-{name}-{}", std::process::id()))
}

#[test]
fn hello_world() {
    let dir = tmp("hello");
    let file = SourceFile::write(&dir, "hello.why", r#"func main() { println("hello, world!"); }"#).unwrap();

    run_and_check(&[file.path()], &[], "", Expected { stdout: "hello, world!\n", stderr: "", exit_code: 0 }).unwrap();
}

#[test]
fn factorial_with_include() {
    let dir = tmp("factorial");
    let factorial = SourceFile::write(
        &dir,
        "factorial.why",
        r#"
func factorial(int n) -> int {
    if (n == 0) {
        return 1;
    }
    return n * factorial(n - 1);
}
"#,
    )
    .unwrap();

    let use_file_contents = format!(
        r#"
include "{}";

func main() {{
    if (no_arguments() > 0) {{
        println(factorial(argument(0)));
    }} else {{
        println("no argument given");
    }}
}}
"#,
        factorial.path().display()
    );
    let use_file = SourceFile::write(&dir, "factorialUse.why", &use_file_contents).unwrap();

    run_and_check(&[use_file.path()], &["3"], "", Expected { stdout: "6\n", stderr: "", exit_code: 0 }).unwrap();

    run_and_check(&[use_file.path()], &[], "", Expected { stdout: "no argument given\n", stderr: "", exit_code: 0 }).unwrap();

    // The string-to-int cast fails before `factorial` is ever called; assert
    // the distinctive message rather than the exact position, which depends
    // on where the call site falls in the generated source.
    let output = std::process::Command::new("./target/debug/why").arg(use_file.path()).arg("--args").arg("abc").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = str::from_utf8(&output.stderr).unwrap();
    assert!(stderr.contains("Conversion of string abc to integer failed"), "got: {stderr}");
}

#[test]
fn factorial_negative_argument_overflows_recursion() {
    let dir = tmp("factorial-neg");
    let factorial = SourceFile::write(
        &dir,
        "factorial.why",
        r#"
func factorial(int n) -> int {
    if (n == 0) {
        return 1;
    }
    return n * factorial(n - 1);
}
"#,
    )
    .unwrap();
    let use_file_contents = format!(
        r#"
include "{}";

func main() {{
    println(factorial(argument(0)));
}}
"#,
        factorial.path().display()
    );
    let use_file = SourceFile::write(&dir, "factorialUse.why", &use_file_contents).unwrap();

    let output = std::process::Command::new("./target/debug/why")
        .arg(use_file.path())
        .arg("--args")
        .arg("-1")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = str::from_utf8(&output.stderr).unwrap();
    assert!(stderr.contains("Recursion limit exceeded"), "got: {stderr}");
}

#[test]
fn line_number_adder() {
    let dir = tmp("adder");
    let file = SourceFile::write(
        &dir,
        "adder.why",
        r#"
func main() {
    $str prefix = "";
    if (no_arguments() > 0) {
        prefix = argument(0);
    }
    $int index = 1;
    while (true) {
        str line = input();
        if (len(line) == 0) {
            return;
        }
        println(prefix ! index ! " " ! line);
        index = index + 1;
    }
}
"#,
    )
    .unwrap();

    run_and_check(
        &[file.path()],
        &[],
        "first line\nsecond line\nthird line\n",
        Expected { stdout: "1 first line\n2 second line\n3 third line\n", stderr: "", exit_code: 0 },
    )
    .unwrap();

    run_and_check(
        &[file.path()],
        &["a"],
        "first line\nsecond line\nthird line\n",
        Expected { stdout: "a1 first line\na2 second line\na3 third line\n", stderr: "", exit_code: 0 },
    )
    .unwrap();
}

#[test]
fn tree_dump_has_fixed_sections_in_order() {
    let dir = tmp("dump");
    let file = SourceFile::write(&dir, "adder.why", r#"func main() { println("hi"); }"#).unwrap();

    let output = run_dump(&[file.path()]).unwrap();
    assert_eq!(output.status.code(), Some(0));
    let stdout = str::from_utf8(&output.stdout).unwrap();

    assert!(stdout.starts_with("Program containing:\n"));
    // Builtins are merged in, so Functions: is always present; this source
    // declares no structs/variants, so those sections are omitted.
    assert!(!stdout.contains("Structs:"));
    assert!(!stdout.contains("Variants:"));
    assert!(stdout.contains("Functions:"));
    assert!(stdout.contains("FunctionDeclaration"));
    assert!(stdout.contains("main"));
    // `len`/`argument` declare a return type and must show it; `main` and
    // `print`/`println` are void and must omit `returnType=` entirely.
    assert!(stdout.contains("returnType=int"));
    assert!(stdout.contains("returnType=str"));
}

#[test]
fn syntax_error_reports_pipeline_format() {
    let dir = tmp("syntax-error");
    let file = SourceFile::write(&dir, "broken.why", "func f() }").unwrap();

    let output = std::process::Command::new("./target/debug/why").arg(file.path()).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = str::from_utf8(&output.stderr).unwrap();
    assert!(stderr.starts_with("Error: Expected"), "got: {stderr}");
    assert!(stderr.contains(&format!("in file {}", file.path().display())), "got: {stderr}");
}

#[test]
fn duplicate_main_across_includes() {
    let dir = tmp("dup-main");
    let b = SourceFile::write(&dir, "b.why", r#"func main() { println("B"); }"#).unwrap();
    let a_contents = format!(r#"include "{}"; func main() {{ println("A"); }}"#, b.path().display());
    let a = SourceFile::write(&dir, "a.why", &a_contents).unwrap();

    let output = std::process::Command::new("./target/debug/why").arg(a.path()).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = str::from_utf8(&output.stderr).unwrap();
    assert!(stderr.contains("Duplicate function with signature main"), "got: {stderr}");
}
