//! End-to-end CLI integration test: a real markup file and stylesheet on
//! disk, run through the actual binary, asserting on stdout and exit code
//! rather than calling any library function directly.

use std::io::Write;
use std::process::Command;

fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("borrowser-cli-test-{}-{}", std::process::id(), name));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_borrowser")
}

#[test]
fn renders_a_simple_page_to_stdout_with_exit_code_zero() {
    let html = write_temp(
        "page.html",
        r#"<html><body><div id="box"><p>hello world</p></div></body></html>"#,
    );
    let css = write_temp(
        "page.css",
        "#box { width: 300px; background-color: #ffffff; } p { color: #112233; }",
    );

    let output = Command::new(bin())
        .arg("--html")
        .arg(&html)
        .arg("--css")
        .arg(&css)
        .output()
        .expect("failed to run binary");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("html rect="));
    assert!(stdout.contains("div rect="));
    assert!(stdout.contains("hello world"));

    std::fs::remove_file(html).ok();
    std::fs::remove_file(css).ok();
}

#[test]
fn missing_html_file_exits_non_zero_with_stderr_message() {
    let mut missing = std::env::temp_dir();
    missing.push(format!("borrowser-cli-test-{}-does-not-exist.html", std::process::id()));

    let output = Command::new(bin())
        .arg("--html")
        .arg(&missing)
        .output()
        .expect("failed to run binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains(missing.to_str().unwrap()));
}

#[test]
fn missing_stylesheet_file_exits_non_zero() {
    let html = write_temp("page2.html", "<html><body><p>x</p></body></html>");
    let mut missing_css = std::env::temp_dir();
    missing_css.push(format!("borrowser-cli-test-{}-missing.css", std::process::id()));

    let output = Command::new(bin())
        .arg("--html")
        .arg(&html)
        .arg("--css")
        .arg(&missing_css)
        .output()
        .expect("failed to run binary");

    assert!(!output.status.success());

    std::fs::remove_file(html).ok();
}
