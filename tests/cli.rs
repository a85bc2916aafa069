use assert_cmd::Command;

#[test]
fn help_flag_prints_usage() {
    let output = Command::cargo_bin("devtype")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("typing-practice"));
    assert!(stdout.contains("--list"));
}

#[test]
fn list_flag_prints_snippets_without_a_tty() {
    let output = Command::cargo_bin("devtype")
        .unwrap()
        .args(["--list", "-l", "python"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("py1"));
    assert!(stdout.contains("Quick Sort"));
}

#[test]
fn rejects_non_tty_stdin_for_interactive_run() {
    let output = Command::cargo_bin("devtype").unwrap().output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("stdin must be a tty"));
}
