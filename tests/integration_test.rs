use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn script_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("autoscript_{}_{name}.csv", std::process::id()))
}

fn run_script(path: &PathBuf, extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_autoscript"))
        .arg("--script")
        .arg(path)
        .arg("--tick-ms")
        .arg("5")
        .args(extra)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute autoscript")
}

#[test]
fn test_basic_script_execution() {
    let script = "Print,hello from auto\r\nWait,50\r\nPrint,all done\r\n";

    let path = script_path("basic");
    fs::write(&path, script).expect("Failed to write test script");

    let output = run_script(&path, &[]);

    assert!(
        output.status.success(),
        "autoscript failed with stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    let hello = stderr.find("hello from auto").expect("first message logged");
    let done = stderr.find("all done").expect("second message logged");
    assert!(hello < done, "Messages should be logged in script order");
    assert!(stderr.contains("autonomous script finished"));

    let _ = fs::remove_file(&path);
}

#[test]
fn test_unknown_command_is_skipped() {
    let script = "Fly,100\nPrint,still running\n";

    let path = script_path("unknown");
    fs::write(&path, script).expect("Failed to write test script");

    let output = run_script(&path, &[]);

    assert!(
        output.status.success(),
        "autoscript should keep going past an unknown command, stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown command"),
        "Diagnostic should mention the unknown command"
    );
    assert!(stderr.contains("still running"));

    let _ = fs::remove_file(&path);
}

#[test]
fn test_missing_script_fails() {
    let path = script_path("does_not_exist");
    let _ = fs::remove_file(&path);

    let output = run_script(&path, &[]);

    assert!(
        !output.status.success(),
        "autoscript should fail when the script is missing"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to load script file"),
        "Error should mention the script, got: {stderr}"
    );
}

#[test]
fn test_malformed_script_fails() {
    let path = script_path("malformed");
    fs::write(&path, "Print,ok\n,10\n").expect("Failed to write test script");

    let output = run_script(&path, &[]);

    assert!(!output.status.success(), "autoscript should reject the script");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("line 2"), "got: {stderr}");

    let _ = fs::remove_file(&path);
}

#[test]
fn test_period_elapsed_kills_script() {
    let path = script_path("period");
    fs::write(&path, "Wait,60000\nPrint,never reached\n").expect("Failed to write test script");

    let output = run_script(&path, &["--period-ms", "100"]);

    assert!(
        output.status.success(),
        "autoscript failed with stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("autonomous period elapsed"));
    assert!(!stderr.contains("never reached"));

    let _ = fs::remove_file(&path);
}

#[test]
fn test_start_delay_option() {
    let path = script_path("delay");
    fs::write(&path, "Print,after delay\n").expect("Failed to write test script");

    let started = std::time::Instant::now();
    let output = run_script(&path, &["--start-delay-ms", "200"]);

    assert!(output.status.success());
    assert!(started.elapsed() >= std::time::Duration::from_millis(200));
    assert!(String::from_utf8_lossy(&output.stderr).contains("after delay"));

    let _ = fs::remove_file(&path);
}
