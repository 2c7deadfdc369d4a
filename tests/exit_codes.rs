use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicU64, Ordering};

fn initcheck_cmd(work: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_initcheck"));
    cmd.current_dir(work);
    cmd.env_remove("RUST_LOG");
    cmd.env_remove("INITCHECK_UI_COLOR");
    cmd.env_remove("INITCHECK_UI_WRAP_WIDTH");
    cmd.env_remove("INITCHECK_SCAN_DIRECTORY");
    cmd.env_remove("INITCHECK_SCAN_EXCLUDE");
    cmd.env_remove("INITCHECK_PACKAGES_RPM_COMMAND");
    cmd.env_remove("INITCHECK_CLASSIFY_VENDOR_PREFIX");
    cmd
}

fn run(work: &Path, args: &[&str]) -> Output {
    initcheck_cmd(work).args(args).output().expect("run initcheck")
}

fn make_work_dir() -> PathBuf {
    static WORK_SEQ: AtomicU64 = AtomicU64::new(0);
    let seq = WORK_SEQ.fetch_add(1, Ordering::Relaxed);
    let work = std::env::temp_dir().join(format!(
        "initcheck-exit-test-{}-{seq}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&work);
    std::fs::create_dir_all(&work).expect("create work dir");
    work
}

fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("mkdirs");
    }
    std::fs::write(path, bytes).expect("write");
}

#[test]
fn missing_directory_reports_nothing_to_do_and_exits_0() {
    let work = make_work_dir();
    let missing = work.join("no-such-init.d");
    let out = run(&work, &["--dir", missing.to_str().expect("utf8 path")]);

    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(
        stdout.lines().next(),
        Some("No init scripts found. Nothing needs to be done."),
        "stdout={stdout}"
    );
    let _ = std::fs::remove_dir_all(&work);
}

#[test]
fn empty_directory_needs_no_package_manager() {
    let work = make_work_dir();
    let dir = work.join("init.d");
    std::fs::create_dir_all(&dir).expect("mkdir");

    let out = initcheck_cmd(&work)
        .env("INITCHECK_PACKAGES_RPM_COMMAND", "initcheck-missing-rpm-binary")
        .env("INITCHECK_SCAN_DIRECTORY", &dir)
        .output()
        .expect("run initcheck");
    assert_eq!(out.status.code(), Some(0));
    let _ = std::fs::remove_dir_all(&work);
}

#[test]
fn unusable_package_manager_leaves_packages_unknown() {
    let work = make_work_dir();
    let dir = work.join("init.d");
    write_file(&dir.join("myapp"), b"exec myapp\n");

    let out = initcheck_cmd(&work)
        .env("INITCHECK_PACKAGES_RPM_COMMAND", "initcheck-missing-rpm-binary")
        .args(["--json", "--dir", dir.to_str().expect("utf8 path")])
        .output()
        .expect("run initcheck");

    assert_eq!(out.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).expect("parse json");
    let script = &report["scripts"][0];
    assert_eq!(script["name"], "myapp");
    assert!(script["package"].is_null());
    assert_eq!(script["origin"], "(unknown)");
    assert_eq!(script["remediation"]["action_needed"], true);

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("owner query failed"), "stderr={stderr}");
    let _ = std::fs::remove_dir_all(&work);
}

#[test]
fn bare_environment_still_runs() {
    let work = make_work_dir();
    let missing = work.join("no-such-init.d");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_initcheck"));
    cmd.env_clear();
    if let Some(path) = std::env::var_os("PATH") {
        cmd.env("PATH", path);
    }
    let out = cmd
        .args(["--dir", missing.to_str().expect("utf8 path")])
        .output()
        .expect("run initcheck");

    assert_eq!(
        out.status.code(),
        Some(0),
        "stderr={}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(
        stdout.lines().next(),
        Some("No init scripts found. Nothing needs to be done.")
    );
    let _ = std::fs::remove_dir_all(&work);
}

#[test]
fn completion_unknown_shell_exits_2() {
    let work = make_work_dir();
    let out = run(&work, &["completion", "nope"]);
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&work);
}

#[test]
fn completion_bash_succeeds() {
    let work = make_work_dir();
    let out = run(&work, &["completion", "bash"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("initcheck"));
    let _ = std::fs::remove_dir_all(&work);
}

#[test]
fn invalid_exclude_exits_2() {
    let work = make_work_dir();
    let out = initcheck_cmd(&work)
        .env("INITCHECK_SCAN_EXCLUDE", "[")
        .output()
        .expect("run initcheck");
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&work);
}

#[test]
fn invalid_env_override_exits_2() {
    let work = make_work_dir();
    let out = initcheck_cmd(&work)
        .env("INITCHECK_UI_WRAP_WIDTH", "wide")
        .output()
        .expect("run initcheck");
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&work);
}

#[test]
fn config_flag_is_not_accepted() {
    let work = make_work_dir();
    let out = run(&work, &["--config", "initcheck.toml"]);
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&work);
}

#[test]
fn unknown_flag_exits_2() {
    let work = make_work_dir();
    let out = run(&work, &["--frobnicate"]);
    assert_eq!(out.status.code(), Some(2));
    let _ = std::fs::remove_dir_all(&work);
}
