//! Integration tests for the zopen CLI binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Test context with a throwaway HOME, TMPDIR and installation root
struct TestContext {
    temp_dir: TempDir,
    home: PathBuf,
    root: PathBuf,
    tmp: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let home = temp_dir.path().join("home");
        let root = temp_dir.path().join("root");
        let tmp = temp_dir.path().join("tmp");
        for dir in [&home, &root, &tmp] {
            std::fs::create_dir_all(dir).expect("failed to create test dir");
        }
        Self {
            temp_dir,
            home,
            root,
            tmp,
        }
    }

    fn setup_cmd(&self) -> Command {
        let bin_path = env!("CARGO_BIN_EXE_zopen-setup");
        let mut cmd = Command::new(bin_path);
        cmd.env("HOME", &self.home);
        cmd.env("TMPDIR", &self.tmp);
        cmd.env_remove("RUST_LOG");
        cmd.env_remove("ZOPEN_BOOT_URL");
        cmd.env_remove("ZOPEN_BOOT_API_URL");
        cmd.env_remove("ZOPEN_CA_BUNDLE");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.setup_cmd()
            .args(args)
            .output()
            .expect("failed to run zopen-setup")
    }

    fn root_arg(&self) -> &str {
        self.root.to_str().expect("utf-8 temp path")
    }
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_help_flags_exit_8() {
    let ctx = TestContext::new();
    for flag in ["-h", "--help", "-V", "--version", "--"] {
        let output = ctx.run(&[flag, ctx.root_arg()]);
        assert_eq!(output.status.code(), Some(8), "{flag}");
        assert!(stderr(&output).contains(&format!("Unknown option: {flag} specified")));
    }
    assert!(!ctx.root.join("boot").exists());
}

#[test]
fn test_no_arguments_exits_4() {
    let ctx = TestContext::new();
    let output = ctx.run(&[]);
    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("Syntax: zopen-setup [-vq] <root>"));
}

#[test]
fn test_unknown_option_exits_8() {
    let ctx = TestContext::new();
    let output = ctx.run(&["-x", ctx.root_arg()]);
    assert_eq!(output.status.code(), Some(8));
    assert!(stderr(&output).contains("Unknown option: -x specified"));
}

#[test]
fn test_extra_positional_exits_8() {
    let ctx = TestContext::new();
    let root = ctx.root_arg();
    let output = ctx.run(&[root, root]);
    assert_eq!(output.status.code(), Some(8));
    assert!(stderr(&output).contains("Too many parameters specified"));
}

#[test]
fn test_flag_without_root_exits_8() {
    let ctx = TestContext::new();
    let output = ctx.run(&["-v"]);
    assert_eq!(output.status.code(), Some(8));
    assert!(stderr(&output).contains("Specify a directory to install into"));
}

#[test]
fn test_flag_after_root_exits_8() {
    let ctx = TestContext::new();
    let output = ctx.run(&[ctx.root_arg(), "-q"]);
    assert_eq!(output.status.code(), Some(8));
}

#[test]
fn test_missing_root_exits_4() {
    let ctx = TestContext::new();
    let missing = ctx.temp_dir.path().join("nope");
    let output = ctx.run(&[missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(4));
    assert!(stderr(&output).contains("does not exist, or is not writable"));
    assert!(!ctx.home.join("zopen").exists());
}

#[test]
fn test_unreachable_server_stops_after_directories() {
    let ctx = TestContext::new();
    let output = ctx
        .setup_cmd()
        .env("ZOPEN_BOOT_URL", "https://127.0.0.1:9")
        .env("ZOPEN_BOOT_API_URL", "https://127.0.0.1:9")
        .arg("-q")
        .arg(ctx.root_arg())
        .output()
        .expect("failed to run zopen-setup");

    let code = output.status.code().expect("exited normally");
    assert_ne!(code, 0);
    assert_ne!(code, 8);

    for tier in ["boot", "prod", "dev"] {
        assert!(ctx.root.join(tier).is_dir(), "{tier} should exist");
    }
    assert!(!ctx.root.join("boot/.bootenv").exists());
    assert!(!ctx.home.join("zopen").exists());

    // The trust bundle is left behind on failure.
    assert_eq!(pem_files(&ctx.tmp), 1);
}

fn pem_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".pem"))
        .count()
}
