//! Command line resolution.
//!
//! Turns the raw argument vector into an [`Invocation`]: the verbosity and
//! the canonical installation root. Every malformed invocation maps to a
//! [`SetupError`] carrying the right exit code.

use std::ffi::OsString;
use std::path::Path;

use clap::Parser;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use zopen_core::Verbosity;
use zopen_core::paths::InstallRoot;
use zopen_core::remote::DEFAULT_HOST;

use crate::Cli;
use crate::ops::SetupError;

/// A validated command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub verbosity: Verbosity,
    pub root: InstallRoot,
}

/// Resolve `args` (including the program name) into an [`Invocation`].
///
/// Only `-v`, `-q` and the root are accepted; help, version and `--` are
/// unknown options like any other flag.
pub fn resolve<I, T>(args: I) -> Result<Invocation, SetupError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if args.len() < 2 {
        return Err(SetupError::NoArguments);
    }

    if args.iter().skip(1).any(|arg| arg == "--") {
        return Err(SetupError::Usage("Unknown option: -- specified".to_string()));
    }

    let cli = Cli::try_parse_from(&args).map_err(|e| usage_error(&e))?;

    // The root has to be the final argument; flags after it are extra parameters.
    if args
        .last()
        .is_some_and(|last| last.to_string_lossy().starts_with('-'))
    {
        return Err(SetupError::Usage("Too many parameters specified".to_string()));
    }

    let root = InstallRoot::resolve(&cli.root)?;
    Ok(Invocation {
        verbosity: cli.verbosity(),
        root,
    })
}

fn usage_error(err: &clap::Error) -> SetupError {
    let message = match err.kind() {
        ErrorKind::MissingRequiredArgument => "Specify a directory to install into".to_string(),
        ErrorKind::UnknownArgument => match err.get(ContextKind::InvalidArg) {
            Some(ContextValue::String(arg)) if arg.starts_with('-') => {
                format!("Unknown option: {arg} specified")
            }
            _ => "Too many parameters specified".to_string(),
        },
        _ => err
            .to_string()
            .lines()
            .next()
            .unwrap_or("invalid arguments")
            .trim_start_matches("error: ")
            .to_string(),
    };
    SetupError::Usage(message)
}

/// Base name of the running program, for messages.
pub fn program_name(arg0: Option<&OsString>) -> String {
    arg0.and_then(|a| Path::new(a).file_name())
        .map_or_else(
            || "zopen-setup".to_string(),
            |n| n.to_string_lossy().into_owned(),
        )
}

/// The syntax message printed after usage errors.
pub fn syntax(program: &str) -> String {
    format!(
        "{program} : Install the z/OS Open Source Tools 'starter' environment by downloading from {DEFAULT_HOST}\n\
         Syntax: {program} [-vq] <root>\n\
         \x20 <root> is the root directory where:\n\
         \x20   a symbolic link from ${{HOME}}/zopen to <root> will be created\n\
         \x20   boot, prod, and dev directories will be created\n\
         \x20 The boot subdirectory will have:\n\
         \x20   sub-directories created for each of the tools needed for running the zopen utility\n\
         \x20 The dev subdirectory will have:\n\
         \x20   a 'git clone' of both the utils and meta repositories\n\
         Options:\n\
         \x20-v : print out verbose messages\n\
         \x20-q : only print out errors\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(rest: &[&str]) -> Vec<String> {
        std::iter::once("zopen-setup")
            .chain(rest.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_no_arguments() {
        let err = resolve(args(&[])).unwrap_err();
        assert!(matches!(err, SetupError::NoArguments));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_unknown_option() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let err = resolve(args(&["-x", root])).unwrap_err();

        assert_eq!(err.exit_code(), 8);
        assert_eq!(err.to_string(), "Unknown option: -x specified");
    }

    #[test]
    fn test_help_and_version_are_unknown_options() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();

        for flag in ["-h", "--help", "-V", "--version"] {
            let err = resolve(args(&[flag, root])).unwrap_err();
            assert_eq!(err.exit_code(), 8, "{flag}");
            assert_eq!(err.to_string(), format!("Unknown option: {flag} specified"));
        }
    }

    #[test]
    fn test_option_terminator_is_rejected() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();

        let err = resolve(args(&["--", root])).unwrap_err();
        assert_eq!(err.exit_code(), 8);
        assert_eq!(err.to_string(), "Unknown option: -- specified");
    }

    #[test]
    fn test_two_positionals() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let err = resolve(args(&[root, root])).unwrap_err();

        assert_eq!(err.exit_code(), 8);
        assert_eq!(err.to_string(), "Too many parameters specified");
    }

    #[test]
    fn test_flags_without_root() {
        let err = resolve(args(&["-v"])).unwrap_err();
        assert_eq!(err.exit_code(), 8);
        assert_eq!(err.to_string(), "Specify a directory to install into");
    }

    #[test]
    fn test_flag_after_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();
        let err = resolve(args(&[root, "-v"])).unwrap_err();
        assert_eq!(err.exit_code(), 8);
    }

    #[test]
    fn test_missing_root_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        let err = resolve(args(&[missing.to_str().unwrap()])).unwrap_err();

        assert!(matches!(err, SetupError::Root(_)));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_last_verbosity_flag_wins() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_str().unwrap();

        let inv = resolve(args(&["-v", "-q", root])).unwrap();
        assert_eq!(inv.verbosity, Verbosity::Quiet);

        let inv = resolve(args(&["-q", "-v", root])).unwrap();
        assert_eq!(inv.verbosity, Verbosity::Verbose);

        let inv = resolve(args(&["-v", "-v", root])).unwrap();
        assert_eq!(inv.verbosity, Verbosity::Verbose);

        let inv = resolve(args(&[root])).unwrap();
        assert_eq!(inv.verbosity, Verbosity::Normal);
    }

    #[test]
    fn test_root_is_canonical() {
        let dir = tempdir().unwrap();
        let inv = resolve(args(&[dir.path().to_str().unwrap()])).unwrap();
        assert_eq!(inv.root.path(), std::fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn test_program_name_is_base_name() {
        let arg0 = OsString::from("/usr/local/bin/zopen-setup");
        assert_eq!(program_name(Some(&arg0)), "zopen-setup");
        assert_eq!(program_name(None), "zopen-setup");
    }

    #[test]
    fn test_syntax_mentions_program_and_options() {
        let text = syntax("zs");
        assert!(text.starts_with("zs : Install"));
        assert!(text.contains("Syntax: zs [-vq] <root>"));
        assert!(text.contains("${HOME}/zopen"));
        assert!(text.contains(" -q : only print out errors"));
    }
}
