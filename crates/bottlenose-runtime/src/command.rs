//! Command builder for ACE.
//!
//! This module turns a grammar, the static [`AceConfig`] and per-request
//! [`ProcessorOptions`] into an ACE command line. Every invocation asks for
//! `[incr tsdb()]` style output on stdout so the result can be read as
//! s-expressions.

use bottlenose_core::{AceConfig, ProcessorOptions};
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// What ACE is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Parse,
    Generate,
}

impl Mode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::Generate => "generate",
        }
    }
}

/// Build the argument list, without the executable.
///
/// Configured `cmdargs` come before the per-request flags so a request can
/// never be overridden by static configuration.
pub fn ace_args(
    grammar: &Path,
    cmdargs: &[String],
    mode: Mode,
    options: &ProcessorOptions,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-g".into(),
        grammar.as_os_str().to_os_string(),
        "--tsdb-stdout".into(),
        "--report-labels".into(),
    ];
    args.extend(cmdargs.iter().map(OsString::from));
    args.push("-n".into());
    args.push(options.results.to_string().into());
    if !options.generics {
        args.push("--disable-generalization".into());
    }
    if mode == Mode::Generate {
        args.push("-e".into());
    }
    args
}

/// Build the ACE command with piped stdio and the configured environment.
///
/// The child is killed when the returned handle is dropped, which is how an
/// expired timeout stops it.
pub fn build_command(
    config: &AceConfig,
    grammar: &Path,
    mode: Mode,
    options: &ProcessorOptions,
) -> Command {
    let mut cmd = Command::new(&config.executable);
    cmd.args(ace_args(grammar, &config.cmdargs, mode, options))
        .envs(config.environment())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[OsString]) -> Vec<&str> {
        args.iter().map(|a| a.to_str().unwrap()).collect()
    }

    #[test]
    fn test_parse_args() {
        let args = ace_args(
            Path::new("/g/erg.dat"),
            &[],
            Mode::Parse,
            &ProcessorOptions::default(),
        );
        assert_eq!(
            strings(&args),
            ["-g", "/g/erg.dat", "--tsdb-stdout", "--report-labels", "-n", "1"]
        );
    }

    #[test]
    fn test_cmdargs_precede_request_flags() {
        let args = ace_args(
            Path::new("erg.dat"),
            &["-r".to_string(), "root_informal".to_string()],
            Mode::Parse,
            &ProcessorOptions::default().with_results(5).with_generics(false),
        );
        assert_eq!(
            strings(&args),
            [
                "-g",
                "erg.dat",
                "--tsdb-stdout",
                "--report-labels",
                "-r",
                "root_informal",
                "-n",
                "5",
                "--disable-generalization"
            ]
        );
    }

    #[test]
    fn test_generate_adds_flag() {
        let args = ace_args(
            Path::new("erg.dat"),
            &[],
            Mode::Generate,
            &ProcessorOptions::default(),
        );
        assert_eq!(strings(&args).last(), Some(&"-e"));
    }
}
