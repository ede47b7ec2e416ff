//! CLI argument definitions.
//!
//! The launcher is started by MCP clients that may pass arguments of their
//! own, so parsing never fails: anything unrecognised is ignored.

use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Launcher for the THSR timetable MCP server.
#[derive(Debug, Default, Parser)]
#[command(name = "mcp-server-thsrc")]
#[command(version, about, long_about = None)]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// Print usage and required environment variables
    #[arg(short = 'h', long = "help")]
    pub help: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Never show progress, even on a terminal
    #[arg(short, long)]
    pub quiet: bool,

    /// Python interpreter to try before any other
    #[arg(long, env = "THSRC_PYTHON", value_name = "PATH")]
    pub python: Option<String>,

    /// Directory containing thsrc.py and requirements.txt
    #[arg(long, env = "THSRC_SERVER_DIR", value_name = "DIR")]
    pub server_dir: Option<PathBuf>,

    /// Ignored
    #[arg(hide = true, num_args = 0..)]
    pub rest: Vec<String>,
}

impl Cli {
    /// Parse the process arguments.
    pub fn parse_lenient() -> Self {
        Self::parse_lenient_from(std::env::args_os())
    }

    /// Parse `args`, falling back to a plain scan when clap rejects them.
    ///
    /// `--version` prints and exits the process, as clap normally does.
    pub fn parse_lenient_from<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        match Self::try_parse_from(&args) {
            Ok(cli) => cli,
            Err(err) if err.kind() == ErrorKind::DisplayVersion => err.exit(),
            Err(err) => {
                tracing::debug!("Ignoring unparseable arguments: {}", err.kind());
                Self::scan(&args)
            }
        }
    }

    fn scan(args: &[OsString]) -> Self {
        let has = |flags: &[&str]| {
            args.iter()
                .skip(1)
                .any(|a| a.to_str().is_some_and(|a| flags.contains(&a)))
        };
        let non_empty = |name: &str| std::env::var_os(name).filter(|v| !v.is_empty());

        Self {
            help: has(&["-h", "--help"]),
            debug: has(&["--debug"]),
            quiet: has(&["-q", "--quiet"]),
            python: non_empty("THSRC_PYTHON").map(|v| v.to_string_lossy().to_string()),
            server_dir: non_empty("THSRC_SERVER_DIR").map(PathBuf::from),
            rest: Vec::new(),
        }
    }
}
