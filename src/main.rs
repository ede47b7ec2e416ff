//! mcp-server-thsrc entry point.

use std::process::ExitCode;

use thsrc_launcher::cli::{help_text, Cli};
use thsrc_launcher::config::LaunchConfig;
use thsrc_launcher::runner::{Bootstrap, BootstrapContext};
use thsrc_launcher::ui::{create_ui, OutputMode, UserInterface};
use thsrc_launcher::LauncherError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Logs go to stderr; stdout carries the MCP protocol.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("thsrc_launcher=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("thsrc_launcher=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn report(ui: &mut dyn UserInterface, err: &LauncherError) {
    ui.error(&err.to_string());
    for hint in err.remediation() {
        ui.show_hint(&hint);
    }
    if matches!(err, LauncherError::MissingCredentials { .. }) {
        eprintln!();
        eprint!("{}", help_text());
    }
}

fn exit_with(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(code) => ExitCode::from(code),
        // Windows exit codes don't fit in a byte.
        Err(_) => std::process::exit(code),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse_lenient();
    init_tracing(cli.debug);

    tracing::debug!("Launcher starting with args: {:?}", cli);

    if cli.help {
        print!("{}", help_text());
        return ExitCode::SUCCESS;
    }

    let mode = OutputMode::detect(cli.quiet);
    let mut ui = create_ui(mode);

    let result = LaunchConfig::from_cli(&cli, mode).and_then(|config| {
        let ctx = BootstrapContext::host(&config);
        Bootstrap::new(&config, &ctx).run(ui.as_mut())
    });

    match result {
        Ok(code) => exit_with(code),
        Err(e) => {
            report(ui.as_mut(), &e);
            exit_with(e.exit_code())
        }
    }
}
