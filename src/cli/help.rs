//! Help text.

/// Where users sign up for TDX API credentials.
pub const REGISTRATION_URL: &str = "https://tdx.transportdata.tw/register";

/// The full help text: usage, required variables, and client setup.
pub fn help_text() -> String {
    format!(
        r#"mcp-server-thsrc {version}
Taiwan High Speed Rail timetable server for the Model Context Protocol.

USAGE:
    mcp-server-thsrc [OPTIONS]

The server speaks MCP over stdin/stdout and is normally started by an MCP
client, not by hand. On first run it installs its Python dependencies.

REQUIRED ENVIRONMENT VARIABLES:
    TDX_CLIENT_ID        TDX API client id
    TDX_CLIENT_SECRET    TDX API client secret

    Register for free credentials at {url}

OPTIONAL ENVIRONMENT VARIABLES:
    THSRC_PYTHON         Python interpreter to use (3.8 or newer)
    THSRC_SERVER_DIR     Directory containing thsrc.py and requirements.txt
    RUST_LOG             Launcher log filter, e.g. thsrc_launcher=debug

OPTIONS:
    -h, --help           Print this help
    -V, --version        Print version
        --debug          Enable debug logging on stderr
    -q, --quiet          Never show progress, even on a terminal
        --python <PATH>  Same as THSRC_PYTHON
        --server-dir <DIR>
                         Same as THSRC_SERVER_DIR

MCP CLIENT CONFIGURATION (e.g. claude_desktop_config.json):
    {{
      "mcpServers": {{
        "thsrc": {{
          "command": "mcp-server-thsrc",
          "env": {{
            "TDX_CLIENT_ID": "your-client-id",
            "TDX_CLIENT_SECRET": "your-client-secret"
          }}
        }}
      }}
    }}
"#,
        version = env!("CARGO_PKG_VERSION"),
        url = REGISTRATION_URL,
    )
}
