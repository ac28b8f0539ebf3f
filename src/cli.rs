use crate::core::health::Provider;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "llm-proxy-health")]
#[command(version = concat!("Ver:", env!("CARGO_PKG_VERSION")))]
#[command(about = "LLM Proxy Health Checker")]
#[command(after_help = r#"EXAMPLES:
    llm-proxy-health --username alice --pin 1234                      # Test all providers
    llm-proxy-health --username alice --pin 1234 --provider opensource
    llm-proxy-health --username alice --pin 1234 -v                   # Detailed JSON per provider
    llm-proxy-health --username alice --pin 1234 --show-token         # Print token, then check
    llm-proxy-health --username alice --pin 1234 --token-only         # Only register and print token

ENVIRONMENT VARIABLES (also read from .env):
    PROXY_BASE_URL       Proxy base URL (default: http://aitools.cs.vt.edu:7860)
    PROXY_TIMEOUT        Request timeout in seconds (default: 30)
    DEFAULT_USERNAME     Username used when --username is absent
    DEFAULT_PIN          PIN used when --pin is absent
    OPENAI_API_KEY       Forwarded to the openai route
    OPENAI_ORG_ID        Forwarded to the openai route (optional)
    ANTHROPIC_API_KEY    Forwarded to the anthropic route
    HEALTHCHECK_DEBUG    Write JSON debug log to ~/.llm-proxy-health/
"#)]
pub struct Cli {
    /// Show detailed JSON responses
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Display the session token after registration
    #[arg(long = "show-token")]
    pub show_token: bool,

    /// Only register and show token, skip health checks
    #[arg(long = "token-only")]
    pub token_only: bool,

    /// Test only this provider (repeatable; default: all providers)
    #[arg(long = "provider", value_enum, value_name = "PROVIDER")]
    pub providers: Vec<Provider>,

    /// Username for authentication (required if not in .env)
    #[arg(long)]
    pub username: Option<String>,

    /// PIN for authentication (required if not in .env)
    #[arg(long)]
    pub pin: Option<String>,

    /// Read configuration from this dotenv file instead of ./.env
    #[arg(long = "env-file", value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Disable ANSI colours
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
