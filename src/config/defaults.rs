// Built-in defaults and the configuration keys read from the environment / .env

pub const DEFAULT_PROXY_BASE_URL: &str = "http://aitools.cs.vt.edu:7860";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ENV_FILE: &str = ".env";

pub const KEY_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const KEY_OPENAI_ORG_ID: &str = "OPENAI_ORG_ID";
pub const KEY_ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const KEY_PROXY_BASE_URL: &str = "PROXY_BASE_URL";
pub const KEY_PROXY_TIMEOUT: &str = "PROXY_TIMEOUT";
pub const KEY_DEFAULT_USERNAME: &str = "DEFAULT_USERNAME";
pub const KEY_DEFAULT_PIN: &str = "DEFAULT_PIN";

/// Every key the loader picks up from the process environment
pub const CONFIG_KEYS: [&str; 7] = [
    KEY_OPENAI_API_KEY,
    KEY_OPENAI_ORG_ID,
    KEY_ANTHROPIC_API_KEY,
    KEY_PROXY_BASE_URL,
    KEY_PROXY_TIMEOUT,
    KEY_DEFAULT_USERNAME,
    KEY_DEFAULT_PIN,
];

/// Values shipped in the template .env; treated the same as an unset key
pub const PLACEHOLDER_VALUES: [&str; 3] = [
    "your_openai_api_key_here",
    "your_openai_org_id_here",
    "your_anthropic_api_key_here",
];

/// Colour output is suppressed when this is set to anything non-empty
pub const NO_COLOR_ENV: &str = "NO_COLOR";
