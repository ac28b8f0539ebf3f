use llm_proxy_health::cli::Cli;
use llm_proxy_health::config::loader::color_enabled;
use llm_proxy_health::config::Config;
use llm_proxy_health::core::{HealthCheckError, HealthCheckRunner, ReportRenderer, EXIT_FAILURE};
use std::io::{self, Write};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let code = match build_runner(&cli) {
        Ok(runner) => run_until_interrupted(&runner, &mut out).await,
        Err(e) => {
            let renderer = ReportRenderer::new(color_enabled(cli.no_color));
            let _ = renderer.fatal(&mut out, &e);
            e.exit_code()
        }
    };

    let _ = out.flush();
    ExitCode::from(code)
}

// Configuration errors abort before any network call
fn build_runner(cli: &Cli) -> Result<HealthCheckRunner, HealthCheckError> {
    let config = Config::load(cli)?;
    HealthCheckRunner::new(config)
}

async fn run_until_interrupted(runner: &HealthCheckRunner, out: &mut dyn Write) -> u8 {
    let code = tokio::select! {
        code = runner.execute(&mut *out) => Some(code),
        _ = tokio::signal::ctrl_c() => None,
    };

    match code {
        Some(code) => code,
        None => {
            let _ = runner.renderer().interrupted(out);
            EXIT_FAILURE
        }
    }
}
