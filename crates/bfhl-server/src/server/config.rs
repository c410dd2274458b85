use anyhow::bail;
use clap::{Parser, ValueEnum};
use core::time::Duration;

/// Runtime configuration for the `bfhl-server` binary.
///
/// All values are parsed from CLI arguments or environment variables (a `.env`
/// file in the working directory is loaded first). Everything is resolved
/// once at start-up and never re-read while serving.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "bfhl-server",
    version,
    about = "An HTTP service dispatching single-key requests to small operations"
)]
pub struct CliArgs {
    /// Identity marker echoed in every response envelope.
    ///
    /// Environment variable: `OFFICIAL_EMAIL`
    #[arg(long, env = "OFFICIAL_EMAIL")]
    pub official_email: String,

    /// Interface to bind.
    ///
    /// Environment variable: `HOST`
    #[arg(long, env = "HOST", default_value_t = String::from("0.0.0.0"))]
    pub host: String,

    /// Port to listen on.
    ///
    /// Environment variable: `PORT`
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Credential for the Gemini text-generation API.
    ///
    /// Optional so the arithmetic operations can run without it; `AI` requests
    /// fail with an internal error when it is missing.
    ///
    /// Environment variable: `GEMINI_API_KEY`
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Gemini model used for `AI` requests.
    ///
    /// Environment variable: `GEMINI_MODEL`
    #[arg(long, env = "GEMINI_MODEL", default_value_t = String::from("gemini-pro"))]
    pub gemini_model: String,

    /// Base URL of the Gemini API, without a trailing model path.
    ///
    /// Environment variable: `GEMINI_BASE_URL`
    #[arg(
        long,
        env = "GEMINI_BASE_URL",
        default_value_t = String::from("https://generativelanguage.googleapis.com/v1beta")
    )]
    pub gemini_base_url: String,

    /// Upper bound on a single text-generation round trip, in milliseconds.
    ///
    /// Environment variable: `AI_TIMEOUT_MS`
    #[arg(long, env = "AI_TIMEOUT_MS", default_value_t = 10_000)]
    pub ai_timeout_ms: u64,

    /// Console log output format.
    ///
    /// Environment variable: `LOG_FORMAT`
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// How log events are rendered on stdout.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line human readable output.
    Pretty,
    /// One JSON object per event.
    Json,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub official_email: String,
    pub server_addr: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub ai_timeout: Duration,
    pub log_format: LogFormat,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let official_email = args.official_email.trim().to_string();
        if official_email.is_empty() {
            bail!("OFFICIAL_EMAIL must not be empty");
        }

        if args.ai_timeout_ms == 0 {
            bail!("AI_TIMEOUT_MS must be greater than 0");
        }

        if args.gemini_model.trim().is_empty() {
            bail!("GEMINI_MODEL must not be empty");
        }

        Ok(Self {
            official_email,
            server_addr: format!("{}:{}", args.host, args.port),
            gemini_api_key: args.gemini_api_key.filter(|key| !key.trim().is_empty()),
            gemini_model: args.gemini_model,
            gemini_base_url: args.gemini_base_url.trim_end_matches('/').to_string(),
            ai_timeout: Duration::from_millis(args.ai_timeout_ms),
            log_format: args.log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["bfhl-server", "--official-email", "ops@example.com"];
        argv.extend_from_slice(extra);
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn resolves_and_normalizes() {
        let config = ServerConfig::try_from(args(&[
            "--host",
            "127.0.0.1",
            "--port",
            "8080",
            "--gemini-base-url",
            "http://localhost:9/v1/",
            "--ai-timeout-ms",
            "2500",
        ]))
        .unwrap();
        assert_eq!(config.official_email, "ops@example.com");
        assert_eq!(config.server_addr, "127.0.0.1:8080");
        assert_eq!(config.gemini_base_url, "http://localhost:9/v1");
        assert_eq!(config.ai_timeout, Duration::from_millis(2500));
    }

    #[test]
    fn log_format_parses() {
        let config = ServerConfig::try_from(args(&["--log-format", "json"])).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(ServerConfig::try_from(args(&["--ai-timeout-ms", "0"])).is_err());
    }

    #[test]
    fn blank_email_is_rejected() {
        let mut cli = args(&[]);
        cli.official_email = "   ".into();
        assert!(ServerConfig::try_from(cli).is_err());
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = ServerConfig::try_from(args(&["--gemini-api-key", " "])).unwrap();
        assert!(config.gemini_api_key.is_none());
    }
}
