//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "zyborn";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PUBLIC_PORT: u16 = 3000;
const DEFAULT_GRACEFUL_SHUTDOWN_SECS: u64 = 30;
const DEFAULT_CANONICAL_HOST: &str = "zyborn.com";
const DEFAULT_FROM_NAME: &str = "ZYBORN ART";
const DEFAULT_FROM_EMAIL: &str = "hello@zyborn.com";
const DEFAULT_PRESS_ADDRESS: &str = "press@zyborn.com";

/// Command-line arguments for the zyborn binary.
#[derive(Debug, Parser)]
#[command(name = "zyborn", version, about = "ZYBORN site server and CMS preview renderer")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "ZYBORN_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP service.
    Serve(Box<ServeArgs>),
    /// Render a single content file to preview HTML.
    #[command(name = "render")]
    Render(RenderArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    /// Markdown content file to render.
    #[arg(value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub file: PathBuf,

    /// Collection the file belongs to (home|curatorial|press|custom_pages).
    /// Read from the front matter `collection` key when omitted.
    #[arg(long, value_name = "NAME")]
    pub collection: Option<String>,

    /// Write the rendered HTML here instead of stdout.
    #[arg(short, long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the public listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the public listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Override the canonical host used for OAuth redirect fallbacks.
    #[arg(long = "server-canonical-host", value_name = "HOST")]
    pub server_canonical_host: Option<String>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the Supabase project URL.
    #[arg(long = "supabase-url", env = "SUPABASE_URL", value_name = "URL")]
    pub supabase_url: Option<String>,

    /// Override the Supabase service role key.
    #[arg(
        long = "supabase-service-role-key",
        env = "SUPABASE_SERVICE_ROLE_KEY",
        value_name = "KEY",
        hide_env_values = true
    )]
    pub supabase_service_role_key: Option<String>,

    /// Override the Resend API key.
    #[arg(
        long = "resend-api-key",
        env = "RESEND_API_KEY",
        value_name = "KEY",
        hide_env_values = true
    )]
    pub resend_api_key: Option<String>,

    /// Override the transactional sender display name.
    #[arg(long = "resend-from-name", env = "RESEND_FROM_NAME", value_name = "NAME")]
    pub resend_from_name: Option<String>,

    /// Override the transactional sender address.
    #[arg(
        long = "resend-from-email",
        env = "RESEND_FROM_EMAIL",
        value_name = "EMAIL"
    )]
    pub resend_from_email: Option<String>,

    /// Override the Turnstile secret key.
    #[arg(
        long = "turnstile-secret-key",
        env = "TURNSTILE_SECRET_KEY",
        value_name = "KEY",
        hide_env_values = true
    )]
    pub turnstile_secret_key: Option<String>,

    /// Override the broadcast endpoint shared secret.
    #[arg(
        long = "broadcast-secret-key",
        env = "BROADCAST_SECRET_KEY",
        value_name = "KEY",
        hide_env_values = true
    )]
    pub broadcast_secret_key: Option<String>,

    /// Override the GitHub OAuth client id.
    #[arg(
        long = "oauth-github-client-id",
        env = "OAUTH_GITHUB_CLIENT_ID",
        value_name = "ID"
    )]
    pub oauth_github_client_id: Option<String>,

    /// Override the GitHub OAuth client secret.
    #[arg(
        long = "oauth-github-client-secret",
        env = "OAUTH_GITHUB_CLIENT_SECRET",
        value_name = "SECRET",
        hide_env_values = true
    )]
    pub oauth_github_client_secret: Option<String>,
}

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub supabase: SupabaseSettings,
    pub mail: MailSettings,
    pub turnstile: TurnstileSettings,
    pub broadcast: BroadcastSettings,
    pub oauth: OAuthSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub public_addr: SocketAddr,
    pub graceful_shutdown: Duration,
    pub canonical_host: String,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct SupabaseSettings {
    pub url: Option<String>,
    pub service_role_key: Option<String>,
}

impl SupabaseSettings {
    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.service_role_key.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct MailSettings {
    pub api_key: Option<String>,
    pub from_name: String,
    pub from_email: String,
    pub press_address: String,
}

impl MailSettings {
    /// Sender in the `Name <address>` form the provider expects.
    pub fn sender(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    /// Sender used for press correspondence.
    pub fn press_sender(&self) -> String {
        format!("ZYBORN Press <{}>", self.press_address)
    }
}

#[derive(Debug, Clone)]
pub struct TurnstileSettings {
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BroadcastSettings {
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OAuthSettings {
    pub github_client_id: Option<String>,
    pub github_client_secret: Option<String>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("ZYBORN").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;

    match cli.command.as_ref() {
        Some(Command::Serve(args)) => raw.apply_serve_overrides(&args.overrides),
        Some(Command::Render(_)) => {}
        None => raw.apply_serve_overrides(&ServeOverrides::default()),
    }

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    supabase: RawSupabaseSettings,
    mail: RawMailSettings,
    turnstile: RawTurnstileSettings,
    broadcast: RawBroadcastSettings,
    oauth: RawOAuthSettings,
}

impl RawSettings {
    fn apply_serve_overrides(&mut self, overrides: &ServeOverrides) {
        if let Some(host) = overrides.server_host.as_ref() {
            self.server.host = Some(host.clone());
        }
        if let Some(port) = overrides.server_port {
            self.server.port = Some(port);
        }
        if let Some(seconds) = overrides.server_graceful_shutdown_seconds {
            self.server.graceful_shutdown_seconds = Some(seconds);
        }
        if let Some(host) = overrides.server_canonical_host.as_ref() {
            self.server.canonical_host = Some(host.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
        if let Some(url) = overrides.supabase_url.as_ref() {
            self.supabase.url = Some(url.clone());
        }
        if let Some(key) = overrides.supabase_service_role_key.as_ref() {
            self.supabase.service_role_key = Some(key.clone());
        }
        if let Some(key) = overrides.resend_api_key.as_ref() {
            self.mail.api_key = Some(key.clone());
        }
        if let Some(name) = overrides.resend_from_name.as_ref() {
            self.mail.from_name = Some(name.clone());
        }
        if let Some(email) = overrides.resend_from_email.as_ref() {
            self.mail.from_email = Some(email.clone());
        }
        if let Some(key) = overrides.turnstile_secret_key.as_ref() {
            self.turnstile.secret_key = Some(key.clone());
        }
        if let Some(key) = overrides.broadcast_secret_key.as_ref() {
            self.broadcast.secret_key = Some(key.clone());
        }
        if let Some(id) = overrides.oauth_github_client_id.as_ref() {
            self.oauth.github_client_id = Some(id.clone());
        }
        if let Some(secret) = overrides.oauth_github_client_secret.as_ref() {
            self.oauth.github_client_secret = Some(secret.clone());
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            server,
            logging,
            supabase,
            mail,
            turnstile,
            broadcast,
            oauth,
        } = raw;

        Ok(Self {
            server: build_server_settings(server)?,
            logging: build_logging_settings(logging)?,
            supabase: build_supabase_settings(supabase),
            mail: build_mail_settings(mail),
            turnstile: TurnstileSettings {
                secret_key: non_empty(turnstile.secret_key),
            },
            broadcast: BroadcastSettings {
                secret_key: non_empty(broadcast.secret_key),
            },
            oauth: OAuthSettings {
                github_client_id: non_empty(oauth.github_client_id),
                github_client_secret: non_empty(oauth.github_client_secret),
            },
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    let host = server.host.unwrap_or_else(|| DEFAULT_HOST.to_string());

    let port = server.port.unwrap_or(DEFAULT_PUBLIC_PORT);
    if port == 0 {
        return Err(LoadError::invalid(
            "server.port",
            "port must be greater than zero",
        ));
    }

    let public_addr = parse_socket_addr(&host, port)
        .map_err(|reason| LoadError::invalid("server.public_addr", reason))?;

    let graceful_secs = server
        .graceful_shutdown_seconds
        .unwrap_or(DEFAULT_GRACEFUL_SHUTDOWN_SECS);
    if graceful_secs == 0 {
        return Err(LoadError::invalid(
            "server.graceful_shutdown_seconds",
            "must be greater than zero",
        ));
    }

    let canonical_host = server
        .canonical_host
        .unwrap_or_else(|| DEFAULT_CANONICAL_HOST.to_string());
    if canonical_host.trim().is_empty() {
        return Err(LoadError::invalid(
            "server.canonical_host",
            "host must not be empty",
        ));
    }

    Ok(ServerSettings {
        public_addr,
        graceful_shutdown: Duration::from_secs(graceful_secs),
        canonical_host,
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_supabase_settings(supabase: RawSupabaseSettings) -> SupabaseSettings {
    SupabaseSettings {
        url: non_empty(supabase.url).map(|url| url.trim_end_matches('/').to_string()),
        service_role_key: non_empty(supabase.service_role_key),
    }
}

fn build_mail_settings(mail: RawMailSettings) -> MailSettings {
    MailSettings {
        api_key: non_empty(mail.api_key),
        from_name: non_empty(mail.from_name).unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
        from_email: non_empty(mail.from_email).unwrap_or_else(|| DEFAULT_FROM_EMAIL.to_string()),
        press_address: non_empty(mail.press_address)
            .unwrap_or_else(|| DEFAULT_PRESS_ADDRESS.to_string()),
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawServerSettings {
    host: Option<String>,
    port: Option<u16>,
    graceful_shutdown_seconds: Option<u64>,
    canonical_host: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSupabaseSettings {
    url: Option<String>,
    service_role_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawMailSettings {
    api_key: Option<String>,
    from_name: Option<String>,
    from_email: Option<String>,
    press_address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawTurnstileSettings {
    secret_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawBroadcastSettings {
    secret_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawOAuthSettings {
    github_client_id: Option<String>,
    github_client_secret: Option<String>,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}
