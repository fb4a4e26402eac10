//! Settings resolved from built-in defaults, then config files, then `FOLIO__*`
//! environment variables, then CLI flags.

use std::{net::SocketAddr, num::NonZeroU32, path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::application::auth::TokenCredential;

const ENV_PREFIX: &str = "FOLIO";
const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "folio";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_GRACEFUL_SHUTDOWN_SECS: u64 = 30;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;
const SHA256_LEN: usize = 32;

/// Command-line arguments for the Folio binary.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Folio post service")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "FOLIO_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP service.
    Serve(Box<ServeArgs>),
    /// Apply pending database migrations and exit.
    Migrate(MigrateArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct DatabaseOverride {
    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseOverride,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

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

    #[command(flatten)]
    pub database: DatabaseOverride,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
    pub graceful_shutdown: Duration,
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
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: NonZeroU32,
}

/// Bearer tokens allowed to mutate posts, stored as SHA-256 digests.
#[derive(Debug, Clone, Default)]
pub struct AuthSettings {
    pub tokens: Vec<TokenCredential>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] ConfigError),
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

type Builder = ConfigBuilder<DefaultState>;

pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = with_defaults(Config::builder())?
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    resolve(builder, cli.command.as_ref())
}

fn with_defaults(builder: Builder) -> Result<Builder, LoadError> {
    Ok(builder
        .set_default("server.host", DEFAULT_HOST)?
        .set_default("server.port", u64::from(DEFAULT_PORT))?
        .set_default("server.graceful_shutdown_seconds", DEFAULT_GRACEFUL_SHUTDOWN_SECS)?
        .set_default("logging.level", DEFAULT_LOG_LEVEL)?
        .set_default("logging.json", false)?
        .set_default(
            "database.max_connections",
            u64::from(DEFAULT_DB_MAX_CONNECTIONS),
        )?)
}

/// CLI flags become overrides, so they win over every file and env layer.
fn resolve(builder: Builder, command: Option<&Command>) -> Result<Settings, LoadError> {
    let builder = match command {
        Some(Command::Serve(args)) => args.overrides.apply(builder)?,
        Some(Command::Migrate(args)) => args.database.apply(builder)?,
        None => builder,
    };

    let raw: RawSettings = builder.build()?.try_deserialize()?;
    Settings::from_raw(raw)
}

impl ServeOverrides {
    fn apply(&self, builder: Builder) -> Result<Builder, ConfigError> {
        let builder = builder
            .set_override_option("server.host", self.server_host.clone())?
            .set_override_option("server.port", self.server_port.map(u64::from))?
            .set_override_option(
                "server.graceful_shutdown_seconds",
                self.server_graceful_shutdown_seconds,
            )?
            .set_override_option("logging.level", self.log_level.clone())?
            .set_override_option("logging.json", self.log_json)?
            .set_override_option(
                "database.max_connections",
                self.database_max_connections.map(u64::from),
            )?;
        self.database.apply(builder)
    }
}

impl DatabaseOverride {
    fn apply(&self, builder: Builder) -> Result<Builder, ConfigError> {
        builder.set_override_option("database.url", self.database_url.clone())
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        Ok(Self {
            server: build_server_settings(raw.server)?,
            logging: build_logging_settings(raw.logging)?,
            database: build_database_settings(raw.database)?,
            auth: build_auth_settings(raw.auth)?,
        })
    }
}

fn build_server_settings(server: RawServerSettings) -> Result<ServerSettings, LoadError> {
    if server.port == 0 {
        return Err(LoadError::invalid("server.port", "must be greater than zero"));
    }
    let addr = parse_socket_addr(&server.host, server.port)
        .map_err(|reason| LoadError::invalid("server.host", reason))?;

    if server.graceful_shutdown_seconds == 0 {
        return Err(LoadError::invalid(
            "server.graceful_shutdown_seconds",
            "must be greater than zero",
        ));
    }

    Ok(ServerSettings {
        addr,
        graceful_shutdown: Duration::from_secs(server.graceful_shutdown_seconds),
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = LevelFilter::from_str(logging.level.trim())
        .map_err(|err| LoadError::invalid("logging.level", err.to_string()))?;
    let format = if logging.json {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_database_settings(database: RawDatabaseSettings) -> Result<DatabaseSettings, LoadError> {
    // A blank URL means "not configured".
    let url = database
        .url
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    let max_connections = NonZeroU32::new(database.max_connections)
        .ok_or_else(|| LoadError::invalid("database.max_connections", "must be greater than zero"))?;

    Ok(DatabaseSettings {
        url,
        max_connections,
    })
}

fn build_auth_settings(auth: RawAuthSettings) -> Result<AuthSettings, LoadError> {
    let tokens = auth
        .tokens
        .into_iter()
        .map(|token| {
            let name = token.name.trim().to_string();
            if name.is_empty() {
                return Err(LoadError::invalid("auth.tokens.name", "must not be empty"));
            }

            let digest = hex::decode(token.sha256.trim()).map_err(|err| {
                LoadError::invalid("auth.tokens.sha256", format!("`{name}`: {err}"))
            })?;
            if digest.len() != SHA256_LEN {
                return Err(LoadError::invalid(
                    "auth.tokens.sha256",
                    format!("`{name}`: expected {SHA256_LEN} bytes, got {}", digest.len()),
                ));
            }

            Ok(TokenCredential { name, digest })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AuthSettings { tokens })
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    server: RawServerSettings,
    logging: RawLoggingSettings,
    database: RawDatabaseSettings,
    #[serde(default)]
    auth: RawAuthSettings,
}

#[derive(Debug, Deserialize)]
struct RawServerSettings {
    host: String,
    port: u16,
    graceful_shutdown_seconds: u64,
}

#[derive(Debug, Deserialize)]
struct RawLoggingSettings {
    level: String,
    json: bool,
}

#[derive(Debug, Deserialize)]
struct RawDatabaseSettings {
    #[serde(default)]
    url: Option<String>,
    max_connections: u32,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawAuthSettings {
    tokens: Vec<RawToken>,
}

#[derive(Debug, Deserialize)]
struct RawToken {
    name: String,
    sha256: String,
}

fn parse_socket_addr(host: &str, port: u16) -> Result<SocketAddr, String> {
    let candidate = format!("{host}:{port}");
    candidate
        .parse()
        .map_err(|err| format!("invalid address `{candidate}`: {err}"))
}

/// Parse the process arguments and resolve settings against them.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;
    use crate::application::auth::TokenAuthenticator;

    /// Resolves settings from built-in defaults, one TOML layer and an optional command.
    fn resolve_toml(toml: &str, command: Option<Command>) -> Result<Settings, LoadError> {
        let builder =
            with_defaults(Config::builder())?.add_source(File::from_str(toml, FileFormat::Toml));
        resolve(builder, command.as_ref())
    }

    fn serve(overrides: ServeOverrides) -> Option<Command> {
        Some(Command::Serve(Box::new(ServeArgs { overrides })))
    }

    #[test]
    fn defaults_are_valid() {
        let settings = resolve_toml("", None).expect("valid settings");

        assert_eq!(settings.server.addr.to_string(), "127.0.0.1:3000");
        assert_eq!(settings.server.graceful_shutdown, Duration::from_secs(30));
        assert_eq!(settings.logging.level, LevelFilter::INFO);
        assert!(matches!(settings.logging.format, LogFormat::Compact));
        assert_eq!(settings.database.max_connections.get(), 8);
        assert!(settings.database.url.is_none());
        assert!(settings.auth.tokens.is_empty());
    }

    #[test]
    fn file_values_replace_defaults() {
        let toml = "[server]\nport = 4000\n[logging]\nlevel = \"warn\"\njson = true\n";
        let settings = resolve_toml(toml, None).expect("valid settings");

        assert_eq!(settings.server.addr.port(), 4000);
        assert_eq!(settings.logging.level, LevelFilter::WARN);
        assert!(matches!(settings.logging.format, LogFormat::Json));
    }

    #[test]
    fn cli_overrides_take_highest_precedence() {
        let toml = "[server]\nport = 4000\n[logging]\nlevel = \"info\"\n";
        let overrides = ServeOverrides {
            server_port: Some(4321),
            log_level: Some("debug".to_string()),
            log_json: Some(true),
            database_max_connections: Some(2),
            ..Default::default()
        };

        let settings = resolve_toml(toml, serve(overrides)).expect("valid settings");

        assert_eq!(settings.server.addr.port(), 4321);
        assert_eq!(settings.logging.level, LevelFilter::DEBUG);
        assert!(matches!(settings.logging.format, LogFormat::Json));
        assert_eq!(settings.database.max_connections.get(), 2);
    }

    #[test]
    fn migrate_only_overrides_database_url() {
        let command = Command::Migrate(MigrateArgs {
            database: DatabaseOverride {
                database_url: Some("postgres://migrate".to_string()),
            },
        });

        let settings = resolve_toml("", Some(command)).expect("valid settings");

        assert_eq!(settings.database.url.as_deref(), Some("postgres://migrate"));
        assert_eq!(settings.server.addr.port(), 3000);
    }

    #[test]
    fn blank_database_url_is_ignored() {
        let settings =
            resolve_toml("[database]\nurl = \"   \"\n", None).expect("valid settings");
        assert!(settings.database.url.is_none());
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let err = resolve_toml("[database]\nmax_connections = 0\n", None).expect_err("zero pool");
        assert!(matches!(
            err,
            LoadError::Invalid {
                key: "database.max_connections",
                ..
            }
        ));
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let err = resolve_toml("[logging]\nlevel = \"loud\"\n", None).expect_err("bad level");
        assert!(matches!(
            err,
            LoadError::Invalid {
                key: "logging.level",
                ..
            }
        ));
    }

    #[test]
    fn token_digests_are_decoded() {
        let digest = TokenAuthenticator::hash_token("s3cret");
        let toml = format!(
            "[[auth.tokens]]\nname = \"editor\"\nsha256 = \"{}\"\n",
            hex::encode(&digest)
        );

        let settings = resolve_toml(&toml, None).expect("valid settings");
        assert_eq!(settings.auth.tokens.len(), 1);
        assert_eq!(settings.auth.tokens[0].name, "editor");
        assert_eq!(settings.auth.tokens[0].digest, digest);
    }

    #[test]
    fn short_token_digest_is_rejected() {
        let auth = RawAuthSettings {
            tokens: vec![RawToken {
                name: "editor".to_string(),
                sha256: "abcd".to_string(),
            }],
        };

        assert!(build_auth_settings(auth).is_err());
    }

    #[test]
    fn default_to_serve_command() {
        let args = CliArgs::parse_from(["folio"]);
        let command = args
            .command
            .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
        assert!(matches!(command, Command::Serve(_)));
    }

    #[test]
    fn parse_serve_overrides() {
        let args = CliArgs::parse_from([
            "folio",
            "serve",
            "--server-host",
            "0.0.0.0",
            "--database-url",
            "postgres://override",
        ]);

        match args.command.expect("serve command") {
            Command::Serve(serve) => {
                assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
                assert_eq!(
                    serve.overrides.database.database_url.as_deref(),
                    Some("postgres://override")
                );
            }
            _ => panic!("wrong command parsed"),
        }
    }

    #[test]
    fn parse_migrate_arguments() {
        let args = CliArgs::parse_from(["folio", "migrate", "--database-url", "postgres://example"]);

        match args.command.expect("migrate command") {
            Command::Migrate(migrate) => {
                assert_eq!(
                    migrate.database.database_url.as_deref(),
                    Some("postgres://example")
                );
            }
            _ => panic!("wrong command parsed"),
        }
    }
}
