// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{
    Config, LogFormat, LoggingSettings, ServerSettings, SimulationSettings, TradeSourceSettings,
};

/// Environment variables starting with this prefix override file values.
pub const ENV_PREFIX: &str = "PNLSIM";
/// Nesting separator for environment keys, e.g. `PNLSIM__SERVER__PORT`.
pub const ENV_SEPARATOR: &str = "__";
pub const CONFIG_FILE: &str = "config.toml";

/// Loads the application configuration.
///
/// Built-in defaults are overlaid by an optional `config.toml` in the working
/// directory, then by `PNLSIM__*` environment variables. The result is validated
/// before it is returned.
pub fn load_config() -> Result<Config, ConfigError> {
    build_config(
        config::File::with_name(CONFIG_FILE).required(false),
        environment(),
    )
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

fn build_config<S>(file: S, env: config::Environment) -> Result<Config, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let builder = config::Config::builder()
        .add_source(file)
        .add_source(env)
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(source = ?config.trade_source, port = config.server.port, "Configuration loaded.");
    Ok(config)
}
