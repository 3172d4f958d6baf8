use crate::error::ConfigError;
use crate::settings::Settings;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Benchmark, History, Ipo, Output, Provider};

/// Environment variable holding the provider API credential.
pub const API_KEY_ENV: &str = "POLYGON_API_KEY";

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, deserializes it into our strongly-typed `Settings`
/// struct, and returns it. Values can be overridden from the environment
/// with the `RSRANK_` prefix (e.g. `RSRANK_PROVIDER__BASE_URL`).
pub fn load_settings() -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `config.toml`
        .add_source(config::File::with_name("config.toml"))
        .add_source(config::Environment::with_prefix("RSRANK").separator("__"))
        .build()?;

    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.try_deserialize::<Settings>()?;

    Ok(settings)
}

/// Reads the provider API credential from the environment.
///
/// A missing credential is fatal at startup; no provider call can be made
/// without it.
pub fn api_key() -> Result<String, ConfigError> {
    std::env::var(API_KEY_ENV).map_err(|_| ConfigError::MissingEnvVar(API_KEY_ENV.to_string()))
}
