//! CLI parser
use clap::Parser;
use std::num::NonZeroU16;

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "TERRAFORMER_DEBUG")]
    /// Enable debug logging. Env: TERRAFORMER_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "9000", env = "TERRAFORMER_PORT")]
    /// http listener port, defaults to `9000`.
    /// Env: TERRAFORMER_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "TERRAFORMER_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: TERRAFORMER_LISTEN_ADDRESS
    pub listen_address: String,

    #[clap(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    /// Server-held Gemini API key, used when a request carries none.
    /// Env: GEMINI_API_KEY
    pub gemini_api_key: Option<String>,
    #[clap(long, env = "MAPS_API_KEY", hide_env_values = true)]
    /// Server-held Maps API key, used when a request carries none.
    /// Env: MAPS_API_KEY
    pub maps_api_key: Option<String>,
}
