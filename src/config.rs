//! Config handling

use tracing::log::LevelFilter;

use crate::constants::{GEMINI_ENDPOINT, STATIC_MAP_ENDPOINT, STREET_VIEW_ENDPOINT};

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        logger = logger
            .with_module_level("tracing", LevelFilter::Warn)
            .with_module_level("rustls", LevelFilter::Info)
            .with_module_level("hyper_util", LevelFilter::Info)
            .with_module_level("reqwest", LevelFilter::Info)
            .with_module_level("h2", LevelFilter::Info);
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

/// Server-held default credentials for the outbound services.
///
/// Keys supplied in a request always win; these only fill the gaps when the
/// client omits them.
#[derive(Clone, Debug, Default)]
pub struct Credentials {
    /// Gemini API key.
    pub gemini_api_key: Option<String>,
    /// Maps Static / Street View API key.
    pub maps_api_key: Option<String>,
}

impl Credentials {
    /// Builds credentials from the parsed CLI options.
    #[must_use]
    pub fn from_cli(cli: &crate::cli::CliOptions) -> Self {
        Self {
            gemini_api_key: cli.gemini_api_key.clone(),
            maps_api_key: cli.maps_api_key.clone(),
        }
    }
}

/// Base URLs for the three outbound collaborators.
#[derive(Clone, Debug)]
pub struct UpstreamEndpoints {
    /// Street View Static API.
    pub street_view: String,
    /// Maps Static API.
    pub static_map: String,
    /// Gemini model collection root.
    pub gemini: String,
}

impl Default for UpstreamEndpoints {
    fn default() -> Self {
        Self {
            street_view: STREET_VIEW_ENDPOINT.to_string(),
            static_map: STATIC_MAP_ENDPOINT.to_string(),
            gemini: GEMINI_ENDPOINT.to_string(),
        }
    }
}
