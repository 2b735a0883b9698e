use serde::Deserialize;

/// Configuration options of the configurator service.
#[derive(Clone, Debug, Deserialize)]
pub struct ServerConfig {
    /// Interface the HTTP server binds to.
    pub address: String,
    pub port: u16,
    /// SQLite database holding the saved builds.
    pub database_url: String,
    /// JSON product list replacing the bundled catalog.
    #[serde(default)]
    pub catalog_path: Option<String>,
}
