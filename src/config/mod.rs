mod loader;
mod schema;

pub use loader::{load_from_env_or_file, load_from_path};
pub use schema::{platform_base_url, BridgeConfig, DEFAULT_PORT};
