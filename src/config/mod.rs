pub mod loader;
pub mod schema;

pub use loader::{apply_env_overrides, get_config_path, load_config, save_config};
pub use schema::{AutomodConfig, Config, DEFAULT_API_BASE_URL, DiscordConfig, RULES_FILE_NAME};
