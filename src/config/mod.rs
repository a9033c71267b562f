mod loader;

pub use loader::{Config, CONFIG_FILE_NAME};
