use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Well-known configuration file, looked up at the project root.
pub const CONFIG_FILE_NAME: &str = ".deadfiles.json";

/// Configuration for a scan, resolved once per scan and immutable after.
///
/// Keys present in the project config fully replace the corresponding
/// default; keys absent keep the default. Unknown keys are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Extensions of files that participate in the scan (no leading dot,
    /// compared case-insensitively)
    pub file_types: Vec<String>,

    /// Folder names pruned from traversal wherever they appear
    pub ignore_folders: Vec<String>,

    /// File names skipped during traversal
    pub ignore_root_files: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file_types: [
                // Source
                "js", "jsx", "ts", "tsx", "mjs", "cjs", "vue", "svelte", "py", "rb",
                "php", "java", "kt", "go", "rs", "c", "h", "cpp", "hpp", "cs", "sh",
                // Markup and styles
                "html", "htm", "css", "scss", "sass", "less", "styl", "xml", "md",
                // Data
                "json", "yaml", "yml", "toml", "csv", "txt", "sql", "graphql",
                // Images
                "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "bmp",
                // Audio/video
                "mp3", "mp4", "wav", "ogg", "webm",
                // Fonts
                "woff", "woff2", "ttf", "otf", "eot",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            ignore_folders: [
                "node_modules", ".git", ".svn", ".hg", "dist", "build", "out",
                "target", "vendor", "coverage", "__pycache__", ".next", ".cache",
                ".idea", ".vscode", "bower_components",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            ignore_root_files: [
                "package.json", "package-lock.json", "yarn.lock", "pnpm-lock.yaml",
                "tsconfig.json", "jsconfig.json", "webpack.config.js",
                "babel.config.js", "Cargo.toml", "Cargo.lock", "Makefile",
                "README.md", "CHANGELOG.md", "LICENSE", ".gitignore",
                ".gitattributes", ".editorconfig", ".deadfiles.json",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl Config {
    /// Resolve the configuration for `project_root`.
    ///
    /// Reads `.deadfiles.json` if present; any read or parse failure falls
    /// back to the built-in defaults without surfacing an error.
    pub fn resolve(project_root: &Path) -> Self {
        let path = project_root.join(CONFIG_FILE_NAME);
        let mut config = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Config>(&contents) {
                Ok(config) => {
                    debug!("Loaded config from {}", path.display());
                    config
                }
                Err(err) => {
                    debug!("Malformed {}, using defaults: {}", path.display(), err);
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        };
        config.normalize();
        config
    }

    /// Load configuration from an explicit file path.
    ///
    /// Unlike [`Config::resolve`], a path the user named on the command
    /// line fails loudly.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = serde_json::from_str(&contents)
            .into_diagnostic()
            .wrap_err("Failed to parse JSON config")?;
        config.normalize();
        Ok(config)
    }

    /// Lowercase extensions and strip any leading dot so later comparisons
    /// are a plain equality check.
    pub fn normalize(&mut self) {
        for ext in &mut self.file_types {
            *ext = ext.trim_start_matches('.').to_lowercase();
        }
    }

    /// Whether `path` has a tracked extension.
    pub fn is_tracked(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = ext.to_lowercase();
        self.file_types.iter().any(|t| *t == ext)
    }

    /// Whether a folder with this name is pruned from traversal.
    pub fn ignores_folder(&self, name: &str) -> bool {
        self.ignore_folders.iter().any(|f| f == name)
    }

    /// Whether a file with this name is skipped during traversal.
    pub fn ignores_file_name(&self, name: &str) -> bool {
        self.ignore_root_files.iter().any(|f| f == name)
    }
}
