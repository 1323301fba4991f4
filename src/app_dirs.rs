use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "hexle";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Directory for files that should survive between sessions but are not config
    pub fn state_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME)
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
            proj_dirs.data_local_dir().to_path_buf()
        } else {
            PathBuf::from(".")
        }
    }

    pub fn cache_path() -> PathBuf {
        Self::state_dir().join("dictionary.json")
    }

    pub fn log_path() -> PathBuf {
        Self::state_dir().join("hexle.log")
    }

    pub fn config_path() -> PathBuf {
        if let Some(pd) = ProjectDirs::from("", "", APP_NAME) {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("hexle_config.json")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_files_share_a_directory() {
        let dir = AppDirs::state_dir();
        assert_eq!(AppDirs::cache_path().parent(), Some(dir.as_path()));
        assert_eq!(AppDirs::log_path().parent(), Some(dir.as_path()));
    }

    #[test]
    fn test_config_path_is_json() {
        let path = AppDirs::config_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("json"));
    }
}
