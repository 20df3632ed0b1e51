//! Viewer configuration loaded from `mulberry.toml`.
//!
//! Every field is optional; absent fields keep the [`ViewOptions`] defaults.
//! Unknown fields are ignored. A file that fails to parse is reported and
//! replaced by defaults so a typo never prevents the viewer from starting.
//!
//! [`ViewOptions`]: crate::options::ViewOptions

pub const FILE_NAME: &str = "mulberry.toml";

#[derive(Debug, serde::Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ViewportConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, serde::Deserialize, Default, Clone, PartialEq, Eq)]
pub struct TextConfig {
    pub column_width: Option<u32>,
    pub line_height: Option<u32>,
    pub line_buffer: Option<u32>,
}

#[derive(Debug, serde::Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub text: TextConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Where the configuration came from, if a file was read.
    pub source: Option<std::path::PathBuf>,
    pub file: ConfigFile,
}

/// `mulberry.toml` in the working directory, else the platform config dir.
#[must_use]
pub fn discover() -> std::path::PathBuf {
    discover_in(std::path::Path::new(""), dirs::config_dir())
}

/// [`discover`] with an explicit working directory and config dir.
#[must_use]
pub fn discover_in(
    working_dir: &std::path::Path,
    config_dir: Option<std::path::PathBuf>,
) -> std::path::PathBuf {
    let local = working_dir.join(FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = config_dir {
        return dir.join("mulberry").join(FILE_NAME);
    }
    local
}

/// Loads `path`, or the discovered path when `None`. Never fails: a missing
/// or malformed file yields defaults.
#[must_use]
pub fn load_from(path: Option<std::path::PathBuf>) -> Config {
    let path = path.unwrap_or_else(discover);

    let Ok(content) = std::fs::read_to_string(&path) else {
        tracing::debug!(target: "config", path = %path.display(), "config_absent_using_defaults");
        return Config::default();
    };

    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            tracing::info!(target: "config", path = %path.display(), "config_loaded");
            Config {
                source: Some(path),
                file,
            }
        }
        Err(e) => {
            tracing::warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Config::default()
        }
    }
}

impl Config {
    /// The overrides this configuration makes, in application order.
    #[must_use]
    pub fn options(&self) -> Vec<crate::options::ViewOption> {
        let defaults = crate::options::ViewOptions::default();
        let mut options = Vec::new();
        let viewport = &self.file.viewport;
        let text = &self.file.text;

        if viewport.width.is_some() || viewport.height.is_some() {
            options.push(crate::options::ViewOption::Dimensions(
                viewport.width.unwrap_or(defaults.width),
                viewport.height.unwrap_or(defaults.height),
            ));
        }
        if let Some(px) = text.column_width {
            options.push(crate::options::ViewOption::ColumnWidth(px));
        }
        if let Some(px) = text.line_height {
            options.push(crate::options::ViewOption::LineHeight(px));
        }
        if let Some(px) = text.line_buffer {
            options.push(crate::options::ViewOption::LineBuffer(px));
        }

        options
    }

    #[must_use]
    pub fn view_options(&self) -> crate::options::ViewOptions {
        crate::options::ViewOptions::with(&self.options())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ViewOption;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(Some(dir.path().join("absent.toml")));

        assert!(config.source.is_none());
        assert!(config.options().is_empty());
        assert_eq!(config.view_options(), crate::options::ViewOptions::default());
    }

    #[test]
    fn test_full_file() {
        let file = write_config(
            "[viewport]\nwidth = 480\nheight = 320\n\n[text]\ncolumn_width = 9\nline_height = 14\nline_buffer = 2\n",
        );
        let config = load_from(Some(file.path().to_path_buf()));

        assert_eq!(config.source.as_deref(), Some(file.path()));
        assert_eq!(
            config.options(),
            vec![
                ViewOption::Dimensions(480, 320),
                ViewOption::ColumnWidth(9),
                ViewOption::LineHeight(14),
                ViewOption::LineBuffer(2),
            ]
        );
        assert_eq!(config.view_options().line_stride(), 16);
    }

    #[test]
    fn test_partial_viewport_keeps_other_default() {
        let file = write_config("[viewport]\nheight = 100\n");
        let options = load_from(Some(file.path().to_path_buf())).view_options();

        assert_eq!((options.width, options.height), (240, 100));
        assert_eq!(options.line_height, 12);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let file = write_config("[viewport]\nwidth = 300\nborder = true\n\n[theme]\nname = \"dark\"\n");
        let options = load_from(Some(file.path().to_path_buf())).view_options();

        assert_eq!(options.width, 300);
    }

    #[test]
    fn test_parse_error_falls_back_to_defaults() {
        let file = write_config("[viewport\nwidth = ");
        let config = load_from(Some(file.path().to_path_buf()));

        assert!(config.source.is_none());
        assert_eq!(config.file, ConfigFile::default());
    }

    // --- DISCOVERY TESTS ---

    #[test]
    fn test_discover_prefers_working_directory() {
        let cwd = tempfile::tempdir().unwrap();
        let config_dir = tempfile::tempdir().unwrap();
        std::fs::write(cwd.path().join(FILE_NAME), "[viewport]\nwidth = 300\n").unwrap();

        let path = discover_in(cwd.path(), Some(config_dir.path().to_path_buf()));

        assert_eq!(path, cwd.path().join(FILE_NAME));
        assert_eq!(load_from(Some(path)).view_options().width, 300);
    }

    #[test]
    fn test_discover_falls_back_to_config_dir() {
        let cwd = tempfile::tempdir().unwrap();
        let config_dir = tempfile::tempdir().unwrap();

        assert_eq!(
            discover_in(cwd.path(), Some(config_dir.path().to_path_buf())),
            config_dir.path().join("mulberry").join(FILE_NAME)
        );
    }

    #[test]
    fn test_discover_without_config_dir_stays_local() {
        let cwd = tempfile::tempdir().unwrap();

        assert_eq!(discover_in(cwd.path(), None), cwd.path().join(FILE_NAME));
        assert_eq!(
            discover_in(std::path::Path::new(""), None),
            std::path::PathBuf::from(FILE_NAME)
        );
    }
}
