use crate::APP_NAME;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.ini";
const DATA_FILE: &str = "products.txt";

// Config holds the settings that can be changed without recompiling.
// It is read from $XDG_CONFIG_HOME/sklep/config.ini, for example:
// ```
// [store]
// file = /srv/sklep/produkty.txt
// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // Where the product list is stored.
    pub file: PathBuf,
}

impl Config {
    // Resolve the configuration.
    // `file` comes from the command line and takes priority over the config
    // file, which takes priority over the default under $XDG_DATA_HOME.
    pub fn load(file: Option<PathBuf>) -> Result<Config> {
        if let Some(file) = file {
            return Ok(Config { file });
        }
        let dirs = xdg::BaseDirectories::with_prefix(APP_NAME)?;
        if let Some(path) = dirs.find_config_file(CONFIG_FILE) {
            if let Some(file) = Self::file_from_ini(&path)? {
                return Ok(Config { file });
            }
        }
        let file = dirs.get_data_file(DATA_FILE);
        log::debug!("Using default data file {file:?}");
        Ok(Config { file })
    }

    // Read the `file` key of the [store] section, if set.
    // Relative paths are taken relative to the config file.
    fn file_from_ini(path: &Path) -> Result<Option<PathBuf>> {
        log::debug!("Reading config {path:?}");
        let ini = ini::Ini::load_from_file(path).with_context(|| format!("Parsing {path:?}"))?;
        let Some(file) = ini.get_from(Some("store"), "file") else {
            log::warn!("No [store] file set in {path:?}");
            return Ok(None);
        };
        let file = Path::new(file.trim());
        Ok(Some(match path.parent() {
            Some(dir) if file.is_relative() => dir.join(file),
            _ => file.to_path_buf(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    #[test]
    fn test_explicit_file() {
        let config = Config::load(Some("/tmp/produkty.txt".into())).unwrap();
        assert_eq!(config.file, PathBuf::from("/tmp/produkty.txt"));
    }

    #[test]
    fn test_file_from_ini() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE);

        fs::write(&path, "[store]\nfile = /srv/sklep/produkty.txt\n").unwrap();
        assert_eq!(
            Config::file_from_ini(&path).unwrap(),
            Some(PathBuf::from("/srv/sklep/produkty.txt"))
        );

        fs::write(&path, "[store]\nfile = dane/produkty.txt\n").unwrap();
        assert_eq!(
            Config::file_from_ini(&path).unwrap(),
            Some(tmp.path().join("dane/produkty.txt"))
        );

        fs::write(&path, "[other]\nfile = x\n").unwrap();
        assert_eq!(Config::file_from_ini(&path).unwrap(), None);
    }

    #[test]
    fn test_file_from_bad_ini() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(&path, "[store\nfile = x\n").unwrap();
        assert!(Config::file_from_ini(&path).is_err());
    }
}
