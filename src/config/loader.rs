use crate::config::schema::JobConfig;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use validator::Validate;

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<JobConfig> {
        let config = Self::load_file(path.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    fn load_file(path: &Path) -> Result<JobConfig> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => {
                let config: JobConfig = serde_json::from_str(&content)?;
                Ok(config)
            }
            Some("yaml") | Some("yml") => {
                let config: JobConfig = serde_yaml::from_str(&content)?;
                Ok(config)
            }
            Some("toml") => {
                let config: JobConfig = toml::from_str(&content)?;
                Ok(config)
            }
            _ => Err(Error::Config(format!(
                "Unsupported file extension: {}",
                path.display()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_toml_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "job.toml",
            "url = \"example.com\"\noutput = \"./mirror\"\n",
        );

        let config = ConfigLoader::load(&path).unwrap();
        assert_eq!(config.url, "example.com");
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.timeout_secs, 10);
        assert!(!config.external);
        assert!(config.max_pages.is_none());
    }

    #[test]
    fn loads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "job.json",
            r#"{"url": "https://example.com", "output": "out", "external": true, "max_pages": 50}"#,
        );

        let config = ConfigLoader::load(&path).unwrap();
        assert!(config.external);
        assert_eq!(config.max_pages, Some(50));
    }

    #[test]
    fn loads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "job.yaml",
            "url: example.com\noutput: out\nconcurrency: 2\n",
        );

        let config = ConfigLoader::load(&path).unwrap();
        assert_eq!(config.concurrency, 2);
    }

    #[test]
    fn missing_url_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "job.toml", "output = \"out\"\n");

        assert!(matches!(
            ConfigLoader::load(&path),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "job.ini", "url=example.com\n");

        assert!(matches!(ConfigLoader::load(&path), Err(Error::Config(_))));
    }
}
