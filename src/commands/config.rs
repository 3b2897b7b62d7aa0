use crate::config::{Config, config_dir, save_to_path};
use anyhow::{Context, Result};
use std::path::PathBuf;

pub fn list(config: &Config) -> Result<()> {
    let toml_str = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", toml_str);
    Ok(())
}

/// Look up a dotted key such as `catalog.debounce_ms`.
pub fn lookup(key: &str, config: &Config) -> Result<serde_json::Value> {
    let value = serde_json::to_value(config).context("Failed to serialize config")?;

    let mut current = &value;
    for part in key.split('.') {
        current = current
            .get(part)
            .with_context(|| format!("Key not found: {}", key))?;
    }

    Ok(current.clone())
}

pub fn get(key: &str, config: &Config) -> Result<()> {
    match lookup(key, config)? {
        serde_json::Value::String(s) => println!("{}", s),
        v => println!("{}", v),
    }
    Ok(())
}

/// Write a default config file unless one already exists.
pub fn init() -> Result<PathBuf> {
    let dir = config_dir()?;
    let path = dir.join("config.toml");
    if path.exists() {
        anyhow::bail!("Config already exists at {}", path.display());
    }

    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    save_to_path(&Config::default(), &path)?;
    println!("✓ Wrote default config to {}", path.display());

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_nested_key() {
        let config = Config::default();
        assert_eq!(lookup("catalog.debounce_ms", &config).unwrap(), 500);
        assert_eq!(lookup("display.locale", &config).unwrap(), "es_ES");
    }

    #[test]
    fn test_lookup_missing_key() {
        let config = Config::default();
        let err = lookup("catalog.nope", &config).unwrap_err();
        assert!(err.to_string().contains("Key not found"));
    }
}
