//! Application configuration module / 应用配置模块
//!
//! Manages application configuration loaded from config.json
//! Creates default config file on first run / 首次运行时创建默认配置文件
//!
//! The loaded [`AppConfig`] is passed to the backend explicitly by the
//! frontend; there is no process-global configuration instance.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration / 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database configuration / 数据库配置
    pub database: DatabaseConfig,
    /// Archive handling configuration / 压缩包处理配置
    pub archive: ArchiveConfig,
}

/// Database configuration / 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Data directory path / 数据目录路径
    pub data_dir: String,
    /// Database file path (relative to data_dir) / 数据库文件路径
    pub db_file: String,
}

/// Archive handling configuration / 压缩包处理配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    /// Extraction directory (relative to data_dir) / 解压目录
    pub extract_dir: String,
    /// Fallback encoding for member file names / 成员文件名回退编码
    pub filename_encoding: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            archive: ArchiveConfig::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            db_file: "chat_data.db".to_string(),
        }
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            extract_dir: "extracted".to_string(),
            filename_encoding: "utf-8".to_string(),
        }
    }
}

impl AppConfig {
    /// Get the full data directory path / 获取完整的数据目录路径
    pub fn get_data_dir(&self) -> PathBuf {
        PathBuf::from(&self.database.data_dir)
    }

    /// Get the full database file path / 获取完整的数据库文件路径
    pub fn get_db_path(&self) -> PathBuf {
        self.get_data_dir().join(&self.database.db_file)
    }

    /// Get the extraction root directory / 获取解压根目录
    pub fn get_extract_dir(&self) -> PathBuf {
        let data_dir = self.get_data_dir();
        if self.archive.extract_dir.is_empty() {
            data_dir
        } else {
            data_dir.join(&self.archive.extract_dir)
        }
    }
}

/// Get the config file path / 获取配置文件路径
fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 加载配置文件，不存在则创建默认配置
pub fn load_config() -> Result<AppConfig, String> {
    load_config_from(&get_config_path())
}

/// Load configuration from a specific path / 从指定路径加载配置
pub fn load_config_from(config_path: &Path) -> Result<AppConfig, String> {
    if config_path.exists() {
        // Load existing config / 加载现有配置
        let content = std::fs::read_to_string(config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        // Create default config / 创建默认配置
        let config = AppConfig::default();
        save_config_to(&config, config_path)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

/// Save configuration to file / 保存配置到文件
pub fn save_config(config: &AppConfig) -> Result<(), String> {
    save_config_to(config, &get_config_path())
}

/// Save configuration to a specific path / 保存配置到指定路径
pub fn save_config_to(config: &AppConfig, config_path: &Path) -> Result<(), String> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_paths() {
        let config = AppConfig::default();
        assert_eq!(config.get_db_path(), PathBuf::from("data/chat_data.db"));
        assert_eq!(config.get_extract_dir(), PathBuf::from("data/extracted"));
    }

    #[test]
    fn test_extract_dir_falls_back_to_data_dir() {
        let mut config = AppConfig::default();
        config.archive.extract_dir = String::new();
        assert_eq!(config.get_extract_dir(), PathBuf::from("data"));
    }

    #[test]
    fn test_load_creates_default_and_round_trips() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.json");

        let created = load_config_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.database.db_file, "chat_data.db");

        let mut edited = created.clone();
        edited.database.data_dir = "elsewhere".to_string();
        save_config_to(&edited, &path).unwrap();

        let reloaded = load_config_from(&path).unwrap();
        assert_eq!(reloaded.database.data_dir, "elsewhere");
    }
}
