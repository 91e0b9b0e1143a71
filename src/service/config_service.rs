// src/service/config_service.rs
use log::{info, warn};

use crate::common::config::ClockConfig;
use crate::common::error::{AppError, Result};
use crate::driver::storage::ConfigStorage;

/// 配置服务：在字节存储之上读写 JSON 格式的 [`ClockConfig`]
pub struct ConfigService<S: ConfigStorage> {
    storage: S,
}

impl<S: ConfigStorage> ConfigService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// 读取配置，不存在时返回 `None`
    pub fn load_config(&mut self) -> Result<Option<ClockConfig>> {
        let Some(data) = self.storage.read_config_block()? else {
            return Ok(None);
        };
        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|e| AppError::ConfigError(e.to_string()))
    }

    /// 读取配置，缺失或损坏时使用默认值
    pub fn load_or_default(&mut self) -> ClockConfig {
        match self.load_config() {
            Ok(Some(config)) => {
                info!("Configuration loaded");
                config
            }
            Ok(None) => {
                warn!("No configuration found, using defaults");
                ClockConfig::default()
            }
            Err(e) => {
                warn!("Failed to load configuration ({}), using defaults", e);
                ClockConfig::default()
            }
        }
    }

    pub fn save_config(&mut self, config: &ClockConfig) -> Result<()> {
        let data =
            serde_json::to_vec_pretty(config).map_err(|e| AppError::ConfigError(e.to_string()))?;
        self.storage.write_config_block(&data)
    }

    pub fn reset_to_defaults(&mut self) -> Result<()> {
        self.storage.erase_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 内存中的存储
    #[derive(Default)]
    struct MemoryStorage {
        data: Option<Vec<u8>>,
    }

    impl ConfigStorage for MemoryStorage {
        fn read_config_block(&mut self) -> Result<Option<Vec<u8>>> {
            Ok(self.data.clone())
        }

        fn write_config_block(&mut self, data: &[u8]) -> Result<()> {
            self.data = Some(data.to_vec());
            Ok(())
        }

        fn erase_config(&mut self) -> Result<()> {
            self.data = None;
            Ok(())
        }
    }

    #[test]
    fn test_absent_config_falls_back_to_defaults() {
        let mut service = ConfigService::new(MemoryStorage::default());
        assert_eq!(service.load_config(), Ok(None));
        assert_eq!(service.load_or_default(), ClockConfig::default());
    }

    #[test]
    fn test_malformed_config_falls_back_to_defaults() {
        let mut service = ConfigService::new(MemoryStorage {
            data: Some(b"{not json".to_vec()),
        });
        assert!(matches!(service.load_config(), Err(AppError::ConfigError(_))));
        assert_eq!(service.load_or_default(), ClockConfig::default());
    }

    #[test]
    fn test_saved_config_is_loaded_back() {
        let mut service = ConfigService::new(MemoryStorage::default());
        let mut config = ClockConfig::default();
        config.color.hue = 42.0;
        config.network.control_port = Some(5000);

        service.save_config(&config).unwrap();
        assert_eq!(service.load_config(), Ok(Some(config)));

        service.reset_to_defaults().unwrap();
        assert_eq!(service.load_config(), Ok(None));
    }
}
