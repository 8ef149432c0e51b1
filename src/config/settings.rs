use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, File};

use crate::config::RpcConfig;
use crate::utils::address;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub app: AppSettings,
    pub rpc: RpcConfig,
    pub database: DatabaseSettings,
    pub generator: GeneratorSettings,
    pub api: ApiSettings,
    pub mint: MintSettings,
    pub share: ShareSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub version: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorSettings {
    pub model: String,
    pub temperature: f32,
    pub timeout_seconds: u64,
    pub api_base: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintSettings {
    pub price_eth: f64,
    pub recipient: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareSettings {
    pub base_url: String,
    pub hashtags: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: "Base Identity Protocol".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                log_level: "info".to_string(),
            },
            rpc: RpcConfig::default(),
            database: DatabaseSettings {
                url: "sqlite://wallet_identities.db".to_string(),
                max_connections: 5,
            },
            generator: GeneratorSettings {
                model: "gemini-flash-latest".to_string(),
                temperature: 0.8,
                timeout_seconds: 20,
                api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                api_key_env: "GOOGLE_API_KEY".to_string(),
            },
            api: ApiSettings {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            mint: MintSettings {
                price_eth: 0.5,
                recipient: "0x0000000000000000000000000000000000000000".to_string(),
            },
            share: ShareSettings {
                base_url: "https://baseidentity.xyz".to_string(),
                hashtags: vec![
                    "BaseIdentity".to_string(),
                    "BaseL2".to_string(),
                    "OnChainIdentity".to_string(),
                ],
            },
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("BASE_IDENTITY").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.rpc.endpoints.is_empty() {
            return Err("At least one RPC endpoint must be configured".to_string());
        }

        if !(0.0..=2.0).contains(&self.generator.temperature) {
            return Err(format!(
                "Generator temperature must be between 0 and 2, got {}",
                self.generator.temperature
            ));
        }

        if !(self.mint.price_eth.is_finite() && self.mint.price_eth > 0.0) {
            return Err(format!("Mint price must be positive, got {}", self.mint.price_eth));
        }

        address::normalize(&self.mint.recipient)
            .map_err(|e| format!("Mint recipient is not a valid address: {}", e))?;

        if self.database.max_connections == 0 {
            return Err("Database max_connections must be at least 1".to_string());
        }

        Ok(())
    }

    /// API key for the identity generator, if present in the environment.
    pub fn generator_api_key(&self) -> Option<String> {
        std::env::var(&self.generator.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.generator.temperature = 3.5;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.mint.price_eth = 0.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.mint.recipient = "nobody".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.rpc.endpoints.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_layered_defaults_deserialize() {
        let settings = Config::builder()
            .add_source(Config::try_from(&Settings::default()).unwrap())
            .set_override("api.port", 9090)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize::<Settings>()
            .unwrap();

        assert_eq!(settings.api.port, 9090);
        assert_eq!(settings.rpc.chain_id, 8453);
        assert_eq!(settings.generator.model, "gemini-flash-latest");
    }
}
