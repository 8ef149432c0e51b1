use serde::{Deserialize, Serialize};

pub const BASE_MAINNET_CHAIN_ID: u64 = 8453;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    pub endpoints: Vec<RpcEndpoint>,
    pub chain_id: u64,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcEndpoint {
    pub name: String,
    pub url: String,
    pub priority: u8, // Lower is higher priority
}

impl Default for RpcConfig {
    fn default() -> Self {
        let endpoints = vec![
            RpcEndpoint {
                name: "base_official".to_string(),
                url: "https://mainnet.base.org".to_string(),
                priority: 1,
            },
            RpcEndpoint {
                name: "base_publicnode".to_string(),
                url: "https://base.publicnode.com".to_string(),
                priority: 2,
            },
        ];

        Self {
            endpoints,
            chain_id: BASE_MAINNET_CHAIN_ID,
            timeout_seconds: 30,
            max_retries: 3,
        }
    }
}

impl RpcConfig {
    pub fn endpoints_by_priority(&self) -> Vec<&RpcEndpoint> {
        let mut endpoints: Vec<&RpcEndpoint> = self.endpoints.iter().collect();
        endpoints.sort_by_key(|e| e.priority);
        endpoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_endpoint_is_lowest_priority_number() {
        let mut config = RpcConfig::default();
        config.endpoints.reverse();

        let ordered = config.endpoints_by_priority();
        assert_eq!(ordered[0].url, "https://mainnet.base.org");
        assert_eq!(ordered[1].url, "https://base.publicnode.com");
    }

    #[test]
    fn test_no_endpoints() {
        let config = RpcConfig {
            endpoints: Vec::new(),
            ..RpcConfig::default()
        };
        assert!(config.endpoints_by_priority().is_empty());
    }
}
