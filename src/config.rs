//! Layered configuration.
//!
//! Values are looked up in the following sources, first hit wins:
//!
//! 1. process environment;
//! 2. the first `agent*.env` file (by name) in the config directory;
//! 3. `config.json` in the config directory;
//! 4. the exchange's `/api/config` document, if the caller fetched one
//!    (see [`ConfigSources::with_remote`]);
//! 5. the preset of the selected `NETWORK`.
//!
//! Empty values are treated as unset. The result is one immutable [`Config`];
//! the private key is resolved separately with [`ConfigSources::private_key`]
//! so it never travels with the rest of the configuration.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::primitives::Address;
use fastnum::UD128;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::{
    Chain, num,
    signing::{PrivateKey, RecoveryIdFormat, SigningError},
};

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_EXCHANGE_URL: &str = "http://localhost:3002";
pub const DEFAULT_EXCHANGE_WS_URL: &str = "ws://localhost:3002";
pub const DEFAULT_ORDER_SIZE_USDC: &str = "5";
pub const TESTNET_RPC_URL: &str = "https://testnet-rpc.monad.xyz";
pub const MAINNET_RPC_URL: &str = "https://rpc.monad.xyz";

/// Configuration could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("CHAIN_ID not configured")]
    MissingChainId,

    #[error("EXCHANGE_ADDRESS (verifying contract) not configured")]
    MissingVerifyingContract,

    #[error("{0} not configured")]
    MissingContract(&'static str),

    #[error("unknown network {0:?}, expected testnet, mainnet or custom")]
    UnknownNetwork(String),

    #[error("{key} is not a valid address: {value}")]
    InvalidAddress { key: &'static str, value: String },

    #[error("{key} is not a valid number: {value}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("{key} is not a valid URL: {value}")]
    InvalidUrl { key: &'static str, value: String },

    #[error("RECOVERY_ID_OFFSET must be 27 or 0, got {0}")]
    InvalidRecoveryIdOffset(String),

    #[error("environment error: {0}")]
    Env(#[from] envy::Error),

    #[error("failed to read {path}: {source}")]
    EnvFile {
        path: PathBuf,
        source: dotenvy::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "WITHDRAW_TO not configured, the cash-out destination must be set in the agent environment"
    )]
    MissingWithdrawTo,

    #[error("address mismatch: requested {requested} does not match WITHDRAW_TO {configured}")]
    WithdrawToMismatch {
        requested: Address,
        configured: Address,
    },
}

/// Network preset selected with `NETWORK`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Network {
    #[default]
    Testnet,
    Mainnet,
    /// No preset, every value must come from the other sources.
    Custom,
}

impl Network {
    /// Lowest priority layer of the cascade.
    pub fn preset(&self) -> ConfigLayer {
        let (chain, rpc_url) = match self {
            Network::Testnet => (Chain::testnet(), TESTNET_RPC_URL),
            Network::Mainnet => (Chain::mainnet(), MAINNET_RPC_URL),
            Network::Custom => return ConfigLayer::default(),
        };
        ConfigLayer {
            chain_id: Some(chain.chain_id().to_string()),
            rpc_url: Some(rpc_url.to_string()),
            exchange_address: Some(chain.exchange().to_checksum(None)),
            vault_address: chain.vault().map(|a| a.to_checksum(None)),
            usdc_address: chain.collateral_token().map(|a| a.to_checksum(None)),
            ..Default::default()
        }
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            "custom" => Ok(Network::Custom),
            _ => Err(ConfigError::UnknownNetwork(s.to_string())),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
            Network::Custom => "custom",
        })
    }
}

/// Raw values of a single configuration source.
///
/// Field names follow the environment variable names (`CHAIN_ID` ->
/// `chain_id`).
#[derive(Clone, Default, PartialEq, Eq, Deserialize, derive_more::Debug)]
#[serde(default)]
pub struct ConfigLayer {
    pub network: Option<String>,
    pub exchange_url: Option<String>,
    pub exchange_ws_url: Option<String>,
    pub chain_id: Option<String>,
    pub exchange_address: Option<String>,
    pub vault_address: Option<String>,
    pub usdc_address: Option<String>,
    pub rpc_url: Option<String>,
    #[debug(skip)]
    pub private_key: Option<String>,
    pub recovery_id_offset: Option<String>,
    pub default_order_size_usdc: Option<String>,
    pub withdraw_to: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ConfigLayer {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(envy::from_env()?)
    }

    /// Builds a layer from `KEY=value` pairs.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::from_iter(pairs)?)
    }

    /// Reads a dotenv file.
    pub fn from_env_file(path: &Path) -> Result<Self, ConfigError> {
        let env_file_error = |source| ConfigError::EnvFile {
            path: path.to_path_buf(),
            source,
        };
        let pairs = dotenvy::from_path_iter(path)
            .map_err(env_file_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(env_file_error)?;
        Self::from_pairs(pairs)
    }

    /// Reads a JSON object with uppercase keys and string or number values.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&json)
            .map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        let pairs = object
            .into_iter()
            .filter_map(|(key, value)| json_scalar(value).map(|v| (key, v)));
        Self::from_pairs(pairs)
    }

    /// Fills unset values of `self` from `lower`.
    pub fn or(self, lower: ConfigLayer) -> ConfigLayer {
        ConfigLayer {
            network: non_empty(self.network).or(non_empty(lower.network)),
            exchange_url: non_empty(self.exchange_url).or(non_empty(lower.exchange_url)),
            exchange_ws_url: non_empty(self.exchange_ws_url).or(non_empty(lower.exchange_ws_url)),
            chain_id: non_empty(self.chain_id).or(non_empty(lower.chain_id)),
            exchange_address: non_empty(self.exchange_address)
                .or(non_empty(lower.exchange_address)),
            vault_address: non_empty(self.vault_address).or(non_empty(lower.vault_address)),
            usdc_address: non_empty(self.usdc_address).or(non_empty(lower.usdc_address)),
            rpc_url: non_empty(self.rpc_url).or(non_empty(lower.rpc_url)),
            private_key: non_empty(self.private_key).or(non_empty(lower.private_key)),
            recovery_id_offset: non_empty(self.recovery_id_offset)
                .or(non_empty(lower.recovery_id_offset)),
            default_order_size_usdc: non_empty(self.default_order_size_usdc)
                .or(non_empty(lower.default_order_size_usdc)),
            withdraw_to: non_empty(self.withdraw_to).or(non_empty(lower.withdraw_to)),
        }
    }
}

fn json_scalar(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Contract addresses published by the exchange service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RemoteContracts {
    pub exchange: Option<String>,
    pub vault: Option<String>,
    pub usdc: Option<String>,
}

/// Body of the exchange's `GET /api/config`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoteExchangeConfig {
    pub chain_id: Option<serde_json::Value>,
    pub rpc_url: Option<String>,
    pub network: Option<String>,
    pub contracts: RemoteContracts,
}

impl From<RemoteExchangeConfig> for ConfigLayer {
    fn from(remote: RemoteExchangeConfig) -> Self {
        ConfigLayer {
            chain_id: remote.chain_id.and_then(json_scalar),
            rpc_url: remote.rpc_url,
            network: remote.network,
            exchange_address: remote.contracts.exchange,
            vault_address: remote.contracts.vault,
            usdc_address: remote.contracts.usdc,
            ..Default::default()
        }
    }
}

/// Every source of the cascade, highest priority first.
#[derive(Clone, Debug, Default)]
pub struct ConfigSources {
    env: ConfigLayer,
    agent_env: ConfigLayer,
    file: ConfigLayer,
    remote: ConfigLayer,
}

impl ConfigSources {
    pub fn new(env: ConfigLayer, agent_env: ConfigLayer, file: ConfigLayer) -> Self {
        Self {
            env,
            agent_env,
            file,
            remote: ConfigLayer::default(),
        }
    }

    /// Reads the process environment plus `agent*.env` and `config.json`
    /// from `dir`. Missing files are skipped.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let dir = dir.as_ref();
        let agent_env = match find_agent_env(dir)? {
            Some(path) => {
                debug!(path = %path.display(), "loading agent env");
                ConfigLayer::from_env_file(&path)?
            }
            None => ConfigLayer::default(),
        };

        let path = dir.join(CONFIG_FILE);
        let file = if path.is_file() {
            debug!(path = %path.display(), "loading config file");
            ConfigLayer::from_json_file(&path)?
        } else {
            ConfigLayer::default()
        };

        Ok(Self::new(ConfigLayer::from_env()?, agent_env, file))
    }

    /// Adds the configuration published by the exchange, ranked between
    /// `config.json` and the network preset.
    pub fn with_remote(mut self, remote: RemoteExchangeConfig) -> Self {
        self.remote = remote.into();
        self
    }

    fn merged(&self) -> ConfigLayer {
        self.env
            .clone()
            .or(self.agent_env.clone())
            .or(self.file.clone())
            .or(self.remote.clone())
    }

    /// Exchange endpoint, available before the remote config is known.
    pub fn exchange_url(&self) -> Result<Url, ConfigError> {
        let value = self
            .env
            .clone()
            .or(self.agent_env.clone())
            .or(self.file.clone())
            .exchange_url;
        parse_url(
            "EXCHANGE_URL",
            value.as_deref().unwrap_or(DEFAULT_EXCHANGE_URL),
        )
    }

    /// Resolves every non-secret value.
    pub fn resolve(&self) -> Result<Config, ConfigError> {
        let merged = self.merged();
        let network = match merged.network.as_deref() {
            Some(name) => name.parse()?,
            None => Network::default(),
        };
        let layer = merged.or(network.preset());

        let chain_id = layer
            .chain_id
            .as_deref()
            .ok_or(ConfigError::MissingChainId)?;
        let chain_id = chain_id
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber {
                key: "CHAIN_ID",
                value: chain_id.to_string(),
            })?;
        let exchange = layer
            .exchange_address
            .as_deref()
            .ok_or(ConfigError::MissingVerifyingContract)
            .and_then(|v| parse_address("EXCHANGE_ADDRESS", v))?;
        let vault = optional(layer.vault_address.as_deref(), |v| {
            parse_address("VAULT_ADDRESS", v)
        })?;
        let collateral_token = optional(layer.usdc_address.as_deref(), |v| {
            parse_address("USDC_ADDRESS", v)
        })?;

        let recovery_id = match layer.recovery_id_offset.as_deref() {
            Some(offset) => offset
                .trim()
                .parse::<u8>()
                .ok()
                .and_then(RecoveryIdFormat::from_offset)
                .ok_or_else(|| ConfigError::InvalidRecoveryIdOffset(offset.to_string()))?,
            None => RecoveryIdFormat::default(),
        };

        let order_size = layer
            .default_order_size_usdc
            .as_deref()
            .unwrap_or(DEFAULT_ORDER_SIZE_USDC);
        let default_order_size =
            num::parse_amount(order_size).map_err(|_| ConfigError::InvalidNumber {
                key: "DEFAULT_ORDER_SIZE_USDC",
                value: order_size.to_string(),
            })?;

        let config = Config {
            network,
            chain: Chain::custom(chain_id, exchange, vault, collateral_token),
            rpc_url: optional(layer.rpc_url.as_deref(), |v| parse_url("RPC_URL", v))?,
            exchange_url: parse_url(
                "EXCHANGE_URL",
                layer.exchange_url.as_deref().unwrap_or(DEFAULT_EXCHANGE_URL),
            )?,
            exchange_ws_url: parse_url(
                "EXCHANGE_WS_URL",
                layer
                    .exchange_ws_url
                    .as_deref()
                    .unwrap_or(DEFAULT_EXCHANGE_WS_URL),
            )?,
            recovery_id,
            default_order_size,
            withdraw_to: optional(layer.withdraw_to.as_deref(), |v| {
                parse_address("WITHDRAW_TO", v)
            })?,
        };
        info!(
            %network,
            chain_id,
            exchange = %exchange,
            recovery_id = ?config.recovery_id,
            "configuration resolved"
        );
        Ok(config)
    }

    /// Signing key from `PRIVATE_KEY`.
    pub fn private_key(&self) -> Result<PrivateKey, SigningError> {
        match self.merged().private_key {
            Some(key) => PrivateKey::from_hex(&key),
            None => Err(SigningError::MissingKey),
        }
    }
}

fn find_agent_env(dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let io_error = |source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        let is_agent_env = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("agent") && name.ends_with(".env"));
        if is_agent_env && path.is_file() {
            candidates.push(path);
        }
    }
    candidates.sort();
    Ok(candidates.into_iter().next())
}

fn optional<T>(
    value: Option<&str>,
    parse: impl FnOnce(&str) -> Result<T, ConfigError>,
) -> Result<Option<T>, ConfigError> {
    value.map(parse).transpose()
}

fn parse_address(key: &'static str, value: &str) -> Result<Address, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidAddress {
            key,
            value: value.to_string(),
        })
}

fn parse_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|_| ConfigError::InvalidUrl {
        key,
        value: value.to_string(),
    })
}

/// Resolved configuration, free of key material.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    network: Network,
    chain: Chain,
    rpc_url: Option<Url>,
    exchange_url: Url,
    exchange_ws_url: Url,
    recovery_id: RecoveryIdFormat,
    default_order_size: UD128,
    withdraw_to: Option<Address>,
}

impl Config {
    pub fn network(&self) -> Network {
        self.network
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    pub fn rpc_url(&self) -> Option<&Url> {
        self.rpc_url.as_ref()
    }

    pub fn exchange_url(&self) -> &Url {
        &self.exchange_url
    }

    pub fn exchange_ws_url(&self) -> &Url {
        &self.exchange_ws_url
    }

    pub fn recovery_id(&self) -> RecoveryIdFormat {
        self.recovery_id
    }

    /// Order size in USDC used when the caller gives none.
    pub fn default_order_size(&self) -> UD128 {
        self.default_order_size
    }

    /// Pre-configured cash-out destination.
    pub fn withdraw_to(&self) -> Option<Address> {
        self.withdraw_to
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;
    use fastnum::udec128;

    use super::*;
    use crate::testing::{TEST_PRIVATE_KEY, TempDir};

    fn layer(pairs: &[(&str, &str)]) -> ConfigLayer {
        ConfigLayer::from_pairs(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
        .unwrap()
    }

    #[test]
    fn test_testnet_preset_by_default() {
        let config = ConfigSources::default().resolve().unwrap();
        assert_eq!(config.network(), Network::Testnet);
        assert_eq!(config.chain(), &Chain::testnet());
        assert_eq!(config.rpc_url().unwrap().as_str(), "https://testnet-rpc.monad.xyz/");
        assert_eq!(config.exchange_url().as_str(), "http://localhost:3002/");
        assert_eq!(config.exchange_ws_url().as_str(), "ws://localhost:3002/");
        assert_eq!(config.recovery_id(), RecoveryIdFormat::Electrum);
        assert_eq!(config.default_order_size(), udec128!(5));
        assert_eq!(config.withdraw_to(), None);
    }

    #[test]
    fn test_mainnet_preset() {
        let sources = ConfigSources::new(layer(&[("NETWORK", "mainnet")]), Default::default(), Default::default());
        let config = sources.resolve().unwrap();
        assert_eq!(config.network(), Network::Mainnet);
        assert_eq!(config.chain().chain_id(), 143);
        assert_eq!(config.rpc_url().unwrap().as_str(), "https://rpc.monad.xyz/");
    }

    #[test]
    fn test_cascade_priority() {
        let env = layer(&[("CHAIN_ID", "1")]);
        let agent = layer(&[("CHAIN_ID", "2"), ("RPC_URL", "http://agent:8545")]);
        let file = layer(&[
            ("CHAIN_ID", "3"),
            ("RPC_URL", "http://file:8545"),
            ("EXCHANGE_URL", "http://file:3002"),
        ]);
        let remote = RemoteExchangeConfig {
            chain_id: Some(4.into()),
            rpc_url: Some("http://remote:8545".to_string()),
            contracts: RemoteContracts {
                vault: Some("0x1111111111111111111111111111111111111111".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let config = ConfigSources::new(env, agent, file)
            .with_remote(remote)
            .resolve()
            .unwrap();
        assert_eq!(config.chain().chain_id(), 1);
        assert_eq!(config.rpc_url().unwrap().as_str(), "http://agent:8545/");
        assert_eq!(config.exchange_url().as_str(), "http://file:3002/");
        assert_eq!(
            config.chain().vault(),
            Some(address!("0x1111111111111111111111111111111111111111"))
        );
        // preset fills the rest
        assert_eq!(config.chain().exchange(), Chain::testnet().exchange());
    }

    #[test]
    fn test_empty_values_are_unset() {
        let env = layer(&[("CHAIN_ID", ""), ("RECOVERY_ID_OFFSET", " ")]);
        let file = layer(&[("CHAIN_ID", "777")]);
        let config = ConfigSources::new(env, Default::default(), file)
            .resolve()
            .unwrap();
        assert_eq!(config.chain().chain_id(), 777);
        assert_eq!(config.recovery_id(), RecoveryIdFormat::Electrum);
    }

    #[test]
    fn test_custom_network_requires_domain() {
        let env = layer(&[("NETWORK", "custom")]);
        assert!(matches!(
            ConfigSources::new(env.clone(), Default::default(), Default::default()).resolve(),
            Err(ConfigError::MissingChainId)
        ));

        let file = layer(&[("CHAIN_ID", "31337")]);
        assert!(matches!(
            ConfigSources::new(env.clone(), Default::default(), file).resolve(),
            Err(ConfigError::MissingVerifyingContract)
        ));

        let file = layer(&[
            ("CHAIN_ID", "31337"),
            ("EXCHANGE_ADDRESS", "0x2222222222222222222222222222222222222222"),
        ]);
        let config = ConfigSources::new(env, Default::default(), file)
            .resolve()
            .unwrap();
        assert_eq!(config.network(), Network::Custom);
        assert_eq!(config.chain().chain_id(), 31337);
        assert_eq!(config.chain().vault(), None);
        assert_eq!(config.rpc_url(), None);
    }

    #[test]
    fn test_invalid_values() {
        let resolve = |pairs: &[(&str, &str)]| {
            ConfigSources::new(layer(pairs), Default::default(), Default::default()).resolve()
        };
        assert!(matches!(
            resolve(&[("NETWORK", "devnet")]),
            Err(ConfigError::UnknownNetwork(_))
        ));
        assert!(matches!(
            resolve(&[("CHAIN_ID", "ten")]),
            Err(ConfigError::InvalidNumber { key: "CHAIN_ID", .. })
        ));
        assert!(matches!(
            resolve(&[("EXCHANGE_ADDRESS", "0x1234")]),
            Err(ConfigError::InvalidAddress { key: "EXCHANGE_ADDRESS", .. })
        ));
        assert!(matches!(
            resolve(&[("RECOVERY_ID_OFFSET", "1")]),
            Err(ConfigError::InvalidRecoveryIdOffset(_))
        ));
        assert!(matches!(
            resolve(&[("EXCHANGE_URL", "not a url")]),
            Err(ConfigError::InvalidUrl { key: "EXCHANGE_URL", .. })
        ));
        assert!(matches!(
            resolve(&[("DEFAULT_ORDER_SIZE_USDC", "lots")]),
            Err(ConfigError::InvalidNumber { key: "DEFAULT_ORDER_SIZE_USDC", .. })
        ));
    }

    #[test]
    fn test_raw_recovery_id() {
        let config = ConfigSources::new(
            layer(&[("RECOVERY_ID_OFFSET", "0")]),
            Default::default(),
            Default::default(),
        )
        .resolve()
        .unwrap();
        assert_eq!(config.recovery_id(), RecoveryIdFormat::Raw);
    }

    #[test]
    fn test_private_key_resolution() {
        assert_eq!(
            ConfigSources::default().private_key().unwrap_err(),
            SigningError::MissingKey
        );

        let agent = layer(&[("PRIVATE_KEY", TEST_PRIVATE_KEY)]);
        let sources = ConfigSources::new(Default::default(), agent, Default::default());
        assert!(sources.private_key().is_ok());
        assert!(!format!("{sources:?}").contains(TEST_PRIVATE_KEY));
    }

    #[test]
    fn test_json_layer() {
        let dir = TempDir::new("config-json");
        let path = dir.write(
            "config.json",
            r#"{"CHAIN_ID": 10143, "EXCHANGE_URL": "http://x:1", "MAX_POSITION_USDC": 50, "NESTED": {}}"#,
        );
        let layer = ConfigLayer::from_json_file(&path).unwrap();
        assert_eq!(layer.chain_id.as_deref(), Some("10143"));
        assert_eq!(layer.exchange_url.as_deref(), Some("http://x:1"));

        let path = dir.write("array.json", "[1, 2]");
        assert!(matches!(
            ConfigLayer::from_json_file(&path),
            Err(ConfigError::Json { .. })
        ));
        assert!(matches!(
            ConfigLayer::from_json_file(&dir.path().join("missing.json")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn test_remote_config_document() {
        let remote: RemoteExchangeConfig = serde_json::from_str(
            r#"{
                "chainId": 143,
                "rpcUrl": "https://rpc.monad.xyz",
                "network": "mainnet",
                "contracts": {"exchange": "0x3333333333333333333333333333333333333333"}
            }"#,
        )
        .unwrap();
        let layer = ConfigLayer::from(remote);
        assert_eq!(layer.chain_id.as_deref(), Some("143"));
        assert_eq!(layer.network.as_deref(), Some("mainnet"));
        assert_eq!(
            layer.exchange_address.as_deref(),
            Some("0x3333333333333333333333333333333333333333")
        );
        assert_eq!(layer.vault_address, None);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = TempDir::new("config-load");
        dir.write(
            "config.json",
            r#"{"CHAIN_ID": "31337", "DEFAULT_ORDER_SIZE_USDC": 2.5}"#,
        );
        dir.write("agent-b.env", "RPC_URL=http://b:8545\n");
        dir.write(
            "agent-a.env",
            "# agent runtime\nRPC_URL=http://a:8545\nWITHDRAW_TO=0x4444444444444444444444444444444444444444\n",
        );

        let sources = ConfigSources::load(dir.path()).unwrap();
        assert_eq!(sources.agent_env.rpc_url.as_deref(), Some("http://a:8545"));
        assert_eq!(sources.file.chain_id.as_deref(), Some("31337"));
        assert_eq!(sources.file.default_order_size_usdc.as_deref(), Some("2.5"));
        assert_eq!(
            sources.agent_env.withdraw_to.as_deref(),
            Some("0x4444444444444444444444444444444444444444")
        );
    }

    #[test]
    fn test_load_rejects_broken_json() {
        let dir = TempDir::new("config-broken");
        dir.write("config.json", "{not json");
        assert!(matches!(
            ConfigSources::load(dir.path()),
            Err(ConfigError::Json { .. })
        ));
    }

    #[test]
    fn test_exchange_url_ignores_remote() {
        let file = layer(&[("EXCHANGE_URL", "http://exchange:3002")]);
        let sources = ConfigSources::new(Default::default(), Default::default(), file);
        assert_eq!(
            sources.exchange_url().unwrap().as_str(),
            "http://exchange:3002/"
        );
        assert_eq!(
            ConfigSources::default().exchange_url().unwrap().as_str(),
            "http://localhost:3002/"
        );
    }
}
