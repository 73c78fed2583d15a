use std::collections::HashMap;
use std::sync::RwLock;

pub use crate::particl_layer::network::constants::Network;
use crate::particl_layer::network::constants::{MAINNET_MAGIC, REGTEST_MAGIC, TESTNET_MAGIC};

/// Address encoding parameters of a Particl network.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct NetworkParams {
    pub name: &'static str,
    pub network: Network,
    pub magic: u32,
    pub pubkey_hash: u8,
    pub script_hash: u8,
    pub secret_key: u8,
    pub bech32_hrp: &'static str,
}

pub static MAINNET_PARAMS: NetworkParams = NetworkParams {
    name: "Particl",
    network: Network::Mainnet,
    magic: MAINNET_MAGIC,
    pubkey_hash: 56, // 'P'
    script_hash: 60, // 'R'
    secret_key: 108,
    bech32_hrp: "pw",
};

pub static TESTNET_PARAMS: NetworkParams = NetworkParams {
    name: "Particl Testnet",
    network: Network::Testnet,
    magic: TESTNET_MAGIC,
    pubkey_hash: 118, // 'p'
    script_hash: 122, // 'r'
    secret_key: 46,
    bech32_hrp: "tp",
};

pub static REGTEST_PARAMS: NetworkParams = NetworkParams {
    name: "Particl Regtest",
    network: Network::Regtest,
    magic: REGTEST_MAGIC,
    pubkey_hash: 118,
    script_hash: 122,
    secret_key: 46,
    bech32_hrp: "tpw",
};

lazy_static! {
    static ref REGISTRY: RwLock<HashMap<&'static str, &'static NetworkParams>> = {
        let mut registry = HashMap::new();
        for params in &[&MAINNET_PARAMS, &TESTNET_PARAMS, &REGTEST_PARAMS] {
            registry.insert(params.name, *params);
        }
        RwLock::new(registry)
    };
}

/// Registers `params` under its name. Registering the same name again is a no-op,
/// the first registration wins. Returns whether this call inserted the entry.
pub fn register(params: &'static NetworkParams) -> bool {
    let mut registry = REGISTRY.write().unwrap();
    if registry.contains_key(params.name) {
        trace!("network {:?} already registered", params.name);
        return false;
    }
    debug!("registering network {:?}", params.name);
    registry.insert(params.name, params);
    true
}

pub fn is_registered(name: &str) -> bool {
    REGISTRY.read().unwrap().contains_key(name)
}

/// Returns the parameters for a backend chain identifier (`getblockchaininfo.chain`).
/// Unknown identifiers resolve to mainnet.
pub fn params_for(chain: &str) -> &'static NetworkParams {
    let network = Network::from(chain);
    let wanted = network.default_params();
    REGISTRY
        .read()
        .unwrap()
        .get(wanted.name)
        .copied()
        .unwrap_or(wanted)
}

impl Network {
    /// Network label reported to clients (`livenet` / `testnet`).
    pub fn label(self) -> &'static str {
        match self {
            Network::Mainnet => "livenet",
            Network::Testnet | Network::Regtest => "testnet",
        }
    }

    pub fn params(self) -> &'static NetworkParams {
        params_for(self.chain_name())
    }

    fn default_params(self) -> &'static NetworkParams {
        match self {
            Network::Mainnet => &MAINNET_PARAMS,
            Network::Testnet => &TESTNET_PARAMS,
            Network::Regtest => &REGTEST_PARAMS,
        }
    }

    /// Chain identifier as reported by the backend.
    pub fn chain_name(self) -> &'static str {
        match self {
            Network::Mainnet => "main",
            Network::Testnet => "test",
            Network::Regtest => "regtest",
        }
    }

    pub fn names() -> Vec<String> {
        vec!["main".to_string(), "test".to_string(), "regtest".to_string()]
    }
}

impl From<&str> for Network {
    fn from(chain: &str) -> Self {
        match chain {
            "test" => Network::Testnet,
            "regtest" => Network::Regtest,
            "main" => Network::Mainnet,
            _ => {
                debug!("unknown chain {:?}, using mainnet", chain);
                Network::Mainnet
            }
        }
    }
}
