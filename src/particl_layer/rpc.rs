//! Shapes of the backend (particld) JSON-RPC results this crate normalizes.
//!
//! Privacy fields (commitments, range proofs, carried data, the CT fee) only
//! exist here, the wire encoding does not expose them.

use bitcoin::{BlockHash, Txid};
use serde_json::Value;

use crate::chain::Network;

/// `getrawtransaction` (verbose) result, also each entry of `getblock` verbosity 2.
#[derive(Debug, Deserialize)]
pub struct TxJson {
    #[serde(default)]
    pub hex: Option<String>,
    pub txid: Txid,
    pub version: i32,
    #[serde(default, rename = "locktime")]
    pub lock_time: u32,
    #[serde(default)]
    pub vin: Vec<VinJson>,
    #[serde(default)]
    pub vout: Vec<VoutJson>,
    #[serde(default)]
    pub confirmations: u32,
    #[serde(default)]
    pub blocktime: i64,
    #[serde(default)]
    pub time: i64,
}

#[derive(Debug, Deserialize)]
pub struct VinJson {
    #[serde(default)]
    pub coinbase: Option<String>,
    #[serde(default)]
    pub txid: Option<Txid>,
    #[serde(default)]
    pub vout: u32,
    #[serde(default, rename = "scriptSig")]
    pub script_sig: Option<ScriptSigJson>,
    #[serde(default)]
    pub sequence: u32,
    /// `anon` for RingCT inputs.
    #[serde(default, rename = "type")]
    pub input_type: Option<String>,
    #[serde(default)]
    pub num_inputs: u32,
    #[serde(default)]
    pub ring_size: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScriptSigJson {
    #[serde(default)]
    pub hex: String,
}

#[derive(Debug, Deserialize)]
pub struct VoutJson {
    /// Decimal PART amount, absent on privacy outputs.
    #[serde(default)]
    pub value: Option<Value>,
    #[serde(default)]
    pub n: u32,
    #[serde(default, rename = "scriptPubKey")]
    pub script_pub_key: ScriptPubKeyJson,
    #[serde(default, rename = "type")]
    pub output_type: Option<String>,
    #[serde(default, rename = "valueCommitment")]
    pub value_commitment: Option<String>,
    #[serde(default, rename = "data_hex", alias = "data")]
    pub data: Option<String>,
    #[serde(default)]
    pub rangeproof: Option<String>,
    /// Only set on the data output of blind and anon transactions.
    #[serde(default)]
    pub ct_fee: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ScriptPubKeyJson {
    #[serde(default)]
    pub hex: String,
    #[serde(default)]
    pub addresses: Vec<String>,
    /// Single address form, used by cold staking outputs.
    #[serde(default)]
    pub address: Option<String>,
}

/// `getblock` verbosity 2 result.
#[derive(Debug, Deserialize)]
pub struct BlockJson {
    pub hash: BlockHash,
    #[serde(default, rename = "previousblockhash")]
    pub prev_hash: Option<BlockHash>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub size: usize,
    #[serde(default)]
    pub time: i64,
    /// Kept as raw values so a single bad transaction does not fail the block.
    #[serde(default)]
    pub tx: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Warnings {
    List(Vec<String>),
    Text(String),
}

impl Default for Warnings {
    fn default() -> Self {
        Warnings::List(vec![])
    }
}

impl Warnings {
    fn joined(&self) -> String {
        match self {
            Warnings::List(list) => list.join("; "),
            Warnings::Text(text) => text.clone(),
        }
    }
}

/// `getblockchaininfo` result. Particl reports `warnings` as an array.
#[derive(Debug, Deserialize)]
pub struct BlockchainInfoJson {
    pub chain: String,
    #[serde(default)]
    pub blocks: u32,
    #[serde(default)]
    pub headers: u32,
    #[serde(default)]
    pub bestblockhash: String,
    #[serde(default)]
    pub difficulty: Value,
    #[serde(default)]
    pub size_on_disk: u64,
    #[serde(default)]
    pub warnings: Warnings,
}

/// `getnetworkinfo` result.
#[derive(Debug, Deserialize)]
pub struct NetworkInfoJson {
    #[serde(default)]
    pub version: Value,
    #[serde(default)]
    pub subversion: String,
    #[serde(default)]
    pub protocolversion: Value,
    #[serde(default)]
    pub timeoffset: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainInfo {
    pub chain: String,
    pub network: Network,
    /// `livenet` or `testnet`.
    pub network_label: String,
    pub blocks: u32,
    pub headers: u32,
    pub best_block_hash: String,
    pub difficulty: String,
    pub size_on_disk: u64,
    pub warnings: String,
    pub version: String,
    pub subversion: String,
    pub protocol_version: String,
    pub time_offset: i64,
}

fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl ChainInfo {
    /// Merges `getblockchaininfo` with the optional `getnetworkinfo` result.
    pub fn from_rpc(chain: BlockchainInfoJson, network: Option<NetworkInfoJson>) -> Self {
        let kind = Network::from(chain.chain.as_str());
        let mut info = ChainInfo {
            network: kind,
            network_label: kind.label().to_string(),
            chain: chain.chain,
            blocks: chain.blocks,
            headers: chain.headers,
            best_block_hash: chain.bestblockhash,
            difficulty: value_text(&chain.difficulty),
            size_on_disk: chain.size_on_disk,
            warnings: chain.warnings.joined(),
            version: String::new(),
            subversion: String::new(),
            protocol_version: String::new(),
            time_offset: 0,
        };
        match network {
            Some(net) => {
                info.version = value_text(&net.version);
                info.subversion = net.subversion;
                info.protocol_version = value_text(&net.protocolversion);
                info.time_offset = net.timeoffset;
                debug!(
                    "backend version={}, subversion={}",
                    info.version, info.subversion
                );
            }
            None => debug!("getnetworkinfo not available, version left empty"),
        }
        info
    }
}
