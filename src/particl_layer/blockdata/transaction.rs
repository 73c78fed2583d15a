use bitcoin::Txid;

use crate::particl_layer::blockdata::units::Amount;
use crate::util::Bytes;

/// Canonical transaction, built either from wire bytes or from backend JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    pub txid: Txid,
    pub version: i32,
    pub lock_time: u32,
    pub vin: Vec<Vin>,
    pub vout: Vec<Vout>,
    /// Raw transaction bytes, empty when the source did not carry them.
    #[serde(default)]
    pub raw: Bytes,
    #[serde(default)]
    pub confirmations: u32,
    #[serde(default)]
    pub block_time: i64,
    #[serde(default)]
    pub time: i64,
    /// Present on transactions normalized from backend JSON.
    #[serde(default)]
    pub coin_specific: Option<ParticlTxData>,
}

impl Tx {
    /// Confidential transaction fee, zero when unknown.
    pub fn ct_fee(&self) -> Amount {
        self.coin_specific
            .as_ref()
            .map_or(Amount::ZERO, |data| data.ct_fee)
    }

    pub fn is_coinbase(&self) -> bool {
        match self.vin.first() {
            Some(vin) => vin.is_coinbase(),
            None => false,
        }
    }

    /// Sum of the values visible on chain. Hidden values are not included.
    pub fn visible_value(&self) -> Amount {
        self.vout
            .iter()
            .filter(|vout| !vout.output_type.hides_value())
            .map(|vout| vout.value)
            .sum()
    }
}

/// Particl data that has no place in a Bitcoin transaction.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticlTxData {
    pub ct_fee: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vin {
    pub source: InputSource,
    /// Unlocking script. Empty for coinbase and anon inputs.
    #[serde(default)]
    pub script_sig: Bytes,
    pub sequence: u32,
}

impl Vin {
    pub fn is_coinbase(&self) -> bool {
        match self.source {
            InputSource::Coinbase(_) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputSource {
    /// Coinbase or stake genesis input, with its coinbase data.
    Coinbase(Bytes),
    Prevout { txid: Txid, vout: u32 },
    /// RingCT input, the spent output is hidden in a ring of `ring_size` members.
    Anon { num_inputs: u32, ring_size: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vout {
    pub n: u32,
    /// Zero and meaningless for `data`, `blind` and `anon` outputs.
    pub value: Amount,
    pub script_pubkey: ScriptPubKey,
    pub output_type: OutputType,
    #[serde(default)]
    pub value_commitment: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub range_proof: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptPubKey {
    pub script: Bytes,
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    Standard,
    Data,
    Blind,
    Anon,
}

impl OutputType {
    /// Maps the backend's `type` tag. Anything unknown is a standard output.
    pub fn from_backend(tag: Option<&str>) -> Self {
        match tag {
            Some("data") => OutputType::Data,
            Some("blind") => OutputType::Blind,
            Some("anon") => OutputType::Anon,
            _ => OutputType::Standard,
        }
    }

    /// True when a zero value means "not visible" rather than "empty".
    pub fn hides_value(self) -> bool {
        self != OutputType::Standard
    }
}

impl Default for OutputType {
    fn default() -> Self {
        OutputType::Standard
    }
}
