//! Particl parser: the Bitcoin-like base parser decorated with cold staking
//! addresses, coinstake scripts, the extended block header and the backend's
//! privacy output JSON.

use std::io::Cursor;
use std::str::FromStr;

use bitcoin::hashes::Hash;
use bitcoin::Transaction;

use crate::chain::NetworkParams;
use crate::config::ParserConfig;
use crate::errors::*;
use crate::particl_layer::blockdata::block::{decode_block_prefix, MIN_TX_SIZE};
use crate::particl_layer::{
    encode_address, Address256, Amount, Block, BlockInfo, InputSource, OutputType, ScriptPubKey,
    ScriptShape, Tx, Vin, Vout,
};
use crate::util::Bytes;

mod base;
mod normalize;

pub use self::base::{BaseParser, BitcoinLikeParser};

/// Descriptor returned for inputs whose spent output is unknown.
const UNKNOWN_INPUT_DESCRIPTOR_LEN: usize = 10;

type AddressStrategy<B> = fn(&ParticlParser<B>, &str) -> Result<Bytes>;

pub struct ParticlParser<B: BaseParser = BitcoinLikeParser> {
    base: B,
    config: ParserConfig,
}

impl ParticlParser {
    pub fn new(params: &'static NetworkParams, config: ParserConfig) -> Self {
        ParticlParser::with_base(BitcoinLikeParser::new(params), config)
    }
}

impl<B: BaseParser> ParticlParser<B> {
    pub fn with_base(base: B, config: ParserConfig) -> Self {
        ParticlParser { base, config }
    }

    pub fn params(&self) -> &'static NetworkParams {
        self.base.params()
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Locking script for `address`. Standard addresses are tried first, then
    /// the 256-bit cold staking and script hash forms.
    pub fn address_to_descriptor(&self, address: &str) -> Result<Bytes> {
        let strategies: [(&str, AddressStrategy<B>); 2] = [
            ("standard", |parser, address| {
                parser.base.address_to_descriptor(address)
            }),
            ("256-bit", |_, address| {
                Ok(Address256::from_str(address)?.script_pubkey())
            }),
        ];
        for (name, strategy) in strategies.iter() {
            match strategy(self, address) {
                Ok(script) => return Ok(script),
                Err(e) => trace!("{} decoding of {:?} failed: {}", name, address, e),
            }
        }
        bail!(ErrorKind::AddressMissing)
    }

    /// Addresses paid by `script` and whether they are spendable addresses.
    /// Never fails, unknown scripts give no addresses.
    pub fn descriptor_to_addresses(&self, script: &[u8]) -> (Vec<String>, bool) {
        match ScriptShape::of(script).hash256() {
            Some((hash, version)) => (vec![encode_address(hash, version)], true),
            None => self.base.descriptor_to_addresses(script),
        }
    }

    /// Parses a serialized block. Output addresses are resolved only when
    /// `parse_block_addresses` is set.
    pub fn parse_block(&self, bytes: &[u8]) -> Result<Block> {
        let mut cursor = Cursor::new(bytes);
        let (header, tx_count) = decode_block_prefix(&mut cursor)?;
        // the declared count is untrusted, size the buffer by what the bytes can hold
        let mut txs = Vec::with_capacity(tx_count.min(bytes.len() / MIN_TX_SIZE));
        for _ in 0..tx_count {
            let tx = self.base.decode_tx(&mut cursor)?;
            txs.push(self.tx_from_wire(&tx, self.config.parse_block_addresses, vec![]));
        }
        trace!("parsed block with {} txs, {} bytes", txs.len(), bytes.len());
        Ok(Block {
            header: BlockInfo {
                hash: None,
                prev_hash: Some(header.header.prev_blockhash),
                height: None,
                size: bytes.len(),
                time: header.time(),
                witness_merkle_root: Some(hex::encode(header.witness_merkle_root)),
            },
            txs,
        })
    }

    /// Parses a serialized transaction, resolving output addresses.
    pub fn parse_tx(&self, bytes: &[u8]) -> Result<Tx> {
        let tx = self.base.decode_tx(&mut Cursor::new(bytes))?;
        Ok(self.tx_from_wire(&tx, true, bytes.to_vec()))
    }

    fn tx_from_wire(&self, tx: &Transaction, resolve_addresses: bool, raw: Bytes) -> Tx {
        let vin = tx
            .input
            .iter()
            .enumerate()
            .map(|(i, input)| {
                let prev = &input.previous_output;
                // coinbase and coinstake genesis inputs spend the all-zero hash
                if i == 0 && prev.txid.as_inner() == &[0u8; 32] {
                    Vin {
                        source: InputSource::Coinbase(input.script_sig.to_bytes()),
                        script_sig: vec![],
                        sequence: input.sequence,
                    }
                } else {
                    Vin {
                        source: InputSource::Prevout {
                            txid: prev.txid,
                            vout: prev.vout,
                        },
                        script_sig: input.script_sig.to_bytes(),
                        sequence: input.sequence,
                    }
                }
            })
            .collect();

        let vout = tx
            .output
            .iter()
            .enumerate()
            .map(|(n, output)| {
                let script = output.script_pubkey.to_bytes();
                let addresses = if resolve_addresses {
                    self.descriptor_to_addresses(&script).0
                } else {
                    vec![]
                };
                Vout {
                    n: n as u32,
                    value: Amount::from_sat(output.value),
                    script_pubkey: ScriptPubKey { script, addresses },
                    output_type: OutputType::Standard,
                    value_commitment: None,
                    data: None,
                    range_proof: None,
                }
            })
            .collect();

        Tx {
            txid: tx.txid(),
            version: tx.version,
            lock_time: tx.lock_time,
            vin,
            vout,
            raw,
            confirmations: 0,
            block_time: 0,
            time: 0,
            coin_specific: None,
        }
    }

    pub fn pack_tx(&self, tx: &Tx, height: u32, block_time: i64) -> Result<Bytes> {
        self.base.pack_tx(tx, height, block_time)
    }

    pub fn unpack_tx(&self, buf: &[u8]) -> Result<(Tx, u32)> {
        self.base.unpack_tx(buf)
    }

    /// Descriptor for an input whose spent output is not indexed: its
    /// unlocking script, or ten zero bytes when there is none.
    pub fn descriptor_for_unknown_input(&self, tx: &Tx, index: usize) -> Bytes {
        match tx.vin.get(index) {
            Some(vin) if !vin.script_sig.is_empty() => vin.script_sig.clone(),
            _ => vec![0u8; UNKNOWN_INPUT_DESCRIPTOR_LEN],
        }
    }
}
