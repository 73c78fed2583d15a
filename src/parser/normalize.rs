// Normalization of the backend's verbose transaction and block JSON.

use serde_json::Value;

use super::{BaseParser, ParticlParser};
use crate::errors::*;
use crate::particl_layer::rpc::{BlockJson, TxJson, VinJson, VoutJson};
use crate::particl_layer::{
    Amount, Block, BlockInfo, InputSource, OutputType, ParticlTxData, ScriptPubKey, Tx, Vin, Vout,
};

/// Reads a decimal JSON amount. Missing and null amounts are zero.
pub(crate) fn json_amount(value: Option<&Value>, decimal_point: usize) -> Result<Amount> {
    match value {
        None | Some(Value::Null) => Ok(Amount::ZERO),
        Some(Value::Number(n)) => Amount::from_decimal_str(&n.to_string(), decimal_point),
        Some(Value::String(s)) => Amount::from_decimal_str(s, decimal_point),
        Some(other) => bail!(ErrorKind::AmountConversion(other.to_string())),
    }
}

fn vin_from_json(vin: VinJson) -> Result<Vin> {
    let script_sig = match vin.script_sig {
        Some(script_sig) if !script_sig.hex.is_empty() => hex::decode(&script_sig.hex)?,
        _ => vec![],
    };
    let source = if vin.input_type.as_deref() == Some("anon") {
        InputSource::Anon {
            num_inputs: vin.num_inputs,
            ring_size: vin.ring_size,
        }
    } else if let Some(coinbase) = vin.coinbase {
        InputSource::Coinbase(hex::decode(&coinbase)?)
    } else if let Some(txid) = vin.txid {
        InputSource::Prevout {
            txid,
            vout: vin.vout,
        }
    } else {
        bail!(ErrorKind::Deserialization(
            "input has no coinbase, txid or anon type".to_string()
        ));
    };
    Ok(Vin {
        source,
        script_sig,
        sequence: vin.sequence,
    })
}

impl<B: BaseParser> ParticlParser<B> {
    /// Parses a verbose `getrawtransaction` result.
    pub fn parse_tx_json(&self, json: &[u8]) -> Result<Tx> {
        let tx: TxJson = serde_json::from_slice(json)
            .chain_err(|| ErrorKind::Deserialization("invalid transaction JSON".to_string()))?;
        self.tx_from_json(tx)
    }

    fn vout_from_json(&self, vout: VoutJson) -> Result<Vout> {
        let output_type = OutputType::from_backend(vout.output_type.as_deref());
        let value = if output_type.hides_value() {
            Amount::ZERO
        } else {
            json_amount(vout.value.as_ref(), self.config.amount_decimal_point)?
        };
        let spk = vout.script_pub_key;
        let addresses = match spk.address {
            Some(address) if spk.addresses.is_empty() && !address.is_empty() => vec![address],
            _ => spk.addresses,
        };
        Ok(Vout {
            n: vout.n,
            value,
            script_pubkey: ScriptPubKey {
                script: hex::decode(&spk.hex)?,
                addresses,
            },
            output_type,
            value_commitment: vout.value_commitment,
            data: vout.data,
            range_proof: vout.rangeproof,
        })
    }

    /// The CT fee sits on the first data output carrying a positive `ct_fee`.
    /// Zero and negative fees are passed over.
    fn ct_fee(&self, vouts: &[VoutJson]) -> Result<Amount> {
        for vout in vouts {
            if OutputType::from_backend(vout.output_type.as_deref()) != OutputType::Data {
                continue;
            }
            let fee = match vout.ct_fee.as_ref() {
                Some(Value::Number(n)) if n.to_string().starts_with('-') => continue,
                fee => json_amount(fee, self.config.amount_decimal_point)?,
            };
            if fee > Amount::ZERO {
                return Ok(fee);
            }
        }
        Ok(Amount::ZERO)
    }

    pub(crate) fn tx_from_json(&self, tx: TxJson) -> Result<Tx> {
        let ct_fee = self.ct_fee(&tx.vout)?;
        let vin = tx
            .vin
            .into_iter()
            .map(vin_from_json)
            .collect::<Result<Vec<Vin>>>()?;
        let vout = tx
            .vout
            .into_iter()
            .map(|vout| self.vout_from_json(vout))
            .collect::<Result<Vec<Vout>>>()?;
        let raw = match tx.hex {
            Some(raw) => hex::decode(&raw)?,
            None => vec![],
        };
        Ok(Tx {
            txid: tx.txid,
            version: tx.version,
            lock_time: tx.lock_time,
            vin,
            vout,
            raw,
            confirmations: tx.confirmations,
            block_time: tx.blocktime,
            time: tx.time,
            coin_specific: Some(ParticlTxData { ct_fee }),
        })
    }

    /// Parses a `getblock` verbosity 2 result. Transactions that fail to
    /// normalize are logged and left out of the block.
    pub fn parse_block_json(&self, json: &[u8]) -> Result<Block> {
        let block: BlockJson = serde_json::from_slice(json)
            .chain_err(|| ErrorKind::Deserialization("invalid block JSON".to_string()))?;
        let mut txs = Vec::with_capacity(block.tx.len());
        for (i, value) in block.tx.into_iter().enumerate() {
            let tx = serde_json::from_value::<TxJson>(value)
                .map_err(Error::from)
                .and_then(|tx| self.tx_from_json(tx));
            match tx {
                Ok(tx) => {
                    if tx.ct_fee() > Amount::ZERO {
                        debug!("tx {} carries CT fee {}", tx.txid, tx.ct_fee());
                    }
                    txs.push(tx);
                }
                Err(e) => warn!("skipping tx #{} of block {}: {}", i, block.hash, e),
            }
        }
        Ok(Block {
            header: BlockInfo {
                hash: Some(block.hash),
                prev_hash: block.prev_hash,
                height: block.height,
                size: block.size,
                time: block.time,
                witness_merkle_root: None,
            },
            txs,
        })
    }
}
