use std::io;

use bitcoin::{
    consensus::{encode::Error, Decodable, Encodable},
    VarInt,
};

use crate::particl_layer::blockdata::transaction::Tx;
use crate::particl_layer::network::constants::WITNESS_MERKLE_ROOT_LEN;

/// Largest block payload the decoder accepts.
const MAX_BLOCK_SIZE: usize = 4_000_000;
/// Every transaction takes at least this many bytes.
pub(crate) const MIN_TX_SIZE: usize = 10;

pub type BlockHeader = bitcoin::BlockHeader;
pub type BlockHash = bitcoin::BlockHash;

/// Particl block header: the Bitcoin header followed by the witness merkle root.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ParticlHeader {
    pub header: BlockHeader,
    pub witness_merkle_root: [u8; WITNESS_MERKLE_ROOT_LEN],
}

impl ParticlHeader {
    /// Serialized size of the header.
    pub const SIZE: usize = 80 + WITNESS_MERKLE_ROOT_LEN;

    pub fn time(&self) -> i64 {
        i64::from(self.header.time)
    }
}

impl Decodable for ParticlHeader {
    fn consensus_decode<D: io::Read>(mut d: D) -> Result<Self, Error> {
        Ok(ParticlHeader {
            header: BlockHeader::consensus_decode(&mut d)?,
            witness_merkle_root: Decodable::consensus_decode(&mut d)?,
        })
    }
}

impl Encodable for ParticlHeader {
    fn consensus_encode<S: io::Write>(&self, mut s: S) -> Result<usize, io::Error> {
        let mut len = self.header.consensus_encode(&mut s)?;
        len += self.witness_merkle_root.consensus_encode(&mut s)?;
        Ok(len)
    }
}

/// Decodes the block header and transaction count, leaving `d` at the first transaction.
pub fn decode_block_prefix<D: io::Read>(mut d: D) -> Result<(ParticlHeader, usize), Error> {
    let header = ParticlHeader::consensus_decode(&mut d)?;
    let tx_count = VarInt::consensus_decode(&mut d)?.0;
    let max = MAX_BLOCK_SIZE / MIN_TX_SIZE;
    if tx_count > max as u64 {
        return Err(Error::OversizedVectorAllocation {
            requested: tx_count as usize,
            max,
        });
    }
    Ok((header, tx_count as usize))
}

/// Block with its transactions normalized.
#[derive(PartialEq, Eq, Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub header: BlockInfo,
    pub txs: Vec<Tx>,
}

impl Block {
    /// Returns the coinbase or coinstake transaction, if one is present.
    pub fn coinbase(&self) -> Option<&Tx> {
        self.txs.first()
    }
}

/// Block metadata known to the parser.
#[derive(PartialEq, Eq, Clone, Debug, Default, Serialize, Deserialize)]
pub struct BlockInfo {
    #[serde(default)]
    pub hash: Option<BlockHash>,
    #[serde(default)]
    pub prev_hash: Option<BlockHash>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Serialized block size in bytes.
    pub size: usize,
    pub time: i64,
    /// Hex of the witness merkle root, only known from the binary header.
    #[serde(default)]
    pub witness_merkle_root: Option<String>,
}
