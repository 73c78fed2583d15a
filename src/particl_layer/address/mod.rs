// Particl 256-bit hash addresses (cold staking P2CS and P2SH256).

use std::str::FromStr;

use bitcoin::hashes::{sha256d, Hash};
use bitcoin::util::base58;

use crate::errors::*;
use crate::particl_layer::blockdata::script::{p2cs_script, p2sh256_script, Hash256};
use crate::particl_layer::network::constants::{PUBKEY_ADDRESS_256, SCRIPT_ADDRESS_256};

const CHECKSUM_LEN: usize = 4;

/// A base58check address over a 32-byte hash, keyed by its version byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address256 {
    pub hash: Hash256,
    pub version: u8,
}

impl Address256 {
    pub fn new(hash: Hash256, version: u8) -> Self {
        Address256 { hash, version }
    }

    /// Locking script this address pays to.
    pub fn script_pubkey(&self) -> Vec<u8> {
        if self.version == SCRIPT_ADDRESS_256 {
            p2sh256_script(&self.hash)
        } else {
            p2cs_script(&self.hash)
        }
    }
}

impl FromStr for Address256 {
    type Err = Error;

    /// Decodes a 256-bit address. The checksum is verified by hand since the
    /// version byte must be inspected before the payload length is known.
    fn from_str(address: &str) -> Result<Self> {
        let decoded = base58::from(address).chain_err(|| ErrorKind::AddressMissing)?;
        if decoded.len() < 1 + CHECKSUM_LEN {
            bail!(ErrorKind::AddressMissing);
        }
        let (data, checksum) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
        if sha256d::Hash::hash(data)[..CHECKSUM_LEN] != *checksum {
            bail!(ErrorKind::AddressMissing);
        }
        let (version, payload) = (data[0], &data[1..]);
        if payload.len() != 32 || (version != PUBKEY_ADDRESS_256 && version != SCRIPT_ADDRESS_256)
        {
            bail!(ErrorKind::AddressMissing);
        }
        Ok(Address256::new(*array_ref![payload, 0, 32], version))
    }
}

impl std::fmt::Display for Address256 {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&encode_address(&self.hash, self.version))
    }
}

/// Base58check of `version || hash` with a double SHA256 checksum.
pub fn encode_address(hash: &Hash256, version: u8) -> String {
    let mut data = Vec::with_capacity(1 + hash.len());
    data.push(version);
    data.extend_from_slice(hash);
    base58::check_encode_slice(&data)
}
