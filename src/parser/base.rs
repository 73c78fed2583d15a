use std::io;

use bech32::{self, FromBase32, ToBase32, Variant};
use bitcoin::blockdata::opcodes::all as ops;
use bitcoin::blockdata::script::{Builder, Instruction};
use bitcoin::consensus::{Decodable, Encodable};
use bitcoin::util::base58;
use bitcoin::{Script, Transaction};

use crate::chain::NetworkParams;
use crate::errors::*;
use crate::particl_layer::Tx;
use crate::util::{bincode, Bytes};

/// Bitcoin-like parsing capabilities the Particl parser builds on.
pub trait BaseParser: Send + Sync {
    fn params(&self) -> &'static NetworkParams;

    /// Locking script of a standard (P2PKH, P2SH, segwit) address.
    fn address_to_descriptor(&self, address: &str) -> Result<Bytes>;

    /// Addresses of a standard locking script and whether they are spendable addresses.
    fn descriptor_to_addresses(&self, script: &[u8]) -> (Vec<String>, bool);

    fn decode_tx(&self, reader: &mut dyn io::Read) -> Result<Transaction>;

    fn encode_tx(&self, tx: &Transaction) -> Bytes;

    fn pack_tx(&self, tx: &Tx, height: u32, block_time: i64) -> Result<Bytes>;

    /// Returns the packed transaction and the height it was packed with.
    fn unpack_tx(&self, buf: &[u8]) -> Result<(Tx, u32)>;
}

/// Standard Bitcoin script and address handling with the network's version bytes.
#[derive(Debug, Clone, Copy)]
pub struct BitcoinLikeParser {
    params: &'static NetworkParams,
}

impl BitcoinLikeParser {
    pub fn new(params: &'static NetworkParams) -> Self {
        BitcoinLikeParser { params }
    }

    fn base58_descriptor(&self, data: &[u8]) -> Result<Bytes> {
        if data.len() != 21 {
            bail!(ErrorKind::AddressMissing);
        }
        let (version, hash) = (data[0], &data[1..]);
        let builder = if version == self.params.pubkey_hash {
            Builder::new()
                .push_opcode(ops::OP_DUP)
                .push_opcode(ops::OP_HASH160)
                .push_slice(hash)
                .push_opcode(ops::OP_EQUALVERIFY)
                .push_opcode(ops::OP_CHECKSIG)
        } else if version == self.params.script_hash {
            Builder::new()
                .push_opcode(ops::OP_HASH160)
                .push_slice(hash)
                .push_opcode(ops::OP_EQUAL)
        } else {
            bail!(ErrorKind::AddressMissing);
        };
        Ok(builder.into_script().into_bytes())
    }

    fn segwit_descriptor(&self, address: &str) -> Result<Bytes> {
        let (hrp, data, variant) =
            bech32::decode(address).chain_err(|| ErrorKind::AddressMissing)?;
        if hrp != self.params.bech32_hrp || data.is_empty() {
            bail!(ErrorKind::AddressMissing);
        }
        let version = data[0].to_u8();
        let program = Vec::<u8>::from_base32(&data[1..]).chain_err(|| ErrorKind::AddressMissing)?;
        let valid = match version {
            0 => variant == Variant::Bech32 && (program.len() == 20 || program.len() == 32),
            1..=16 => variant == Variant::Bech32m && (2..=40).contains(&program.len()),
            _ => false,
        };
        if !valid {
            bail!(ErrorKind::AddressMissing);
        }
        Ok(Builder::new()
            .push_int(i64::from(version))
            .push_slice(&program)
            .into_script()
            .into_bytes())
    }

    fn base58_address(&self, version: u8, hash: &[u8]) -> String {
        let mut data = Vec::with_capacity(1 + hash.len());
        data.push(version);
        data.extend_from_slice(hash);
        base58::check_encode_slice(&data)
    }

    fn segwit_address(&self, script: &[u8]) -> Option<String> {
        let version = match script[0] {
            0 => 0,
            op => op - (ops::OP_PUSHNUM_1.into_u8() - 1),
        };
        let variant = if version == 0 {
            Variant::Bech32
        } else {
            Variant::Bech32m
        };
        let mut data = vec![bech32::u5::try_from_u8(version).ok()?];
        data.extend((&script[2..]).to_base32());
        match bech32::encode(self.params.bech32_hrp, data, variant) {
            Ok(address) => Some(address),
            Err(e) => {
                debug!("failed to encode witness program: {}", e);
                None
            }
        }
    }
}

/// Describes a single-push OP_RETURN payload, as text when it is valid UTF-8.
fn op_return_label(script: &Script) -> Option<String> {
    let mut instructions = script.instructions();
    match instructions.next() {
        Some(Ok(Instruction::Op(op))) if op == ops::OP_RETURN => (),
        _ => return None,
    }
    let data = match (instructions.next(), instructions.next()) {
        (Some(Ok(Instruction::PushBytes(data))), None) => data,
        _ => return None,
    };
    Some(match std::str::from_utf8(data) {
        Ok(text) => format!("OP_RETURN ({})", text),
        Err(_) => format!("OP_RETURN {}", hex::encode(data)),
    })
}

impl BaseParser for BitcoinLikeParser {
    fn params(&self) -> &'static NetworkParams {
        self.params
    }

    fn address_to_descriptor(&self, address: &str) -> Result<Bytes> {
        match base58::from_check(address) {
            Ok(data) => self.base58_descriptor(&data),
            Err(_) => self.segwit_descriptor(address),
        }
    }

    fn descriptor_to_addresses(&self, script: &[u8]) -> (Vec<String>, bool) {
        let script = Script::from(script.to_vec());
        let bytes = script.as_bytes();
        if script.is_p2pkh() {
            (
                vec![self.base58_address(self.params.pubkey_hash, &bytes[3..23])],
                true,
            )
        } else if script.is_p2sh() {
            (
                vec![self.base58_address(self.params.script_hash, &bytes[2..22])],
                true,
            )
        } else if script.is_witness_program() {
            match self.segwit_address(bytes) {
                Some(address) => (vec![address], true),
                None => (vec![], false),
            }
        } else if let Some(label) = op_return_label(&script) {
            (vec![label], false)
        } else {
            (vec![], false)
        }
    }

    fn decode_tx(&self, reader: &mut dyn io::Read) -> Result<Transaction> {
        Ok(Transaction::consensus_decode(reader)?)
    }

    fn encode_tx(&self, tx: &Transaction) -> Bytes {
        let mut buf = vec![];
        tx.consensus_encode(&mut buf)
            .expect("in-memory writers don't error");
        buf
    }

    fn pack_tx(&self, tx: &Tx, height: u32, block_time: i64) -> Result<Bytes> {
        Ok(bincode::serialize_little(&(height, block_time, tx))?)
    }

    fn unpack_tx(&self, buf: &[u8]) -> Result<(Tx, u32)> {
        let (height, block_time, mut tx): (u32, i64, Tx) = bincode::deserialize_little(buf)?;
        tx.block_time = block_time;
        Ok((tx, height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{MAINNET_PARAMS, REGTEST_PARAMS};

    fn roundtrip(parser: &BitcoinLikeParser, address: &str, script_hex: &str) {
        let script = parser.address_to_descriptor(address).unwrap();
        assert_eq!(hex::encode(&script), script_hex);
        assert_eq!(
            parser.descriptor_to_addresses(&script),
            (vec![address.to_string()], true)
        );
    }

    #[test]
    fn test_p2pkh() {
        roundtrip(
            &BitcoinLikeParser::new(&MAINNET_PARAMS),
            "Po3VBGWztKbFnU9rFGKNx2Rtg1zWoS4zTR",
            "76a914a5cea39a684776fa5d6782faf02baf04251b53bc88ac",
        );
    }

    #[test]
    fn test_p2sh_and_segwit_roundtrip() {
        let parser = BitcoinLikeParser::new(&MAINNET_PARAMS);
        let hash = [0x11u8; 20];

        let p2sh = parser.base58_address(MAINNET_PARAMS.script_hash, &hash);
        assert!(p2sh.starts_with('R'));
        roundtrip(&parser, &p2sh, &format!("a914{}87", hex::encode(hash)));

        let mut p2wpkh = vec![0x00, 0x14];
        p2wpkh.extend_from_slice(&hash);
        let (addresses, valid) = parser.descriptor_to_addresses(&p2wpkh);
        assert!(valid);
        assert!(addresses[0].starts_with("pw1q"));
        roundtrip(&parser, &addresses[0], &hex::encode(&p2wpkh));

        let mut p2tr = vec![0x51, 0x20];
        p2tr.extend_from_slice(&[0x22u8; 32]);
        let (addresses, valid) = parser.descriptor_to_addresses(&p2tr);
        assert!(valid);
        assert!(addresses[0].starts_with("pw1p"));
        roundtrip(&parser, &addresses[0], &hex::encode(&p2tr));
    }

    #[test]
    fn test_network_version_bytes() {
        let main = BitcoinLikeParser::new(&MAINNET_PARAMS);
        let regtest = BitcoinLikeParser::new(&REGTEST_PARAMS);
        let script = hex::decode("76a914a5cea39a684776fa5d6782faf02baf04251b53bc88ac").unwrap();
        let (addresses, _) = regtest.descriptor_to_addresses(&script);
        assert!(regtest.address_to_descriptor(&addresses[0]).is_ok());
        assert!(main.address_to_descriptor(&addresses[0]).is_err());
    }

    #[test]
    fn test_invalid_addresses() {
        let parser = BitcoinLikeParser::new(&MAINNET_PARAMS);
        assert!(parser.address_to_descriptor("").is_err());
        assert!(parser.address_to_descriptor("Po3VBGWztKbFnU9rFGKNx2Rtg1zWoS4zTX").is_err());
        assert!(parser
            .address_to_descriptor("2urAsyaHCnbMEQLNCCv3unbeysaPpjp1TiWLMWcQRMwYs74qGQh")
            .is_err());
    }

    #[test]
    fn test_wire_codec() {
        let parser = BitcoinLikeParser::new(&MAINNET_PARAMS);
        let tx = Transaction {
            version: 2,
            lock_time: 0,
            input: vec![bitcoin::TxIn {
                previous_output: bitcoin::OutPoint::null(),
                script_sig: Script::from(vec![0x01, 0x02]),
                sequence: 0xffff_ffff,
                witness: bitcoin::Witness::default(),
            }],
            output: vec![bitcoin::TxOut {
                value: 5,
                script_pubkey: Script::from(vec![0x51]),
            }],
        };
        let raw = parser.encode_tx(&tx);
        let decoded = parser.decode_tx(&mut &raw[..]).unwrap();
        assert_eq!(decoded, tx);
        assert!(parser.decode_tx(&mut &raw[..raw.len() - 1]).is_err());
    }

    #[test]
    fn test_op_return() {
        let parser = BitcoinLikeParser::new(&MAINNET_PARAMS);
        assert_eq!(
            parser.descriptor_to_addresses(&hex::decode("6a0568656c6c6f").unwrap()),
            (vec!["OP_RETURN (hello)".to_string()], false)
        );
        assert_eq!(
            parser.descriptor_to_addresses(&hex::decode("6a02ff00").unwrap()),
            (vec!["OP_RETURN ff00".to_string()], false)
        );
        assert_eq!(
            parser.descriptor_to_addresses(&hex::decode("6a").unwrap()),
            (vec![], false)
        );
    }
}
