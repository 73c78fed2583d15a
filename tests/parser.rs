use bitcoin::blockdata::script::Script;
use bitcoin::consensus::serialize;
use bitcoin::hashes::Hash;
use bitcoin::{BlockHash, OutPoint, Transaction, TxIn, TxMerkleNode, TxOut, Txid, VarInt, Witness};

use particl_parser::chain::{params_for, MAINNET_PARAMS};
use particl_parser::config::ParserConfig;
use particl_parser::errors::{Error, ErrorKind};
use particl_parser::particl_layer::{
    Amount, BlockHeader, InputSource, OutputType, ParticlHeader, Tx,
};
use particl_parser::ParticlParser;

const P2PKH_ADDRESS: &str = "Po3VBGWztKbFnU9rFGKNx2Rtg1zWoS4zTR";
const P2PKH_SCRIPT: &str = "76a914a5cea39a684776fa5d6782faf02baf04251b53bc88ac";
const P2CS_ADDRESS: &str = "2urAsyaHCnbMEQLNCCv3unbeysaPpjp1TiWLMWcQRMwYs74qGQh";
const P2CS_SCRIPT: &str =
    "76a8200637bcc74ffe834bc66f1e8c5bd6a13bc7a17276338be0016ba8151a2c5473fa88ac";
const P2SH256_ADDRESS: &str = "33kQnRT9ecMedncHvns3eHbbNzgKPqXMcTCFuWV697J8PiX6myG";
const P2SH256_SCRIPT: &str =
    "a82016b5038ba914c48cc67b15c980731c7d4628fb2e18591db9058bead591aefd7687";
const COINSTAKE_P2CS: &str = "b86376a914912e2b234f941f30b18afbb4fa46171214bf66c888ac6776a8207be3f09c8d809bc6fa2ced97e35c65d813f29129645bfb45fa3362d28d46123188ac68";
const COINSTAKE_P2SH256: &str = "b86376a914912e2b234f941f30b18afbb4fa46171214bf66c888ac67a82016b5038ba914c48cc67b15c980731c7d4628fb2e18591db9058bead591aefd768768";

const DATA_OUTPUT_TX: &str = r#"{
    "txid": "b480399e2dd29d6edd836a57567289d641a42ea2d7608708e734afec06999c1c",
    "version": 672,
    "locktime": 0,
    "vin": [{
        "txid": "547f07ded4809a061d68b867efbeebb7e208c58837a405e92529c655707c6376",
        "vout": 1,
        "scriptSig": {"hex": ""},
        "sequence": 4294967295
    }],
    "vout": [{
        "n": 0,
        "type": "data",
        "data_hex": "52e81e0007f291b9c26409010affffff1e",
        "treasury_fund_cfwd": 269.82893810,
        "smsgfeerate": 0.00000001,
        "smsgdifficulty": "1effffff"
    }, {
        "n": 1,
        "type": "standard",
        "value": 1352.23715049,
        "scriptPubKey": {
            "hex": "76a914a5cea39a684776fa5d6782faf02baf04251b53bc88ac",
            "address": "Po3VBGWztKbFnU9rFGKNx2Rtg1zWoS4zTR",
            "type": "pubkeyhash"
        }
    }]
}"#;

// mainnet block 2028364
const BLIND_TX: &str = r#"{
    "txid": "4be9ec51111a27794b5c3ea1fe58a2658f58a354595a73d55cffb8394f07ad48",
    "version": 160,
    "locktime": 2028364,
    "vin": [{
        "txid": "184f0ee8668c99918e8357c04304c0d08567020c4bc403993b1aa4b2ae8db7c5",
        "vout": 3,
        "scriptSig": {"hex": ""},
        "sequence": 4294967293
    }],
    "vout": [{
        "n": 0,
        "type": "data",
        "data_hex": "06a0910d",
        "ct_fee": 0.00215200
    }, {
        "n": 1,
        "type": "blind",
        "value": 12.5,
        "valueCommitment": "08d120c189c1754c03a20816beb3e9764bf1c28814c86e0e0fef5e96edd9429d39",
        "scriptPubKey": {
            "asm": "OP_DUP OP_HASH160 9f903c425f944b5a1e44da73246b87bc1e03389a OP_EQUALVERIFY OP_CHECKSIG",
            "hex": "76a9149f903c425f944b5a1e44da73246b87bc1e03389a88ac",
            "address": "PnUUNEUgXs99PvQ2cC2KNyYRYwTbnADk2W",
            "type": "pubkeyhash"
        },
        "data_hex": "025e9096196d919512ad7794d4fe0d9208f00a3e2355f0edc77f7a7d0e070d4930",
        "rangeproof": "7dc3ca80691319d1a0181006058b72cb58dcecc2756ed8e3bfa322a2d254786b"
    }]
}"#;

// mainnet block 488901
const ANON_TX: &str = r#"{
    "txid": "f48d5bce842ac718b2995642ebf2fe35cbe70f10e92069e21d9959dcd6df7384",
    "version": 160,
    "locktime": 0,
    "vin": [{
        "type": "anon",
        "valueSat": -1,
        "num_inputs": 1,
        "ring_size": 5,
        "ring_row_0": "2, 3, 4, 5, 6",
        "sequence": 4294967295
    }],
    "vout": [{
        "n": 0,
        "type": "data",
        "data_hex": "06d09f1c",
        "ct_fee": 0.00462800
    }, {
        "n": 1,
        "type": "anon",
        "pubkey": "02bbc1d7e01e1a6ee800b7dc4990976f1bfd2e6e53541915ce2306bc7e16a2aed6",
        "valueCommitment": "097f3a6f1c56406703393e1d7a52c2ec672cf62a267d72a51b2fed2290f46002f3",
        "data_hex": "033fb674cb4ce2989a3f5a20a46c39c7b8698d210dd85a586ff66264d03166b18f",
        "rangeproof": "d6e91ad3d0cb2a7c0f01a065166ba134769b8306377426be6c0e8372e1c36fc4"
    }]
}"#;

fn parser() -> ParticlParser {
    ParticlParser::new(params_for("main"), ParserConfig::default())
}

fn script(script_hex: &str) -> Script {
    Script::from(hex::decode(script_hex).unwrap())
}

fn coinstake_tx() -> Transaction {
    Transaction {
        version: 2,
        lock_time: 0,
        input: vec![TxIn {
            previous_output: OutPoint::null(),
            script_sig: script("03e0f31e"),
            sequence: 0xffff_ffff,
            witness: Witness::default(),
        }],
        output: vec![TxOut {
            value: 1_000_000,
            script_pubkey: script(COINSTAKE_P2CS),
        }],
    }
}

fn spend_tx() -> Transaction {
    Transaction {
        version: 2,
        lock_time: 2_028_364,
        input: vec![TxIn {
            previous_output: OutPoint::new(Txid::from_inner([7u8; 32]), 3),
            script_sig: script("0101"),
            sequence: 0xffff_fffd,
            witness: Witness::default(),
        }],
        output: vec![
            TxOut {
                value: 135_223_715_049,
                script_pubkey: script(P2PKH_SCRIPT),
            },
            TxOut {
                value: 42,
                script_pubkey: script(P2SH256_SCRIPT),
            },
        ],
    }
}

fn block_header() -> ParticlHeader {
    ParticlHeader {
        header: BlockHeader {
            version: 0xa000_0000u32 as i32,
            prev_blockhash: BlockHash::from_inner([1u8; 32]),
            merkle_root: TxMerkleNode::from_inner([2u8; 32]),
            time: 1_761_309_840,
            bits: 0x1a01_5f53,
            nonce: 0,
        },
        witness_merkle_root: [0xabu8; 32],
    }
}

fn raw_block() -> Vec<u8> {
    let mut raw = serialize(&block_header());
    raw.extend(serialize(&VarInt(2)));
    raw.extend(serialize(&coinstake_tx()));
    raw.extend(serialize(&spend_tx()));
    raw
}

fn assert_kind(result: Result<impl std::fmt::Debug, Error>, check: fn(&ErrorKind) -> bool) {
    match result {
        Err(Error(ref kind, _)) if check(kind) => (),
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn test_address_roundtrip() {
    let parser = parser();
    for (address, script_hex) in &[
        (P2PKH_ADDRESS, P2PKH_SCRIPT),
        (P2CS_ADDRESS, P2CS_SCRIPT),
        (P2SH256_ADDRESS, P2SH256_SCRIPT),
    ] {
        let descriptor = parser.address_to_descriptor(address).unwrap();
        assert_eq!(hex::encode(&descriptor), *script_hex);
        assert_eq!(
            parser.descriptor_to_addresses(&descriptor),
            (vec![address.to_string()], true)
        );
    }
}

#[test]
fn test_invalid_addresses() {
    let parser = parser();
    let missing = |kind: &ErrorKind| matches!(kind, ErrorKind::AddressMissing);
    assert_kind(parser.address_to_descriptor(""), missing);
    assert_kind(parser.address_to_descriptor("2urAs"), missing);
    assert_kind(
        parser.address_to_descriptor("2urAsyaHCnbMEQLNCCv3unbeysaPpjp1TiWLMWcQRMwYs74qGQj"),
        missing,
    );
}

#[test]
fn test_coinstake_scripts() {
    let parser = parser();
    assert_eq!(
        parser.descriptor_to_addresses(&hex::decode(COINSTAKE_P2CS).unwrap()),
        (
            vec!["2vjzfpCeiohkBtg3gcQJFLFaV6Yjqehw6Q4SwiKqRwKWfut2zPD".to_string()],
            true
        )
    );
    assert_eq!(
        parser.descriptor_to_addresses(&hex::decode(COINSTAKE_P2SH256).unwrap()),
        (vec![P2SH256_ADDRESS.to_string()], true)
    );
}

#[test]
fn test_parse_data_output_tx_json() {
    let tx = parser().parse_tx_json(DATA_OUTPUT_TX.as_bytes()).unwrap();
    assert_eq!(
        tx.txid.to_string(),
        "b480399e2dd29d6edd836a57567289d641a42ea2d7608708e734afec06999c1c"
    );
    assert_eq!(tx.version, 672);

    let data = &tx.vout[0];
    assert_eq!(data.output_type, OutputType::Data);
    assert_eq!(data.value, Amount::ZERO);
    assert!(data.script_pubkey.addresses.is_empty());
    assert_eq!(data.data.as_deref(), Some("52e81e0007f291b9c26409010affffff1e"));

    let standard = &tx.vout[1];
    assert_eq!(standard.output_type, OutputType::Standard);
    assert_eq!(standard.value, Amount(135_223_715_049));
    assert_eq!(standard.script_pubkey.addresses, vec![P2PKH_ADDRESS]);
    assert_eq!(hex::encode(&standard.script_pubkey.script), P2PKH_SCRIPT);

    match &tx.vin[0].source {
        InputSource::Prevout { txid, vout } => {
            assert_eq!(
                txid.to_string(),
                "547f07ded4809a061d68b867efbeebb7e208c58837a405e92529c655707c6376"
            );
            assert_eq!(*vout, 1);
        }
        other => panic!("unexpected input {:?}", other),
    }
    assert_eq!(tx.ct_fee(), Amount::ZERO);
    assert!(tx.coin_specific.is_some());
}

#[test]
fn test_parse_blind_tx_json() {
    let tx = parser().parse_tx_json(BLIND_TX.as_bytes()).unwrap();
    let blind = &tx.vout[1];
    assert_eq!(blind.output_type, OutputType::Blind);
    // a numeric value on a blind output is ignored
    assert_eq!(blind.value, Amount::ZERO);
    assert_eq!(
        blind.script_pubkey.addresses,
        vec!["PnUUNEUgXs99PvQ2cC2KNyYRYwTbnADk2W"]
    );
    assert!(blind.value_commitment.is_some());
    assert!(blind.range_proof.is_some());
    assert_eq!(tx.ct_fee(), Amount(215_200));
    assert_eq!(tx.ct_fee().to_string(), "0.00215200");
    assert_eq!(tx.lock_time, 2_028_364);
    assert_eq!(tx.vin[0].sequence, 4_294_967_293);
}

#[test]
fn test_parse_anon_tx_json() {
    let tx = parser().parse_tx_json(ANON_TX.as_bytes()).unwrap();
    assert_eq!(
        tx.vin[0].source,
        InputSource::Anon {
            num_inputs: 1,
            ring_size: 5
        }
    );
    assert!(tx.vin[0].script_sig.is_empty());

    let anon = &tx.vout[1];
    assert_eq!(anon.output_type, OutputType::Anon);
    assert_eq!(anon.value, Amount::ZERO);
    assert!(anon.script_pubkey.addresses.is_empty());
    assert!(anon.script_pubkey.script.is_empty());
    assert_eq!(tx.ct_fee(), Amount(462_800));
    assert_eq!(tx.visible_value(), Amount::ZERO);
}

#[test]
fn test_ct_fee_uses_first_positive_data_output() {
    let json = r#"{
        "txid": "4be9ec51111a27794b5c3ea1fe58a2658f58a354595a73d55cffb8394f07ad48",
        "version": 160,
        "vout": [
            {"n": 0, "type": "standard", "value": 1.0, "ct_fee": 9.0,
             "scriptPubKey": {"hex": ""}},
            {"n": 1, "type": "data", "ct_fee": 0},
            {"n": 2, "type": "data", "ct_fee": 0.00000300},
            {"n": 3, "type": "data", "ct_fee": 0.00000500}
        ]
    }"#;
    let tx = parser().parse_tx_json(json.as_bytes()).unwrap();
    assert_eq!(tx.ct_fee(), Amount(300));
    assert_eq!(tx.vout[0].value, Amount(100_000_000));
}

#[test]
fn test_ct_fee_skips_negative_data_output() {
    let json = r#"{
        "txid": "4be9ec51111a27794b5c3ea1fe58a2658f58a354595a73d55cffb8394f07ad48",
        "version": 160,
        "vout": [
            {"n": 0, "type": "data", "ct_fee": -0.001},
            {"n": 1, "type": "data", "ct_fee": 0.0001}
        ]
    }"#;
    let tx = parser().parse_tx_json(json.as_bytes()).unwrap();
    assert_eq!(tx.ct_fee(), Amount(10_000));
}

#[test]
fn test_script_addresses_preferred_over_single_address() {
    let json = r#"{
        "txid": "4be9ec51111a27794b5c3ea1fe58a2658f58a354595a73d55cffb8394f07ad48",
        "version": 160,
        "vout": [
            {"n": 0, "type": "standard", "value": 1.0,
             "scriptPubKey": {"hex": "", "addresses": ["A", "B"], "address": "C"}},
            {"n": 1, "type": "standard", "value": 1.0,
             "scriptPubKey": {"hex": "", "address": ""}},
            {"n": 2, "type": "standard", "value": 1.0,
             "scriptPubKey": {"hex": "", "address": "C"}}
        ]
    }"#;
    let tx = parser().parse_tx_json(json.as_bytes()).unwrap();
    assert_eq!(tx.vout[0].script_pubkey.addresses, vec!["A", "B"]);
    assert!(tx.vout[1].script_pubkey.addresses.is_empty());
    assert_eq!(tx.vout[2].script_pubkey.addresses, vec!["C"]);
}

#[test]
fn test_malformed_amount_fails_tx() {
    let json = r#"{
        "txid": "4be9ec51111a27794b5c3ea1fe58a2658f58a354595a73d55cffb8394f07ad48",
        "version": 160,
        "vout": [{"n": 0, "type": "standard", "value": "1.2.3"}]
    }"#;
    assert_kind(parser().parse_tx_json(json.as_bytes()), |kind| {
        matches!(kind, ErrorKind::AmountConversion(_))
    });
}

#[test]
fn test_parse_block() {
    let raw = raw_block();
    let block = parser().parse_block(&raw).unwrap();

    assert_eq!(block.header.size, raw.len());
    assert_eq!(block.header.time, 1_761_309_840);
    assert_eq!(block.header.prev_hash, Some(BlockHash::from_inner([1u8; 32])));
    assert_eq!(
        block.header.witness_merkle_root.as_deref(),
        Some(hex::encode([0xabu8; 32]).as_str())
    );
    assert_eq!(block.txs.len(), 2);

    let coinstake = block.coinbase().unwrap();
    assert!(coinstake.is_coinbase());
    assert_eq!(coinstake.txid, coinstake_tx().txid());
    assert_eq!(
        coinstake.vin[0].source,
        InputSource::Coinbase(hex::decode("03e0f31e").unwrap())
    );
    assert!(coinstake.vin[0].script_sig.is_empty());
    // addresses are not resolved by default on the block path
    assert!(coinstake.vout[0].script_pubkey.addresses.is_empty());
    assert!(coinstake.raw.is_empty());

    let spend = &block.txs[1];
    assert!(!spend.is_coinbase());
    assert_eq!(spend.vout[0].value, Amount(135_223_715_049));
    assert_eq!(spend.vin[0].script_sig, vec![0x01, 0x01]);
}

#[test]
fn test_parse_block_with_addresses() {
    let config = ParserConfig {
        parse_block_addresses: true,
        ..ParserConfig::default()
    };
    let parser = ParticlParser::new(&MAINNET_PARAMS, config);
    let block = parser.parse_block(&raw_block()).unwrap();
    assert_eq!(
        block.txs[0].vout[0].script_pubkey.addresses,
        vec!["2vjzfpCeiohkBtg3gcQJFLFaV6Yjqehw6Q4SwiKqRwKWfut2zPD"]
    );
    assert_eq!(block.txs[1].vout[1].script_pubkey.addresses, vec![P2SH256_ADDRESS]);
}

#[test]
fn test_truncated_block() {
    let raw = raw_block();
    let deserialization = |kind: &ErrorKind| matches!(kind, ErrorKind::Deserialization(_));
    // inside the witness merkle root
    assert_kind(parser().parse_block(&raw[..100]), deserialization);
    // inside the last transaction
    assert_kind(parser().parse_block(&raw[..raw.len() - 3]), deserialization);
}

#[test]
fn test_block_with_inflated_tx_count() {
    let mut raw = serialize(&block_header());
    raw.extend(serialize(&VarInt(400_000)));
    raw.extend(serialize(&spend_tx()));
    assert_kind(parser().parse_block(&raw), |kind| {
        matches!(kind, ErrorKind::Deserialization(_))
    });
}

#[test]
fn test_parse_tx() {
    let raw = serialize(&spend_tx());
    let tx = parser().parse_tx(&raw).unwrap();
    assert_eq!(tx.txid, spend_tx().txid());
    assert_eq!(tx.raw, raw);
    assert_eq!(tx.lock_time, 2_028_364);
    assert_eq!(tx.vout[0].script_pubkey.addresses, vec![P2PKH_ADDRESS]);
    assert_eq!(tx.vout[1].script_pubkey.addresses, vec![P2SH256_ADDRESS]);
    assert_eq!(
        tx.vin[0].source,
        InputSource::Prevout {
            txid: Txid::from_inner([7u8; 32]),
            vout: 3
        }
    );
    assert!(tx.coin_specific.is_none());
}

#[test]
fn test_pack_unpack() {
    let parser = parser();
    let tx = parser.parse_tx_json(BLIND_TX.as_bytes()).unwrap();
    let packed = parser.pack_tx(&tx, 2_028_364, 1_761_309_840).unwrap();
    let (unpacked, height): (Tx, u32) = parser.unpack_tx(&packed).unwrap();
    assert_eq!(height, 2_028_364);
    assert_eq!(unpacked.block_time, 1_761_309_840);
    assert_eq!(unpacked.vout, tx.vout);
    assert_eq!(unpacked.ct_fee(), Amount(215_200));

    assert!(parser.unpack_tx(&packed[..packed.len() - 1]).is_err());
}

#[test]
fn test_descriptor_for_unknown_input() {
    let parser = parser();
    let spend = parser.parse_tx(&serialize(&spend_tx())).unwrap();
    assert_eq!(parser.descriptor_for_unknown_input(&spend, 0), vec![0x01, 0x01]);
    assert_eq!(parser.descriptor_for_unknown_input(&spend, 5), vec![0u8; 10]);

    let anon = parser.parse_tx_json(ANON_TX.as_bytes()).unwrap();
    assert_eq!(parser.descriptor_for_unknown_input(&anon, 0), vec![0u8; 10]);
}

#[test]
fn test_parse_block_json_skips_bad_tx() {
    let json = format!(
        r#"{{
            "hash": "{}",
            "previousblockhash": "{}",
            "height": 2028364,
            "size": 1234,
            "time": 1761309840,
            "tx": [{}, {{"txid": "zz"}}, {}]
        }}"#,
        "11".repeat(32),
        "22".repeat(32),
        DATA_OUTPUT_TX,
        BLIND_TX
    );
    let block = parser().parse_block_json(json.as_bytes()).unwrap();
    assert_eq!(block.header.height, Some(2_028_364));
    assert_eq!(block.header.size, 1234);
    assert!(block.header.hash.is_some());
    assert_eq!(block.txs.len(), 2);
    assert_eq!(block.txs[1].ct_fee(), Amount(215_200));
}

#[test]
fn test_parser_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ParticlParser>();

    let parser = std::sync::Arc::new(parser());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let parser = parser.clone();
            std::thread::spawn(move || parser.parse_tx_json(ANON_TX.as_bytes()).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap().ct_fee(), Amount(462_800));
    }
}
