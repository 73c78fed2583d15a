// Particl script shapes and the byte layouts used to recognize them.

pub use bitcoin::blockdata::script::*;

/// Particl specific opcodes and the standard ones its templates are built from.
pub mod opcodes {
    pub use bitcoin::blockdata::opcodes::*;

    pub const OP_DUP: u8 = 0x76;
    pub const OP_HASH160: u8 = 0xa9;
    pub const OP_SHA256: u8 = 0xa8;
    pub const OP_EQUAL: u8 = 0x87;
    pub const OP_EQUALVERIFY: u8 = 0x88;
    pub const OP_CHECKSIG: u8 = 0xac;
    pub const OP_IF: u8 = 0x63;
    pub const OP_ELSE: u8 = 0x67;
    pub const OP_ENDIF: u8 = 0x68;
    pub const OP_PUSHBYTES_20: u8 = 0x14;
    pub const OP_PUSHBYTES_32: u8 = 0x20;
    /// Repurposed OP_NOP9, true when the spending transaction is a coinstake.
    pub const OP_ISCOINSTAKE: u8 = 0xb8;
}

use self::opcodes::*;

pub type Hash256 = [u8; 32];

/// `OP_DUP OP_SHA256 <32> OP_EQUALVERIFY OP_CHECKSIG`
pub const P2CS_LEN: usize = 37;
/// `OP_SHA256 <32> OP_EQUAL`
pub const P2SH256_LEN: usize = 35;
const P2PKH_LEN: usize = 25;
/// `OP_ISCOINSTAKE OP_IF` + spend branch + `OP_ELSE`, the staking branch starts here.
const COINSTAKE_BRANCH_START: usize = 2 + P2PKH_LEN + 1;
pub const COINSTAKE_P2CS_LEN: usize = COINSTAKE_BRANCH_START + P2CS_LEN + 1;
pub const COINSTAKE_P2SH256_LEN: usize = COINSTAKE_BRANCH_START + P2SH256_LEN + 1;

/// Layout of a locking script. Every script has exactly one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptShape {
    P2pkh,
    P2sh,
    Segwit,
    /// Cold staking pay-to-pubkey-hash over a 32-byte hash.
    P2cs(Hash256),
    /// Pay-to-script-hash over a 32-byte hash.
    P2sh256(Hash256),
    /// `OP_ISCOINSTAKE OP_IF <p2pkh> OP_ELSE <branch> OP_ENDIF`, `branch` is
    /// always `P2cs` or `P2sh256`.
    Coinstake(Box<ScriptShape>),
    Unclassified,
}

impl ScriptShape {
    /// Classifies `script`. Coinstake layouts are tried before the standalone
    /// 256-bit forms since their else branch is one of those.
    pub fn of(script: &[u8]) -> ScriptShape {
        if let Some(branch) = coinstake_branch(script) {
            return ScriptShape::Coinstake(Box::new(branch));
        }
        if let Some(shape) = standalone_256(script) {
            return shape;
        }
        if has_coinstake_prefix(script) {
            warn!(
                "unrecognized {}-byte coinstake script {}",
                script.len(),
                hex::encode(script)
            );
        }
        let script = Script::from(script.to_vec());
        if script.is_p2pkh() {
            ScriptShape::P2pkh
        } else if script.is_p2sh() {
            ScriptShape::P2sh
        } else if script.is_witness_program() {
            ScriptShape::Segwit
        } else {
            ScriptShape::Unclassified
        }
    }

    /// The 32-byte hash and address version byte of Particl 256-bit shapes.
    pub fn hash256(&self) -> Option<(&Hash256, u8)> {
        use crate::particl_layer::network::constants::{PUBKEY_ADDRESS_256, SCRIPT_ADDRESS_256};
        match self {
            ScriptShape::P2cs(hash) => Some((hash, PUBKEY_ADDRESS_256)),
            ScriptShape::P2sh256(hash) => Some((hash, SCRIPT_ADDRESS_256)),
            ScriptShape::Coinstake(branch) => branch.hash256(),
            _ => None,
        }
    }
}

fn has_coinstake_prefix(script: &[u8]) -> bool {
    script.len() >= 2 && script[0] == OP_ISCOINSTAKE && script[1] == OP_IF
}

fn coinstake_branch(script: &[u8]) -> Option<ScriptShape> {
    let len = script.len();
    if len != COINSTAKE_P2CS_LEN && len != COINSTAKE_P2SH256_LEN {
        return None;
    }
    if !has_coinstake_prefix(script)
        || script[2] != OP_DUP
        || script[3] != OP_HASH160
        || script[4] != OP_PUSHBYTES_20
        || script[COINSTAKE_BRANCH_START - 1] != OP_ELSE
        || script[len - 1] != OP_ENDIF
    {
        return None;
    }
    standalone_256(&script[COINSTAKE_BRANCH_START..len - 1])
}

fn standalone_256(script: &[u8]) -> Option<ScriptShape> {
    match script.len() {
        P2CS_LEN
            if script[0] == OP_DUP
                && script[1] == OP_SHA256
                && script[2] == OP_PUSHBYTES_32
                && script[35] == OP_EQUALVERIFY
                && script[36] == OP_CHECKSIG =>
        {
            Some(ScriptShape::P2cs(*array_ref![script, 3, 32]))
        }
        P2SH256_LEN
            if script[0] == OP_SHA256
                && script[1] == OP_PUSHBYTES_32
                && script[34] == OP_EQUAL =>
        {
            Some(ScriptShape::P2sh256(*array_ref![script, 2, 32]))
        }
        _ => None,
    }
}

/// `OP_DUP OP_SHA256 <hash> OP_EQUALVERIFY OP_CHECKSIG`
pub fn p2cs_script(hash: &Hash256) -> Vec<u8> {
    let mut script = Vec::with_capacity(P2CS_LEN);
    script.extend_from_slice(&[OP_DUP, OP_SHA256, OP_PUSHBYTES_32]);
    script.extend_from_slice(hash);
    script.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
    script
}

/// `OP_SHA256 <hash> OP_EQUAL`
pub fn p2sh256_script(hash: &Hash256) -> Vec<u8> {
    let mut script = Vec::with_capacity(P2SH256_LEN);
    script.extend_from_slice(&[OP_SHA256, OP_PUSHBYTES_32]);
    script.extend_from_slice(hash);
    script.push(OP_EQUAL);
    script
}
