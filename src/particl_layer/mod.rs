// Particl chain layer on top of the bitcoin data structures
pub mod address;
pub mod blockdata;
pub mod network;
pub mod rpc;

pub use address::{encode_address, Address256};
pub use blockdata::block::{Block, BlockHash, BlockHeader, BlockInfo, ParticlHeader};
pub use blockdata::transaction::{
    InputSource, OutputType, ParticlTxData, ScriptPubKey, Tx, Vin, Vout,
};
pub use blockdata::units::Amount;
pub use network::constants::Network;

pub use self::blockdata::script::{Hash256, ScriptShape};
