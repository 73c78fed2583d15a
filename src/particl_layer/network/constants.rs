#[derive(Copy, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Debug, Serialize, Deserialize)]
pub enum Network {
    /// Particl mainnet
    Mainnet,
    Testnet,
    Regtest,
}

pub const MAINNET_MAGIC: u32 = 0xfbf2_efb4;
pub const TESTNET_MAGIC: u32 = 0x0b11_0907;
pub const REGTEST_MAGIC: u32 = 0xfabf_b5da;

/// Version byte of 256-bit pubkey hash (cold staking) addresses, same on every network.
pub const PUBKEY_ADDRESS_256: u8 = 0x39;
/// Version byte of 256-bit script hash addresses.
pub const SCRIPT_ADDRESS_256: u8 = 0x3d;

/// Size of the witness merkle root that follows the 80-byte header.
pub const WITNESS_MERKLE_ROOT_LEN: usize = 32;

/// Decimal places of a PART amount.
pub const AMOUNT_DECIMAL_POINT: usize = 8;

/// Largest decimal point whose scale still fits a u64.
pub const MAX_DECIMAL_POINT: usize = 19;
