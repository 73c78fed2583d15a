pub mod bincode;

pub type Bytes = Vec<u8>;
