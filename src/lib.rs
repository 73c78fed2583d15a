#![recursion_limit = "1024"]

#[macro_use]
extern crate arrayref;
#[macro_use]
extern crate clap;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod chain;
pub mod config;
pub mod errors;
pub mod parser;
pub mod particl_layer;
pub mod util;

pub use crate::parser::{BaseParser, BitcoinLikeParser, ParticlParser};
