extern crate particl_parser;

#[macro_use]
extern crate log;

use std::fs;
use std::io::{self, Read};
use std::process;

use error_chain::ChainedError;
use serde::Serialize;

use particl_parser::{
    config::{Command, Config},
    errors::*,
    ParticlParser,
};

fn read_input(input: &str) -> Result<Vec<u8>> {
    let mut buf = vec![];
    if input == "-" {
        io::stdin()
            .read_to_end(&mut buf)
            .chain_err(|| "failed to read stdin")?;
    } else {
        buf = fs::read(input).chain_err(|| format!("failed to read {}", input))?;
    }
    Ok(buf)
}

fn decode_hex(text: &[u8]) -> Result<Vec<u8>> {
    let text = std::str::from_utf8(text).chain_err(|| "input is not hex text")?;
    Ok(hex::decode(text.trim())?)
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(config: Config) -> Result<()> {
    let parser = ParticlParser::new(config.network.params(), config.parser);
    debug!("parsing with {} params", parser.params().name);

    match config.command {
        Command::Address(address) => print(&hex::encode(parser.address_to_descriptor(&address)?)),
        Command::Script(script) => {
            let (addresses, is_valid) =
                parser.descriptor_to_addresses(&decode_hex(script.as_bytes())?);
            print(&json_map(addresses, is_valid))
        }
        Command::Tx(tx) => print(&parser.parse_tx(&decode_hex(tx.as_bytes())?)?),
        Command::TxJson(input) => print(&parser.parse_tx_json(&read_input(&input)?)?),
        Command::Block { input, json } => {
            let input = read_input(&input)?;
            let block = if json {
                parser.parse_block_json(&input)?
            } else {
                parser.parse_block(&decode_hex(&input)?)?
            };
            info!("parsed {} transactions", block.txs.len());
            print(&block)
        }
    }
}

fn json_map(addresses: Vec<String>, is_valid: bool) -> serde_json::Value {
    serde_json::json!({
        "addresses": addresses,
        "is_valid": is_valid,
    })
}

fn main() {
    let config = Config::from_args();
    if let Err(e) = run(config) {
        error!("{}", e.display_chain());
        process::exit(1);
    }
}
