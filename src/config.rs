use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

use crate::chain::Network;
use crate::particl_layer::network::constants::{AMOUNT_DECIMAL_POINT, MAX_DECIMAL_POINT};

/// Settings the parser consumes. Hosts can deserialize it from their own config source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Decimal places of the backend's amount strings.
    pub amount_decimal_point: usize,
    /// Whether `parse_block` resolves output addresses. `parse_tx` always does.
    pub parse_block_addresses: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            amount_decimal_point: AMOUNT_DECIMAL_POINT,
            parse_block_addresses: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Address(String),
    /// Hex encoded locking script.
    Script(String),
    /// Hex encoded wire transaction.
    Tx(String),
    /// Path to a `getrawtransaction` verbose result, `-` for stdin.
    TxJson(String),
    /// Path to a hex encoded block (or a `getblock` verbosity 2 result with `json`), `-` for stdin.
    Block { input: String, json: bool },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log: stderrlog::StdErrLog,
    pub network: Network,
    pub parser: ParserConfig,
    pub command: Command,
}

fn input_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("input")
        .help("Input file, or - to read stdin")
        .default_value("-")
        .index(1)
}

impl Config {
    pub fn from_args() -> Config {
        let network_help = format!("Select network type ({})", Network::names().join(", "));

        let args = App::new("Particl Block Parser")
            .version(crate_version!())
            .setting(AppSettings::SubcommandRequired)
            .arg(
                Arg::with_name("verbosity")
                    .short("v")
                    .multiple(true)
                    .global(true)
                    .help("Increase logging verbosity"),
            )
            .arg(
                Arg::with_name("timestamp")
                    .long("timestamp")
                    .global(true)
                    .help("Prepend log lines with a timestamp"),
            )
            .arg(
                Arg::with_name("network")
                    .long("network")
                    .help(&network_help)
                    .takes_value(true)
                    .global(true)
                    .possible_values(&["main", "test", "regtest"]),
            )
            .arg(
                Arg::with_name("amount_decimal_point")
                    .long("amount-decimal-point")
                    .help("Decimal places of backend amounts")
                    .takes_value(true)
                    .global(true)
                    .default_value("8"),
            )
            .arg(
                Arg::with_name("block_addresses")
                    .long("block-addresses")
                    .global(true)
                    .help("Resolve output addresses when parsing binary blocks"),
            )
            .subcommand(
                SubCommand::with_name("address")
                    .about("Print the locking script of an address")
                    .arg(Arg::with_name("address").required(true).index(1)),
            )
            .subcommand(
                SubCommand::with_name("script")
                    .about("Print the addresses of a hex encoded locking script")
                    .arg(Arg::with_name("script").required(true).index(1)),
            )
            .subcommand(
                SubCommand::with_name("tx")
                    .about("Normalize a hex encoded wire transaction")
                    .arg(Arg::with_name("tx").required(true).index(1)),
            )
            .subcommand(
                SubCommand::with_name("tx-json")
                    .about("Normalize a verbose getrawtransaction result")
                    .arg(input_arg()),
            )
            .subcommand(
                SubCommand::with_name("block")
                    .about("Normalize a hex encoded block")
                    .arg(input_arg())
                    .arg(
                        Arg::with_name("json")
                            .long("json")
                            .help("Input is a getblock verbosity 2 result"),
                    ),
            )
            .get_matches();

        let network = Network::from(args.value_of("network").unwrap_or("main"));

        let amount_decimal_point = value_t_or_exit!(args, "amount_decimal_point", usize);
        if amount_decimal_point > MAX_DECIMAL_POINT {
            clap::Error::with_description(
                &format!("--amount-decimal-point must be at most {}", MAX_DECIMAL_POINT),
                clap::ErrorKind::InvalidValue,
            )
            .exit();
        }
        let parser = ParserConfig {
            amount_decimal_point,
            parse_block_addresses: args.is_present("block_addresses"),
        };

        let command = match args.subcommand() {
            ("address", Some(m)) => Command::Address(required(m, "address")),
            ("script", Some(m)) => Command::Script(required(m, "script")),
            ("tx", Some(m)) => Command::Tx(required(m, "tx")),
            ("tx-json", Some(m)) => Command::TxJson(required(m, "input")),
            ("block", Some(m)) => Command::Block {
                input: required(m, "input"),
                json: m.is_present("json"),
            },
            (name, _) => clap::Error::with_description(
                &format!("unknown subcommand {:?}", name),
                clap::ErrorKind::UnrecognizedSubcommand,
            )
            .exit(),
        };

        let mut log = stderrlog::new();
        log.verbosity(args.occurrences_of("verbosity") as usize);
        log.timestamp(if args.is_present("timestamp") {
            stderrlog::Timestamp::Millisecond
        } else {
            stderrlog::Timestamp::Off
        });
        log.init().unwrap_or_else(|err| panic!("logging initialization failed: {}", err));

        let config = Config {
            log,
            network,
            parser,
            command,
        };
        debug!("{:?}", config);
        config
    }
}

fn required(m: &ArgMatches, name: &str) -> String {
    m.value_of(name).unwrap_or_default().to_string()
}
