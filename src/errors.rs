error_chain! {
    types {
        Error, ErrorKind, ResultExt, Result;
    }

    foreign_links {
        Json(serde_json::Error);
        Hex(hex::FromHexError);
        Bincode(bincode_do_not_use_directly::Error);
    }

    errors {
        AddressMissing {
            description("address missing")
            display("address missing")
        }

        Deserialization(msg: String) {
            description("deserialization error")
            display("deserialization error: {}", msg)
        }

        AmountConversion(amount: String) {
            description("amount conversion error")
            display("failed to convert amount {:?}", amount)
        }
    }
}

impl From<bitcoin::consensus::encode::Error> for Error {
    fn from(e: bitcoin::consensus::encode::Error) -> Self {
        ErrorKind::Deserialization(e.to_string()).into()
    }
}
