use std::io::Read;

use clap::{ArgAction, ArgGroup, Parser};
use zeroize::Zeroizing;

use saltmine::adapter::{self, Material, Options};
use saltmine::error::{ErrorCategory, ErrorKind, Result, SaltmineError};

#[derive(Parser, Debug)]
#[command(
    name = "saltmine",
    version,
    about = "derive a key from a passphrase with scrypt",
    group(ArgGroup::new("salt_input").required(true))
)]
struct Cli {
    /// Read passphrase from stdin instead of from terminal
    #[arg(long = "passphrase-stdin", action = ArgAction::SetTrue)]
    passphrase_stdin: bool,

    /// Salt as a UTF-8 string
    #[arg(long = "salt", group = "salt_input")]
    salt: Option<String>,

    /// Salt as hex-encoded bytes
    #[arg(long = "salt-hex", group = "salt_input")]
    salt_hex: Option<String>,

    /// CPU/memory cost parameter N (a power of two greater than 1)
    #[arg(short = 'N', long = "cost")]
    n: u64,

    /// Block size factor r
    #[arg(short = 'r', long = "block-size")]
    r: u32,

    /// Parallelization factor p
    #[arg(short = 'p', long = "parallelism")]
    p: u32,

    /// Derived key length in bytes
    #[arg(long = "length")]
    dk_len: usize,
}

/// Reads the passphrase without echo from the terminal, or as raw
/// bytes from stdin when requested (the passphrase need not be UTF-8
/// in that case).
fn read_passphrase(from_stdin: bool) -> Result<Zeroizing<Vec<u8>>> {
    if from_stdin {
        let mut data = Zeroizing::new(Vec::new());
        std::io::stdin().read_to_end(&mut data).map_err(|e| {
            SaltmineError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("error reading passphrase: {}", e),
                e,
            )
        })?;
        Ok(data)
    } else {
        let pass = rpassword::prompt_password("Passphrase: ").map_err(|e| {
            SaltmineError::with_kind_and_source(
                ErrorCategory::Internal,
                ErrorKind::Io,
                format!("error reading passphrase from terminal: {}", e),
                e,
            )
        })?;
        Ok(Zeroizing::new(pass.into_bytes()))
    }
}

fn run(cli: Cli) -> Result<String> {
    let salt = match (&cli.salt, &cli.salt_hex) {
        (Some(text), None) => Material::Text(text.clone()),
        (None, Some(encoded)) => Material::Bytes(adapter::decode_salt_hex(encoded)?),
        // clap's arg group guarantees exactly one was given.
        _ => unreachable!("salt arg group"),
    };

    let passphrase = read_passphrase(cli.passphrase_stdin)?;
    let options = Options {
        n: Some(cli.n),
        r: Some(cli.r),
        p: Some(cli.p),
        dk_len: Some(cli.dk_len),
    };

    adapter::derive_hex(&Material::Bytes(passphrase.to_vec()), &salt, &options)
}

fn main() {
    let cli = Cli::parse();

    match run(cli) {
        Ok(hex) => println!("{}", hex),
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}
