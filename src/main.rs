//! Encrypt or decrypt paste bodies from the command line.
//!
//! Reads the body from stdin and writes the result to stdout, using the same
//! envelope format as the client.

use anyhow::{bail, Context};
use binpaste::{Config, PassphraseCodec};
use clap::{Parser, Subcommand};
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "binpaste", about = "BinPaste body encryption", version)]
struct Cli {
    /// Passphrase (can also be set via BINPASTE_PASSPHRASE env var)
    #[arg(short, long, env = "BINPASTE_PASSPHRASE", hide_env_values = true)]
    passphrase: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Encrypt stdin into a ciphertext envelope
    Encrypt,
    /// Decrypt a ciphertext envelope read from stdin
    Decrypt,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("binpaste=info,binpaste_core=info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn run(
    codec: &PassphraseCodec,
    command: Commands,
    passphrase: &str,
    input: &str,
) -> anyhow::Result<String> {
    match command {
        Commands::Encrypt => codec.encrypt(input, passphrase).context("encryption failed"),
        Commands::Decrypt => match codec.decrypt(input, passphrase) {
            Some(plaintext) => Ok(plaintext),
            None => bail!("could not decrypt: wrong passphrase or malformed input"),
        },
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::from_env();
    let codec = PassphraseCodec::new(config.kdf);

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let output = run(&codec, cli.command, &cli.passphrase, &input)?;
    let mut stdout = io::stdout().lock();
    match cli.command {
        Commands::Encrypt => writeln!(stdout, "{}", output)?,
        Commands::Decrypt => write!(stdout, "{}", output)?,
    }
    stdout.flush()?;
    tracing::debug!(command = ?cli.command, bytes = output.len(), "done");
    Ok(())
}
