use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use sealnote::clipboard::SystemClipboard;
use sealnote::commands::{self, CopyTarget, EncryptOptions, TextSource};
use sealnote::error::{ErrorCategory, Result, SealnoteError};
use sealnote::keycodec::DEFAULT_KEY_BITS;
use sealnote::keytext::{self, ConstantKeyTextReader, FileKeyTextReader};

#[derive(Parser, Debug)]
#[command(
    name = "sealnote",
    version,
    about = "one-shot public-key encryption of short notes"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt a message under a freshly generated key pair
    Encrypt {
        /// Path to a file containing the message
        #[arg(short = 'i', long = "input", conflicts_with = "message")]
        input: Option<PathBuf>,
        /// The message itself; read from stdin if neither this nor --input is given
        #[arg(short = 'm', long = "message")]
        message: Option<String>,
        /// Write the ciphertext to this file instead of stdout
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
        /// Write the private key to this file instead of stdout
        #[arg(long = "key-out")]
        key_out: Option<PathBuf>,
        /// RSA modulus size in bits (minimum 2048)
        #[arg(long = "bits", default_value_t = DEFAULT_KEY_BITS)]
        bits: usize,
        /// Copy the key and/or message to the clipboard after display
        #[arg(long = "copy", value_enum, default_value = "none")]
        copy: CopyTarget,
    },
    /// Decrypt a message with a pasted private key
    Decrypt {
        /// Path to a file containing the ciphertext
        #[arg(short = 'i', long = "input", conflicts_with = "ciphertext")]
        input: Option<PathBuf>,
        /// The ciphertext itself
        #[arg(short = 'c', long = "ciphertext")]
        ciphertext: Option<String>,
        /// Path to a file containing the private key text
        #[arg(
            short = 'k',
            long = "key",
            conflicts_with = "key_stdin",
            required_unless_present = "key_stdin"
        )]
        key: Option<PathBuf>,
        /// Read the private key pasted on stdin; without -i/-c the
        /// ciphertext may follow the key block in the same paste
        #[arg(long = "key-stdin", action = ArgAction::SetTrue)]
        key_stdin: bool,
        /// Write the recovered message to this file instead of stdout
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
    /// Interactive encrypt/decrypt loop
    Interactive {
        /// RSA modulus size in bits (minimum 2048)
        #[arg(long = "bits", default_value_t = DEFAULT_KEY_BITS)]
        bits: usize,
    },
}

fn run(cli: Cli) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    let mut clipboard = SystemClipboard::new();

    match cli.command {
        Commands::Encrypt {
            input,
            message,
            output,
            key_out,
            bits,
            copy,
        } => {
            let source = match (input, message) {
                (Some(path), None) => TextSource::File(path),
                (None, Some(text)) => TextSource::Literal(text),
                (None, None) => TextSource::Stdin,
                (Some(_), Some(_)) => {
                    return Err(SealnoteError::new(
                        ErrorCategory::User,
                        "provide the message via --input or --message, not both",
                    ));
                }
            };
            let message = source.read()?;
            let opts = EncryptOptions {
                key_bits: bits,
                output: output.as_deref(),
                key_out: key_out.as_deref(),
                copy,
            };
            commands::encrypt(&message, &opts, &mut clipboard, &mut stdout)
        }
        Commands::Decrypt {
            input,
            ciphertext,
            key,
            key_stdin,
            output,
        } => {
            let ct_source = match (input, ciphertext) {
                (Some(path), None) => Some(TextSource::File(path)),
                (None, Some(text)) => Some(TextSource::Literal(text)),
                (None, None) => None,
                (Some(_), Some(_)) => {
                    return Err(SealnoteError::new(
                        ErrorCategory::User,
                        "provide the ciphertext via --input or --ciphertext, not both",
                    ));
                }
            };

            if key_stdin {
                match ct_source {
                    Some(source) => {
                        let ct = source.read()?;
                        let key_text = {
                            let mut stdin = std::io::stdin().lock();
                            keytext::read_key_text_lines(&mut stdin)?
                        };
                        let mut reader = ConstantKeyTextReader::new((*key_text).clone());
                        commands::decrypt(&mut reader, &ct, output.as_deref(), &mut stdout)
                    }
                    None => {
                        // One paste carrying the key block followed by the
                        // ciphertext.
                        let pasted = TextSource::Stdin.read()?;
                        let (key_text, ct) = keytext::split_pasted_input(&pasted)?;
                        let mut reader = ConstantKeyTextReader::new((*key_text).clone());
                        commands::decrypt(&mut reader, &ct, output.as_deref(), &mut stdout)
                    }
                }
            } else {
                let key_path = key.ok_or_else(|| {
                    SealnoteError::new(
                        ErrorCategory::User,
                        "a private key is required; use --key or --key-stdin",
                    )
                })?;
                let ct = ct_source.unwrap_or(TextSource::Stdin).read()?;
                let mut reader = FileKeyTextReader::new(key_path);
                commands::decrypt(&mut reader, &ct, output.as_deref(), &mut stdout)
            }
        }
        Commands::Interactive { bits } => {
            let mut stdin = std::io::stdin().lock();
            commands::interactive(bits, &mut stdin, &mut stdout, &mut clipboard)
        }
    }
}

fn report_error(err: &SealnoteError) {
    match err.kind {
        Some(kind) => eprintln!("sealnote: error[{}]: {}", kind.label(), err.message()),
        None => eprintln!("sealnote: error: {}", err.message()),
    }
    let mut source: Option<&dyn std::error::Error> = err.source_error().map(|s| s as _);
    while let Some(s) = source {
        eprintln!("  caused by: {}", s);
        source = s.source();
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        report_error(&err);
        std::process::exit(1);
    }
}
