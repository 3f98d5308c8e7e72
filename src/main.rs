use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod auth;

#[derive(Debug, Parser)]
#[command(name = "sealbox")]
#[command(
    version,
    about = "Passphrase-based authenticated file encryption (scrypt + AES-256-GCM)."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypts a file, writing <FILE>.3dfx and <FILE>.salt
    #[command(arg_required_else_help = true)]
    Encrypt {
        /// File to encrypt
        file: PathBuf,

        /// Directory to write the ciphertext and salt files into
        /// (default: next to the input)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },

    /// Decrypts a .3dfx file using its sibling .salt file
    #[command(arg_required_else_help = true)]
    Decrypt {
        /// Ciphertext file (.3dfx)
        file: PathBuf,

        /// Path to write the plaintext to
        /// (default: the input path without its .3dfx suffix)
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    match args.command {
        Commands::Encrypt { file, out } => {
            let passphrase = auth::read_new_passphrase_with_confirmation()?;
            let (blob_path, salt_path) =
                sealbox::encrypt_file(&file, out.as_deref(), &passphrase)?;
            println!(
                "encrypted to {} (salt: {})",
                blob_path.display(),
                salt_path.display()
            );
        }
        Commands::Decrypt { file, out } => {
            let passphrase = auth::read_passphrase()?;
            let out_path = sealbox::decrypt_file(&file, out.as_deref(), &passphrase)?;
            println!("decrypted to {}", out_path.display());
        }
    }

    Ok(())
}
