//! CLI command implementations

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use tidemark_core::bencode::{Decoder, Element};
use tidemark_core::torrent::{BencodeTorrentParser, TorrentParser, TorrentSummary};
use tidemark_core::{TidemarkConfig, TidemarkError};

/// Bytes of a non-text string shown before eliding the rest.
const BYTE_PREVIEW_LEN: usize = 16;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the metadata of a torrent file
    Inspect {
        /// Path to the .torrent file
        torrent: PathBuf,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Pretty-print any bencoded file as a tree
    Decode {
        /// Path to the bencoded file
        file: PathBuf,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns the error of whichever command fails
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let config = TidemarkConfig::from_env();
    match command {
        Commands::Inspect { torrent, json } => {
            let output = inspect_torrent(&config, &torrent, json).await?;
            println!("{output}");
            Ok(())
        }
        Commands::Decode { file } => {
            let output = decode_file(&config, &file).await?;
            print!("{output}");
            Ok(())
        }
    }
}

/// Extracts a torrent's metadata and renders it as text or JSON.
///
/// # Errors
/// - `TidemarkError::Torrent` - File unreadable, too large or not a valid torrent
/// - `serde_json::Error` - Summary could not be serialized
pub async fn inspect_torrent(
    config: &TidemarkConfig,
    path: &Path,
    json: bool,
) -> anyhow::Result<String> {
    let parser = BencodeTorrentParser::with_config(config);
    let metadata = parser
        .parse_torrent_file(path)
        .await
        .map_err(TidemarkError::from)
        .with_context(|| format!("Failed to inspect {}", path.display()))?;

    let summary = metadata.summary();
    if json {
        Ok(serde_json::to_string_pretty(&summary)?)
    } else {
        Ok(format_summary(&summary))
    }
}

/// Decodes a bencoded file and renders the element tree.
///
/// # Errors
/// - `std::io::Error` - File could not be read
/// - `TidemarkError::Bencode` - Contents are not exactly one bencode element
pub async fn decode_file(config: &TidemarkConfig, path: &Path) -> anyhow::Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let element = Decoder::with_options(&bytes, config.decode_options())
        .decode()
        .map_err(TidemarkError::from)?;

    Ok(ElementTree(&element).to_string())
}

/// Human-readable, aligned summary lines.
pub fn format_summary(summary: &TorrentSummary) -> String {
    let mut lines = vec![
        format!("Name:         {}", summary.name),
        format!("Announce:     {}", summary.announce),
        format!("Total length: {} bytes", summary.total_length),
    ];
    if let Some(piece_length) = summary.piece_length {
        lines.push(format!("Piece length: {piece_length} bytes"));
    }
    lines.push(format!("Pieces:       {}", summary.piece_count));
    lines.push(format!("Info hash:    {}", summary.info_hash));

    for (tier, urls) in summary.announce_list.iter().enumerate() {
        lines.push(format!("Tier {tier}:       {}", urls.join(", ")));
    }
    lines.join("\n")
}

/// Indented tree rendering of an element, one value per line.
pub struct ElementTree<'a>(pub &'a Element);

impl fmt::Display for ElementTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_element(f, self.0, 0)
    }
}

fn write_element(f: &mut fmt::Formatter<'_>, element: &Element, depth: usize) -> fmt::Result {
    let indent = (depth + 1) * 2;
    match element {
        Element::Integer(value) => writeln!(f, "{value}"),
        Element::ByteString(bytes) => {
            write_byte_string(f, bytes)?;
            writeln!(f)
        }
        Element::List(items) => {
            writeln!(f, "list ({} items)", items.len())?;
            for item in items {
                write!(f, "{:indent$}- ", "")?;
                write_element(f, item, depth + 1)?;
            }
            Ok(())
        }
        Element::Dictionary(dictionary) => {
            writeln!(f, "dictionary ({} entries)", dictionary.len())?;
            for (key, value) in dictionary.iter() {
                write!(f, "{:indent$}", "")?;
                match std::str::from_utf8(key) {
                    Ok(text) => write!(f, "{text}: ")?,
                    Err(_) => {
                        write_raw_bytes(f, key)?;
                        write!(f, ": ")?;
                    }
                }
                write_element(f, value, depth + 1)?;
            }
            Ok(())
        }
    }
}

fn write_byte_string(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    match std::str::from_utf8(bytes) {
        Ok(text) if !text.chars().any(char::is_control) => write!(f, "{text:?}"),
        _ => write_raw_bytes(f, bytes),
    }
}

fn write_raw_bytes(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    write!(f, "<{} bytes> ", bytes.len())?;
    for byte in bytes.iter().take(BYTE_PREVIEW_LEN) {
        write!(f, "{byte:02x}")?;
    }
    if bytes.len() > BYTE_PREVIEW_LEN {
        write!(f, "...")?;
    }
    Ok(())
}
