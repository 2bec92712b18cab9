//! Qeike Headless Runner
//!
//! Drives an edit session from scripted key bytes without a terminal and
//! prints the final session snapshot. Useful for testing and automation.

use std::fs;
use std::io::{self, Read};
use std::process::ExitCode;

use clap::Parser;
use log::{info, warn};

use qeike::config::EditorConfig;
use qeike::input::decode_all;
use qeike::prompt::{check_grid_size, parse_size, PromptError};
use qeike_core::{Dimensions, EditSession, Outcome};
use qeike_map::{resolve_export_path, write_map, ExportFormat, DEFAULT_BASE_NAME};

/// Headless qeike session
#[derive(Parser, Debug)]
#[command(name = "qeike-headless")]
#[command(version)]
#[command(about = "Run a qeike edit session from scripted keys", long_about = None)]
struct Args {
    /// Grid size, e.g. 16x16x4
    #[arg(short, long, value_name = "WxHxD")]
    size: String,

    /// Largest grid accepted, in cells
    #[arg(long, value_name = "CELLS", default_value_t = EditorConfig::default().max_cells)]
    max_cells: usize,

    /// Keys to apply; understands \e, \r, \n, \t, \\ and \xNN escapes
    #[arg(short, long, value_name = "KEYS")]
    keys: Option<String>,

    /// File with raw key bytes, applied after --keys
    #[arg(short, long, value_name = "FILE")]
    file: Option<String>,

    /// Where export requests write the map
    #[arg(short, long, value_name = "PATH")]
    export: Option<String>,

    /// Export format (qkm, vxl)
    #[arg(long, default_value = "qkm")]
    format: String,

    /// Print the snapshot as JSON
    #[arg(short, long)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns false when an export failed
fn run(args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    let dims = grid_size(&args.size, args.max_cells)?;
    let format = ExportFormat::from_str(&args.format)
        .ok_or_else(|| format!("Unknown format '{}'. Expected qkm or vxl", args.format))?;

    let mut input = Vec::new();
    if let Some(keys) = &args.keys {
        input.extend(unescape_keys(keys));
    }
    if let Some(path) = &args.file {
        input.extend(fs::read(path).map_err(|e| format!("Error reading {}: {}", path, e))?);
    }
    if args.keys.is_none() && args.file.is_none() {
        io::stdin().read_to_end(&mut input)?;
    }

    let mut session = EditSession::with_dimensions(dims)?;
    let mut ok = true;

    for key in decode_all(&input) {
        match session.handle_key(key) {
            Outcome::Continue => {}
            Outcome::ExportRequested => match &args.export {
                Some(target) => {
                    let path = resolve_export_path(target, DEFAULT_BASE_NAME, format, None);
                    match write_map(session.grid(), &path, format, true) {
                        Ok(bytes) => info!("Wrote {} bytes to {}", bytes, path.display()),
                        Err(e) => {
                            eprintln!("Export failed: {}", e);
                            ok = false;
                        }
                    }
                }
                None => warn!("Export requested but no --export path given"),
            },
            Outcome::Quit => break,
        }
    }

    let snapshot = session.snapshot();
    if args.json {
        println!("{}", snapshot.to_json());
    } else {
        print!("{}", snapshot.to_debug_string());
    }

    Ok(ok)
}

fn grid_size(size: &str, max_cells: usize) -> Result<Dimensions, PromptError> {
    let dims = parse_size(size)?;
    check_grid_size(dims, max_cells)?;
    Ok(dims)
}

/// Expand backslash escapes in a `--keys` argument
fn unescape_keys(s: &str) -> Vec<u8> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'\\' || i + 1 == bytes.len() {
            out.push(bytes[i]);
            i += 1;
            continue;
        }
        match bytes[i + 1] {
            b'e' => out.push(0x1B),
            b'r' => out.push(b'\r'),
            b'n' => out.push(b'\n'),
            b't' => out.push(b'\t'),
            b'\\' => out.push(b'\\'),
            b'x' => {
                let hex = s.get(i + 2..i + 4).and_then(|h| u8::from_str_radix(h, 16).ok());
                if let Some(byte) = hex {
                    out.push(byte);
                    i += 4;
                    continue;
                }
                out.extend_from_slice(b"\\x");
            }
            other => {
                out.push(b'\\');
                out.push(other);
            }
        }
        i += 2;
    }
    out
}
