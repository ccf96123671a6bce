//! `wavemark` command-line tool: replay recorded widget sessions and convert
//! between RTTM files and widget state.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use wavemark_core::config::Config;
use wavemark_core::ids::RegionIdGenerator;
use wavemark_core::{interaction_log, rttm};
use wavemark_types::{StatePatch, WidgetState};

const USAGE: &str = "usage:
  wavemark replay [LOG] [--seed N]         replay a session log, print the final state
  wavemark import-rttm FILE [--uri URI]    print a state patch with the file's speech turns
  wavemark export-rttm STATE [--uri URI]   print the regions of a state file as RTTM
options:
  -v, --verbose                            debug logging";

fn init_logging(verbose: bool) {
    use simplelog::{LevelFilter, WriteLogger};

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wavemark")
        .join("wavemark.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path).or_else(|_| File::create("/tmp/wavemark.log")) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("wavemark: logging disabled: {}", e);
            return;
        }
    };

    if WriteLogger::init(log_level, simplelog::Config::default(), log_file).is_err() {
        return;
    }

    log::info!("wavemark starting (log level: {:?})", log_level);
}

/// Value following `flag`, if present.
fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

/// Positional arguments after the subcommand, skipping flags and their values.
fn positional(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter().skip(2);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" | "--uri" => {
                iter.next();
            }
            "-v" | "--verbose" => {}
            other => out.push(other),
        }
    }
    out
}

fn replay(log_path: &Path, seed: u64) -> Result<String, String> {
    let settings = Config::load().settings();
    let state = interaction_log::replay(log_path, &settings, seed)
        .map_err(|e| format!("{}: {}", log_path.display(), e))?;
    serde_json::to_string_pretty(&state).map_err(|e| e.to_string())
}

fn import_rttm(path: &Path, uri: Option<&str>) -> Result<String, String> {
    let mut turns = rttm::read(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    if let Some(uri) = uri {
        turns.retain(|t| t.uri == uri);
    } else if rttm::uris(&turns).len() > 1 {
        log::warn!(target: "rttm", "{} holds several uris; importing all of them", path.display());
    }
    let (regions, labels) = rttm::import(&turns, &Default::default(), &mut RegionIdGenerator::new());
    let patch = StatePatch {
        regions: Some(regions),
        labels: Some(labels),
        ..StatePatch::default()
    };
    serde_json::to_string_pretty(&patch).map_err(|e| e.to_string())
}

fn export_rttm(path: &Path, uri: Option<&str>) -> Result<String, String> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let state: WidgetState =
        serde_json::from_str(&text).map_err(|e| format!("{}: {}", path.display(), e))?;
    let uri = uri
        .map(str::to_string)
        .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "wavemark".to_string());
    Ok(rttm::export(&uri, &state.regions, &state.labels))
}

fn run(args: &[String]) -> Result<String, String> {
    let command = args.get(1).map(String::as_str).unwrap_or("");
    let positional = positional(args);
    let uri = flag_value(args, "--uri");

    match command {
        "replay" => {
            let seed = match flag_value(args, "--seed") {
                Some(s) => s.parse().map_err(|_| format!("invalid seed {:?}", s))?,
                None => 0,
            };
            let path = positional
                .first()
                .map(PathBuf::from)
                .unwrap_or_else(interaction_log::default_log_path);
            replay(&path, seed)
        }
        "import-rttm" => {
            let path = positional.first().ok_or("import-rttm needs a file")?;
            import_rttm(Path::new(path), uri)
        }
        "export-rttm" => {
            let path = positional.first().ok_or("export-rttm needs a state file")?;
            export_rttm(Path::new(path), uri)
        }
        _ => Err(USAGE.to_string()),
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    init_logging(verbose);

    match run(&args) {
        Ok(output) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
            ExitCode::SUCCESS
        }
        Err(message) => {
            log::error!("{}", message);
            eprintln!("wavemark: {}", message);
            ExitCode::FAILURE
        }
    }
}
