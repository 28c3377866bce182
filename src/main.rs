use adofai_timing::{Level, LevelError};
use std::env;
use std::fs;
use std::process;

const USAGE: &str = "Usage: adofai-timing [--offset] [--tempo] [--format json|yaml] <level.adofai> [output]";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Format {
    Json,
    Yaml,
}

struct Options {
    add_offset: bool,
    tempo_only: bool,
    format: Format,
    input_path: String,
    output_path: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut add_offset = false;
    let mut tempo_only = false;
    let mut format = Format::Json;
    let mut positional = Vec::new();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--offset" => add_offset = true,
            "--tempo" => tempo_only = true,
            "--format" => {
                format = match iter.next().map(String::as_str) {
                    Some("json") => Format::Json,
                    Some("yaml") => Format::Yaml,
                    Some(other) => return Err(format!("Unknown format '{}'", other)),
                    None => return Err("--format needs a value".to_string()),
                }
            }
            flag if flag.starts_with("--") => return Err(format!("Unknown option '{}'", flag)),
            _ => positional.push(arg.clone()),
        }
    }

    let mut positional = positional.into_iter();
    let input_path = positional.next().ok_or_else(|| USAGE.to_string())?;
    let output_path = positional.next();
    if positional.next().is_some() {
        return Err(USAGE.to_string());
    }

    Ok(Options {
        add_offset,
        tempo_only,
        format,
        input_path,
        output_path,
    })
}

fn render(level: &Level, options: &Options) -> Result<String, LevelError> {
    if options.tempo_only {
        let trace = level.tempo_trace()?;
        return match options.format {
            Format::Json => serde_json::to_string_pretty(trace)
                .map_err(|e| LevelError::FormatError(e.to_string())),
            Format::Yaml => {
                serde_yaml::to_string(trace).map_err(|e| LevelError::FormatError(e.to_string()))
            }
        };
    }

    let report = level.report(options.add_offset)?;
    match options.format {
        Format::Json => report.to_json(),
        Format::Yaml => report.to_yaml(),
    }
}

fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            process::exit(1);
        }
    };

    let level = match Level::load(&options.input_path) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Error loading level: {}", e);
            process::exit(1);
        }
    };

    let output = match render(&level, &options) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Timing error: {}", e);
            process::exit(1);
        }
    };

    match &options.output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &output) {
                eprintln!("Error writing to '{}': {}", path, e);
                process::exit(1);
            }
            eprintln!("Wrote timing to {}", path);
        }
        None => {
            println!("{}", output);
        }
    }
}
