use std::env;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use scene_cli::{
    load_config_for, run, CommandKind, CommonOptions, OutputFormat, MAX_DEPTH_ENV_VAR,
};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn run_cli() -> Result<(), String> {
    let args = env::args().skip(1).collect::<Vec<_>>();
    if args.is_empty() {
        return Err(usage_text());
    }
    if args[0] == "-h" || args[0] == "--help" {
        print_usage();
        return Ok(());
    }

    let mut options = CommonOptions::default();
    let mut index = 0usize;
    while index < args.len() {
        match args[index].as_str() {
            "--max-depth" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --max-depth".to_string())?;
                options.max_depth = Some(
                    value
                        .parse::<usize>()
                        .map_err(|_| format!("invalid --max-depth value '{value}' (expected usize)"))?,
                );
                index += 2;
            }
            "--format" => {
                let value = args
                    .get(index + 1)
                    .ok_or_else(|| "missing value for --format".to_string())?;
                options.format = OutputFormat::parse(value)?;
                index += 2;
            }
            _ => break,
        }
    }

    let command = args
        .get(index)
        .ok_or_else(|| "missing subcommand".to_string())?
        .as_str();
    let command_args = &args[(index + 1)..];

    let kind = match command {
        "load" => CommandKind::Load {
            path: single_path(command, command_args)?,
        },
        "prefabs" => CommandKind::Prefabs {
            path: single_path(command, command_args)?,
        },
        "capabilities" => {
            if !command_args.is_empty() {
                return Err("capabilities takes no arguments".to_string());
            }
            CommandKind::Capabilities
        }
        other => return Err(format!("unknown subcommand '{other}'")),
    };

    let env_depth = env::var(MAX_DEPTH_ENV_VAR).ok();
    let config = load_config_for(&kind, options.max_depth, env_depth.as_deref())?;
    run(kind, options, config, &mut io::stdout())
}

fn single_path(command: &str, command_args: &[String]) -> Result<PathBuf, String> {
    match command_args {
        [path] => Ok(PathBuf::from(path)),
        [] => Err(format!("{command} requires a scene file path")),
        _ => Err(format!("{command} takes exactly one scene file path")),
    }
}

fn print_usage() {
    println!("{}", usage_text());
}

fn usage_text() -> String {
    [
        "scene_cli - decode scene documents and expand prefab instances",
        "",
        "Usage:",
        "  scene_cli [--max-depth <usize>] [--format <text|json>] load <scene.json>",
        "  scene_cli [--max-depth <usize>] prefabs <scene.json>",
        "  scene_cli capabilities",
        "",
        "Defaults:",
        "  --max-depth 64 (or SCENE_MAX_PREFAB_DEPTH)",
        "  --format text",
    ]
    .join("\n")
}
