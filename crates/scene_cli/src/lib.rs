use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use scene_core::{
    Diagnostic, DiagnosticLog, DecoderRegistry, LoadConfig, SceneDocument, SceneLoadReport,
    SceneLoader,
};
use serde::Serialize;
use tracing::info;

pub const MAX_DEPTH_ENV_VAR: &str = "SCENE_MAX_PREFAB_DEPTH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn parse(raw: &str) -> Result<Self, String> {
        match raw {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("invalid --format value '{other}' (expected text|json)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommonOptions {
    pub max_depth: Option<usize>,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Load { path: PathBuf },
    Prefabs { path: PathBuf },
    Capabilities,
}

/// Builds the load config. An explicit `--max-depth` wins over the
/// environment value.
pub fn resolve_load_config(
    max_depth_flag: Option<usize>,
    max_depth_env: Option<&str>,
) -> Result<LoadConfig, String> {
    let mut config = LoadConfig::default();
    if let Some(depth) = max_depth_flag {
        config.max_prefab_depth = depth;
    } else if let Some(raw) = max_depth_env.map(str::trim).filter(|raw| !raw.is_empty()) {
        config.max_prefab_depth = raw.parse::<usize>().map_err(|_| {
            format!("invalid {MAX_DEPTH_ENV_VAR} value '{raw}' (expected usize)")
        })?;
    }
    Ok(config)
}

/// Resolves the load config for commands that read a scene file.
/// `capabilities` never loads, so depth settings are not consulted for it.
pub fn load_config_for(
    kind: &CommandKind,
    max_depth_flag: Option<usize>,
    max_depth_env: Option<&str>,
) -> Result<LoadConfig, String> {
    match kind {
        CommandKind::Load { .. } | CommandKind::Prefabs { .. } => {
            resolve_load_config(max_depth_flag, max_depth_env)
        }
        CommandKind::Capabilities => Ok(LoadConfig::default()),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordSummary<'a> {
    runtime_id: u64,
    persistent_id: &'a str,
    parent_persistent_id: Option<&'a str>,
    name: &'a str,
    tags: &'a [String],
    components: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoadSummary<'a> {
    records: Vec<RecordSummary<'a>>,
    registered_prefabs: &'a [String],
    instantiated_seeds: usize,
    skipped_seeds: &'a [String],
    diagnostics: Vec<String>,
}

pub fn run<W: Write>(
    kind: CommandKind,
    opts: CommonOptions,
    config: LoadConfig,
    stdout: &mut W,
) -> Result<(), String> {
    let decoders = DecoderRegistry::with_default_decoders();
    match kind {
        CommandKind::Load { path } => {
            let document = read_document(&path)?;
            let loader = SceneLoader::new(&decoders, config);
            let mut log = DiagnosticLog::new();
            let report = loader.load(&document, &mut log);
            info!(
                path = %path.display(),
                records = report.records.len(),
                diagnostics = log.len(),
                "scene_file_loaded"
            );
            match opts.format {
                OutputFormat::Text => write_text_report(stdout, &report, log.entries()),
                OutputFormat::Json => write_json_report(stdout, &report, log.entries()),
            }
        }
        CommandKind::Prefabs { path } => {
            let document = read_document(&path)?;
            let loader = SceneLoader::new(&decoders, config);
            let mut log = DiagnosticLog::new();
            let registry = loader.register_prefabs(&document, &mut log);
            for definition in registry.iter() {
                let dependencies = if definition.dependencies.is_empty() {
                    "-".to_string()
                } else {
                    definition.dependencies.join(",")
                };
                write_line(
                    stdout,
                    &format!(
                        "prefab={} version={} nodes={} dependencies={}",
                        definition.id,
                        definition.version,
                        definition.root.node_count(),
                        dependencies
                    ),
                )?;
            }
            write_diagnostics(stdout, log.entries())
        }
        CommandKind::Capabilities => {
            for kind in decoders.registered_kinds() {
                let Some(caps) = decoders.capabilities(kind.as_str()) else {
                    continue;
                };
                write_line(
                    stdout,
                    &format!(
                        "kind={} affects_rendering={} pass={} stable={}",
                        kind,
                        caps.affects_rendering,
                        caps.required_pass.unwrap_or("-"),
                        caps.stable
                    ),
                )?;
            }
            Ok(())
        }
    }
}

fn read_document(path: &Path) -> Result<SceneDocument, String> {
    let raw = fs::read_to_string(path)
        .map_err(|error| format!("failed to read scene file '{}': {error}", path.display()))?;
    SceneDocument::from_json(&raw)
        .map_err(|error| format!("failed to parse scene file '{}': {error}", path.display()))
}

fn write_text_report<W: Write>(
    stdout: &mut W,
    report: &SceneLoadReport,
    diagnostics: &[Diagnostic],
) -> Result<(), String> {
    write_line(stdout, &report.render_human_readable())?;
    write_diagnostics(stdout, diagnostics)
}

fn write_json_report<W: Write>(
    stdout: &mut W,
    report: &SceneLoadReport,
    diagnostics: &[Diagnostic],
) -> Result<(), String> {
    let summary = LoadSummary {
        records: report
            .records
            .iter()
            .map(|record| RecordSummary {
                runtime_id: record.runtime_id.0,
                persistent_id: &record.persistent_id,
                parent_persistent_id: record.parent_persistent_id.as_deref(),
                name: &record.name,
                tags: &record.tags,
                components: record.component_kinds().collect(),
            })
            .collect(),
        registered_prefabs: &report.registered_prefabs,
        instantiated_seeds: report.instantiated_seeds,
        skipped_seeds: &report.skipped_seeds,
        diagnostics: diagnostics.iter().map(ToString::to_string).collect(),
    };
    let rendered = serde_json::to_string_pretty(&summary)
        .map_err(|error| format!("failed to encode report: {error}"))?;
    write_line(stdout, &rendered)
}

fn write_diagnostics<W: Write>(stdout: &mut W, diagnostics: &[Diagnostic]) -> Result<(), String> {
    for diagnostic in diagnostics {
        write_line(stdout, &format!("diagnostic {diagnostic}"))?;
    }
    Ok(())
}

fn write_line<W: Write>(stdout: &mut W, line: &str) -> Result<(), String> {
    writeln!(stdout, "{line}").map_err(|error| format!("failed to write output: {error}"))
}
