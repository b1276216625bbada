//! BoardPatch CLI - routing and placement patch synthesis from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use boardpatch::geometry::{analyze_net, GeometryIndex};
use boardpatch::{
    BoardPatchCore, EngineOptions, GeometrySnapshot, Patch, RoutingStats,
};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "boardpatch")]
#[command(about = "PCB routing and placement patch synthesis tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Route unconnected nets and emit one patch per net
    Route {
        /// Path to a board snapshot JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Route only this net (by name)
        #[arg(long)]
        net: Option<String>,

        /// Grid resolution in mm
        #[arg(long)]
        resolution: Option<f64>,

        /// Cap on nets routed in one pass
        #[arg(long)]
        max_nets: Option<usize>,

        /// Emit patches for degraded (obstacle-ignoring) routes
        #[arg(long)]
        include_degraded: bool,

        /// Exit with code 2 if any produced route was degraded
        #[arg(long)]
        strict: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Write the patches as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Propose footprint moves restoring minimum spacing
    Space {
        /// Path to a board snapshot JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Minimum footprint spacing in mm
        #[arg(long)]
        min_spacing: Option<f64>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Write the patch as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List nets and their connectivity state
    Nets {
        /// Path to a board snapshot JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for tooling
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Route {
            file,
            net,
            resolution,
            max_nets,
            include_degraded,
            strict,
            format,
            output,
        } => handle_route(
            &file,
            net.as_deref(),
            resolution,
            max_nets,
            include_degraded,
            strict,
            format,
            output.as_deref(),
        ),
        Commands::Space {
            file,
            min_spacing,
            format,
            output,
        } => handle_space(&file, min_spacing, format, output.as_deref()),
        Commands::Nets { file, format } => handle_nets(&file, format),
    };

    process::exit(exit_code);
}

fn load_snapshot(file: &Path) -> Result<GeometrySnapshot, String> {
    let json = std::fs::read_to_string(file)
        .map_err(|e| format!("cannot read {}: {}", file.display(), e))?;
    boardpatch::parse_snapshot(&json).map_err(|e| e.to_string())
}

#[allow(clippy::too_many_arguments)]
fn handle_route(
    file: &Path,
    net: Option<&str>,
    resolution: Option<f64>,
    max_nets: Option<usize>,
    include_degraded: bool,
    strict: bool,
    format: OutputFormat,
    output: Option<&Path>,
) -> i32 {
    let snapshot = match load_snapshot(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut options = EngineOptions {
        include_degraded,
        ..EngineOptions::default()
    };
    if let Some(resolution) = resolution {
        options.resolution = resolution;
    }
    if let Some(max_nets) = max_nets {
        options.max_nets = max_nets;
    }

    let (patches, stats) = if let Some(net_name) = net {
        let index = GeometryIndex::build(&snapshot);
        let net = match index.net_by_name(net_name) {
            Some(net) => net.clone(),
            None => {
                eprintln!("Error: no net named '{}'", net_name);
                return 1;
            }
        };
        match BoardPatchCore::route_net(&snapshot, net.id, &options) {
            Ok(patch) => {
                let patches: Vec<Patch> = patch.into_iter().collect();
                let stats = RoutingStats {
                    nets_considered: 1,
                    routed: patches.len(),
                    degraded: 0,
                    skipped: 1 - patches.len(),
                };
                (patches, stats)
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    } else {
        match BoardPatchCore::route_unconnected_nets(&snapshot, &options, None) {
            Ok(report) => (report.patches, report.stats),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    };

    if let Some(path) = output {
        if let Err(e) = write_patches(path, &patches) {
            eprintln!("Error: {}", e);
            return 1;
        }
    }

    match format {
        OutputFormat::Human => output_route_human(&patches, &stats),
        OutputFormat::Json => output_route_json(&patches, &stats),
    }

    if strict && stats.degraded > 0 {
        return 2;
    }
    0
}

fn handle_space(
    file: &Path,
    min_spacing: Option<f64>,
    format: OutputFormat,
    output: Option<&Path>,
) -> i32 {
    let snapshot = match load_snapshot(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut options = EngineOptions::default();
    if let Some(min_spacing) = min_spacing {
        options.min_spacing = min_spacing;
    }

    let patch = match BoardPatchCore::optimize_placement(&snapshot, &options) {
        Ok(patch) => patch,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let patches: Vec<Patch> = patch.into_iter().collect();
    if let Some(path) = output {
        if let Err(e) = write_patches(path, &patches) {
            eprintln!("Error: {}", e);
            return 1;
        }
    }

    match format {
        OutputFormat::Human => {
            if patches.is_empty() {
                println!("Spacing already satisfied; no suggestions produced.");
            } else {
                output_patches_human(&patches);
            }
        }
        OutputFormat::Json => {
            let value = serde_json::json!({ "patches": patches });
            println!("{}", serde_json::to_string_pretty(&value).unwrap());
        }
    }
    0
}

fn handle_nets(file: &Path, format: OutputFormat) -> i32 {
    let snapshot = match load_snapshot(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let index = GeometryIndex::build(&snapshot);
    let mut entries = Vec::new();
    for net in &snapshot.nets {
        let connectivity = analyze_net(&index, net.id);
        let pad_count: usize = connectivity.pad_clusters.iter().map(|c| c.len()).sum();
        entries.push((
            net.name.clone(),
            net.id,
            pad_count,
            connectivity.is_fully_connected(),
        ));
    }

    match format {
        OutputFormat::Human => {
            println!("Nets in {}:", file.display());
            for (name, id, pads, connected) in &entries {
                let state = if *connected { "connected" } else { "unconnected" };
                println!("  {} (id {}): {} pad(s), {}", name, id, pads, state);
            }
        }
        OutputFormat::Json => {
            let value = serde_json::json!({
                "nets": entries.iter().map(|(name, id, pads, connected)| {
                    serde_json::json!({
                        "name": name,
                        "id": id,
                        "pads": pads,
                        "connected": connected,
                    })
                }).collect::<Vec<_>>()
            });
            println!("{}", serde_json::to_string_pretty(&value).unwrap());
        }
    }
    0
}

fn write_patches(path: &Path, patches: &[Patch]) -> Result<(), String> {
    let json = serde_json::to_string_pretty(patches)
        .map_err(|e| format!("cannot serialize patches: {}", e))?;
    std::fs::write(path, json).map_err(|e| format!("cannot write {}: {}", path.display(), e))
}

fn output_patches_human(patches: &[Patch]) {
    for patch in patches {
        println!(
            "\nPatch {}: v{} -> v{} ({} op(s))",
            patch.artifact_id,
            patch.from_version,
            patch.to_version,
            patch.op_count()
        );
        if let Some(ref explanation) = patch.metadata.explanation {
            println!("  {}", explanation);
        }
        for op in &patch.ops {
            println!("  - {}", op.kind());
        }
    }
}

fn output_route_human(patches: &[Patch], stats: &RoutingStats) {
    if patches.is_empty() {
        println!("No suggestions produced.");
    } else {
        output_patches_human(patches);
    }
    println!("\nSummary:");
    println!("  Considered: {}", stats.nets_considered);
    println!("  Routed:     {}", stats.routed);
    println!("  Degraded:   {}", stats.degraded);
    println!("  Skipped:    {}", stats.skipped);
}

fn output_route_json(patches: &[Patch], stats: &RoutingStats) {
    let value = serde_json::json!({
        "patches": patches,
        "stats": stats,
    });
    println!("{}", serde_json::to_string_pretty(&value).unwrap());
}
