use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "seqtrie workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the trie benchmarks and write a comparison report
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
}

/// Benchmark ids, in report column order. The first is the baseline.
const VARIANTS: &[&str] = &["std_btreemap", "std_hashmap", "sorted_trie", "patricia_trie", "hash_trie"];

const BENCH: &str = "trie_benchmark";

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench { quick, report_only } => {
            if !report_only {
                run_benchmarks(quick)?;
            }
            generate_report()?;
        }
    }

    Ok(())
}

fn run_benchmarks(quick: bool) -> Result<()> {
    println!("Running trie benchmarks...");
    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.env("CARGO_INCREMENTAL", "0");
    cmd.args(["bench", "--bench", BENCH]);

    // Args for the test runner (Criterion) go after --
    cmd.arg("--");
    if quick {
        cmd.arg("--measurement-time").arg("0.1");
        cmd.arg("--noplot");
        cmd.arg("--sample-size").arg("10");
    }

    let status = cmd.status().context(format!("Failed to run bench {}", BENCH))?;
    if !status.success() {
        anyhow::bail!("Benchmark {} failed", BENCH);
    }
    println!("Finished in {:.2?}", start.elapsed());
    Ok(())
}

/// Workload -> variant -> elements per second.
type Results = BTreeMap<String, BTreeMap<String, f64>>;

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");
    let mut results = Results::new();

    let criterion_dir = Path::new("target/criterion");
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    collect_results(criterion_dir, &mut results);

    let report_path = Path::new("benchmark_results/report.md");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }

    use std::io::Write;
    let mut file = fs::File::create(report_path)?;

    writeln!(file, "# Trie Benchmark Report")?;
    writeln!(file)?;

    // Header
    write!(file, "| Workload |")?;
    for variant in VARIANTS {
        write!(file, " {} (Ops/s) | vs {} |", variant, VARIANTS[0])?;
    }
    writeln!(file)?;

    // Separator
    write!(file, "|---|")?;
    for _ in VARIANTS {
        write!(file, "---|---|")?;
    }
    writeln!(file)?;

    // Rows
    for (workload, by_variant) in &results {
        write!(file, "| {} |", workload)?;
        let baseline = by_variant.get(VARIANTS[0]).copied().unwrap_or(0.0);

        for variant in VARIANTS {
            match by_variant.get(*variant) {
                Some(ops) => {
                    let rel = if baseline > 0.0 { ops / baseline } else { 0.0 };
                    write!(file, " {} | **{:.2}x** |", format_ops(*ops), rel)?;
                }
                None => write!(file, " N/A | - |")?,
            }
        }
        writeln!(file)?;
    }

    println!("Report written to {}", report_path.display());
    Ok(())
}

fn format_ops(ops: f64) -> String {
    if ops > 1_000_000.0 {
        format!("{:.2}M", ops / 1_000_000.0)
    } else if ops > 1_000.0 {
        format!("{:.2}K", ops / 1_000.0)
    } else {
        format!("{:.0}", ops)
    }
}

fn dir_name(path: &Path) -> Option<String> {
    path.file_name().and_then(|s| s.to_str()).map(str::to_string)
}

fn collect_results(dir: &Path, results: &mut Results) {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_results(&path, results);
            continue;
        }
        if dir_name(&path).as_deref() != Some("estimates.json") {
            continue;
        }

        // Structure: .../<group>/<function>/new/estimates.json
        let Some(run_dir) = path.parent() else { continue };
        if dir_name(run_dir).as_deref() != Some("new") {
            continue;
        }
        let Some(function_dir) = run_dir.parent() else { continue };
        let Some(group_dir) = function_dir.parent() else { continue };
        let (Some(variant), Some(workload)) = (dir_name(function_dir), dir_name(group_dir)) else {
            continue;
        };
        if workload == "report" || variant == "report" {
            continue;
        }

        // Get throughput from benchmark.json
        let mut elements = 1.0;
        if let Ok(content) = fs::read_to_string(run_dir.join("benchmark.json")) {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&content) {
                if let Some(t) = json.get("throughput").and_then(|t| t.get("Elements")) {
                    elements = t.as_f64().unwrap_or(1.0);
                }
            }
        }

        // Get time
        let Ok(content) = fs::read_to_string(&path) else { continue };
        let Ok(json) = serde_json::from_str::<serde_json::Value>(&content) else { continue };
        let time_ns = json
            .get("mean")
            .and_then(|m| m.get("point_estimate"))
            .and_then(|p| p.as_f64())
            .unwrap_or(0.0);
        if time_ns > 0.0 {
            results
                .entry(workload)
                .or_default()
                .insert(variant, (elements * 1e9) / time_ns);
        }
    }
}
