use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use crate::config::settings::{generate_default_config, Settings};
use crate::monitoring::{self, ClusterStatus};
use crate::scheduler::ClusterManager;

#[derive(Parser)]
#[command(name = "pod-cluster-sim")]
#[command(about = "Miniature cluster scheduler simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive menu: create pods, show status, exit
    Run,
    /// Admit a batch of pods, then print the cluster status
    Create {
        #[arg(short = 'n', long)]
        count: u32,
        /// Seed for the pod requirement generator (overrides config)
        #[arg(short, long)]
        seed: Option<u64>,
        /// Wait for the admitted lifecycles to finish before reporting
        #[arg(short, long)]
        wait: bool,
        /// Print the status as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Generate default configuration
    Init {
        #[arg(short, long)]
        force: bool,
    },
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::new_from_file(path)?,
        None => Settings::new()?,
    };

    match cli.command {
        Commands::Run => run_interactive(&settings).await?,
        Commands::Create { count, seed, wait, json } => {
            handle_create(&settings, count, seed, wait, json).await?;
        }
        Commands::Init { force } => handle_init(force)?,
    }

    Ok(())
}

fn workload_rng(settings: &Settings, seed: Option<u64>) -> StdRng {
    match seed.or(settings.workload.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

async fn run_interactive(settings: &Settings) -> Result<()> {
    let manager = ClusterManager::new(settings);
    let mut rng = workload_rng(settings, None);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("\n{}", "Menu:".bold());
        println!("1. Create pods");
        println!("2. Show cluster status");
        println!("3. Exit");
        print!("Choose an option: ");
        std::io::stdout().flush()?;

        let Some(choice) = lines.next_line().await? else {
            break;
        };

        match choice.trim() {
            "1" => {
                print!("How many pods? ");
                std::io::stdout().flush()?;
                let Some(input) = lines.next_line().await? else {
                    break;
                };
                match input.trim().parse::<u32>() {
                    Ok(count) => {
                        manager.create_pods(count, &mut rng).await;
                        // Give the freshly spawned lifecycles a moment before
                        // handing the prompt back.
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                    Err(_) => {
                        println!("{} not a number: {}", "✗".red(), input.trim());
                    }
                }
            }
            "2" => render_status(&monitoring::gather(&manager).await),
            "3" => break,
            other => println!("{} invalid option: {}", "✗".red(), other),
        }
    }

    Ok(())
}

async fn handle_create(
    settings: &Settings,
    count: u32,
    seed: Option<u64>,
    wait: bool,
    json: bool,
) -> Result<()> {
    let manager = ClusterManager::new(settings);
    let mut rng = workload_rng(settings, seed);

    manager.create_pods(count, &mut rng).await;

    if wait {
        let delays = settings.lifecycle.delays();
        info!("waiting for admitted lifecycles to finish");
        tokio::time::sleep(delays.start + delays.run + Duration::from_millis(250)).await;
    }

    let status = monitoring::gather(&manager).await;
    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        render_status(&status);
    }

    Ok(())
}

fn render_status(status: &ClusterStatus) {
    println!("\n{}", "Workers:".bold());
    println!(
        "{:<12} {:>20} {:>24} {:>22}",
        "NAME", "CPU (used | total)", "MEMORY (used | total)", "DISK (used | total)"
    );
    for w in &status.workers {
        println!(
            "{:<12} {:>20} {:>24} {:>22}",
            w.name,
            format!("[{} | {}]", w.compute_used, w.compute_total),
            format!("[{} | {}]", w.memory_used, w.memory_total),
            format!("[{} | {}]", w.storage_used, w.storage_total),
        );
    }

    println!("\n{}", "Pods:".bold());
    println!(
        "{:<12} {:>6} {:>8} {:>6} {:>10} {:>12}",
        "NAME", "CPU", "MEMORY", "DISK", "STATE", "NODE"
    );
    for p in &status.pods {
        let state = match p.state {
            crate::core::PodState::Starting => "STARTING".yellow(),
            crate::core::PodState::Running => "RUNNING".green(),
            crate::core::PodState::Finished => "FINISHED".blue(),
        };
        println!(
            "{:<12} {:>6} {:>8} {:>6} {:>10} {:>12}",
            p.name,
            p.requested.compute,
            p.requested.memory,
            p.requested.storage,
            state,
            p.worker,
        );
    }

    println!("\n{} pods admitted", status.pods_admitted);
}

fn handle_init(force: bool) -> Result<()> {
    let config_dir = PathBuf::from("config");
    if config_dir.join("default.toml").exists() && !force {
        error!("Configuration already exists. Use --force to overwrite.");
        return Ok(());
    }

    std::fs::create_dir_all(&config_dir)?;
    let config_str = toml::to_string_pretty(&generate_default_config())?;
    std::fs::write(config_dir.join("default.toml"), config_str)?;

    println!("{} Default configuration generated", "✓".green());
    Ok(())
}
