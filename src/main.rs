// ABOUTME: Entry point for the dockhand CLI application.
// ABOUTME: Parses arguments and dispatches to the manager.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use dockhand::config::Config;
use dockhand::error::Result;
use dockhand::manager::{Manager, ProvisionRequest};
use dockhand::model::{ContainerSummary, ImageSummary, NetworkSummary};
use dockhand::output::{Output, OutputMode, table};
use dockhand::runtime::{self, BollardRuntime, LogOptions, LogStream};
use dockhand::types::ContainerId;
use futures::StreamExt;
use serde::Serialize;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Normal
    });

    if let Err(e) = run(cli.command, &output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

async fn connect() -> Result<Manager<BollardRuntime>> {
    let cwd = env::current_dir()?;
    let config = Config::discover_or_default(&cwd)?.with_env_overrides()?;
    let runtime = runtime::connect(&config.runtime_config(), config.timeout)?;
    Ok(Manager::new(runtime).with_cleanup(config.cleanup))
}

/// Accept either a container ID or a name.
async fn resolve_container(manager: &Manager<BollardRuntime>, reference: &str) -> ContainerId {
    match manager.container_id_by_name(reference).await {
        Ok(id) => id,
        Err(_) => ContainerId::new(reference),
    }
}

#[derive(Serialize)]
struct Usage {
    container: String,
    memory_percent: f64,
    memory_used: f64,
    memory_limit: f64,
    cpu_percent: f64,
}

async fn run(command: Commands, output: &Output) -> Result<()> {
    let manager = connect().await?;

    match command {
        Commands::Version => {
            let version = manager.version().await?;
            output.result(&version, |v| {
                format!(
                    "Version:     {}\nAPI version: {} (min {})\nGo version:  {}\nGit commit:  {}\nOS/Arch:     {}/{}",
                    v.docker_version,
                    v.api_version,
                    v.min_api_version,
                    v.go_version,
                    v.git_commit,
                    v.os,
                    v.arch
                )
            })?;
        }
        Commands::Ps => {
            let containers = manager.list_containers().await?;
            output.result(&containers, |cs| render_containers(cs))?;
        }
        Commands::Images => {
            let images = manager.list_images().await?;
            output.result(&images, |is| render_images(is))?;
        }
        Commands::Networks => {
            let networks = manager.list_networks().await?;
            output.result(&networks, |ns| render_networks(ns))?;
        }
        Commands::Create {
            name,
            image,
            network,
            publish,
            volume,
            label,
            command,
        } => {
            let mut request = ProvisionRequest::new(name, image, network);
            request.ports = publish;
            request.volumes = volume;
            request.labels = label.into_iter().collect();
            if !command.is_empty() {
                request.command = Some(command);
            }

            output.progress(&format!("Creating {}...", request.name));
            let id = manager.create_container(&request).await?;
            output.result(&id, |id| id.to_string())?;
        }
        Commands::Stats { container } => {
            let id = resolve_container(&manager, &container).await;
            let memory = manager.memory_usage(&id).await?;
            let cpu = manager.cpu_usage(&id).await?;
            let usage = Usage {
                container,
                memory_percent: memory.percent,
                memory_used: memory.used,
                memory_limit: memory.limit,
                cpu_percent: cpu,
            };
            output.result(&usage, |u| {
                format!(
                    "{}: cpu {:.2}%  mem {:.2}% ({:.0} / {:.0} bytes)",
                    u.container, u.cpu_percent, u.memory_percent, u.memory_used, u.memory_limit
                )
            })?;
        }
        Commands::Logs {
            container,
            follow,
            tail,
        } => {
            let id = resolve_container(&manager, &container).await;
            let options = LogOptions::both_streams(follow, tail);
            let mut stream = manager.container_logs(&id, &options).await?;
            while let Some(line) = stream.next().await {
                let line = line.map_err(dockhand::manager::ManagerError::from)?;
                match line.stream {
                    LogStream::Stdout => print!("{}", line.content),
                    LogStream::Stderr => eprint!("{}", line.content),
                }
            }
        }
        Commands::Rm { container } => {
            let id = resolve_container(&manager, &container).await;
            manager.delete_container(&id).await?;
            output.progress(&format!("Removed {}", container));
        }
        Commands::NetworkCreate {
            name,
            driver,
            subnet,
            gateway,
            label,
        } => {
            let id = manager
                .create_network(&name, &driver, &subnet, &gateway, label.into_iter().collect())
                .await?;
            output.result(&id, |id| id.to_string())?;
        }
        Commands::Export { output: path, images } => {
            manager.export_image(&images, &path).await?;
            output.progress(&format!("Wrote {}", path.display()));
        }
        Commands::Import { input } => {
            let mut stdout = std::io::stdout();
            manager.import_image(&input, &mut stdout).await?;
        }
    }

    Ok(())
}

fn render_containers(containers: &[ContainerSummary]) -> String {
    let rows: Vec<Vec<String>> = containers
        .iter()
        .map(|c| {
            vec![
                c.id.short().to_string(),
                c.name.clone(),
                c.image.clone(),
                c.state.to_string(),
                c.ip.clone(),
                c.uptime.clone(),
            ]
        })
        .collect();
    table(&["ID", "NAME", "IMAGE", "STATE", "IP", "STARTED"], &rows)
}

fn render_images(images: &[ImageSummary]) -> String {
    let rows: Vec<Vec<String>> = images
        .iter()
        .map(|i| {
            vec![
                i.name.clone(),
                i.tag.clone(),
                i.id.short().to_string(),
                i.created.clone(),
                i.size.clone(),
            ]
        })
        .collect();
    table(&["REPOSITORY", "TAG", "ID", "CREATED", "SIZE"], &rows)
}

fn render_networks(networks: &[NetworkSummary]) -> String {
    let rows: Vec<Vec<String>> = networks
        .iter()
        .map(|n| {
            let subnets = n
                .subnets
                .iter()
                .map(|s| s.subnet.as_str())
                .collect::<Vec<_>>()
                .join(",");
            vec![
                n.id.short().to_string(),
                n.name.clone(),
                n.driver.clone(),
                n.scope.clone(),
                subnets,
                n.containers.len().to_string(),
            ]
        })
        .collect();
    table(
        &["ID", "NAME", "DRIVER", "SCOPE", "SUBNETS", "CONTAINERS"],
        &rows,
    )
}
