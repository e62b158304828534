// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dockhand")]
#[command(about = "Manage containers, images and networks on Docker or Podman")]
#[command(version)]
pub struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show runtime daemon version details
    Version,

    /// List containers, stopped ones included
    Ps,

    /// List tagged local images
    Images,

    /// List networks
    Networks,

    /// Create and start a container on a network
    Create {
        /// Container name
        name: String,

        /// Image reference
        image: String,

        /// Network to attach to
        #[arg(short, long)]
        network: String,

        /// Port spec, e.g. 8080:80/tcp (repeatable)
        #[arg(short, long = "publish")]
        publish: Vec<String>,

        /// Volume spec, e.g. /srv/data:/data:ro (repeatable)
        #[arg(short = 'v', long = "volume")]
        volume: Vec<String>,

        /// Label as key=value (repeatable)
        #[arg(short, long, value_parser = parse_label)]
        label: Vec<(String, String)>,

        /// Command to run instead of the image default
        #[arg(last = true)]
        command: Vec<String>,
    },

    /// Show memory and CPU usage of a container
    Stats {
        /// Container ID or name
        container: String,
    },

    /// Print container logs
    Logs {
        /// Container ID or name
        container: String,

        /// Keep streaming new output
        #[arg(short, long)]
        follow: bool,

        /// Number of lines from the end
        #[arg(short = 'n', long)]
        tail: Option<u64>,
    },

    /// Force-remove a container
    Rm {
        /// Container ID or name
        container: String,
    },

    /// Create an attachable network
    NetworkCreate {
        name: String,

        #[arg(short, long, default_value = "bridge")]
        driver: String,

        #[arg(long, default_value = "")]
        subnet: String,

        #[arg(long, default_value = "")]
        gateway: String,

        /// Label as key=value (repeatable)
        #[arg(short, long, value_parser = parse_label)]
        label: Vec<(String, String)>,
    },

    /// Save images to a tar archive
    Export {
        /// Output archive path
        #[arg(short, long)]
        output: PathBuf,

        /// Image references
        #[arg(required = true)]
        images: Vec<String>,
    },

    /// Load images from a tar archive
    Import {
        /// Archive path
        input: PathBuf,
    },
}

pub fn parse_label(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("label must be key=value, got '{s}'"))
}
