use std::path::PathBuf;

use clap::Parser;
use sitewatch::Config;

/// Website availability monitor
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Config file, created with defaults if missing
    /// [default: $XDG_CONFIG_HOME/sitewatch/config.toml]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to listen on, overrides the config file
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on, overrides the config file
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Print the effective configuration and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Command line flags win over the file and the environment
    pub fn apply(&self, config: &mut Config) {
        if let Some(bind) = &self.bind {
            config.server.bind.clone_from(bind);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}
