pub mod commands;
pub mod render;

/// Inspection tool for pgfleet-managed PostgreSQL clusters.
#[derive(clap::Parser, Clone, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct PgfleetCli {
    #[command(subcommand)]
    pub command: PgfleetCommands,
}

#[derive(clap::Subcommand, Clone, Debug)]
pub enum PgfleetCommands {
    /// Report the health of a cluster and all of its instances
    #[clap(aliases = &["st", "s"])]
    Status {
        /// Cluster name
        cluster_name: String,
        #[clap(flatten)]
        opt: StatusArgs,
    },
}

#[derive(clap::Args, Clone, Debug)]
pub struct StatusArgs {
    /// Kubernetes namespace holding the cluster
    #[arg(short, long, default_value = "default")]
    pub namespace: String,
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
    /// Also dump the server configuration read from the primary pod
    #[arg(short, long)]
    pub verbose: bool,
    /// Per-pod query timeout in seconds
    #[arg(long, default_value_t = 2)]
    pub timeout_secs: u64,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Colorized sections for a terminal
    Text,
    Json,
    Yaml,
}
