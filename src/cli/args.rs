use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Resolve Dataproc clusters and rewrite jdbc:dataproc:// URLs into Hive JDBC URLs",
    long_about = "dataproc-url finds the Dataproc cluster a connection URL refers to, either by name or by a\n\
cluster pool label, and rewrites the URL into a jdbc:hive2:// URL pointing at the cluster's\n\
Component Gateway.\n\
---\n\
Cluster pool labels are colon-separated key=value pairs:\n\
  com=google:env=staging:team=dataproc     # labels.com = google AND labels.env = staging AND ...\n\
  clusterName=my-cluster                   # shorthand for a single cluster name\n\
The pool must match exactly one RUNNING cluster.\n\
---\n\
Configuration Examples:\n\
  dataproc-url setconfig project_id my-project            # Default project\n\
  dataproc-url setconfig region us-central1               # Default region\n\
  dataproc-url setconfig api.timeout_seconds 10           # HTTP request timeout\n\
  dataproc-url getconfig                                  # Show all current configuration\n\
The access token is read from --access-token, DATAPROC_ACCESS_TOKEN or GOOGLE_OAUTH_ACCESS_TOKEN."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level for debug output
    #[arg(short, long, global = true)]
    pub verbosity: Option<u8>,

    /// Enable development mode - writes trace logs to a file
    #[arg(long, global = true)]
    pub dev: bool,

    /// Dataproc API endpoint (overrides config)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// OAuth access token sent as a bearer token
    #[arg(long, global = true)]
    pub access_token: Option<String>,

    /// HTTP request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

/// Where to look for a cluster when no connection URL is given
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ClusterArgs {
    /// Google Cloud project (defaults to config project_id)
    #[arg(short, long)]
    pub project: Option<String>,

    /// Dataproc region (defaults to config region)
    #[arg(short, long)]
    pub region: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rewrite a jdbc:dataproc:// URL into a jdbc:hive2:// URL
    Resolve {
        /// Connection URL, e.g. "jdbc:dataproc://hive/;projectId=pid;region=us-central1;clusterName=c1"
        url: String,
    },
    /// Print the Component Gateway host of the selected cluster
    Host {
        #[command(flatten)]
        target: ClusterArgs,

        /// Cluster name
        #[arg(short, long, conflicts_with = "label")]
        cluster: Option<String>,

        /// Cluster pool label, e.g. "env=staging:team=dataproc"
        #[arg(short, long)]
        label: Option<String>,
    },
    /// Print the clusters.list filter for a cluster pool label
    Filter {
        /// Cluster pool label; omit for the default pool
        label: Option<String>,
    },
    /// List the clusters a cluster pool label matches
    Clusters {
        #[command(flatten)]
        target: ClusterArgs,

        /// Cluster pool label; omit for the default pool
        #[arg(short, long)]
        label: Option<String>,
    },
    /// Configure dataproc-url settings
    #[command(name = "setconfig")]
    SetConfig {
        /// Configuration key to set
        key: String,
        /// Configuration value to set
        value: String,
    },
    /// Display current dataproc-url configuration
    #[command(name = "getconfig")]
    GetConfig {
        /// Optional specific configuration key or section to display (e.g., api)
        key: Option<String>,
    },
}

pub fn parse_args() -> Args {
    Args::parse()
}
