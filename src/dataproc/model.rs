use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Label Dataproc stamps on every cluster with the region it runs in
pub const LOCATION_LABEL: &str = "goog-dataproc-location";

/// A Dataproc cluster as returned by the v1 REST API.
///
/// Only the fields needed to pick a cluster and reach it are decoded; the
/// rest of the resource is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRecord {
    pub cluster_name: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub config: Option<ClusterConfig>,
    #[serde(default)]
    pub status: Option<ClusterStatus>,
    #[serde(default)]
    pub metrics: Option<ClusterMetrics>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfig {
    #[serde(default)]
    pub endpoint_config: Option<EndpointConfig>,
}

/// Component Gateway endpoints, keyed by the web UI they serve
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    #[serde(default)]
    pub http_ports: BTreeMap<String, String>,
    #[serde(default)]
    pub enable_http_port_access: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatus {
    #[serde(default)]
    pub state: ClusterState,
    #[serde(default)]
    pub detail: Option<String>,
}

/// HDFS and YARN metrics. The API encodes int64 values as JSON strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMetrics {
    #[serde(default)]
    pub hdfs_metrics: BTreeMap<String, String>,
    #[serde(default)]
    pub yarn_metrics: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClusterState {
    Creating,
    Running,
    Error,
    ErrorDueToUpdate,
    Deleting,
    Updating,
    Stopping,
    Stopped,
    Starting,
    Repairing,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ClusterState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClusterState::Unknown => "UNKNOWN",
            ClusterState::Creating => "CREATING",
            ClusterState::Running => "RUNNING",
            ClusterState::Error => "ERROR",
            ClusterState::ErrorDueToUpdate => "ERROR_DUE_TO_UPDATE",
            ClusterState::Deleting => "DELETING",
            ClusterState::Updating => "UPDATING",
            ClusterState::Stopping => "STOPPING",
            ClusterState::Stopped => "STOPPED",
            ClusterState::Starting => "STARTING",
            ClusterState::Repairing => "REPAIRING",
        }
    }
}

impl fmt::Display for ClusterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ClusterRecord {
    pub fn state(&self) -> ClusterState {
        self.status.as_ref().map(|s| s.state).unwrap_or_default()
    }

    pub fn is_running(&self) -> bool {
        self.state() == ClusterState::Running
    }

    /// Region the cluster runs in, if Dataproc labelled it
    pub fn region(&self) -> Option<&str> {
        self.labels.get(LOCATION_LABEL).map(String::as_str)
    }

    pub fn http_ports(&self) -> Option<&BTreeMap<String, String>> {
        self.config
            .as_ref()
            .and_then(|c| c.endpoint_config.as_ref())
            .map(|e| &e.http_ports)
    }

    pub fn yarn_metric(&self, name: &str) -> Option<&str> {
        self.metrics
            .as_ref()
            .and_then(|m| m.yarn_metrics.get(name))
            .map(String::as_str)
    }
}

/// One page of `clusters.list`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListClustersResponse {
    #[serde(default)]
    pub clusters: Vec<ClusterRecord>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}
