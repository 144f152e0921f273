use futures::TryStreamExt;
use tracing::{debug, info, warn};

use crate::dataproc::controller::ClusterController;
use crate::dataproc::model::ClusterRecord;
use crate::dataproc::selector::build_filter;
use crate::error::{Result, UrlError};
use crate::jdbc::{ConnectionOptions, to_hive_url};

/// Component Gateway entry used for the host when the cluster exposes it
pub const PREFERRED_ENDPOINT: &str = "YARN ResourceManager";

/// Turns connection options into exactly one running Dataproc cluster and its host
pub struct ClusterResolver<C> {
    controller: C,
}

impl<C: ClusterController> ClusterResolver<C> {
    pub fn new(controller: C) -> Self {
        Self { controller }
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// Resolves the cluster and rewrites the options into a `jdbc:hive2://` URL
    pub async fn to_hive_url(&self, options: &ConnectionOptions) -> Result<String> {
        let host = self.resolve_host(options).await?;
        Ok(to_hive_url(options, &host))
    }

    pub async fn resolve_host(&self, options: &ConnectionOptions) -> Result<String> {
        let cluster = self.resolve_cluster(options).await?;
        let host = extract_host(&cluster)?;
        info!("Resolved cluster {} to host {}", cluster.cluster_name, host);
        Ok(host)
    }

    /// Picks the cluster the options refer to.
    ///
    /// A cluster name is looked up directly. Otherwise the pool label (or the
    /// default pool) must match exactly one cluster, and that cluster must be
    /// RUNNING.
    pub async fn resolve_cluster(&self, options: &ConnectionOptions) -> Result<ClusterRecord> {
        if let Some(name) = options.cluster_name() {
            return self.cluster_by_name(options, name).await;
        }

        let filter = build_filter(options.cluster_pool_label())?;
        let mut clusters = self
            .list_matching(options.project_id(), options.region(), &filter)
            .await?;

        if clusters.len() > 1 {
            let names = clusters.into_iter().map(|c| c.cluster_name).collect();
            return Err(UrlError::AmbiguousSelector {
                filter,
                clusters: names,
            }
            .into());
        }

        let cluster = clusters
            .pop()
            .ok_or_else(|| UrlError::NoMatchingCluster {
                filter: filter.clone(),
            })?;

        if !cluster.is_running() {
            return Err(UrlError::ClusterNotReady {
                cluster: cluster.cluster_name.clone(),
                state: cluster.state(),
            }
            .into());
        }

        Ok(cluster)
    }

    /// Drains every page of the listing for `filter`
    pub async fn list_matching(
        &self,
        project_id: &str,
        region: &str,
        filter: &str,
    ) -> Result<Vec<ClusterRecord>> {
        info!(
            "Listing clusters in project {} region {} with filter '{}'",
            project_id, region, filter
        );
        let clusters: Vec<ClusterRecord> = self
            .controller
            .list_clusters(project_id, region, filter)
            .try_collect()
            .await?;
        debug!("Filter '{}' matched {} clusters", filter, clusters.len());
        Ok(clusters)
    }

    async fn cluster_by_name(&self, options: &ConnectionOptions, name: &str) -> Result<ClusterRecord> {
        info!("Looking up cluster {} by name", name);
        let cluster = self
            .controller
            .get_cluster(options.project_id(), options.region(), name)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    UrlError::ClusterNotFound {
                        cluster: name.to_string(),
                    }
                    .into()
                } else {
                    crate::error::Error::from(e)
                }
            })?;

        if !cluster.is_running() {
            warn!("Cluster {} is in state {}", name, cluster.state());
        }
        Ok(cluster)
    }
}

/// Host of the cluster's Component Gateway.
///
/// All endpoint URLs of a cluster share one host. The entry read is
/// [`PREFERRED_ENDPOINT`] when it holds an HTTPS URL, otherwise the first
/// HTTPS URL in key order.
pub fn extract_host(cluster: &ClusterRecord) -> std::result::Result<String, UrlError> {
    let no_endpoint = || UrlError::NoEndpoint {
        cluster: cluster.cluster_name.clone(),
    };
    let ports = cluster.http_ports().ok_or_else(no_endpoint)?;

    ports
        .get(PREFERRED_ENDPOINT)
        .into_iter()
        .chain(ports.values())
        .find_map(|url| https_host(url))
        .ok_or_else(no_endpoint)
}

fn https_host(url: &str) -> Option<String> {
    let uri: http::Uri = url.parse().ok()?;
    if uri.scheme_str() != Some("https") {
        return None;
    }
    uri.host().filter(|h| !h.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataproc::model::{ClusterConfig, EndpointConfig};
    use std::collections::BTreeMap;

    fn with_ports(ports: &[(&str, &str)]) -> ClusterRecord {
        let http_ports: BTreeMap<String, String> = ports
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ClusterRecord {
            cluster_name: "c1".to_string(),
            config: Some(ClusterConfig {
                endpoint_config: Some(EndpointConfig {
                    http_ports,
                    enable_http_port_access: true,
                }),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_extract_host_strips_scheme_and_path() {
        let cluster = with_ports(&[(
            "HDFS NameNode",
            "https://abc-dot-us-central1.dataproc.googleusercontent.com/hdfs/dfshealth.html?x=1",
        )]);
        assert_eq!(
            extract_host(&cluster).unwrap(),
            "abc-dot-us-central1.dataproc.googleusercontent.com"
        );
    }

    #[test]
    fn test_extract_host_prefers_resource_manager() {
        let cluster = with_ports(&[
            ("HDFS NameNode", "https://first.example.com/hdfs/"),
            ("YARN ResourceManager", "https://preferred.example.com/yarn/"),
        ]);
        assert_eq!(extract_host(&cluster).unwrap(), "preferred.example.com");
    }

    #[test]
    fn test_extract_host_falls_back_to_first_https_key() {
        let cluster = with_ports(&[
            ("Tez", "https://tez.example.com/apphistory/tez-ui/"),
            ("HDFS NameNode", "https://hdfs.example.com/hdfs/"),
            ("YARN ResourceManager", "http://plain.example.com/yarn/"),
        ]);
        assert_eq!(extract_host(&cluster).unwrap(), "hdfs.example.com");
    }

    #[test]
    fn test_extract_host_without_endpoints() {
        let cluster = ClusterRecord {
            cluster_name: "bare".to_string(),
            ..Default::default()
        };
        assert_eq!(
            extract_host(&cluster),
            Err(UrlError::NoEndpoint {
                cluster: "bare".to_string()
            })
        );

        let cluster = with_ports(&[]);
        assert!(matches!(extract_host(&cluster), Err(UrlError::NoEndpoint { .. })));

        let cluster = with_ports(&[("Spark History Server", "not a url")]);
        assert!(matches!(extract_host(&cluster), Err(UrlError::NoEndpoint { .. })));
    }
}
