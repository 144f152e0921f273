//! Shared fixtures for the resolver tests.
//!
//! Two RUNNING clusters with Component Gateway endpoints and two CREATING
//! clusters without, plus an in-memory [`FakeController`] that serves
//! canned listings per filter string.
#![allow(dead_code)]

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use dataproc_url::dataproc::ClusterStream;
use dataproc_url::dataproc::controller::ClusterController;
use dataproc_url::dataproc::model::{
    ClusterConfig, ClusterMetrics, ClusterRecord, ClusterState, ClusterStatus, EndpointConfig,
};
use dataproc_url::jdbc::{ConnectionOptions, ConnectionOptionsBuilder};
use dataproc_url::ControllerError;

pub const PROJECT_ID: &str = "pid";
pub const REGION: &str = "us-central1";
pub const PORT: u16 = 443;

pub const FILTER_DEFAULT: &str = "status.state = ACTIVE";
pub const FILTER_SIMPLE: &str = "status.state = ACTIVE AND clusterName = simple-cluster1";
pub const FILTER_LONG: &str =
    "status.state = ACTIVE AND labels.com = google AND labels.env = staging AND labels.team = dataproc";
pub const FILTER_CREATING: &str = "status.state = ACTIVE AND labels.tag = creating";
pub const FILTER_ALL_CREATING: &str = "status.state = ACTIVE AND labels.tag = all-creating";
pub const FILTER_FLAKY: &str = "status.state = ACTIVE AND labels.tag = flaky";

pub const CLUSTER_NAME_1: &str = "simple-cluster1";
pub const CLUSTER_NAME_2: &str = "simple-cluster2";
pub const CLUSTER_NAME_3: &str = "simple-cluster3";
pub const CLUSTER_NAME_4: &str = "simple-cluster4";
pub const NO_CLUSTER_NAME: &str = "no-cluster";
pub const BROKEN_CLUSTER_NAME: &str = "broken-cluster";

pub const HOST_1: &str = "uklx3owiy5bjlgps5cr72oppla-dot-us-central1.dataproc.googleusercontent.com";
pub const HOST_2: &str = "xgqoq4dqbja2jlqz7dltjhxoka-dot-dataproc-test.googleusercontent.com";

fn gateway_ports(host: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("YARN ResourceManager".to_string(), format!("https://{host}/yarn/")),
        (
            "HDFS NameNode".to_string(),
            format!("https://{host}/hdfs/dfshealth.html"),
        ),
    ])
}

pub fn running_cluster(name: &str, host: &str) -> ClusterRecord {
    ClusterRecord {
        cluster_name: name.to_string(),
        project_id: PROJECT_ID.to_string(),
        labels: BTreeMap::from([("goog-dataproc-location".to_string(), REGION.to_string())]),
        config: Some(ClusterConfig {
            endpoint_config: Some(EndpointConfig {
                http_ports: gateway_ports(host),
                enable_http_port_access: true,
            }),
        }),
        status: Some(ClusterStatus {
            state: ClusterState::Running,
            detail: None,
        }),
        metrics: Some(ClusterMetrics {
            hdfs_metrics: BTreeMap::new(),
            yarn_metrics: BTreeMap::from([(
                "yarn-memory-mb-available".to_string(),
                "0".to_string(),
            )]),
        }),
    }
}

pub fn creating_cluster(name: &str) -> ClusterRecord {
    ClusterRecord {
        cluster_name: name.to_string(),
        project_id: PROJECT_ID.to_string(),
        status: Some(ClusterStatus {
            state: ClusterState::Creating,
            detail: None,
        }),
        ..Default::default()
    }
}

pub fn cluster1() -> ClusterRecord {
    running_cluster(CLUSTER_NAME_1, HOST_1)
}

pub fn cluster2() -> ClusterRecord {
    running_cluster(CLUSTER_NAME_2, HOST_2)
}

pub fn cluster3() -> ClusterRecord {
    creating_cluster(CLUSTER_NAME_3)
}

pub fn cluster4() -> ClusterRecord {
    creating_cluster(CLUSTER_NAME_4)
}

/// One canned page of a listing; `Err` pages fail the stream at that point
pub type Page = Result<Vec<ClusterRecord>, u16>;

/// In-memory cluster controller serving fixed pages per filter
#[derive(Default)]
pub struct FakeController {
    listings: HashMap<String, Vec<Page>>,
    clusters: HashMap<String, ClusterRecord>,
    failing: HashMap<String, u16>,
    pub list_calls: Mutex<Vec<String>>,
    pub get_calls: Mutex<Vec<String>>,
}

impl FakeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(mut self, filter: &str, pages: Vec<Page>) -> Self {
        self.listings.insert(filter.to_string(), pages);
        self
    }

    pub fn with_cluster(mut self, cluster: ClusterRecord) -> Self {
        self.clusters.insert(cluster.cluster_name.clone(), cluster);
        self
    }

    /// `get_cluster` for `name` fails with an HTTP `status` other than 404
    pub fn with_failing_cluster(mut self, name: &str, status: u16) -> Self {
        self.failing.insert(name.to_string(), status);
        self
    }

    pub fn list_calls(&self) -> Vec<String> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn get_calls(&self) -> Vec<String> {
        self.get_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ClusterController for FakeController {
    fn list_clusters(&self, project_id: &str, region: &str, filter: &str) -> ClusterStream {
        assert_eq!(project_id, PROJECT_ID);
        assert_eq!(region, REGION);
        self.list_calls.lock().unwrap().push(filter.to_string());

        let pages = self.listings.get(filter).cloned().unwrap_or_default();
        stream::iter(pages)
            .flat_map(|page| {
                let items: Vec<Result<ClusterRecord, ControllerError>> = match page {
                    Ok(clusters) => clusters.into_iter().map(Ok).collect(),
                    Err(status) => vec![Err(ControllerError::Api {
                        status,
                        message: "backend unavailable".to_string(),
                    })],
                };
                stream::iter(items)
            })
            .boxed()
    }

    async fn get_cluster(
        &self,
        project_id: &str,
        region: &str,
        cluster_name: &str,
    ) -> Result<ClusterRecord, ControllerError> {
        assert_eq!(project_id, PROJECT_ID);
        assert_eq!(region, REGION);
        self.get_calls.lock().unwrap().push(cluster_name.to_string());

        if let Some(status) = self.failing.get(cluster_name) {
            return Err(ControllerError::Api {
                status: *status,
                message: "internal error".to_string(),
            });
        }
        self.clusters
            .get(cluster_name)
            .cloned()
            .ok_or_else(|| ControllerError::NotFound {
                resource: format!("projects/{project_id}/regions/{region}/clusters/{cluster_name}"),
            })
    }
}

/// The fixture world: listings split across pages like the real API returns them
pub fn fixture_controller() -> FakeController {
    FakeController::new()
        .with_listing(FILTER_DEFAULT, vec![Ok(vec![cluster2()]), Ok(vec![cluster1()])])
        .with_listing(FILTER_SIMPLE, vec![Ok(vec![cluster1()])])
        .with_listing(FILTER_LONG, vec![Ok(vec![]), Ok(vec![cluster1()])])
        .with_listing(FILTER_CREATING, vec![Ok(vec![cluster3()])])
        .with_listing(FILTER_ALL_CREATING, vec![Ok(vec![cluster3()]), Ok(vec![cluster4()])])
        .with_listing(FILTER_FLAKY, vec![Ok(vec![cluster1()]), Err(503)])
        .with_cluster(cluster1())
        .with_cluster(cluster2())
        .with_cluster(cluster3())
        .with_failing_cluster(BROKEN_CLUSTER_NAME, 500)
}

pub fn param_builder() -> ConnectionOptionsBuilder {
    ConnectionOptions::builder().project_id(PROJECT_ID).region(REGION)
}

pub fn hive_url(host: &str, database: &str, tail: &str) -> String {
    format!(
        "jdbc:hive2://{host}:{PORT}/{database};transportMode=http;httpPath=hive;ssl=true;http.interceptor=com.google.cloud.dataproc.jdbc.DataprocCGAuthInterceptor{tail}"
    )
}
