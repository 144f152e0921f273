use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::dataproc::model::{ClusterRecord, ListClustersResponse};
use crate::error::ControllerError;

pub const DEFAULT_ENDPOINT: &str = "https://dataproc.googleapis.com";

/// Lazily paged listing of clusters
pub type ClusterStream = BoxStream<'static, Result<ClusterRecord, ControllerError>>;

/// The two Dataproc cluster controller calls the resolver needs
#[async_trait]
pub trait ClusterController: Send + Sync {
    /// Lists clusters matching `filter`, following pagination as the stream is polled
    fn list_clusters(&self, project_id: &str, region: &str, filter: &str) -> ClusterStream;

    /// Fetches one cluster; a missing cluster is [`ControllerError::NotFound`]
    async fn get_cluster(
        &self,
        project_id: &str,
        region: &str,
        cluster_name: &str,
    ) -> Result<ClusterRecord, ControllerError>;
}

/// Cluster controller backed by the Dataproc v1 REST API
#[derive(Debug, Clone)]
pub struct RestClusterController {
    client: Client,
    endpoint: Url,
    access_token: Option<String>,
}

impl RestClusterController {
    pub fn new(
        endpoint: &str,
        access_token: Option<String>,
        timeout_seconds: u64,
    ) -> Result<Self, ControllerError> {
        let invalid = |reason: String| ControllerError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason,
        };
        let parsed = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        if parsed.cannot_be_a_base() {
            return Err(invalid("not a base URL".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        info!("Dataproc REST controller using endpoint {}", parsed);

        Ok(Self {
            client,
            endpoint: parsed,
            access_token: access_token.filter(|t| !t.trim().is_empty()),
        })
    }

    /// Appends `segments` to the endpoint path, percent-encoding each one.
    /// Empty and dot segments cannot name a resource and are reported as not found.
    fn resource_url(&self, segments: &[&str]) -> Result<Url, ControllerError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(ControllerError::NotFound {
                resource: format!("{:?} in {}", bad, segments.join("/")),
            });
        }

        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| ControllerError::InvalidEndpoint {
                endpoint: self.endpoint.to_string(),
                reason: "not a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn clusters_url(&self, project_id: &str, region: &str) -> Result<Url, ControllerError> {
        self.resource_url(&["v1", "projects", project_id, "regions", region, "clusters"])
    }
}

#[async_trait]
impl ClusterController for RestClusterController {
    fn list_clusters(&self, project_id: &str, region: &str, filter: &str) -> ClusterStream {
        let url = match self.clusters_url(project_id, region) {
            Ok(url) => url,
            Err(e) => return stream::once(async move { Err(e) }).boxed(),
        };
        let request = Arc::new(ListRequest {
            client: self.client.clone(),
            url,
            access_token: self.access_token.clone(),
            filter: filter.to_string(),
        });

        stream::try_unfold(PageCursor::First, move |cursor| {
            next_page(Arc::clone(&request), cursor)
        })
        .map_ok(|clusters| stream::iter(clusters.into_iter().map(Ok::<_, ControllerError>)))
        .try_flatten()
        .boxed()
    }

    async fn get_cluster(
        &self,
        project_id: &str,
        region: &str,
        cluster_name: &str,
    ) -> Result<ClusterRecord, ControllerError> {
        let url = self.resource_url(&[
            "v1", "projects", project_id, "regions", region, "clusters", cluster_name,
        ])?;
        debug!("GET {}", url);

        let request = authorize(self.client.get(url.clone()), self.access_token.as_deref());
        let body = read_body(request.send().await?, url.as_str()).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

struct ListRequest {
    client: Client,
    url: Url,
    access_token: Option<String>,
    filter: String,
}

enum PageCursor {
    First,
    Next(String),
    Done,
}

async fn next_page(
    request: Arc<ListRequest>,
    cursor: PageCursor,
) -> Result<Option<(Vec<ClusterRecord>, PageCursor)>, ControllerError> {
    let page_token = match cursor {
        PageCursor::Done => return Ok(None),
        PageCursor::First => None,
        PageCursor::Next(token) => Some(token),
    };

    let mut query = vec![("filter", request.filter.as_str())];
    if let Some(token) = page_token.as_deref() {
        query.push(("pageToken", token));
    }

    debug!("GET {} filter='{}' pageToken={:?}", request.url, request.filter, page_token);

    let builder = authorize(
        request.client.get(request.url.clone()).query(&query),
        request.access_token.as_deref(),
    );
    let body = read_body(builder.send().await?, request.url.as_str()).await?;
    let page: ListClustersResponse = serde_json::from_str(&body)?;

    debug!("Received page with {} clusters", page.clusters.len());

    let next = match page.next_page_token {
        Some(token) if !token.is_empty() => PageCursor::Next(token),
        _ => PageCursor::Done,
    };
    Ok(Some((page.clusters, next)))
}

fn authorize(builder: RequestBuilder, access_token: Option<&str>) -> RequestBuilder {
    match access_token {
        Some(token) => builder.bearer_auth(token.trim()),
        None => builder,
    }
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

async fn read_body(response: Response, url: &str) -> Result<String, ControllerError> {
    let status = response.status();
    debug!("HTTP status {} for {}", status, url);

    if status == StatusCode::NOT_FOUND {
        return Err(ControllerError::NotFound {
            resource: url.to_string(),
        });
    }

    let text = response.text().await?;
    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .map(|body| body.error.message)
            .unwrap_or(text);
        return Err(ControllerError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(text)
}
