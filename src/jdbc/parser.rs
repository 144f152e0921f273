use tracing::debug;

use crate::error::UrlError;
use crate::jdbc::options::{ConnectionOptions, ConnectionOptionsBuilder};

pub const URL_PREFIX: &str = "jdbc:dataproc://";

const SUPPORTED_ENGINE: &str = "hive";

/// Parses a `jdbc:dataproc://hive/<db>;key=value;...[?query][#fragment]` URL
pub fn parse_url(url: &str) -> Result<ConnectionOptions, UrlError> {
    let rest = url
        .strip_prefix(URL_PREFIX)
        .ok_or_else(|| UrlError::UnsupportedScheme(url.to_string()))?;

    let (rest, fragment) = match rest.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (rest, None),
    };
    let (rest, query) = match rest.split_once('?') {
        Some((rest, query)) => (rest, Some(query)),
        None => (rest, None),
    };

    let (engine, path) = rest.split_once('/').unwrap_or((rest, ""));
    if engine != SUPPORTED_ENGINE {
        return Err(UrlError::UnsupportedEngine(engine.to_string()));
    }

    let mut segments = path.split(';');
    let database = segments.next().unwrap_or_default();

    let mut builder = ConnectionOptions::builder().database(database);
    let mut seen: Vec<&str> = Vec::new();

    for segment in segments.filter(|s| !s.is_empty()) {
        let (key, value) = segment
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| UrlError::MalformedParameter(segment.to_string()))?;

        if is_recognized(key) {
            if seen.contains(&key) {
                return Err(UrlError::DuplicateParameter(key.to_string()));
            }
            seen.push(key);
        }
        builder = apply_parameter(builder, key, value);
    }

    if let Some(query) = query {
        builder = builder.query(query);
    }
    if let Some(fragment) = fragment {
        builder = builder.fragment(fragment);
    }

    let options = builder.build()?;
    debug!(
        "Parsed connection URL for project={} region={}",
        options.project_id(),
        options.region()
    );
    Ok(options)
}

fn is_recognized(key: &str) -> bool {
    matches!(
        key,
        "projectId" | "region" | "clusterName" | "clusterPoolLabel" | "user" | "password"
    )
}

fn apply_parameter(builder: ConnectionOptionsBuilder, key: &str, value: &str) -> ConnectionOptionsBuilder {
    match key {
        "projectId" => builder.project_id(value),
        "region" => builder.region(value),
        "clusterName" => builder.cluster_name(value),
        "clusterPoolLabel" => builder.cluster_pool_label(Some(value)),
        "user" => builder.user(value),
        "password" => builder.password(value),
        _ => builder.session_var(key, value),
    }
}
