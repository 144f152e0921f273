//! Cluster pool label parsing and Dataproc filter construction.
//!
//! A cluster pool label is a colon-separated list of `key=value` tokens, e.g.
//! `com=google:env=staging:team=dataproc`. Each token becomes a
//! `labels.<key> = <value>` clause appended to the default readiness filter,
//! in the order given:
//!
//! ```text
//! status.state = ACTIVE AND labels.com = google AND labels.env = staging AND labels.team = dataproc
//! ```
//!
//! A single token whose key is `clusterName` (and no `:`) is shorthand for a
//! cluster name predicate: `clusterName=c1` becomes
//! `status.state = ACTIVE AND clusterName = c1`. Inside a multi-token label,
//! `clusterName` is an ordinary label key.

use std::collections::HashSet;
use tracing::debug;

use crate::error::SelectorError;

/// Filter matching every cluster Dataproc considers usable
pub const DEFAULT_FILTER: &str = "status.state = ACTIVE";

/// Key of the status predicate, always supplied by [`DEFAULT_FILTER`]
pub const STATUS_KEY: &str = "status.state";

/// Key of the cluster name shorthand
pub const CLUSTER_NAME_KEY: &str = "clusterName";

const TOKEN_SEPARATOR: char = ':';
const PAIR_SEPARATOR: char = '=';

/// One clause of a parsed cluster pool label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    ClusterName(String),
    Label { key: String, value: String },
}

impl Predicate {
    fn to_filter_clause(&self) -> String {
        match self {
            Predicate::ClusterName(name) => format!("{CLUSTER_NAME_KEY} = {name}"),
            Predicate::Label { key, value } => format!("labels.{key} = {value}"),
        }
    }
}

/// Validated cluster pool label, predicates kept in input order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelSelector {
    predicates: Vec<Predicate>,
}

impl LabelSelector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        if input.is_empty() {
            return Err(SelectorError::Empty);
        }

        if let Some(name) = cluster_name_shorthand(input) {
            debug!("Cluster pool label '{}' is a cluster name shorthand", input);
            return Ok(Self {
                predicates: vec![Predicate::ClusterName(name.to_string())],
            });
        }

        let mut seen = HashSet::new();
        let mut predicates = Vec::new();

        for token in input.split(TOKEN_SEPARATOR) {
            let (key, value) = split_token(token)?;

            if key == STATUS_KEY {
                return Err(SelectorError::ReservedKey(key.to_string()));
            }
            if !seen.insert(key) {
                return Err(SelectorError::DuplicateKey(key.to_string()));
            }

            predicates.push(Predicate::Label {
                key: key.to_string(),
                value: value.to_string(),
            });
        }

        Ok(Self { predicates })
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Renders the selector as a Dataproc `clusters.list` filter
    pub fn to_filter(&self) -> String {
        self.predicates
            .iter()
            .fold(DEFAULT_FILTER.to_string(), |mut filter, predicate| {
                filter.push_str(" AND ");
                filter.push_str(&predicate.to_filter_clause());
                filter
            })
    }
}

/// Builds the `clusters.list` filter for an optional cluster pool label
pub fn build_filter(cluster_pool_label: Option<&str>) -> Result<String, SelectorError> {
    let filter = match cluster_pool_label {
        Some(label) => LabelSelector::parse(label)?.to_filter(),
        None => DEFAULT_FILTER.to_string(),
    };
    debug!("Built cluster filter: {}", filter);
    Ok(filter)
}

fn cluster_name_shorthand(input: &str) -> Option<&str> {
    if input.contains(TOKEN_SEPARATOR) || input.matches(PAIR_SEPARATOR).count() != 1 {
        return None;
    }
    let (key, value) = input.split_once(PAIR_SEPARATOR)?;
    if key == CLUSTER_NAME_KEY && is_clean(value) {
        Some(value)
    } else {
        None
    }
}

fn split_token(token: &str) -> Result<(&str, &str), SelectorError> {
    match token.split_once(PAIR_SEPARATOR) {
        Some((key, value)) if is_clean(key) && is_clean(value) => Ok((key, value)),
        _ => Err(SelectorError::MalformedToken(token.to_string())),
    }
}

// Filter values are unquoted, so whitespace would split a clause.
fn is_clean(part: &str) -> bool {
    !part.is_empty() && !part.chars().any(char::is_whitespace)
}
