use std::fmt;

use crate::error::UrlError;

/// Everything needed to resolve a cluster and rewrite a connection URL.
///
/// Built once per connection request through [`ConnectionOptions::builder`]
/// and never mutated afterwards. `cluster_name` and `cluster_pool_label` are
/// mutually exclusive; when neither is set the default pool is used.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    project_id: String,
    region: String,
    cluster_name: Option<String>,
    cluster_pool_label: Option<String>,
    database: String,
    user: Option<String>,
    password: Option<String>,
    session_vars: Vec<(String, String)>,
    query: Option<String>,
    fragment: Option<String>,
}

impl ConnectionOptions {
    pub fn builder() -> ConnectionOptionsBuilder {
        ConnectionOptionsBuilder::default()
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn cluster_name(&self) -> Option<&str> {
        self.cluster_name.as_deref()
    }

    pub fn cluster_pool_label(&self) -> Option<&str> {
        self.cluster_pool_label.as_deref()
    }

    /// Database path segment, empty for the default database
    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Unrecognized `key=value` parameters, in the order they were given
    pub fn session_vars(&self) -> &[(String, String)] {
        &self.session_vars
    }

    /// Query string without the leading `?`
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Fragment without the leading `#`
    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }
}

impl fmt::Debug for ConnectionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionOptions")
            .field("project_id", &self.project_id)
            .field("region", &self.region)
            .field("cluster_name", &self.cluster_name)
            .field("cluster_pool_label", &self.cluster_pool_label)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .field("session_vars", &self.session_vars)
            .field("query", &self.query)
            .field("fragment", &self.fragment)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConnectionOptionsBuilder {
    project_id: Option<String>,
    region: Option<String>,
    cluster_name: Option<String>,
    cluster_pool_label: Option<String>,
    database: String,
    user: Option<String>,
    password: Option<String>,
    session_vars: Vec<(String, String)>,
    query: Option<String>,
    fragment: Option<String>,
}

impl ConnectionOptionsBuilder {
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn cluster_name(mut self, cluster_name: impl Into<String>) -> Self {
        self.cluster_name = Some(cluster_name.into());
        self
    }

    pub fn cluster_pool_label(mut self, label: Option<impl Into<String>>) -> Self {
        self.cluster_pool_label = label.map(Into::into);
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn session_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.session_vars.push((key.into(), value.into()));
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    pub fn build(self) -> Result<ConnectionOptions, UrlError> {
        let project_id = self
            .project_id
            .filter(|p| !p.is_empty())
            .ok_or(UrlError::MissingParameter("projectId"))?;
        let region = self
            .region
            .filter(|r| !r.is_empty())
            .ok_or(UrlError::MissingParameter("region"))?;

        if self.cluster_name.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(UrlError::MissingParameter("clusterName"));
        }
        if self.cluster_name.is_some() && self.cluster_pool_label.is_some() {
            return Err(UrlError::ConflictingSelection);
        }

        Ok(ConnectionOptions {
            project_id,
            region,
            cluster_name: self.cluster_name,
            cluster_pool_label: self.cluster_pool_label,
            database: self.database,
            user: self.user,
            password: self.password,
            session_vars: self.session_vars,
            query: self.query,
            fragment: self.fragment,
        })
    }
}
