use crate::jdbc::options::ConnectionOptions;

/// Port Component Gateway serves HiveServer2 on
pub const HIVE_HTTPS_PORT: u16 = 443;

/// Hive JDBC interceptor that attaches Google credentials to each request
pub const AUTH_INTERCEPTOR: &str = "com.google.cloud.dataproc.jdbc.DataprocCGAuthInterceptor";

const HIVE_TRANSPORT_PARAMS: &str = "transportMode=http;httpPath=hive;ssl=true";

/// Rewrites the connection options into a `jdbc:hive2://` URL for `host`.
///
/// Only the host, port and transport parameters are synthesized. The database,
/// credentials, session variables, query string and fragment are copied as given.
pub fn to_hive_url(options: &ConnectionOptions, host: &str) -> String {
    let mut url = format!(
        "jdbc:hive2://{}:{}/{};{};http.interceptor={}",
        host,
        HIVE_HTTPS_PORT,
        options.database(),
        HIVE_TRANSPORT_PARAMS,
        AUTH_INTERCEPTOR
    );

    if let Some(user) = options.user() {
        url.push_str(";user=");
        url.push_str(user);
    }
    if let Some(password) = options.password() {
        url.push_str(";password=");
        url.push_str(password);
    }
    for (key, value) in options.session_vars() {
        url.push(';');
        url.push_str(key);
        url.push('=');
        url.push_str(value);
    }
    if let Some(query) = options.query() {
        url.push('?');
        url.push_str(query);
    }
    if let Some(fragment) = options.fragment() {
        url.push('#');
        url.push_str(fragment);
    }

    url
}
