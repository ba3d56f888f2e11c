use crate::Config;

/// Build the endpoint url of a request.
///
/// ```text
/// {protocol}://{service}.{region}.{api_domain}/{base_path}/{api_version}/{path}/
/// ```
///
/// Absent or empty components contribute nothing, not even their dot or
/// slash. Components are used as given, nothing is percent encoded here.
pub fn build_endpoint(config: &Config, path: Option<&str>) -> String {
    let protocol = if config.use_ssl { "https" } else { "http" };

    let mut host = String::new();
    for label in [Some(config.service_name.as_str()), config.region_name.as_deref()]
        .into_iter()
        .flatten()
        .filter(|v| !v.is_empty())
    {
        host.push_str(label);
        host.push('.');
    }
    host.push_str(&config.api_domain);

    let mut path_param = String::new();
    for segment in [
        config.base_path.as_deref(),
        config.api_version.as_deref(),
        path,
    ]
    .into_iter()
    .flatten()
    .filter(|v| !v.is_empty())
    {
        path_param.push_str(segment);
        path_param.push('/');
    }

    format!("{protocol}://{host}/{path_param}")
}
