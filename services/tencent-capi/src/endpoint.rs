use crate::constants::ENDPOINT_SUFFIX;

/// Services with a dedicated entry in the endpoint table.
const SERVICE_ENDPOINTS: &[(&str, &str)] = &[
    // EdgeOne
    ("teo", "teo.tencentcloudapi.com"),
    // CDN
    ("cdn", "cdn.tencentcloudapi.com"),
    // CVM
    ("cvm", "cvm.tencentcloudapi.com"),
    // VPC
    ("vpc", "vpc.tencentcloudapi.com"),
];

/// Resolve the endpoint host of a service.
///
/// Services missing from the table follow the `<service>.tencentcloudapi.com`
/// naming the API family uses.
pub fn endpoint_for(service: &str) -> String {
    SERVICE_ENDPOINTS
        .iter()
        .find(|(name, _)| *name == service)
        .map(|(_, endpoint)| endpoint.to_string())
        .unwrap_or_else(|| format!("{service}.{ENDPOINT_SUFFIX}"))
}

/// Service name of an endpoint host, which is its first label.
///
/// `cvm.ap-shanghai.tencentcloudapi.com` belongs to `cvm`.
pub fn service_of(endpoint: &str) -> &str {
    endpoint.split('.').next().unwrap_or(endpoint)
}
