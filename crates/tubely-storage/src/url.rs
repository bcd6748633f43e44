//! Derivation of public object URLs from storage keys.

/// Base a storage key is appended to in order to build a public URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicUrlBase {
    /// AWS virtual-hosted style: `https://{bucket}.s3.{region}.amazonaws.com/{key}`
    VirtualHosted { bucket: String, region: String },
    /// S3-compatible providers: `{endpoint}/{bucket}/{key}`
    PathStyle { endpoint: String, bucket: String },
    /// CDN distribution or any fixed front door: `{base_url}/{key}`
    Distribution { base_url: String },
}

impl PublicUrlBase {
    /// Pick the URL base for an S3 bucket. A distribution URL wins over a
    /// custom endpoint, which wins over the AWS default.
    pub fn for_s3(
        bucket: &str,
        region: &str,
        endpoint: Option<&str>,
        distribution: Option<&str>,
    ) -> Self {
        match (distribution, endpoint) {
            (Some(base_url), _) => PublicUrlBase::Distribution {
                base_url: base_url.to_string(),
            },
            (None, Some(endpoint)) => PublicUrlBase::PathStyle {
                endpoint: endpoint.to_string(),
                bucket: bucket.to_string(),
            },
            (None, None) => PublicUrlBase::VirtualHosted {
                bucket: bucket.to_string(),
                region: region.to_string(),
            },
        }
    }

    pub fn url_for(&self, key: &str) -> String {
        let key = key.trim_start_matches('/');
        match self {
            PublicUrlBase::VirtualHosted { bucket, region } => {
                format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
            }
            PublicUrlBase::PathStyle { endpoint, bucket } => {
                format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key)
            }
            PublicUrlBase::Distribution { base_url } => {
                format!("{}/{}", base_url.trim_end_matches('/'), key)
            }
        }
    }
}
