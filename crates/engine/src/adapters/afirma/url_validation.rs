use url::{Host, Url};

use crate::domain::error::{DssError, DssResult};

/// Check the service endpoint before any request leaves the process.
pub fn validate_endpoint_url(url: &Url, allow_http: bool) -> DssResult<()> {
  match url.scheme() {
    "https" => {}
    "http" => {
      if !allow_http { return Err(DssError::Config("HTTP URLs are not allowed".into())); }
    }
    _ => return Err(DssError::Config("unsupported URL scheme".into())),
  }
  match url.host() {
    None => return Err(DssError::Config("URL missing host".into())),
    Some(Host::Domain(d)) if d.trim().is_empty() => {
      return Err(DssError::Config("URL missing host".into()));
    }
    Some(_) => {}
  }
  if !url.username().is_empty() || url.password().is_some() {
    return Err(DssError::Config("credentials in the endpoint URL are not allowed".into()));
  }
  if url.fragment().is_some() {
    return Err(DssError::Config("endpoint URL must not carry a fragment".into()));
  }
  Ok(())
}
