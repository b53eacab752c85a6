//! Security middleware
//!
//! Origin allow-list. The server is expected to sit behind a local reverse
//! proxy, so only loopback-class Host values are accepted by default.

use std::collections::HashSet;

use crate::error::AdmissionError;

pub struct OriginPolicy {
    allowed_hosts: HashSet<String>,
}

impl OriginPolicy {
    pub fn new<I, S>(allowed_hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed_hosts: allowed_hosts
                .into_iter()
                .map(|host| crate::utils::host_without_port(host.as_ref()).to_ascii_lowercase())
                .collect(),
        }
    }

    /// `host` must already have its port stripped
    pub fn check(&self, host: Option<&str>) -> Result<(), AdmissionError> {
        match host {
            Some(host) if self.allowed_hosts.contains(&host.to_ascii_lowercase()) => Ok(()),
            Some(host) => Err(AdmissionError::ForbiddenOrigin(host.to_string())),
            None => Err(AdmissionError::ForbiddenOrigin("<missing host>".to_string())),
        }
    }
}
