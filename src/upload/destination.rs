//! Where uploaded logs land.

use std::fmt;

/// Environment variable naming the deployment environment.
pub const ENVIRONMENT_VAR: &str = "VOLT_ENVIRONMENT";

/// Hostname used when the real one cannot be read.
pub const UNKNOWN_HOST: &str = "unknown";

/// Bucket and key of the uploaded log object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub bucket: String,
    pub key: String,
}

impl Destination {
    pub fn new(environment: &str, hostname: &str) -> Self {
        Self {
            bucket: format!("voltage-{}-system", environment),
            key: format!("traefik-logs/{}/traefik.log", hostname),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// The machine's hostname, or [`UNKNOWN_HOST`].
pub fn hostname() -> String {
    nix::unistd::gethostname()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_HOST.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_layout() {
        let dest = Destination::new("staging", "edge-3");
        assert_eq!(dest.bucket, "voltage-staging-system");
        assert_eq!(dest.key, "traefik-logs/edge-3/traefik.log");
        assert_eq!(dest.to_string(), "voltage-staging-system/traefik-logs/edge-3/traefik.log");
    }

    #[test]
    fn test_hostname_is_never_empty() {
        assert!(!hostname().is_empty());
    }
}
