use std::env;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_PROXY_ENDPOINT: &str = "/corsproxy/";

/// Listener and routing settings for the web server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the server listens on
    pub bind: String,
    /// Path prefix handed to the CORS passthrough
    pub proxy_endpoint: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let proxy_endpoint = non_blank("WORDBRIDGE_PROXY_ENDPOINT")
            .map(|p| if p.starts_with('/') { p } else { format!("/{}", p) })
            .unwrap_or_else(|| DEFAULT_PROXY_ENDPOINT.to_string());

        ServerConfig {
            bind: non_blank("WORDBRIDGE_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            proxy_endpoint,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind, "127.0.0.1:3000");
        assert_eq!(config.proxy_endpoint, "/corsproxy/");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(|key| match key {
            "WORDBRIDGE_BIND" => Some("0.0.0.0:8080".to_string()),
            "WORDBRIDGE_PROXY_ENDPOINT" => Some(" passthrough/ ".to_string()),
            _ => None,
        });
        assert_eq!(config.bind, "0.0.0.0:8080");
        assert_eq!(config.proxy_endpoint, "/passthrough/");
    }
}
