use url::Url;

use crate::error::ConfigError;

/// Raw target inputs as read from CLI, environment, or config.
#[derive(Debug, Clone)]
pub struct TargetSettings {
    pub port: String,
    pub host: String,
    pub path: String,
    pub base_url: Option<String>,
}

/// Target URL resolved once at startup.
#[derive(Debug, Clone)]
pub struct Target {
    url: Url,
    port: String,
}

impl Target {
    /// Resolve `http://<host>:<port><path>`, or `<base_url><path>` when a
    /// base URL is given.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-numeric or zero port, an unparsable URL, or
    /// a scheme other than http/https.
    pub fn resolve(settings: &TargetSettings) -> Result<Self, ConfigError> {
        let (base, port) = match settings.base_url.as_deref() {
            Some(base) => {
                let base = parse_url(base)?;
                let port = base
                    .port_or_known_default()
                    .map(|port| port.to_string())
                    .unwrap_or_default();
                (base, port)
            }
            None => {
                let port = parse_port(&settings.port)?;
                let base = parse_url(&format!("http://{}:{}", settings.host, port))?;
                (base, port.to_string())
            }
        };

        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme {
                url: base.to_string(),
            });
        }

        let url = if settings.path.is_empty() {
            base
        } else {
            base.join(&settings.path)
                .map_err(|err| ConfigError::InvalidTargetUrl {
                    url: format!("{}{}", base, settings.path),
                    source: err,
                })?
        };

        Ok(Self { url, port })
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Port as shown in the first-iteration diagnostic.
    #[must_use]
    pub fn port(&self) -> &str {
        &self.port
    }
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    let port: u16 = value
        .trim()
        .parse()
        .map_err(|err| ConfigError::InvalidPort {
            value: value.to_owned(),
            source: err,
        })?;
    if port == 0 {
        return Err(ConfigError::PortZero);
    }
    Ok(port)
}

fn parse_url(value: &str) -> Result<Url, ConfigError> {
    Url::parse(value).map_err(|err| ConfigError::InvalidTargetUrl {
        url: value.to_owned(),
        source: err,
    })
}
