//! Environment selection and service base-URL resolution.

use url::Url;

use crate::Error;

/// Which deployment of the platform to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl Environment {
    fn auth_default(self) -> &'static str {
        match self {
            Self::Production => "https://auth.whooktown.io",
            Self::Development => "https://auth.dev.whooktown.io",
        }
    }

    fn sensor_default(self) -> &'static str {
        match self {
            Self::Production => "https://sensor.whooktown.io",
            Self::Development => "https://sensor.dev.whooktown.io",
        }
    }
}

/// Resolved base URLs for the two platform services.
///
/// Layouts and popup labels live on the sensor service.
#[derive(Debug, Clone)]
pub struct ServiceUrls {
    pub auth: Url,
    pub sensor: Url,
}

impl ServiceUrls {
    /// Default URLs for an environment.
    pub fn for_environment(env: Environment) -> Self {
        Self {
            auth: Url::parse(env.auth_default()).expect("default auth URL is valid"),
            sensor: Url::parse(env.sensor_default()).expect("default sensor URL is valid"),
        }
    }

    /// Default URLs with individual overrides applied.
    ///
    /// Only explicitly provided overrides replace a default; the other
    /// service keeps its environment URL.
    pub fn resolve(
        env: Environment,
        auth_override: Option<&str>,
        sensor_override: Option<&str>,
    ) -> Result<Self, Error> {
        let mut urls = Self::for_environment(env);
        if let Some(auth) = auth_override {
            urls.auth = Url::parse(auth)?;
        }
        if let Some(sensor) = sensor_override {
            urls.sensor = Url::parse(sensor)?;
        }
        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_differ_per_environment() {
        let prod = ServiceUrls::for_environment(Environment::Production);
        let dev = ServiceUrls::for_environment(Environment::Development);
        assert_ne!(prod.auth, dev.auth);
        assert_ne!(prod.sensor, dev.sensor);
    }

    #[test]
    fn resolve_overrides_only_what_is_set() {
        let urls = ServiceUrls::resolve(
            Environment::Production,
            Some("http://localhost:9000"),
            None,
        )
        .unwrap();
        assert_eq!(urls.auth.as_str(), "http://localhost:9000/");
        assert_eq!(
            urls.sensor,
            ServiceUrls::for_environment(Environment::Production).sensor
        );
    }

    #[test]
    fn resolve_rejects_invalid_override() {
        let result = ServiceUrls::resolve(Environment::Production, Some("not a url"), None);
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
