use std::{env, net::SocketAddr, path::PathBuf, str::FromStr};

pub const DEFAULT_POINTS_PATH: &str = "backend/data/parking_points.json";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const KAKAO_BASE_URL: &str = "https://dapi.kakao.com";
pub const NAVER_BASE_URL: &str = "https://naveropenapi.apigw.ntruss.com";
pub const GOOGLE_BASE_URL: &str = "https://maps.googleapis.com";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has invalid value {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct KakaoConfig {
    pub base_url: String,
    pub rest_api_key: String,
}

#[derive(Debug, Clone)]
pub struct NaverConfig {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub base_url: String,
    pub api_key: String,
}

/// Server settings, read from the environment with local defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub points_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub http_timeout_secs: u64,
    pub session_capacity: usize,
    pub kakao: KakaoConfig,
    pub naver: NaverConfig,
    pub google: GoogleConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            points_path: PathBuf::from(DEFAULT_POINTS_PATH),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            http_timeout_secs: 10,
            session_capacity: 1024,
            kakao: KakaoConfig {
                base_url: KAKAO_BASE_URL.to_string(),
                rest_api_key: String::new(),
            },
            naver: NaverConfig {
                base_url: NAVER_BASE_URL.to_string(),
                client_id: String::new(),
                client_secret: String::new(),
            },
            google: GoogleConfig {
                base_url: GOOGLE_BASE_URL.to_string(),
                api_key: String::new(),
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source. Missing API keys
    /// are left empty; the upstream calls that need them fail at request time.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let string_or = |name: &str, default: String| lookup(name).unwrap_or(default);

        Ok(Self {
            points_path: lookup("POINTS_JSON")
                .map(PathBuf::from)
                .unwrap_or(defaults.points_path),
            bind_addr: parse_var(&lookup, "BIND_ADDR", defaults.bind_addr)?,
            http_timeout_secs: parse_var(&lookup, "HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
            session_capacity: parse_var(&lookup, "SESSION_CAPACITY", defaults.session_capacity)?
                .max(1),
            kakao: KakaoConfig {
                base_url: string_or("KAKAO_BASE_URL", defaults.kakao.base_url),
                rest_api_key: string_or("KAKAO_REST_API_KEY", String::new()),
            },
            naver: NaverConfig {
                base_url: string_or("NAVER_BASE_URL", defaults.naver.base_url),
                client_id: string_or("NAVER_CLIENT_ID", String::new()),
                client_secret: string_or("NAVER_CLIENT_SECRET", String::new()),
            },
            google: GoogleConfig {
                base_url: string_or("GOOGLE_BASE_URL", defaults.google.base_url),
                api_key: string_or("GOOGLE_MAP_API_KEY", String::new()),
            },
        })
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.points_path, PathBuf::from(DEFAULT_POINTS_PATH));
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.google.base_url, GOOGLE_BASE_URL);
        assert!(config.kakao.rest_api_key.is_empty());
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("POINTS_JSON", "/tmp/points.json"),
            ("BIND_ADDR", "127.0.0.1:3000"),
            ("SESSION_CAPACITY", "16"),
            ("KAKAO_REST_API_KEY", "kakao-key"),
            ("GOOGLE_BASE_URL", "http://localhost:9999"),
        ]))
        .unwrap();

        assert_eq!(config.points_path, PathBuf::from("/tmp/points.json"));
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.session_capacity, 16);
        assert_eq!(config.kakao.rest_api_key, "kakao-key");
        assert_eq!(config.google.base_url, "http://localhost:9999");
    }

    #[test]
    fn rejects_unparseable_numbers() {
        let err = AppConfig::from_lookup(lookup_from(&[("HTTP_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("HTTP_TIMEOUT_SECS"));
    }

    #[test]
    fn session_capacity_is_at_least_one() {
        let config = AppConfig::from_lookup(lookup_from(&[("SESSION_CAPACITY", "0")])).unwrap();
        assert_eq!(config.session_capacity, 1);
    }
}
