use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    str::FromStr,
    time::Duration,
};

pub const DEFAULT_MODEL_ID: &str = "@cf/stabilityai/stable-diffusion-xl-base-1.0";
pub const DEFAULT_API_BASE: &str = "https://api.cloudflare.com/client/v4";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Cloudflare,
    Mock,
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "cloudflare" => Ok(ProviderKind::Cloudflare),
            "mock" => Ok(ProviderKind::Mock),
            other => anyhow::bail!("unknown INFERENCE_PROVIDER: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub model_id: String,
    pub provider: ProviderKind,
    pub account_id: Option<String>,
    pub api_token: Option<String>,
    pub api_base: String,
    pub request_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            provider: ProviderKind::Cloudflare,
            account_id: None,
            api_token: None,
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let listen_addr = parse_listen_addr(env::var("SERVER_ADDR").ok().as_deref());

        let model_id = env::var("MODEL_ID").unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string());
        let provider = env::var("INFERENCE_PROVIDER")
            .unwrap_or_else(|_| "cloudflare".into())
            .parse()?;

        let account_id = non_empty(env::var("CLOUDFLARE_ACCOUNT_ID").ok());
        let api_token = non_empty(env::var("CLOUDFLARE_API_TOKEN").ok());
        let api_base =
            env::var("CLOUDFLARE_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let request_timeout = env::var("PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs);

        Ok(Self {
            listen_addr,
            model_id,
            provider,
            account_id,
            api_token,
            api_base,
            request_timeout,
        })
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8080)
}

fn parse_listen_addr(raw: Option<&str>) -> SocketAddr {
    raw.and_then(|v| v.parse().ok())
        .unwrap_or_else(default_listen_addr)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_addr_falls_back_on_garbage() {
        assert_eq!(parse_listen_addr(None), default_listen_addr());
        assert_eq!(parse_listen_addr(Some("not-an-addr")), default_listen_addr());
        assert_eq!(
            parse_listen_addr(Some("0.0.0.0:3000")),
            "0.0.0.0:3000".parse::<SocketAddr>().unwrap()
        );
    }

    #[test]
    fn provider_kind_parses_case_insensitively() {
        assert_eq!("Mock".parse::<ProviderKind>().unwrap(), ProviderKind::Mock);
        assert_eq!(
            " cloudflare ".parse::<ProviderKind>().unwrap(),
            ProviderKind::Cloudflare
        );
        assert!("openai".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn blank_credentials_count_as_missing() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some("abc".into())), Some("abc".into()));
    }
}
