//! HTTP delivery of batched text to chat recipients
//!
//! The [`ChatTransport`] trait is the seam between the batching sink and
//! the network, so tests can swap in an in-memory transport.

use crate::core::{LoggerError, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bot API prefix; a bare token expands to `<prefix><token>/sendMessage`
pub const TELEGRAM_API_PREFIX: &str = "https://api.telegram.org/bot";

/// Upper bound for a single request, keeping a hung endpoint from stalling
/// writers forever
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const COMPONENT: &str = "TelegramSink";

/// JSON body posted once per recipient and flush cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
}

/// Delivers one message to one recipient
pub trait ChatTransport: Send + Sync {
    fn send(&self, message: &ChatMessage<'_>) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyKind {
    /// HTTP(S) proxy; certificate verification is disabled on this route
    Http,
    Socks5,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    pub kind: ProxyKind,
    pub url: String,
}

/// Where batches go and which route they take
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub url: String,
    pub proxy: Option<ProxySettings>,
}

impl Endpoint {
    /// Parse a connection string.
    ///
    /// Accepted forms:
    /// - `https://api.telegram.org/bot<token>/sendMessage`, used verbatim
    /// - `<token>`, expanded to the sendMessage URL
    /// - `<token>|<scheme>://user:password@host:port`, where the scheme is
    ///   `http`, `https` or `socks5`
    pub fn parse(connection: &str) -> Result<Self> {
        if connection.is_empty() {
            return Err(LoggerError::config(COMPONENT, "Empty telegram connection string"));
        }

        let parts: Vec<&str> = connection.split('|').collect();
        match parts.as_slice() {
            [single] => {
                let url = if single.starts_with(TELEGRAM_API_PREFIX) {
                    (*single).to_string()
                } else {
                    send_message_url(single)
                };
                Ok(Self { url, proxy: None })
            }
            [token, proxy] => Ok(Self {
                url: send_message_url(token),
                proxy: Some(ProxySettings::parse(proxy)?),
            }),
            _ => Err(LoggerError::config(COMPONENT, "Invalid connection string format")),
        }
    }
}

fn send_message_url(token: &str) -> String {
    format!("{}{}/sendMessage", TELEGRAM_API_PREFIX, token)
}

impl ProxySettings {
    pub fn parse(uri: &str) -> Result<Self> {
        let url = Url::parse(uri).map_err(|e| {
            LoggerError::config(COMPONENT, format!("Invalid proxy URL '{}': {}", uri, e))
        })?;

        let kind = match url.scheme() {
            scheme if scheme.starts_with("http") => ProxyKind::Http,
            "socks5" => ProxyKind::Socks5,
            _ => return Err(LoggerError::config(COMPONENT, "Invalid proxy scheme")),
        };

        Ok(Self {
            kind,
            url: url.to_string(),
        })
    }
}

/// Reply envelope of the Bot API
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error_code: Option<i32>,
    #[serde(default)]
    description: Option<String>,
}

impl ApiResponse {
    fn summary(&self) -> String {
        match (self.error_code, self.description.as_deref()) {
            (Some(code), Some(desc)) => format!("{} {}", code, desc),
            (Some(code), None) => code.to_string(),
            (None, Some(desc)) => desc.to_string(),
            (None, None) => format!("ok={}", self.ok),
        }
    }
}

/// Decide whether a reply counts as delivered.
///
/// A 200 is a success unless its body is an API envelope with `"ok": false`.
/// Any other status is a failure described by the decoded envelope, the raw
/// body, or the headers when the body is empty.
pub fn check_response(chat_id: &str, status: u16, headers: &str, body: &str) -> Result<()> {
    if status == 200 {
        return match serde_json::from_str::<ApiResponse>(body) {
            Ok(reply) if !reply.ok => Err(LoggerError::delivery(chat_id, reply.summary())),
            _ => Ok(()),
        };
    }

    let detail = if body.trim().is_empty() {
        headers.to_string()
    } else {
        match serde_json::from_str::<ApiResponse>(body) {
            Ok(reply) => reply.summary(),
            Err(_) => body.to_string(),
        }
    };

    Err(LoggerError::delivery(chat_id, format!("HTTP {}: {}", status, detail)))
}

/// Blocking reqwest transport posting JSON to the endpoint URL
pub struct HttpTransport {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(endpoint: &Endpoint) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder().timeout(REQUEST_TIMEOUT);

        // Only the connection string picks the route; environment proxies
        // are ignored.
        builder = match &endpoint.proxy {
            Some(proxy) => {
                let route = reqwest::Proxy::all(proxy.url.as_str())?;
                builder
                    .proxy(route)
                    .danger_accept_invalid_certs(proxy.kind == ProxyKind::Http)
            }
            None => builder.no_proxy(),
        };

        let client = builder.build().map_err(|e| {
            LoggerError::config(COMPONENT, format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            url: endpoint.url.clone(),
        })
    }
}

impl ChatTransport for HttpTransport {
    fn send(&self, message: &ChatMessage<'_>) -> Result<()> {
        let response = self.client.post(&self.url).json(message).send()?;

        let status = response.status().as_u16();
        let headers = format!("{:?}", response.headers());
        let body = response.text()?;

        check_response(message.chat_id, status, &headers, &body)
    }
}
