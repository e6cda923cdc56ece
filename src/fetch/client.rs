// src/fetch/client.rs

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, REFERER};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use super::payload::{PageRequest, RowsPayload};
use super::PageSource;
use crate::config::{Encoding, ReportConfig};
use crate::error::{Result, ScrapeError};

const ACCEPT_JSON: &str = "application/json, text/javascript, */*; q=0.01";
const SEC_CH_UA: &str = r#""Not.A/Brand";v="8", "Chromium";v="114", "Google Chrome";v="114""#;

/// Supplies the CSRF token placed in the envelope.
pub trait SessionTokens: Send + Sync {
    fn csrf_token(&self) -> Option<String>;
}

/// Sends the token field empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSession;

impl SessionTokens for NoSession {
    fn csrf_token(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl SessionTokens for StaticToken {
    fn csrf_token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Blocking client for one report on the reporting endpoint.
pub struct ReportClient {
    http: Client,
    endpoint: Url,
    report_id: String,
    count_type: String,
    encoding: Encoding,
    tokens: Box<dyn SessionTokens>,
}

impl ReportClient {
    pub fn new(cfg: &ReportConfig) -> Result<Self> {
        let tokens: Box<dyn SessionTokens> = match &cfg.csrf_token {
            Some(t) => Box::new(StaticToken(t.clone())),
            None => Box::new(NoSession),
        };
        Self::with_tokens(cfg, tokens)
    }

    pub fn with_tokens(cfg: &ReportConfig, tokens: Box<dyn SessionTokens>) -> Result<Self> {
        cfg.validate()?;
        let endpoint = Url::parse(&cfg.endpoint)
            .map_err(|e| ScrapeError::Config(format!("endpoint {:?}: {}", cfg.endpoint, e)))?;

        // No timeout unless one is configured.
        let http = Client::builder()
            .user_agent(cfg.user_agent.as_str())
            .default_headers(browser_headers(&cfg.referer)?)
            .timeout(cfg.timeout_secs.map(Duration::from_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            report_id: cfg.report_id.clone(),
            count_type: cfg.count_type.clone(),
            encoding: cfg.encoding,
            tokens,
        })
    }

}

fn browser_headers(referer: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert("sec-ch-ua", HeaderValue::from_static(SEC_CH_UA));
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
    headers.insert("sec-ch-ua-platform", HeaderValue::from_static("\"Linux\""));
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_JSON));
    headers.insert("x-requested-with", HeaderValue::from_static("XMLHttpRequest"));
    let referer = HeaderValue::from_str(referer)
        .map_err(|e| ScrapeError::Config(format!("referer {:?}: {}", referer, e)))?;
    headers.insert(REFERER, referer);
    Ok(headers)
}

impl PageSource for ReportClient {
    #[instrument(level = "debug", skip(self), fields(report = %self.report_id))]
    fn fetch(&self, page: u32) -> Result<RowsPayload> {
        let request = PageRequest::new(
            &self.report_id,
            self.tokens.csrf_token(),
            page,
            &self.count_type,
        );

        let builder = self.http.post(self.endpoint.clone());
        let builder = match self.encoding {
            Encoding::Json => builder.json(&request),
            Encoding::Form => builder.form(&request.form_pairs()),
        };

        let resp = builder.send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                page,
                status: status.as_u16(),
            });
        }

        let body = resp.text()?;
        let payload = RowsPayload::from_json(page, &body)?;
        debug!(page, rows = payload.rows.len(), "decoded page");
        Ok(payload)
    }
}

#[cfg(test)]
pub(crate) mod stub {
    //! Loopback HTTP listener that answers each connection with a canned
    //! response and records the raw request it saw.

    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};
    use std::thread;

    pub struct StubServer {
        pub url: String,
        pub requests: Arc<Mutex<Vec<String>>>,
        handle: Option<thread::JoinHandle<()>>,
    }

    impl StubServer {
        /// Serve `responses` in order, one per connection, then stop. A
        /// status of `0` hangs up after reading the request.
        pub fn start(responses: Vec<(u16, String)>) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            let url = format!("http://{}/providers/get-report-data/", listener.local_addr().unwrap());
            let requests = Arc::new(Mutex::new(Vec::new()));
            let seen = Arc::clone(&requests);

            let handle = thread::spawn(move || {
                for (status, body) in responses {
                    let (stream, _) = match listener.accept() {
                        Ok(s) => s,
                        Err(_) => return,
                    };
                    let mut reader = BufReader::new(stream);
                    let mut head = String::new();
                    let mut content_length = 0usize;
                    loop {
                        let mut line = String::new();
                        if reader.read_line(&mut line).unwrap_or(0) == 0 {
                            break;
                        }
                        if let Some((name, value)) = line.split_once(':') {
                            if name.trim().eq_ignore_ascii_case("content-length") {
                                content_length = value.trim().parse().unwrap_or(0);
                            }
                        }
                        head.push_str(&line);
                        if line == "\r\n" {
                            break;
                        }
                    }
                    let mut req_body = vec![0u8; content_length];
                    let _ = reader.read_exact(&mut req_body);
                    head.push_str(&String::from_utf8_lossy(&req_body));
                    seen.lock().unwrap().push(head);

                    if status == 0 {
                        continue;
                    }
                    let reply = format!(
                        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let mut stream = reader.into_inner();
                    let _ = stream.write_all(reply.as_bytes());
                    let _ = stream.flush();
                }
            });

            Self {
                url,
                requests,
                handle: Some(handle),
            }
        }

        pub fn join(mut self) -> Vec<String> {
            if let Some(h) = self.handle.take() {
                let _ = h.join();
            }
            self.requests.lock().unwrap().clone()
        }
    }
}
