use std::error::Error as StdError;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::trace;

use super::types::ProbeResult;

/// Performs a single reachability check.
///
/// Implementations never fail: every failure mode is folded into the returned
/// [`ProbeResult`]. Retrying is left to the scheduler's interval.
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str, timeout: Duration) -> ProbeResult;
}

/// HTTP/HTTPS prober issuing a plain GET
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Prober for HttpProber {
    async fn probe(&self, url: &str, timeout: Duration) -> ProbeResult {
        let start = Instant::now();

        let outcome = self.client.get(url).timeout(timeout).send().await;
        let latency = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(response) => {
                trace!(%url, status = response.status().as_u16(), latency, "probe answered");
                ProbeResult::from_status(response.status().as_u16(), latency)
            }
            Err(e) => ProbeResult::failure(describe_failure(&e, timeout), latency),
        }
    }
}

fn describe_failure(error: &reqwest::Error, timeout: Duration) -> String {
    if error.is_timeout() {
        format!("timeout of {}ms exceeded", timeout.as_millis())
    } else if error.is_connect() {
        format!("connection failed: {}", cause_chain(error))
    } else {
        format!("request failed: {}", cause_chain(error))
    }
}

/// Joins the messages of an error's sources.
///
/// reqwest's own message only names the URL, the useful part (refused, dns,
/// certificate) lives further down the chain.
fn cause_chain(error: &(dyn StdError + 'static)) -> String {
    let mut causes: Vec<String> = Vec::new();
    let mut source = error.source();

    while let Some(cause) = source {
        let message = cause.to_string();
        if causes.last() != Some(&message) {
            causes.push(message);
        }
        source = cause.source();
    }

    if causes.is_empty() { error.to_string() } else { causes.join(": ") }
}
