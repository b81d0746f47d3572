//! HTTP probes against a running mock API

use std::sync::Arc;
use std::time::{Duration, Instant};

use mockapi_common::catalog::DB_TIMEOUT_CODE;
use mockapi_common::ApiError;
use reqwest::header::CACHE_CONTROL;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use crate::error::E2eResult;

/// Thin client bound to one server's base URL
#[derive(Clone)]
pub struct ApiProbe {
    client: reqwest::Client,
    base_url: String,
}

impl ApiProbe {
    pub fn new(base_url: impl Into<String>) -> E2eResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str) -> E2eResult<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    /// GET with an `Origin` header, as a browser on another port would send
    pub async fn get_cross_origin(&self, path: &str, origin: &str) -> E2eResult<Response> {
        Ok(self
            .client
            .get(self.url(path))
            .header(reqwest::header::ORIGIN, origin)
            .send()
            .await?)
    }

    /// GET and decode the body as `T`, whatever the status
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> E2eResult<(StatusCode, T)> {
        let resp = self.get(path).await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        Ok((status, serde_json::from_slice(&bytes)?))
    }

    /// GET and measure the time until the full body has arrived
    pub async fn timed_get(&self, path: &str) -> E2eResult<TimedResponse> {
        let start = Instant::now();
        let resp = self.get(path).await?;
        let status = resp.status();
        let body = resp.bytes().await?.to_vec();
        Ok(TimedResponse {
            elapsed: start.elapsed(),
            status,
            body,
        })
    }

    /// Issue `total` requests to the orders route, at most `concurrency` at a time
    pub async fn sample_orders(&self, total: usize, concurrency: usize) -> E2eResult<OrdersSample> {
        let permits = Arc::new(Semaphore::new(concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for _ in 0..total {
            let probe = self.clone();
            let permits = permits.clone();
            tasks.spawn(async move {
                let _permit = permits.acquire_owned().await;
                probe.classify_order().await
            });
        }

        let mut sample = OrdersSample::default();
        while let Some(joined) = tasks.join_next().await {
            sample.record(joined??);
        }
        debug!(?sample, "orders sample complete");
        Ok(sample)
    }

    async fn classify_order(&self) -> E2eResult<OrderObservation> {
        let resp = self.get("/api/v1/orders").await?;
        let status = resp.status();
        let cache = resp
            .headers()
            .get(CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            let body: ApiError = resp.json().await?;
            Ok(OrderObservation::Failure {
                db_timeout: body.code == DB_TIMEOUT_CODE,
                cache,
            })
        } else {
            Ok(OrderObservation::Success { status, cache })
        }
    }
}

#[derive(Debug)]
pub struct TimedResponse {
    pub elapsed: Duration,
    pub status: StatusCode,
    pub body: Vec<u8>,
}

#[derive(Debug)]
enum OrderObservation {
    Success {
        status: StatusCode,
        cache: Option<String>,
    },
    Failure {
        db_timeout: bool,
        cache: Option<String>,
    },
}

/// Tally of observed orders outcomes
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OrdersSample {
    pub successes: usize,
    pub failures: usize,
    /// Successes that were not exactly 200 with `private, max-age=60`
    pub malformed_successes: usize,
    /// Failures without `DB_TIMEOUT`, or carrying a cache header
    pub malformed_failures: usize,
}

impl OrdersSample {
    pub fn total(&self) -> usize {
        self.successes + self.failures
    }

    pub fn failure_rate(&self) -> f64 {
        if self.total() == 0 {
            return 0.0;
        }
        self.failures as f64 / self.total() as f64
    }

    fn record(&mut self, obs: OrderObservation) {
        match obs {
            OrderObservation::Success { status, cache } => {
                self.successes += 1;
                if status != StatusCode::OK || cache.as_deref() != Some("private, max-age=60") {
                    self.malformed_successes += 1;
                }
            }
            OrderObservation::Failure { db_timeout, cache } => {
                self.failures += 1;
                if !db_timeout || cache.is_some() {
                    self.malformed_failures += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sample_rate() {
        assert_eq!(OrdersSample::default().failure_rate(), 0.0);
    }

    #[test]
    fn test_record_flags_malformed() {
        let mut sample = OrdersSample::default();
        sample.record(OrderObservation::Success {
            status: StatusCode::OK,
            cache: Some("private, max-age=60".to_string()),
        });
        sample.record(OrderObservation::Success {
            status: StatusCode::OK,
            cache: None,
        });
        sample.record(OrderObservation::Failure {
            db_timeout: true,
            cache: None,
        });
        sample.record(OrderObservation::Failure {
            db_timeout: false,
            cache: None,
        });

        assert_eq!(sample.total(), 4);
        assert_eq!(sample.failure_rate(), 0.5);
        assert_eq!(sample.malformed_successes, 1);
        assert_eq!(sample.malformed_failures, 1);
    }
}
