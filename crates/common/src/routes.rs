//! Route table and response policies
//!
//! The table is fixed at compile time. The web crate wires each
//! [`Endpoint`] to a handler; the banner and tests walk the same table.

use std::fmt;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// `Cache-Control` directive attached to a successful response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDirective {
    Public { max_age_secs: u32 },
    Private { max_age_secs: u32 },
    NoCache,
    NoStore,
}

impl fmt::Display for CacheDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheDirective::Public { max_age_secs } => write!(f, "public, max-age={}", max_age_secs),
            CacheDirective::Private { max_age_secs } => {
                write!(f, "private, max-age={}", max_age_secs)
            }
            CacheDirective::NoCache => write!(f, "no-cache"),
            CacheDirective::NoStore => write!(f, "no-store"),
        }
    }
}

/// How a route decides its response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsePolicy {
    /// Always 200 with the fixed payload
    Static,
    /// 200 after [`Simulation::analytics_delay`]
    Delayed,
    /// 500 with probability [`Simulation::orders_failure_rate`], else 200
    Unreliable,
    /// Always 404
    Removed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    UsersV1,
    Products,
    UsersV2,
    Analytics,
    Orders,
    LegacyEndpoint,
    Health,
}

#[derive(Debug, Clone, Copy)]
pub struct RouteSpec {
    pub endpoint: Endpoint,
    pub path: &'static str,
    pub cache: Option<CacheDirective>,
    pub policy: ResponsePolicy,
    pub summary: &'static str,
}

pub const DEFAULT_ANALYTICS_DELAY_MS: u64 = 2500;
pub const DEFAULT_ORDERS_FAILURE_RATE: f64 = 0.3;

pub static ROUTES: &[RouteSpec] = &[
    RouteSpec {
        endpoint: Endpoint::UsersV1,
        path: "/api/v1/users",
        cache: Some(CacheDirective::Public { max_age_secs: 300 }),
        policy: ResponsePolicy::Static,
        summary: "User list (good caching)",
    },
    RouteSpec {
        endpoint: Endpoint::Products,
        path: "/api/v1/products",
        cache: Some(CacheDirective::Public { max_age_secs: 3600 }),
        policy: ResponsePolicy::Static,
        summary: "Products (excellent caching)",
    },
    RouteSpec {
        endpoint: Endpoint::UsersV2,
        path: "/api/v2/users",
        cache: Some(CacheDirective::NoCache),
        policy: ResponsePolicy::Static,
        summary: "Users V2 (breaking changes)",
    },
    RouteSpec {
        endpoint: Endpoint::Analytics,
        path: "/api/v1/analytics",
        cache: Some(CacheDirective::NoStore),
        policy: ResponsePolicy::Delayed,
        summary: "Slow endpoint",
    },
    RouteSpec {
        endpoint: Endpoint::Orders,
        path: "/api/v1/orders",
        cache: Some(CacheDirective::Private { max_age_secs: 60 }),
        policy: ResponsePolicy::Unreliable,
        summary: "Unreliable",
    },
    RouteSpec {
        endpoint: Endpoint::LegacyEndpoint,
        path: "/api/v1/legacy-endpoint",
        cache: None,
        policy: ResponsePolicy::Removed,
        summary: "Removed in a breaking release",
    },
    RouteSpec {
        endpoint: Endpoint::Health,
        path: "/health",
        cache: None,
        policy: ResponsePolicy::Static,
        summary: "Health check",
    },
];

/// Look up the table entry for an endpoint
pub fn route(endpoint: Endpoint) -> &'static RouteSpec {
    ROUTES
        .iter()
        .find(|r| r.endpoint == endpoint)
        .unwrap_or_else(|| unreachable!("every endpoint has a route entry"))
}

/// Timing and failure knobs for the delayed and unreliable routes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Simulation {
    pub analytics_delay_ms: u64,
    pub orders_failure_rate: f64,
}

impl Default for Simulation {
    fn default() -> Self {
        Self {
            analytics_delay_ms: DEFAULT_ANALYTICS_DELAY_MS,
            orders_failure_rate: DEFAULT_ORDERS_FAILURE_RATE,
        }
    }
}

impl Simulation {
    pub fn analytics_delay(&self) -> Duration {
        Duration::from_millis(self.analytics_delay_ms)
    }

    /// Run one independent trial for the unreliable route
    pub fn draw_outcome(&self) -> Outcome {
        let draw: f64 = rand::thread_rng().gen();
        decide(draw, self.orders_failure_rate)
    }
}

/// Result of the per-request trial on the unreliable route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// `draw` is uniform in [0, 1).
pub fn decide(draw: f64, failure_rate: f64) -> Outcome {
    if draw < failure_rate {
        Outcome::Failure
    } else {
        Outcome::Success
    }
}

/// Human-readable route listing printed at startup
pub fn render_banner(base_url: &str, sim: &Simulation) -> String {
    let rule = "=".repeat(60);
    let mut out = String::new();

    out.push('\n');
    out.push_str(&rule);
    out.push_str(&format!("\nDemo API Server running on {}\n", base_url));
    out.push_str(&rule);
    out.push_str("\n\nAvailable Endpoints:\n\n");

    for r in ROUTES {
        let (mark, note) = match r.policy {
            ResponsePolicy::Static => ("ok", String::new()),
            ResponsePolicy::Delayed => ("!!", format!(" (~{}ms)", sim.analytics_delay_ms)),
            ResponsePolicy::Unreliable => (
                "xx",
                format!(" ({:.0}% fail rate)", sim.orders_failure_rate * 100.0),
            ),
            ResponsePolicy::Removed => ("--", " (404)".to_string()),
        };
        out.push_str(&format!(
            "  [{}] GET {:<24} - {}{}\n",
            mark, r.path, r.summary, note
        ));
    }
    out.push_str(&format!("  [ok] GET {:<24} - Demo web page\n", "/"));

    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_directive_header_values() {
        assert_eq!(
            route(Endpoint::UsersV1).cache.unwrap().to_string(),
            "public, max-age=300"
        );
        assert_eq!(
            route(Endpoint::Products).cache.unwrap().to_string(),
            "public, max-age=3600"
        );
        assert_eq!(route(Endpoint::UsersV2).cache.unwrap().to_string(), "no-cache");
        assert_eq!(route(Endpoint::Analytics).cache.unwrap().to_string(), "no-store");
        assert_eq!(
            route(Endpoint::Orders).cache.unwrap().to_string(),
            "private, max-age=60"
        );
        assert!(route(Endpoint::Health).cache.is_none());
    }

    #[test]
    fn test_every_endpoint_listed_once() {
        let all = [
            Endpoint::UsersV1,
            Endpoint::Products,
            Endpoint::UsersV2,
            Endpoint::Analytics,
            Endpoint::Orders,
            Endpoint::LegacyEndpoint,
            Endpoint::Health,
        ];
        for e in all {
            assert_eq!(ROUTES.iter().filter(|r| r.endpoint == e).count(), 1);
        }
        assert_eq!(ROUTES.len(), all.len());
    }

    #[test]
    fn test_decide_threshold() {
        assert_eq!(decide(0.0, 0.3), Outcome::Failure);
        assert_eq!(decide(0.2999, 0.3), Outcome::Failure);
        assert_eq!(decide(0.3, 0.3), Outcome::Success);
        assert_eq!(decide(0.9999, 0.3), Outcome::Success);
    }

    #[test]
    fn test_decide_extreme_rates() {
        assert_eq!(decide(0.0, 0.0), Outcome::Success);
        assert_eq!(decide(0.9999, 1.0), Outcome::Failure);
    }

    #[test]
    fn test_draw_outcome_rate() {
        let sim = Simulation::default();
        let failures = (0..10_000)
            .filter(|_| sim.draw_outcome() == Outcome::Failure)
            .count();
        // 0.3 +/- ~7 standard deviations
        assert!((2700..=3300).contains(&failures), "failures = {}", failures);
    }

    #[test]
    fn test_banner_lists_routes() {
        let banner = render_banner("http://localhost:3000", &Simulation::default());
        for r in ROUTES {
            assert!(banner.contains(r.path), "missing {}", r.path);
        }
        assert!(banner.contains("http://localhost:3000"));
        assert!(banner.contains("~2500ms"));
        assert!(banner.contains("30% fail rate"));
    }
}
