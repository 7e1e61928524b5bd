use dashmap::DashMap;
use recs_errors::AppError;
use std::sync::Arc;
use std::time::{Duration, Instant};

const MAX_REQUESTS_PER_MINUTE: u32 = 3;
const MAX_REQUESTS_PER_HOUR: u32 = 10;
const CLEANUP_INTERVAL_SECS: u64 = 300;

#[derive(Clone)]
struct RequestRecord {
    minute_count: u32,
    hour_count: u32,
    minute_start: Instant,
    hour_start: Instant,
}

impl RequestRecord {
    fn starting_at(now: Instant) -> Self {
        Self {
            minute_count: 0,
            hour_count: 0,
            minute_start: now,
            hour_start: now,
        }
    }
}

/// Fixed-window limiter for login link requests, keyed by email address.
#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<DashMap<String, RequestRecord>>,
    last_cleanup: Arc<std::sync::Mutex<Instant>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self {
            requests: Arc::new(DashMap::new()),
            last_cleanup: Arc::new(std::sync::Mutex::new(Instant::now())),
        }
    }

    pub fn check_rate_limit(&self, key: &str) -> Result<(), RateLimitError> {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> Result<(), RateLimitError> {
        self.maybe_cleanup(now);

        let mut record = self
            .requests
            .entry(key.to_lowercase())
            .or_insert_with(|| RequestRecord::starting_at(now));

        if now.duration_since(record.minute_start) >= Duration::from_secs(60) {
            record.minute_count = 0;
            record.minute_start = now;
        }

        if now.duration_since(record.hour_start) >= Duration::from_secs(3600) {
            record.hour_count = 0;
            record.hour_start = now;
        }

        if record.hour_count >= MAX_REQUESTS_PER_HOUR {
            let wait_secs = 3600 - now.duration_since(record.hour_start).as_secs();
            return Err(RateLimitError::TooManyRequestsPerHour(wait_secs));
        }

        if record.minute_count >= MAX_REQUESTS_PER_MINUTE {
            let wait_secs = 60 - now.duration_since(record.minute_start).as_secs();
            return Err(RateLimitError::TooManyRequestsPerMinute(wait_secs));
        }

        record.minute_count += 1;
        record.hour_count += 1;

        Ok(())
    }

    fn maybe_cleanup(&self, now: Instant) {
        let Ok(mut last_cleanup) = self.last_cleanup.lock() else {
            return;
        };
        if now.duration_since(*last_cleanup) > Duration::from_secs(CLEANUP_INTERVAL_SECS) {
            self.requests
                .retain(|_, v| now.duration_since(v.hour_start) < Duration::from_secs(3600));
            *last_cleanup = now;
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitError {
    #[error("Too many requests, wait {0} seconds")]
    TooManyRequestsPerMinute(u64),
    #[error("Hourly limit reached, wait {} minutes", .0 / 60)]
    TooManyRequestsPerHour(u64),
}

impl RateLimitError {
    pub fn retry_after_secs(&self) -> u64 {
        match self {
            Self::TooManyRequestsPerMinute(secs) | Self::TooManyRequestsPerHour(secs) => *secs,
        }
    }
}

impl From<RateLimitError> for AppError {
    fn from(err: RateLimitError) -> Self {
        AppError::RateLimited(err.retry_after_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_three_per_minute() {
        let limiter = RateLimiter::new();
        let now = Instant::now();
        for _ in 0..3 {
            assert!(limiter.check_at("ana@example.com", now).is_ok());
        }
        assert!(matches!(
            limiter.check_at("ana@example.com", now),
            Err(RateLimitError::TooManyRequestsPerMinute(_))
        ));
    }

    #[test]
    fn keys_are_independent_and_case_insensitive() {
        let limiter = RateLimiter::new();
        let now = Instant::now();
        for _ in 0..3 {
            limiter.check_at("ana@example.com", now).unwrap();
        }
        assert!(limiter.check_at("ANA@example.com", now).is_err());
        assert!(limiter.check_at("bo@example.com", now).is_ok());
    }

    #[test]
    fn hourly_cap_applies_across_minutes() {
        let limiter = RateLimiter::new();
        let start = Instant::now();
        for i in 0..10u64 {
            let at = start + Duration::from_secs(61 * (i / 3));
            limiter.check_at("ana@example.com", at).unwrap();
        }
        let later = start + Duration::from_secs(61 * 4);
        assert!(matches!(
            limiter.check_at("ana@example.com", later),
            Err(RateLimitError::TooManyRequestsPerHour(_))
        ));
    }

    #[test]
    fn converts_into_app_error() {
        let err: AppError = RateLimitError::TooManyRequestsPerMinute(42).into();
        assert_eq!(err, AppError::RateLimited(42));
    }
}
