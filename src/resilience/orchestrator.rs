use crate::client::AzureOpenAIConfig;
use crate::errors::{FineTuneError, FineTuneResult, ServerError};
use rand::Rng;
use std::future::Future;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ResilienceConfig {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub jitter: bool,
    pub circuit_breaker_enabled: bool,
    pub circuit_breaker_threshold: u32,
    pub circuit_breaker_timeout: Duration,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            jitter: true,
            circuit_breaker_enabled: true,
            circuit_breaker_threshold: 5,
            circuit_breaker_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

pub struct CircuitBreaker {
    state: RwLock<CircuitState>,
    failure_count: AtomicU32,
    last_failure_time: AtomicU64,
    threshold: u32,
    timeout: Duration,
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

impl CircuitBreaker {
    pub fn new(threshold: u32, timeout: Duration) -> Self {
        Self {
            state: RwLock::new(CircuitState::Closed),
            failure_count: AtomicU32::new(0),
            last_failure_time: AtomicU64::new(0),
            threshold,
            timeout,
        }
    }

    pub async fn can_execute(&self) -> bool {
        let state = *self.state.read().await;
        match state {
            CircuitState::Closed | CircuitState::HalfOpen => true,
            CircuitState::Open => {
                let last_failure = self.last_failure_time.load(Ordering::SeqCst);
                if now_millis().saturating_sub(last_failure) > self.timeout.as_millis() as u64 {
                    *self.state.write().await = CircuitState::HalfOpen;
                    debug!("circuit breaker half-open");
                    true
                } else {
                    false
                }
            }
        }
    }

    pub async fn record_success(&self) {
        self.failure_count.store(0, Ordering::SeqCst);
        *self.state.write().await = CircuitState::Closed;
    }

    pub async fn record_failure(&self) {
        let count = self.failure_count.fetch_add(1, Ordering::SeqCst) + 1;
        self.last_failure_time.store(now_millis(), Ordering::SeqCst);

        if count >= self.threshold {
            let mut state = self.state.write().await;
            if *state != CircuitState::Open {
                warn!(failures = count, "circuit breaker opened");
            }
            *state = CircuitState::Open;
        }
    }

    pub async fn state(&self) -> CircuitState {
        *self.state.read().await
    }
}

/// Retries retryable failures with exponential backoff and guards the remote
/// service with a circuit breaker.
pub struct ResilienceOrchestrator {
    config: ResilienceConfig,
    circuit_breaker: Option<CircuitBreaker>,
}

impl ResilienceOrchestrator {
    pub fn new(config: ResilienceConfig) -> Self {
        let circuit_breaker = config.circuit_breaker_enabled.then(|| {
            CircuitBreaker::new(config.circuit_breaker_threshold, config.circuit_breaker_timeout)
        });

        Self {
            config,
            circuit_breaker,
        }
    }

    pub fn from_config(config: &AzureOpenAIConfig) -> Self {
        Self::new(ResilienceConfig {
            max_retries: config.max_retries,
            ..Default::default()
        })
    }

    /// No retries, no circuit breaker
    pub fn passthrough() -> Self {
        Self::new(ResilienceConfig {
            max_retries: 0,
            circuit_breaker_enabled: false,
            ..Default::default()
        })
    }

    /// Same retry policy, without a circuit breaker. Used where every call
    /// must be attempted regardless of earlier failures.
    pub fn without_circuit_breaker(&self) -> Self {
        Self::new(ResilienceConfig {
            circuit_breaker_enabled: false,
            ..self.config.clone()
        })
    }

    fn calculate_delay(&self, attempt: u32) -> Duration {
        let base_delay = self.config.initial_delay.as_millis() as f64
            * self.config.multiplier.powi(attempt as i32);

        let delay_ms = base_delay.min(self.config.max_delay.as_millis() as f64);

        let final_delay = if self.config.jitter {
            delay_ms + rand::thread_rng().gen_range(-0.25..=0.25) * delay_ms
        } else {
            delay_ms
        };

        Duration::from_millis(final_delay.max(0.0) as u64)
    }

    pub async fn execute<F, Fut, T>(&self, operation: F) -> FineTuneResult<T>
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = FineTuneResult<T>> + Send,
        T: Send,
    {
        if let Some(cb) = &self.circuit_breaker {
            if !cb.can_execute().await {
                return Err(FineTuneError::Server(ServerError::ServiceUnavailable(
                    "Circuit breaker is open".to_string(),
                )));
            }
        }

        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => {
                    if let Some(cb) = &self.circuit_breaker {
                        cb.record_success().await;
                    }
                    return Ok(result);
                }
                Err(e) => {
                    // only transient failures count toward opening the circuit
                    if e.is_retryable() {
                        if let Some(cb) = &self.circuit_breaker {
                            cb.record_failure().await;
                        }
                    }

                    if !e.is_retryable() || attempt >= self.config.max_retries {
                        return Err(e);
                    }

                    let delay = match &e {
                        FineTuneError::RateLimit(rate_err) => rate_err
                            .retry_after()
                            .map(Duration::from_secs)
                            .unwrap_or_else(|| self.calculate_delay(attempt)),
                        _ => self.calculate_delay(attempt),
                    };

                    warn!(
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying request"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
