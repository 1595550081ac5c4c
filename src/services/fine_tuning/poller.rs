use crate::errors::{ConfigurationError, FineTuneError, FineTuneResult};
use crate::services::fine_tuning::{FineTuningJob, FineTuningJobStatus, FineTuningService};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Controls how often and for how long a job is polled.
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    /// Growth factor applied to the interval after each sleep; `1.0` keeps it fixed.
    pub multiplier: f64,
    pub max_interval: Duration,
    /// Adds up to ±10% random jitter to each sleep.
    pub jitter: bool,
    pub max_wait: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            multiplier: 1.0,
            max_interval: Duration::from_secs(300),
            jitter: false,
            max_wait: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl PollConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    pub fn with_max_interval(mut self, max_interval: Duration) -> Self {
        self.max_interval = max_interval;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn validate(&self) -> FineTuneResult<()> {
        if self.interval.is_zero() {
            return Err(ConfigurationError::InvalidPollConfig(
                "poll interval must be greater than zero".to_string(),
            )
            .into());
        }
        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err(ConfigurationError::InvalidPollConfig(format!(
                "multiplier must be at least 1.0, got {}",
                self.multiplier
            ))
            .into());
        }
        if self.max_interval < self.interval {
            return Err(ConfigurationError::InvalidPollConfig(
                "max interval must not be shorter than the interval".to_string(),
            )
            .into());
        }
        Ok(())
    }

    pub(crate) fn next_interval(&self, current: Duration) -> Duration {
        current.mul_f64(self.multiplier).min(self.max_interval)
    }

    pub(crate) fn jittered(&self, interval: Duration) -> Duration {
        if !self.jitter {
            return interval;
        }
        let factor = 1.0 + rand::thread_rng().gen_range(-0.1..=0.1);
        interval.mul_f64(factor)
    }
}

/// Outcome of a poll that reached a terminal status.
#[derive(Debug, Clone)]
pub struct PollReport {
    pub job: FineTuningJob,
    pub polls: u32,
    pub sleeps: u32,
    pub elapsed: Duration,
}

impl PollReport {
    pub fn status(&self) -> FineTuningJobStatus {
        self.job.status
    }
}

/// Polls a fine-tuning job until it reaches a terminal status or the
/// configured maximum wait elapses.
pub struct JobPoller {
    service: Arc<dyn FineTuningService>,
    config: PollConfig,
}

impl JobPoller {
    pub fn new(service: Arc<dyn FineTuningService>, config: PollConfig) -> FineTuneResult<Self> {
        config.validate()?;
        Ok(Self { service, config })
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    /// Errors from a single status request are returned as is; retrying them
    /// is left to the service's resilience layer.
    pub async fn wait_for_terminal(&self, job_id: &str) -> FineTuneResult<PollReport> {
        let start = Instant::now();
        let mut interval = self.config.interval;
        let mut last_status: Option<FineTuningJobStatus> = None;
        let mut polls = 0u32;
        let mut sleeps = 0u32;

        loop {
            let job = self.service.retrieve(job_id).await?;
            polls += 1;

            if last_status != Some(job.status) {
                info!(
                    job_id = %job_id,
                    status = %job.status,
                    elapsed_secs = start.elapsed().as_secs(),
                    "fine-tuning job status"
                );
                last_status = Some(job.status);
            }

            if job.status.is_terminal() {
                return Ok(PollReport {
                    job,
                    polls,
                    sleeps,
                    elapsed: start.elapsed(),
                });
            }

            let elapsed = start.elapsed();
            if elapsed >= self.config.max_wait {
                return Err(FineTuneError::PollTimeout {
                    job_id: job_id.to_string(),
                    last_status: job.status.to_string(),
                    waited_secs: elapsed.as_secs(),
                });
            }

            let delay = self
                .config
                .jittered(interval)
                .min(self.config.max_wait - elapsed);
            debug!(job_id = %job_id, delay_ms = delay.as_millis() as u64, "waiting before next poll");
            tokio::time::sleep(delay).await;
            sleeps += 1;
            interval = self.config.next_interval(interval);
        }
    }
}
