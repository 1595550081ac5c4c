mod orchestrator;

pub use orchestrator::{CircuitBreaker, CircuitState, ResilienceConfig, ResilienceOrchestrator};
