use crate::domain::item::Price;
use crate::domain::payment::CardOutcome;
use crate::domain::ports::CardAuthorizer;
use crate::error::{CheckoutError, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Answers card authorizations from a fixed script.
///
/// Outcomes are consumed in order; once the script runs out every further
/// request is approved. An optional delay simulates gateway latency.
#[derive(Default)]
pub struct ScriptedAuthorizer {
    outcomes: Mutex<VecDeque<CardOutcome>>,
    delay: Option<Duration>,
}

impl ScriptedAuthorizer {
    pub fn new(outcomes: impl IntoIterator<Item = CardOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            delay: None,
        }
    }

    /// Approves every request.
    pub fn approving() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl CardAuthorizer for ScriptedAuthorizer {
    async fn authorize(&self, amount: Price, card_ref: &str) -> Result<CardOutcome> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let outcome = self
            .outcomes
            .lock()
            .await
            .pop_front()
            .unwrap_or(CardOutcome::Approved);
        debug!(%amount, card_ref, ?outcome, "scripted card authorization");
        Ok(outcome)
    }
}

/// Approves a configurable share of card payments at random.
///
/// Seed it to make a run reproducible.
pub struct SimulatedGateway {
    rng: Mutex<StdRng>,
    approval_rate: f64,
}

impl SimulatedGateway {
    pub fn new(approval_rate: f64, seed: Option<u64>) -> Result<Self> {
        if !(0.0..=1.0).contains(&approval_rate) {
            return Err(CheckoutError::Validation(format!(
                "card approval rate must be within 0.0..=1.0, got {}",
                approval_rate
            )));
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            rng: Mutex::new(rng),
            approval_rate,
        })
    }
}

#[async_trait]
impl CardAuthorizer for SimulatedGateway {
    async fn authorize(&self, amount: Price, card_ref: &str) -> Result<CardOutcome> {
        let approved = self.rng.lock().await.gen_bool(self.approval_rate);
        let outcome = if approved {
            CardOutcome::Approved
        } else {
            CardOutcome::Declined
        };
        debug!(%amount, card_ref, ?outcome, "simulated card authorization");
        Ok(outcome)
    }
}
