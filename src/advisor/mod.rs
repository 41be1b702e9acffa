use crate::cards::CardCatalog;
use crate::error::Result;
use crate::observer::{EvaluationObserver, EvaluationRecord};
use crate::policy::AdvisorPolicy;
use crate::recommendation::Evaluation;
use crate::state::GameState;
use std::sync::Arc;
use tracing::{info, warn};

pub mod mulligan;
pub mod playables;
pub mod rank;

pub use mulligan::CostCurve;
pub use rank::{merge_and_rank, rank};

/// Entry point for both request kinds. Read-only over its catalog; `Sync`.
pub struct Advisor<'c> {
    catalog: &'c dyn CardCatalog,
    policy: AdvisorPolicy,
    observer: Option<Arc<dyn EvaluationObserver>>,
}

impl<'c> Advisor<'c> {
    /// Advisor with the default policy.
    pub fn new(catalog: &'c dyn CardCatalog) -> Self {
        Self {
            catalog,
            policy: AdvisorPolicy::default(),
            observer: None,
        }
    }

    /// Advisor with a custom policy, rejected if it breaks verdict ordering.
    pub fn with_policy(catalog: &'c dyn CardCatalog, policy: AdvisorPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            catalog,
            policy,
            observer: None,
        })
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn EvaluationObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    #[inline]
    pub fn policy(&self) -> &AdvisorPolicy {
        &self.policy
    }

    /// Keep/mulligan decision per opening-hand card.
    pub fn evaluate_mulligan(&self, hand: &[String]) -> Evaluation {
        info!(hand = hand.len(), "mulligan evaluation start");
        let eval = mulligan::advise(self.catalog, &self.policy.mulligan, hand);
        info!(
            recommendations = eval.len(),
            skipped = eval.skipped.len(),
            "mulligan evaluation done"
        );
        self.notify(|| EvaluationRecord::for_mulligan(hand, self.catalog.fingerprint(), &eval));
        eval
    }

    /// Ranked plays for the current main-phase snapshot.
    pub fn evaluate_playables(&self, state: &GameState) -> Evaluation {
        info!(turn = state.turn, hand = state.me.hand.len(), "playables evaluation start");
        let eval = playables::advise(self.catalog, &self.policy, state);
        info!(
            recommendations = eval.len(),
            skipped = eval.skipped.len(),
            "playables evaluation done"
        );
        self.notify(|| EvaluationRecord::for_playables(state, self.catalog.fingerprint(), &eval));
        eval
    }

    fn notify(&self, record: impl FnOnce() -> EvaluationRecord) {
        let Some(observer) = self.observer.as_ref() else {
            return;
        };
        let record = record();
        if let Err(e) = observer.observe(&record) {
            // Observer failures never affect the response.
            warn!(error = %e, kind = ?record.kind, "observer failed");
        }
    }
}
