//! Setup-phase progression.
//!
//! Phases run `Core -> Node -> Hardware -> Wallet -> Mining`. The phase
//! surfaced to the user is the earliest one that the backend has reported,
//! is not disabled, and is not yet complete.

use std::collections::{BTreeMap, BTreeSet};

use shared::{domain::SetupPhase, protocol::SetupPhasePayload};

use crate::state::SetupState;

pub fn phase_to_display(
    phases: &BTreeMap<SetupPhase, SetupPhasePayload>,
    disabled: &BTreeSet<SetupPhase>,
) -> Option<SetupPhase> {
    SetupPhase::ALL.into_iter().find(|phase| {
        !disabled.contains(phase)
            && phases
                .get(phase)
                .is_some_and(|payload| !payload.is_complete)
    })
}

/// Last phase in startup order that has not been disabled.
pub fn last_active_phase(disabled: &BTreeSet<SetupPhase>) -> Option<SetupPhase> {
    SetupPhase::ALL
        .into_iter()
        .rev()
        .find(|phase| !disabled.contains(phase))
}

impl SetupState {
    /// Replaces the stored payload for the reported phase.
    pub fn apply_progress(&mut self, payload: SetupPhasePayload) {
        self.restarting_phases.remove(&payload.phase);
        self.phases.insert(payload.phase, payload);
        self.refresh_retirement();
    }

    pub fn set_disabled_phases(&mut self, disabled: impl IntoIterator<Item = SetupPhase>) {
        self.disabled_phases = disabled.into_iter().collect();
        self.refresh_retirement();
    }

    pub fn current_phase(&self) -> Option<SetupPhase> {
        if self.progress_retired {
            return None;
        }
        phase_to_display(&self.phases, &self.disabled_phases)
    }

    pub fn is_phase_complete(&self, phase: SetupPhase) -> bool {
        self.phases
            .get(&phase)
            .is_some_and(|payload| payload.is_complete)
    }

    fn refresh_retirement(&mut self) {
        if self.progress_retired {
            return;
        }
        if let Some(last) = last_active_phase(&self.disabled_phases) {
            self.progress_retired = self.is_phase_complete(last);
        }
    }
}

#[cfg(test)]
#[path = "tests/setup_tests.rs"]
mod tests;
