use super::*;

fn payload(phase: SetupPhase, is_complete: bool) -> SetupPhasePayload {
    SetupPhasePayload {
        phase,
        is_complete,
        title: format!("setting-up-{}", phase.label()),
        phase_title: phase.label().to_string(),
        title_params: None,
        progress: if is_complete { 1.0 } else { 0.5 },
    }
}

fn phases(flags: &[(SetupPhase, bool)]) -> BTreeMap<SetupPhase, SetupPhasePayload> {
    flags
        .iter()
        .map(|(phase, done)| (*phase, payload(*phase, *done)))
        .collect()
}

#[test]
fn displays_earliest_incomplete_phase() {
    let reported = phases(&[
        (SetupPhase::Core, true),
        (SetupPhase::Node, true),
        (SetupPhase::Hardware, false),
        (SetupPhase::Wallet, false),
        (SetupPhase::Mining, false),
    ]);

    assert_eq!(
        phase_to_display(&reported, &BTreeSet::new()),
        Some(SetupPhase::Hardware)
    );

    let disabled = BTreeSet::from([SetupPhase::Hardware]);
    assert_eq!(
        phase_to_display(&reported, &disabled),
        Some(SetupPhase::Wallet)
    );
}

#[test]
fn skips_phases_the_backend_never_reported() {
    let reported = phases(&[(SetupPhase::Core, true), (SetupPhase::Wallet, false)]);
    assert_eq!(
        phase_to_display(&reported, &BTreeSet::new()),
        Some(SetupPhase::Wallet)
    );
}

#[test]
fn nothing_to_display_when_everything_is_complete_or_disabled() {
    let reported = phases(&[
        (SetupPhase::Core, true),
        (SetupPhase::Node, true),
        (SetupPhase::Hardware, false),
        (SetupPhase::Wallet, true),
        (SetupPhase::Mining, true),
    ]);
    let disabled = BTreeSet::from([SetupPhase::Hardware]);
    assert_eq!(phase_to_display(&reported, &disabled), None);
    assert_eq!(phase_to_display(&BTreeMap::new(), &BTreeSet::new()), None);
}

#[test]
fn selection_matches_brute_force_over_every_combination() {
    // 5 completion bits x 5 disabled bits.
    for mask in 0u32..(1 << 10) {
        let mut reported = BTreeMap::new();
        let mut disabled = BTreeSet::new();
        for (index, phase) in SetupPhase::ALL.into_iter().enumerate() {
            reported.insert(phase, payload(phase, mask & (1 << index) != 0));
            if mask & (1 << (index + 5)) != 0 {
                disabled.insert(phase);
            }
        }

        let expected = SetupPhase::ALL
            .iter()
            .copied()
            .filter(|phase| !disabled.contains(phase))
            .find(|phase| !reported[phase].is_complete);

        assert_eq!(phase_to_display(&reported, &disabled), expected, "mask={mask:#b}");
    }
}

#[test]
fn last_active_phase_skips_disabled_tail() {
    assert_eq!(last_active_phase(&BTreeSet::new()), Some(SetupPhase::Mining));
    let disabled = BTreeSet::from([SetupPhase::Mining, SetupPhase::Wallet]);
    assert_eq!(last_active_phase(&disabled), Some(SetupPhase::Hardware));
    let everything: BTreeSet<_> = SetupPhase::ALL.into_iter().collect();
    assert_eq!(last_active_phase(&everything), None);
}

#[test]
fn new_payload_replaces_previous_one_for_the_phase() {
    let mut state = SetupState::default();
    let mut first = payload(SetupPhase::Node, false);
    first.title_params = Some(BTreeMap::from([(
        "progress".to_string(),
        serde_json::json!(12),
    )]));
    state.apply_progress(first);

    state.apply_progress(payload(SetupPhase::Node, false));

    let stored = &state.phases[&SetupPhase::Node];
    assert!(stored.title_params.is_none());
}

#[test]
fn mining_completion_retires_progress() {
    let mut state = SetupState::default();
    for phase in SetupPhase::ALL {
        state.apply_progress(payload(phase, false));
    }
    assert_eq!(state.current_phase(), Some(SetupPhase::Core));

    for phase in SetupPhase::ALL {
        state.apply_progress(payload(phase, true));
    }
    assert!(state.progress_retired);
    assert_eq!(state.current_phase(), None);

    // Late payloads still overwrite but the indicator stays retired.
    state.apply_progress(payload(SetupPhase::Wallet, false));
    assert!(!state.is_phase_complete(SetupPhase::Wallet));
    assert_eq!(state.current_phase(), None);
}

#[test]
fn disabling_the_tail_retires_once_last_active_phase_is_done() {
    let mut state = SetupState::default();
    state.apply_progress(payload(SetupPhase::Core, true));
    state.apply_progress(payload(SetupPhase::Node, true));
    state.apply_progress(payload(SetupPhase::Hardware, true));
    state.apply_progress(payload(SetupPhase::Wallet, true));
    assert!(!state.progress_retired);

    state.set_disabled_phases([SetupPhase::Mining]);
    assert!(state.progress_retired);
}

#[test]
fn progress_update_clears_restarting_marker() {
    let mut state = SetupState::default();
    state.restarting_phases.insert(SetupPhase::Node);
    state.apply_progress(payload(SetupPhase::Node, false));
    assert!(state.restarting_phases.is_empty());
}
