use watch_core::{update, Msg, RunState, TrackedTarget};

#[test]
fn messages_outside_a_cycle_are_noops() {
    let state = RunState::new(vec![TrackedTarget::new(1, 2)]);

    let (next, effects) = update(state.clone(), Msg::CycleFinished);
    assert_eq!(state, next);
    assert!(effects.is_empty());

    let (next, effects) = update(state.clone(), Msg::FetchFailed);
    assert_eq!(state, next);
    assert!(effects.is_empty());
}
