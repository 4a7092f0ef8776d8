use medmax_core::pricing::PricingConfig;
use medmax_core::{update, AppState, Msg};

#[test]
fn update_is_noop() {
    let (state, _) = AppState::init("/", None, PricingConfig::default());
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn tick_without_subscribers_is_noop() {
    let (state, _) = AppState::init("/pricing", None, PricingConfig::default());
    assert!(!state.wants_ticks());
    let (next, effects) = update(state.clone(), Msg::Tick);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
