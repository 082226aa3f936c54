use discovery_core::{
    update, DiscoveredPage, DiscoveryState, LocalFrontier, Msg, Phase, Seed, SeedPage,
};

#[test]
fn finished_run_ignores_every_message() {
    let state = DiscoveryState::new(Seed::SearchQuery("vlog".to_string()), LocalFrontier::new());
    let (state, _) = update(state, Msg::Start);
    let (state, _) = update(state, Msg::SeedLoaded(SeedPage::default()));
    assert_eq!(state.phase(), Phase::Done);

    for msg in [
        Msg::Start,
        Msg::SeedLoaded(SeedPage::default()),
        Msg::PageFetched(DiscoveredPage::default()),
        Msg::Cancelled,
    ] {
        let (next, effects) = update(
            DiscoveryState::new(Seed::SearchQuery("x".to_string()), LocalFrontier::new()),
            Msg::Cancelled,
        );
        assert!(next.is_done());
        assert_eq!(effects.len(), 1);

        let (_, effects) = update(next, msg);
        assert!(effects.is_empty());
    }

    assert_eq!(state.report().pages_fetched, 0);
}

#[test]
fn page_before_seed_is_ignored() {
    let state = DiscoveryState::new(Seed::SearchQuery("vlog".to_string()), LocalFrontier::new());
    let (state, effects) = update(state, Msg::PageFetched(DiscoveredPage::default()));
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Seeding);
}
