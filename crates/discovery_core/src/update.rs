use crate::{DiscoveryState, Effect, Msg, Phase};

/// Pure update function: applies a message to state and returns any effects.
///
/// Messages that do not fit the current phase are ignored, and a finished run
/// never produces further effects.
pub fn update(mut state: DiscoveryState, msg: Msg) -> (DiscoveryState, Vec<Effect>) {
    let effects = match (state.phase(), msg) {
        (Phase::Done, _) => Vec::new(),
        (_, Msg::Cancelled) => state.cancel(),
        (Phase::Seeding, Msg::Start) => {
            if state.request_seed() {
                vec![Effect::LoadSeed {
                    seed: state.seed().clone(),
                }]
            } else {
                Vec::new()
            }
        }
        (Phase::Seeding, Msg::SeedLoaded(page)) => {
            // Inline results go out before pagination starts.
            let mut effects = state.admit(page.entities);
            state.keep_related_videos(page.related_videos);
            effects.extend(state.advance(page.token));
            effects
        }
        (Phase::Seeding, Msg::SeedFailed { reason }) => state.fail(reason),
        (Phase::Paginating, Msg::PageFetched(page)) => {
            state.count_page();
            let mut effects = state.admit(page.entities);
            effects.extend(state.advance(page.next_token));
            effects
        }
        _ => Vec::new(),
    };

    (state, effects)
}
