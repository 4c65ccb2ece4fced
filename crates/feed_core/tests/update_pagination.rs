use feed_core::{update, AppState, Effect, Msg, PageData, QueryKey};
use pretty_assertions::assert_eq;

fn loaded(page: u32, total: u64) -> PageData {
    PageData {
        page,
        page_size: 20,
        total,
        items: Vec::new(),
    }
}

/// Mounts and settles the first request with the given total.
fn mounted_with_total(total: u64) -> AppState {
    let (state, _) = update(AppState::new(), Msg::Mounted);
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            epoch: 1,
            result: Ok(loaded(1, total)),
        },
    );
    state
}

#[test]
fn total_pages_is_ceiling_with_minimum_of_one() {
    assert_eq!(mounted_with_total(0).view().total_pages, 1);
    assert_eq!(mounted_with_total(20).view().total_pages, 1);
    assert_eq!(mounted_with_total(21).view().total_pages, 2);
    assert_eq!(mounted_with_total(45).view().total_pages, 3);
}

#[test]
fn middle_page_enables_both_directions() {
    let state = mounted_with_total(45);
    let (state, effects) = update(state, Msg::NextClicked);
    assert_eq!(
        effects,
        vec![Effect::FetchPage {
            epoch: 2,
            key: QueryKey::build(2, 20, ""),
        }]
    );
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            epoch: 2,
            result: Ok(loaded(2, 45)),
        },
    );

    let view = state.view();
    assert_eq!(view.page, 2);
    assert_eq!(view.total_pages, 3);
    assert!(view.can_prev);
    assert!(view.can_next);
    assert_eq!(view.status_line(), "Page 2 / 3 \u{2022} 45 items");
}

#[test]
fn bounds_disable_prev_and_next() {
    let state = mounted_with_total(40);
    assert!(!state.view().can_prev);
    assert!(state.view().can_next);

    let (state, effects) = update(state, Msg::PrevClicked);
    assert!(effects.is_empty());
    assert_eq!(state.page(), 1);

    let (state, _) = update(state, Msg::NextClicked);
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            epoch: 2,
            result: Ok(loaded(2, 40)),
        },
    );
    assert!(state.view().can_prev);
    assert!(!state.view().can_next);

    let (state, effects) = update(state, Msg::NextClicked);
    assert!(effects.is_empty());
    assert_eq!(state.page(), 2);
}

#[test]
fn navigation_is_dropped_while_loading() {
    let state = mounted_with_total(100);
    let (state, effects) = update(state, Msg::NextClicked);
    assert_eq!(effects.len(), 1);
    assert!(state.view().loading);
    assert!(!state.view().can_prev);
    assert!(!state.view().can_next);

    let (state, effects) = update(state, Msg::NextClicked);
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::PrevClicked);
    assert!(effects.is_empty());
    assert_eq!(state.page(), 2);
    assert_eq!(state.epoch(), 2);
}

#[test]
fn shrinking_total_clamps_page_and_refetches() {
    let state = mounted_with_total(100);
    let (state, _) = update(state, Msg::NextClicked);
    let (state, _) = update(
        state,
        Msg::PageLoaded {
            epoch: 2,
            result: Ok(loaded(2, 100)),
        },
    );
    let (state, _) = update(state, Msg::NextClicked);
    assert_eq!(state.page(), 3);

    // The feed shrank underneath us: page 3 no longer exists.
    let (state, effects) = update(
        state,
        Msg::PageLoaded {
            epoch: 3,
            result: Ok(loaded(3, 30)),
        },
    );

    assert_eq!(state.page(), 2);
    assert_eq!(
        effects,
        vec![Effect::FetchPage {
            epoch: 4,
            key: QueryKey::build(2, 20, ""),
        }]
    );
}

#[test]
fn item_count_is_hidden_before_first_page() {
    let (state, _) = update(AppState::new(), Msg::Mounted);
    let view = state.view();
    assert_eq!(view.total, None);
    assert_eq!(view.status_line(), "Page 1 / 1");
}

#[test]
fn configured_page_size_flows_into_requests() {
    let (state, effects) = update(AppState::with_page_size(50), Msg::Mounted);
    assert_eq!(state.page_size(), 50);
    assert_eq!(
        effects,
        vec![Effect::FetchPage {
            epoch: 1,
            key: QueryKey::build(1, 50, ""),
        }]
    );
}

#[test]
fn paging_waits_for_pending_search_edit() {
    let state = mounted_with_total(100);
    let (state, effects) = update(state, Msg::SearchEdited("rust".into()));
    let generation = match effects.as_slice() {
        [Effect::Debounce { generation, .. }] => *generation,
        other => panic!("unexpected effects: {other:?}"),
    };

    let view = state.view();
    assert!(!view.can_prev);
    assert!(!view.can_next);

    let (state, effects) = update(state, Msg::NextClicked);
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::NextClicked);
    assert!(effects.is_empty());
    assert_eq!(state.page(), 1);

    let (state, effects) = update(
        state,
        Msg::SearchSettled {
            generation,
            text: "rust".into(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::FetchPage {
            epoch: 2,
            key: QueryKey::build(1, 20, "rust"),
        }]
    );
    assert_eq!(state.page(), 1);
}
