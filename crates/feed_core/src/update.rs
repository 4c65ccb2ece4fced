use feed_logging::{feed_debug, feed_warn};

use crate::{AppState, Effect, Msg, Session};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    if state.session() == Session::Ended {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Mounted => {
            if state.session() != Session::Idle {
                return (state, Vec::new());
            }
            state.mount();
            dispatch(&mut state)
        }
        Msg::SearchEdited(text) => edit_search(&mut state, text),
        Msg::ClearClicked => edit_search(&mut state, String::new()),
        Msg::SearchSettled { generation, text } => {
            if state.settle_search(generation, text) {
                dispatch(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::PrevClicked => {
            if state.can_go_prev() {
                state.set_page(state.page() - 1);
                dispatch(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::NextClicked => {
            if state.can_go_next() {
                state.set_page(state.page() + 1);
                dispatch(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::PageLoaded { epoch, result } => {
            // Results from superseded epochs are expected races; drop them silently.
            if !state.is_current(epoch) {
                return (state, Vec::new());
            }
            match result {
                Ok(data) => {
                    state.apply_loaded(data);
                    // Clamping may have moved the page.
                    dispatch(&mut state)
                }
                Err(message) => {
                    feed_warn!("Page request epoch={} failed: {}", epoch, message);
                    state.apply_failed(message);
                    Vec::new()
                }
            }
        }
        Msg::Unmounted => {
            if state.end_session() {
                vec![Effect::CancelDebounce]
            } else {
                Vec::new()
            }
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn edit_search(state: &mut AppState, text: String) -> Vec<Effect> {
    if text == state.search_text() {
        return Vec::new();
    }
    let generation = state.edit_search(text.clone());
    vec![Effect::Debounce { generation, text }]
}

fn dispatch(state: &mut AppState) -> Vec<Effect> {
    match state.sync_query() {
        Some(effect) => {
            if let Effect::FetchPage { epoch, key } = &effect {
                feed_debug!(
                    "Dispatch epoch={} page={} page_size={} term={:?}",
                    epoch,
                    key.page(),
                    key.page_size(),
                    key.term()
                );
            }
            vec![effect]
        }
        None => Vec::new(),
    }
}
