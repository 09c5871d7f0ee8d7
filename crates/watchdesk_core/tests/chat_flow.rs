use std::sync::Once;

use pretty_assertions::assert_eq;
use watchdesk_core::{
    update, AppState, AssistantReply, ChatMessage, ChatRole, ChatTurn, Effect, InputMode,
    LiveTarget, MessageId, Msg, Route, ScreenView, ViewId, THINKING_TEXT,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(desk_logging::initialize_for_tests);
}

fn chat_landing() -> (AppState, ViewId) {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::Navigate(Route::Landing));
    let view = state.view_id();
    let (state, _) = update(state, Msg::WatchListLoaded { view, result: Ok(Vec::new()) });
    let (state, _) = update(state, Msg::InputModeSelected(InputMode::Chat));
    (state, view)
}

fn transcript(state: &AppState) -> Vec<ChatMessage> {
    match state.view(chrono::Utc::now()).screen {
        ScreenView::Landing(view) => view.chat,
        ScreenView::Live(view) => view.chat,
        other => panic!("no chat on {other:?}"),
    }
}

fn ask(state: AppState, text: &str) -> (AppState, MessageId, Vec<ChatTurn>) {
    let (state, effects) = update(state, Msg::ChatSubmitted(text.to_string()));
    match effects.as_slice() {
        [Effect::AskAssistant {
            tool_id, history, ..
        }] => {
            let (tool_id, history) = (*tool_id, history.clone());
            (state, tool_id, history)
        }
        other => panic!("expected one assistant request, got {other:?}"),
    }
}

#[test]
fn chat_mode_starts_with_greeting() {
    let (state, _) = chat_landing();
    let messages = transcript(&state);

    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, ChatRole::Assistant);
}

#[test]
fn one_exchange_adds_exactly_two_messages() {
    let (state, view) = chat_landing();
    let before = transcript(&state).len();

    let (state, tool_id, history) = ask(state, "  track rust releases ");
    assert!(history.is_empty(), "greeting is not sent as history");
    let during = transcript(&state);
    assert_eq!(during.len(), before + 2);
    assert_eq!(during[before].content, "track rust releases");
    assert_eq!(during[before + 1].role, ChatRole::Tool);
    assert_eq!(during[before + 1].content, THINKING_TEXT);

    let (state, _) = update(
        state,
        Msg::AssistantReplied {
            view,
            tool_id,
            result: Ok(AssistantReply {
                text: "Try the Rust blog.".to_string(),
                found_url: Some("https://blog.rust-lang.org".to_string()),
            }),
        },
    );
    let after = transcript(&state);
    assert_eq!(after.len(), before + 2);
    assert!(after.iter().all(|m| m.role != ChatRole::Tool));
    assert_eq!(after.last().map(|m| m.role), Some(ChatRole::Assistant));
    assert_eq!(
        after.last().and_then(|m| m.found_url.as_deref()),
        Some("https://blog.rust-lang.org")
    );
}

#[test]
fn failure_becomes_an_assistant_message() {
    let (state, view) = chat_landing();
    let before = transcript(&state).len();
    let (state, tool_id, _) = ask(state, "anything");

    let (state, _) = update(
        state,
        Msg::AssistantReplied {
            view,
            tool_id,
            result: Err("timed out".to_string()),
        },
    );

    let after = transcript(&state);
    assert_eq!(after.len(), before + 2);
    let last = after.last().cloned().unwrap();
    assert_eq!(last.role, ChatRole::Assistant);
    assert!(last.content.contains("timed out"));
    assert_eq!(last.found_url, None);
}

#[test]
fn sending_is_ignored_while_pending_or_blank() {
    let (state, _) = chat_landing();
    let (state, effects) = update(state, Msg::ChatSubmitted("   ".to_string()));
    assert!(effects.is_empty());

    let (state, _, _) = ask(state, "first");
    let len = transcript(&state).len();
    let (state, effects) = update(state, Msg::ChatSubmitted("second".to_string()));

    assert!(effects.is_empty());
    assert_eq!(transcript(&state).len(), len);
}

#[test]
fn history_carries_earlier_exchanges() {
    let (state, view) = chat_landing();
    let (state, tool_id, _) = ask(state, "news about tokio");
    let (state, _) = update(
        state,
        Msg::AssistantReplied {
            view,
            tool_id,
            result: Ok(AssistantReply {
                text: "The tokio blog posts releases.".to_string(),
                found_url: None,
            }),
        },
    );
    let (_state, _, history) = ask(state, "and hyper?");

    assert_eq!(
        history,
        vec![
            ChatTurn {
                role: ChatRole::User,
                content: "news about tokio".to_string()
            },
            ChatTurn {
                role: ChatRole::Assistant,
                content: "The tokio blog posts releases.".to_string()
            },
        ]
    );
}

#[test]
fn reply_for_a_left_view_is_dropped() {
    let (state, view) = chat_landing();
    let (state, tool_id, _) = ask(state, "anything");
    let (state, _) = update(state, Msg::Navigate(Route::Landing));

    let (state, effects) = update(
        state,
        Msg::AssistantReplied {
            view,
            tool_id,
            result: Ok(AssistantReply {
                text: "late".to_string(),
                found_url: None,
            }),
        },
    );
    assert!(effects.is_empty());
    assert!(transcript(&state).iter().all(|m| m.content != "late"));
}

#[test]
fn found_url_needs_explicit_confirmation() {
    let (state, view) = chat_landing();
    let (state, tool_id, _) = ask(state, "rust releases");
    let (state, effects) = update(
        state,
        Msg::AssistantReplied {
            view,
            tool_id,
            result: Ok(AssistantReply {
                text: "Found it".to_string(),
                found_url: Some("https://blog.rust-lang.org".to_string()),
            }),
        },
    );
    assert!(effects.is_empty(), "no watch without confirmation");

    let reply_id = transcript(&state).last().map(|m| m.id).unwrap();
    let (state, effects) = update(state, Msg::TrackFoundUrl(reply_id));

    assert_eq!(effects.len(), 2);
    assert!(matches!(
        &effects[1],
        Effect::ProbeFrame { url, .. } if url == "https://blog.rust-lang.org"
    ));
    assert_eq!(
        state.route(),
        &Route::Live(LiveTarget::Draft {
            url: "https://blog.rust-lang.org".to_string()
        })
    );
    let ScreenView::Live(live) = state.view(chrono::Utc::now()).screen else {
        panic!("expected live view");
    };
    assert!(live.is_draft);
    assert!(live.can_create);
}

#[test]
fn invalid_found_url_is_not_offered() {
    let (state, view) = chat_landing();
    let (state, tool_id, _) = ask(state, "something");
    let (state, _) = update(
        state,
        Msg::AssistantReplied {
            view,
            tool_id,
            result: Ok(AssistantReply {
                text: "Maybe this".to_string(),
                found_url: Some("example.com".to_string()),
            }),
        },
    );

    let reply_id = transcript(&state).last().map(|m| m.id).unwrap();
    let (_state, effects) = update(state, Msg::TrackFoundUrl(reply_id));
    assert!(effects.is_empty());
}

#[test]
fn live_chat_sends_site_url() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::Navigate(Route::Live(LiveTarget::Draft {
            url: "https://docs.example.com".to_string(),
        })),
    );
    assert_eq!(transcript(&state).len(), 1);

    let (_state, effects) = update(state, Msg::ChatSubmitted("what changed?".to_string()));
    assert!(matches!(
        effects.as_slice(),
        [Effect::AskAssistant { site_url: Some(url), .. }] if url == "https://docs.example.com"
    ));
}
