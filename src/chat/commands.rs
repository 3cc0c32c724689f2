use serde::Serialize;

use crate::{advisor::Persona, AppState};

use super::{ChatHistoryEntry, ChatSession, Message};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub history_id: String,
    pub advisor_name: String,
    pub turn: u32,
    pub reply: Message,
}

/// Sends one message, continuing `history_id` when given, otherwise starting a new conversation.
pub async fn send_chat_message(
    state: &AppState,
    persona: Persona,
    history_id: Option<String>,
    text: String,
) -> Result<ChatReply, String> {
    let advisor = state.advisor(&persona).map_err(|e| e.to_string())?;
    let history = state.history(&persona);

    let mut session = match history_id {
        Some(id) => {
            let entry = history
                .get(&id)
                .ok_or_else(|| format!("Chat history not found: {id}"))?;
            ChatSession::resume(advisor, history, entry)
        }
        None => ChatSession::new(advisor, history),
    };

    let reply = session.send(&text).await.map_err(|e| e.to_string())?;

    Ok(ChatReply {
        history_id: session.entry_id().unwrap_or_default().to_string(),
        advisor_name: session.advisor().name().to_string(),
        turn: session.turn(),
        reply,
    })
}

pub fn list_chat_histories(state: &AppState, persona: &Persona) -> Vec<ChatHistoryEntry> {
    state.history(persona).list()
}

pub fn get_chat_history(
    state: &AppState,
    persona: &Persona,
    history_id: &str,
) -> Result<ChatHistoryEntry, String> {
    state
        .history(persona)
        .get(history_id)
        .ok_or_else(|| format!("Chat history not found: {history_id}"))
}

pub fn delete_chat_history(
    state: &AppState,
    persona: &Persona,
    history_id: &str,
) -> Result<(), String> {
    let removed = state
        .history(persona)
        .delete(history_id)
        .map_err(|e| e.to_string())?;
    if removed {
        Ok(())
    } else {
        Err(format!("Chat history not found: {history_id}"))
    }
}
