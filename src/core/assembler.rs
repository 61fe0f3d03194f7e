// src/core/assembler.rs — Conversation assembler

use super::persona::{PRIMING_ACK, PRIMING_INSTRUCTION};
use super::session::Session;
use crate::infra::errors::ManualMateError;
use crate::provider::Turn;

/// Build the ordered turn list for one generate call. Pure function over
/// the session plus the new question; the session is not mutated.
///
/// Order (fixed):
///   1. Document reference — grounds everything after it
///   2. Priming instruction (role user)
///   3. Priming acknowledgement (role model)
///   4. Prior transcript, excluding the most recently appended message
///      (the controller appends the in-flight question to the transcript
///      before calling in here; it must not appear twice)
///   5. The new question as the final user turn
pub fn build_request(session: &Session, question: &str) -> Result<Vec<Turn>, ManualMateError> {
    let document = session.document().ok_or(ManualMateError::NoDocument)?;

    let messages = session.messages();
    let history = match messages.split_last() {
        Some((_, prior)) => prior,
        None => &[],
    };

    let mut turns = Vec::with_capacity(history.len() + 4);
    turns.push(Turn::Document(document.clone()));
    turns.push(Turn::user(PRIMING_INSTRUCTION));
    turns.push(Turn::assistant(PRIMING_ACK));

    for message in history {
        turns.push(Turn::Text {
            role: message.role,
            content: message.content.clone(),
        });
    }

    turns.push(Turn::user(question));

    Ok(turns)
}
