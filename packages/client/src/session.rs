//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};

use aizu_server::infrastructure::dto::websocket::{
    ClientMessage, MessageEventMessage, MessageType, PresenceMessage, PresenceSnapshotMessage,
    PresenceStatus, TypingMessage,
};

use crate::{
    domain::{Command, ParsedInput, parse_input},
    error::ClientError,
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

/// Run one WebSocket client session.
///
/// Connects, announces `user_id` with a `join` frame, then runs the read
/// and prompt loops until the connection drops or the user exits.
pub async fn run_client_session(
    url: &str,
    user_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let (ws_stream, _response) = match connect_async(url).await {
        Ok(result) => result,
        Err(e) => {
            return Err(Box::new(ClientError::ConnectionError(e.to_string())));
        }
    };

    tracing::info!("Connected to presence server!");
    println!(
        "\nYou are '{}'. Type /typing <user> on|off to signal typing. Press Ctrl+C to exit.\n",
        user_id
    );

    let (mut write, mut read) = ws_stream.split();

    // Announce our identity before anything else; the server delivers the
    // presence snapshot in response
    let join = ClientMessage::Join {
        user_id: user_id.to_string(),
    };
    if let Err(e) = write.send(Message::Text(serde_json::to_string(&join)?.into())).await {
        return Err(Box::new(ClientError::ConnectionError(e.to_string())));
    }

    // Clone user_id for read task
    let user_id_for_read = user_id.to_string();

    // Spawn a task to handle incoming frames
    let mut read_task = tokio::spawn(async move {
        let mut connection_error = false;

        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = format_frame(&text, &user_id_for_read);
                    print!("{}", formatted);
                    redisplay_prompt(&user_id_for_read);
                }
                Ok(Message::Binary(data)) => {
                    let formatted = MessageFormatter::format_binary_message(data.len());
                    print!("{}", formatted);
                    redisplay_prompt(&user_id_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    connection_error = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    connection_error = true;
                    break;
                }
                _ => {}
            }
        }

        connection_error
    });

    // Clone user_id for the input loop
    let user_id = user_id.to_string();
    let user_id_for_prompt = user_id.clone();

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        let prompt = format!("{}> ", user_id_for_prompt);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to turn prompt input into client frames
    let user_id_for_write = user_id.clone();
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;

        while let Some(line) = input_rx.recv().await {
            match parse_input(&line) {
                ParsedInput::Command(Command::Typing {
                    to_user_id,
                    is_typing,
                }) => {
                    let frame = ClientMessage::Typing {
                        from_user_id: user_id.clone(),
                        to_user_id,
                        is_typing,
                    };
                    let json = match serde_json::to_string(&frame) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("Failed to serialize frame: {}", e);
                            continue;
                        }
                    };
                    if let Err(e) = write.send(Message::Text(json.into())).await {
                        tracing::warn!("Failed to send frame: {}", e);
                        write_error = true;
                        break;
                    }
                }
                ParsedInput::Unknown(_) => {
                    print!("{}", MessageFormatter::format_usage());
                    redisplay_prompt(&user_id_for_write);
                }
            }
        }

        write_error
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            let connection_error = read_result.unwrap_or(false);
            if connection_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
        write_result = &mut write_task => {
            read_task.abort();
            let write_error = write_result.unwrap_or(false);
            if write_error {
                return Err(Box::new(ClientError::ConnectionError(
                    "Connection lost".to_string(),
                )));
            }
        }
    }

    Ok(())
}

/// Render one server frame for display, falling back to the raw text for
/// anything unrecognized.
fn format_frame(text: &str, current_user_id: &str) -> String {
    // Try to parse as PresenceSnapshotMessage first
    if let Ok(snapshot) = serde_json::from_str::<PresenceSnapshotMessage>(text) {
        MessageFormatter::format_snapshot(
            &snapshot.online_user_ids,
            &snapshot.last_seen_by_user,
            current_user_id,
        )
    }
    // Try to parse as PresenceMessage
    else if let Ok(presence) = serde_json::from_str::<PresenceMessage>(text) {
        match presence.status {
            PresenceStatus::Online => {
                MessageFormatter::format_online(&presence.user_id, &presence.timestamp)
            }
            PresenceStatus::Offline => {
                MessageFormatter::format_offline(&presence.user_id, presence.last_seen.as_deref())
            }
        }
    }
    // Try to parse as TypingMessage
    else if let Ok(typing) = serde_json::from_str::<TypingMessage>(text) {
        MessageFormatter::format_typing(&typing.from_user_id, typing.is_typing)
    }
    // Try to parse as MessageEventMessage
    else if let Ok(event) = serde_json::from_str::<MessageEventMessage>(text) {
        let kind = match event.r#type {
            MessageType::MessageUpdated => "message:updated",
            MessageType::MessageDeleted => "message:deleted",
            _ => "message:new",
        };
        MessageFormatter::format_message_event(
            kind,
            &event.sender_id,
            event.message.text.as_deref(),
            &event.timestamp,
        )
    }
    // If parsing fails, display as raw text
    else {
        MessageFormatter::format_raw_message(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_frame_renders_snapshot() {
        // given:
        let text = r#"{"type":"presence:snapshot","onlineUserIds":["alice"],"lastSeenByUser":{},"timestamp":"2023-01-01T00:00:00+00:00"}"#;

        // when:
        let result = format_frame(text, "alice");

        // then:
        assert!(result.contains("alice (me)"));
    }

    #[test]
    fn test_format_frame_renders_offline_presence() {
        // given:
        let text = r#"{"type":"presence","userId":"bob","status":"Offline","lastSeen":"2023-01-01T00:00:00+00:00","timestamp":"2023-01-01T00:00:00+00:00"}"#;

        // when:
        let result = format_frame(text, "alice");

        // then:
        assert!(result.contains("- bob went offline"));
    }

    #[test]
    fn test_format_frame_renders_typing() {
        // given:
        let text = r#"{"type":"typing","fromUserId":"bob","toUserId":"alice","isTyping":true,"timestamp":"2023-01-01T00:00:00+00:00"}"#;

        // when:
        let result = format_frame(text, "alice");

        // then:
        assert!(result.contains("@bob is typing..."));
    }

    #[test]
    fn test_format_frame_renders_message_event() {
        // given:
        let text = r#"{"type":"message:new","senderId":"bob","message":{"id":"m1","conversationId":"c1","text":"hi","edited":false,"createdAt":"2023-01-01T00:00:00+00:00"},"timestamp":"2023-01-01T00:00:01+00:00"}"#;

        // when:
        let result = format_frame(text, "alice");

        // then:
        assert!(result.contains("@bob sent a message: hi"));
    }

    #[test]
    fn test_format_frame_falls_back_to_raw_text() {
        // given:
        let text = "not json at all";

        // when:
        let result = format_frame(text, "alice");

        // then:
        assert!(result.contains("Received: not json at all"));
    }
}
