//! Frame formatting utilities for client display.

use std::collections::BTreeMap;

use chrono::DateTime;

/// Render an RFC 3339 instant as a compact display time.
///
/// Falls back to the raw string if the server ever sends something
/// unparseable.
fn display_time(iso: &str) -> String {
    match DateTime::parse_from_rfc3339(iso) {
        Ok(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        Err(_) => iso.to_string(),
    }
}

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the presence snapshot received right after joining.
    pub fn format_snapshot(
        online_user_ids: &[String],
        last_seen_by_user: &BTreeMap<String, String>,
        current_user_id: &str,
    ) -> String {
        let mut output = String::new();
        output.push_str("\n\n============================================================\n");
        output.push_str("Online:\n");

        if online_user_ids.is_empty() {
            output.push_str("(Nobody online)\n");
        } else {
            for user_id in online_user_ids {
                let me_suffix = if user_id == current_user_id {
                    " (me)"
                } else {
                    ""
                };
                output.push_str(&format!("{}{}\n", user_id, me_suffix));
            }
        }

        if !last_seen_by_user.is_empty() {
            output.push_str("Last seen:\n");
            for (user_id, last_seen) in last_seen_by_user {
                output.push_str(&format!("{} - {}\n", user_id, display_time(last_seen)));
            }
        }

        output.push_str("============================================================\n");
        output
    }

    /// Format an online presence edge.
    pub fn format_online(user_id: &str, timestamp: &str) -> String {
        format!("\n+ {} is online ({})\n", user_id, display_time(timestamp))
    }

    /// Format an offline presence edge.
    pub fn format_offline(user_id: &str, last_seen: Option<&str>) -> String {
        match last_seen {
            Some(last_seen) => format!(
                "\n- {} went offline (last seen {})\n",
                user_id,
                display_time(last_seen)
            ),
            None => format!("\n- {} went offline\n", user_id),
        }
    }

    /// Format a typing indicator.
    pub fn format_typing(from_user_id: &str, is_typing: bool) -> String {
        if is_typing {
            format!("\n@{} is typing...\n", from_user_id)
        } else {
            format!("\n@{} stopped typing\n", from_user_id)
        }
    }

    /// Format a message lifecycle frame.
    ///
    /// `kind` is the wire discriminator (`message:new` etc.).
    pub fn format_message_event(
        kind: &str,
        sender_id: &str,
        text: Option<&str>,
        timestamp: &str,
    ) -> String {
        let action = match kind {
            "message:new" => "sent",
            "message:updated" => "edited",
            "message:deleted" => "deleted",
            other => other,
        };
        format!(
            "\n\n------------------------------------------------------------\n\
             @{} {} a message{}\n\
             at {}\n\
             ------------------------------------------------------------\n",
            sender_id,
            action,
            match text {
                Some(text) => format!(": {}", text),
                None => String::new(),
            },
            display_time(timestamp)
        )
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    /// Format the prompt usage help.
    pub fn format_usage() -> String {
        "\nCommands:\n  /typing <user> on|off   send a typing indicator\n".to_string()
    }
}
