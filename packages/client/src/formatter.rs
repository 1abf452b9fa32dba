//! Message formatting utilities for client display.

use hiroba_shared::protocol::ChatMessage;

const DIVIDER: &str = "------------------------------------------------------------";
const BANNER: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the greeting shown once the connection is open
    ///
    /// # Arguments
    ///
    /// * `username` - The display name the session starts with
    /// * `avatar` - Avatar URL for that name
    pub fn format_welcome(username: &str, avatar: &str) -> String {
        format!(
            "\n{}\nYou are '{}' ({})\n\
             Type messages and press Enter to send.\n\
             /name <new name> changes your name, /quit or Ctrl+C exits.\n{}\n",
            BANNER, username, avatar, BANNER
        )
    }

    /// Format a received chat message
    ///
    /// # Arguments
    ///
    /// * `message` - The message as relayed
    /// * `current_username` - This session's current name, to mark own messages as "me"
    pub fn format_chat_message(message: &ChatMessage, current_username: &str) -> String {
        let me_suffix = if message.username == current_username {
            " (me)"
        } else {
            ""
        };
        format!(
            "\n{}\n@{}{}: {}\navatar {}\n{}\n",
            DIVIDER, message.username, me_suffix, message.text, message.avatar, DIVIDER
        )
    }

    pub fn format_renamed(username: &str) -> String {
        format!("You are now '{}'\n", username)
    }

    pub fn format_usage(usage: &str) -> String {
        format!("Usage: {}\n", usage)
    }
}
