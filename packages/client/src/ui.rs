//! UI utilities for the client.

use std::io::Write;

/// Prompt shown before each input line
pub fn prompt(username: &str) -> String {
    format!("{}> ", username)
}

/// Redisplay the prompt after receiving a message
pub fn redisplay_prompt(username: &str) {
    print!("{}", prompt(username));
    std::io::stdout().flush().ok();
}
