//! Domain logic for client-side operations.
//!
//! This module contains pure types and functions that implement the client's
//! behavior without side effects, making them easy to test.

use std::fmt::Write;

use hiroba_shared::protocol::ChatMessage;
use rand::seq::SliceRandom;

/// Display names a new client picks from at startup
pub const RANDOM_NAMES: [&str; 10] = [
    "BlueRaven",
    "QuietStorm",
    "Sunshine",
    "CrazyArtist",
    "MoonWalker",
    "StarGazer",
    "OceanDreamer",
    "MysticTraveler",
    "DigitalWizard",
    "GalaxyDefender",
];

/// Avatar background colours (hex RGB, no leading `#`)
pub const AVATAR_COLORS: [&str; 10] = [
    "E6E6FA", "FFC0CB", "FFD700", "98FB98", "AFEEEE", "DB7093", "FFA07A", "20B2AA", "87CEFA",
    "778899",
];

const AVATAR_BASE_URL: &str = "https://ui-avatars.com/api/";

/// Build the avatar URL for a username and background colour.
pub fn avatar_url(username: &str, background: &str) -> String {
    format!(
        "{}?name={}&background={}&color=fff",
        AVATAR_BASE_URL,
        encode_uri_component(username),
        background
    )
}

/// Percent-encode a string the way browsers' `encodeURIComponent` does.
///
/// Unreserved characters are `A-Z a-z 0-9 - _ . ! ~ * ' ( )`; every other
/// byte of the UTF-8 encoding becomes `%XX` with upper-case hex.
pub fn encode_uri_component(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => encoded.push(byte as char),
            _ => {
                let _ = write!(encoded, "%{:02X}", byte);
            }
        }
    }
    encoded
}

/// The message being composed: username, avatar colour and the text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composer {
    username: String,
    avatar_color: String,
    text: String,
}

impl Composer {
    pub fn new(username: impl Into<String>, avatar_color: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            avatar_color: avatar_color.into(),
            text: String::new(),
        }
    }

    /// Pick a random name and avatar colour, as a fresh session does.
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        let username = RANDOM_NAMES.choose(&mut rng).unwrap_or(&RANDOM_NAMES[0]);
        let avatar_color = AVATAR_COLORS.choose(&mut rng).unwrap_or(&AVATAR_COLORS[0]);
        Self::new(*username, *avatar_color)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Change the display name. No validation: any string is accepted.
    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn avatar_color(&self) -> &str {
        &self.avatar_color
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear_text(&mut self) {
        self.text.clear();
    }

    /// Avatar URL for the current username
    pub fn avatar_url(&self) -> String {
        avatar_url(&self.username, &self.avatar_color)
    }

    /// Build the message to send, or `None` when the text field is empty.
    pub fn compose(&self) -> Option<ChatMessage> {
        if self.text.is_empty() {
            return None;
        }
        Some(ChatMessage {
            username: self.username.clone(),
            text: self.text.clone(),
            avatar: self.avatar_url(),
        })
    }
}

/// Insertion-ordered log of received messages.
///
/// Messages are never removed or deduplicated; the log grows for the life of
/// the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLog {
    messages: Vec<ChatMessage>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return a reference to the stored entry.
    pub fn push(&mut self, message: ChatMessage) -> &ChatMessage {
        self.messages.push(message);
        &self.messages[self.messages.len() - 1]
    }

    pub fn as_slice(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Usage shown when `/name` is given without a name
pub const RENAME_USAGE: &str = "/name <new name>";

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputCommand {
    /// Send the line as message text
    Say(String),
    /// `/name <new name>`: change the display name
    Rename(String),
    /// `/quit`: leave the chat
    Quit,
    /// A command typed without its required argument
    Usage(&'static str),
}

impl InputCommand {
    pub fn parse(line: &str) -> Self {
        if let Some(rest) = line.strip_prefix("/name")
            && (rest.is_empty() || rest.starts_with(char::is_whitespace))
        {
            let name = rest.trim();
            if name.is_empty() {
                return Self::Usage(RENAME_USAGE);
            }
            return Self::Rename(name.to_string());
        }
        if line.trim() == "/quit" {
            return Self::Quit;
        }
        Self::Say(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_url_format() {
        // テスト項目: アバター URL がユーザー名と背景色から組み立てられる
        // given (前提条件):
        let username = "Alice";

        // when (操作):
        let url = avatar_url(username, "FFD700");

        // then (期待する結果):
        assert_eq!(
            url,
            "https://ui-avatars.com/api/?name=Alice&background=FFD700&color=fff"
        );
    }

    #[test]
    fn test_encode_uri_component_reserved_characters() {
        // テスト項目: 予約文字と空白はパーセントエンコードされる
        // given (前提条件):
        let input = "a b&c=d/e?f#g+h";

        // when (操作):
        let encoded = encode_uri_component(input);

        // then (期待する結果):
        assert_eq!(encoded, "a%20b%26c%3Dd%2Fe%3Ff%23g%2Bh");
    }

    #[test]
    fn test_encode_uri_component_unreserved_characters() {
        // テスト項目: 非予約文字はそのまま残る
        // given (前提条件):
        let input = "Az09-_.!~*'()";

        // when (操作):
        let encoded = encode_uri_component(input);

        // then (期待する結果):
        assert_eq!(encoded, input);
    }

    #[test]
    fn test_encode_uri_component_multibyte() {
        // テスト項目: マルチバイト文字は UTF-8 のバイト列としてエンコードされる
        // given (前提条件):
        let input = "広場";

        // when (操作):
        let encoded = encode_uri_component(input);

        // then (期待する結果):
        assert_eq!(encoded, "%E5%BA%83%E5%A0%B4");
    }

    #[test]
    fn test_random_composer_uses_known_names_and_colors() {
        // テスト項目: ランダムな名前と色は定義済みの候補から選ばれる
        // given (前提条件):

        // when (操作):
        let composer = Composer::random();

        // then (期待する結果):
        assert!(RANDOM_NAMES.contains(&composer.username()));
        assert!(AVATAR_COLORS.contains(&composer.avatar_color()));
        assert!(composer.text().is_empty());
    }

    #[test]
    fn test_compose_with_empty_text() {
        // テスト項目: テキストが空の場合はメッセージが作られない
        // given (前提条件):
        let composer = Composer::new("Alice", "FFD700");

        // when (操作):
        let result = composer.compose();

        // then (期待する結果):
        assert!(result.is_none());
    }

    #[test]
    fn test_compose_builds_message() {
        // テスト項目: ユーザー名・テキスト・アバター URL からメッセージが作られる
        // given (前提条件):
        let mut composer = Composer::new("Star Gazer", "87CEFA");
        composer.set_text("hello");

        // when (操作):
        let message = composer.compose().unwrap();

        // then (期待する結果):
        assert_eq!(message.username, "Star Gazer");
        assert_eq!(message.text, "hello");
        assert_eq!(
            message.avatar,
            "https://ui-avatars.com/api/?name=Star%20Gazer&background=87CEFA&color=fff"
        );
    }

    #[test]
    fn test_whitespace_text_is_not_empty() {
        // テスト項目: 空白のみのテキストは空ではないため送信対象になる
        // given (前提条件):
        let mut composer = Composer::new("Alice", "FFD700");
        composer.set_text(" ");

        // when (操作):
        let result = composer.compose();

        // then (期待する結果):
        assert!(result.is_some());
    }

    #[test]
    fn test_avatar_follows_rename() {
        // テスト項目: ユーザー名を変更するとアバター URL も変わり、色は維持される
        // given (前提条件):
        let mut composer = Composer::new("Alice", "FFD700");

        // when (操作):
        composer.set_username("Bob");

        // then (期待する結果):
        assert_eq!(
            composer.avatar_url(),
            "https://ui-avatars.com/api/?name=Bob&background=FFD700&color=fff"
        );
    }

    #[test]
    fn test_message_log_keeps_insertion_order_and_duplicates() {
        // テスト項目: 受信ログは受信順を保ち、重複も除去しない
        // given (前提条件):
        let mut log = MessageLog::new();
        let hi = ChatMessage {
            username: "Alice".to_string(),
            text: "hi".to_string(),
            avatar: "url1".to_string(),
        };
        let hey = ChatMessage {
            username: "Bob".to_string(),
            text: "hey".to_string(),
            avatar: "url2".to_string(),
        };

        // when (操作):
        log.push(hi.clone());
        log.push(hey.clone());
        let last = log.push(hi.clone()).clone();

        // then (期待する結果):
        assert_eq!(last, hi);
        assert_eq!(log.len(), 3);
        assert_eq!(log.as_slice(), &[hi.clone(), hey, hi]);
    }

    #[test]
    fn test_parse_input_commands() {
        // テスト項目: 入力行がコマンドとして解釈される
        // given (前提条件):

        // when (操作):
        let say = InputCommand::parse("hello /name");
        let rename = InputCommand::parse("/name  Moon Walker ");
        let quit = InputCommand::parse("/quit");

        // then (期待する結果):
        assert_eq!(say, InputCommand::Say("hello /name".to_string()));
        assert_eq!(rename, InputCommand::Rename("Moon Walker".to_string()));
        assert_eq!(quit, InputCommand::Quit);
    }

    #[test]
    fn test_parse_rename_without_name() {
        // テスト項目: 名前のない /name は名前を変更せず使い方を返す
        // given (前提条件):

        // when (操作):
        let bare = InputCommand::parse("/name");
        let blank = InputCommand::parse("/name    ");
        let other = InputCommand::parse("/names");

        // then (期待する結果):
        assert_eq!(bare, InputCommand::Usage(RENAME_USAGE));
        assert_eq!(blank, InputCommand::Usage(RENAME_USAGE));
        assert_eq!(other, InputCommand::Say("/names".to_string()));
    }
}
