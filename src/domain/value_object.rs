//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Length of a room code in characters.
pub const ROOM_CODE_LEN: usize = 6;

/// Maximum length of a user identifier.
pub const USER_ID_MAX_LEN: usize = 128;

/// Maximum length of a display name.
pub const DISPLAY_NAME_MAX_LEN: usize = 64;

/// Maximum length of a message text after trimming.
pub const MESSAGE_TEXT_MAX_LEN: usize = 2000;

/// User identifier value object.
///
/// Represents the stable identifier of an authenticated user, as issued by
/// the external authentication provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId.
    ///
    /// # Returns
    ///
    /// A Result containing the UserId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::UserIdEmpty);
        }
        let len = id.len();
        if len > USER_ID_MAX_LEN {
            return Err(ValueObjectError::UserIdTooLong {
                max: USER_ID_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name value object.
///
/// A snapshot of the name a user is shown as; never used for identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new DisplayName. The input is trimmed before validation.
    ///
    /// # Returns
    ///
    /// A Result containing the DisplayName or an error if validation fails
    pub fn new(name: String) -> Result<Self, ValueObjectError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::DisplayNameEmpty);
        }
        let len = trimmed.len();
        if len > DISPLAY_NAME_MAX_LEN {
            return Err(ValueObjectError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room code value object.
///
/// A short, human-typable room identifier: exactly [`ROOM_CODE_LEN`]
/// uppercase alphanumeric characters. User input is case-folded to
/// uppercase before validation, so codes are case-insensitive to type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomCode(String);

impl RoomCode {
    /// Parse a room code from user input.
    ///
    /// Trims surrounding whitespace and folds to uppercase, then validates
    /// length and alphabet.
    ///
    /// # Returns
    ///
    /// A Result containing the RoomCode or an error if validation fails
    pub fn parse(input: &str) -> Result<Self, ValueObjectError> {
        let code = input.trim().to_uppercase();
        let len = code.chars().count();
        if len != ROOM_CODE_LEN {
            return Err(ValueObjectError::RoomCodeLength {
                expected: ROOM_CODE_LEN,
                actual: len,
            });
        }
        if !code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
            return Err(ValueObjectError::RoomCodeCharset(code));
        }
        Ok(Self(code))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message identifier value object.
///
/// Assigned by the backing store at append time; unique within a room and
/// used as the client-side de-duplication key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    /// Create a new MessageId.
    ///
    /// # Returns
    ///
    /// A Result containing the MessageId or an error if validation fails
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::MessageIdEmpty);
        }
        Ok(Self(id))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message text value object.
///
/// The input is trimmed before validation; a message is never stored with
/// surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageText(String);

impl MessageText {
    /// Create a new MessageText. The input is trimmed before validation.
    ///
    /// # Returns
    ///
    /// A Result containing the MessageText or an error if validation fails
    pub fn new(text: String) -> Result<Self, ValueObjectError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::MessageTextEmpty);
        }
        let len = trimmed.len();
        if len > MESSAGE_TEXT_MAX_LEN {
            return Err(ValueObjectError::MessageTextTooLong {
                max: MESSAGE_TEXT_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Timestamp value object.
///
/// A Unix timestamp in milliseconds, assigned by the backing store at
/// durable-write time. Client clocks never produce ordering keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp from Unix milliseconds.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_new_success() {
        // given:
        let id = "u1".to_string();

        // when:
        let result = UserId::new(id);

        // then:
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "u1");
    }

    #[test]
    fn test_user_id_new_empty_fails() {
        // when:
        let result = UserId::new("".to_string());

        // then:
        assert!(result.is_err());
        assert_eq!(result.unwrap_err(), ValueObjectError::UserIdEmpty);
    }

    #[test]
    fn test_user_id_new_too_long_fails() {
        // given:
        let id = "a".repeat(USER_ID_MAX_LEN + 1);

        // when:
        let result = UserId::new(id);

        // then:
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::UserIdTooLong {
                max: USER_ID_MAX_LEN,
                actual: USER_ID_MAX_LEN + 1
            }
        );
    }

    #[test]
    fn test_display_name_trims_input() {
        // when:
        let result = DisplayName::new("  Alice  ".to_string());

        // then:
        assert_eq!(result.unwrap().as_str(), "Alice");
    }

    #[test]
    fn test_display_name_blank_fails() {
        // when:
        let result = DisplayName::new("   ".to_string());

        // then:
        assert_eq!(result.unwrap_err(), ValueObjectError::DisplayNameEmpty);
    }

    #[test]
    fn test_room_code_parse_success() {
        // when:
        let result = RoomCode::parse("AB12CD");

        // then:
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "AB12CD");
    }

    #[test]
    fn test_room_code_parse_case_insensitive() {
        // given: lowercase user input with surrounding whitespace
        let input = "  ab12cd ";

        // when:
        let result = RoomCode::parse(input);

        // then: normalized to the generator's uppercase convention
        assert_eq!(result.unwrap().as_str(), "AB12CD");
    }

    #[test]
    fn test_room_code_parse_wrong_length_fails() {
        // when:
        let result = RoomCode::parse("AB12");

        // then:
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::RoomCodeLength {
                expected: ROOM_CODE_LEN,
                actual: 4
            }
        );
    }

    #[test]
    fn test_room_code_parse_bad_charset_fails() {
        // when:
        let result = RoomCode::parse("AB-12!");

        // then:
        assert!(matches!(
            result.unwrap_err(),
            ValueObjectError::RoomCodeCharset(_)
        ));
    }

    #[test]
    fn test_message_text_trims_and_validates() {
        // when:
        let result = MessageText::new("  hello  ".to_string());

        // then:
        assert_eq!(result.unwrap().as_str(), "hello");
    }

    #[test]
    fn test_message_text_blank_fails() {
        // when:
        let result = MessageText::new("   ".to_string());

        // then:
        assert_eq!(result.unwrap_err(), ValueObjectError::MessageTextEmpty);
    }

    #[test]
    fn test_message_text_too_long_fails() {
        // given:
        let text = "a".repeat(MESSAGE_TEXT_MAX_LEN + 1);

        // when:
        let result = MessageText::new(text);

        // then:
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::MessageTextTooLong {
                max: MESSAGE_TEXT_MAX_LEN,
                actual: MESSAGE_TEXT_MAX_LEN + 1
            }
        );
    }

    #[test]
    fn test_message_id_new_empty_fails() {
        // when:
        let result = MessageId::new("".to_string());

        // then:
        assert_eq!(result.unwrap_err(), ValueObjectError::MessageIdEmpty);
    }

    #[test]
    fn test_timestamp_ordering() {
        // given:
        let ts1 = Timestamp::new(1000);
        let ts2 = Timestamp::new(2000);

        // then:
        assert!(ts1 < ts2);
        assert!(ts2 > ts1);
    }
}
