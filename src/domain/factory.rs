//! Domain factories for creating domain entities and value objects.

use rand::Rng;

use super::{
    error::ValueObjectError,
    value_object::{ROOM_CODE_LEN, RoomCode},
};

/// Factory for generating room codes.
///
/// Encapsulates the generation concern, separating it from the validation
/// logic in [`RoomCode`]. Generation is a pure function of the thread-local
/// entropy source and carries no collision guarantee beyond low
/// probability; callers own collision checking against the store.
pub struct RoomCodeFactory;

impl RoomCodeFactory {
    /// Generate a new random room code: [`ROOM_CODE_LEN`] uppercase
    /// alphanumeric characters.
    ///
    /// # Errors
    ///
    /// This method should not fail in practice, but returns Result for
    /// consistency with the domain error handling pattern.
    pub fn generate() -> Result<RoomCode, ValueObjectError> {
        let code: String = rand::thread_rng()
            .sample_iter(&rand::distributions::Alphanumeric)
            .take(ROOM_CODE_LEN)
            .map(char::from)
            .collect::<String>()
            .to_uppercase();
        RoomCode::parse(&code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_code_factory_generate() {
        // when:
        let result = RoomCodeFactory::generate();

        // then: fixed length, fixed alphabet
        assert!(result.is_ok());
        let code = result.unwrap();
        assert_eq!(code.as_str().len(), ROOM_CODE_LEN);
        assert!(
            code.as_str()
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_room_code_factory_generate_varies() {
        // when: a batch of codes is generated
        let codes: Vec<_> = (0..32)
            .map(|_| RoomCodeFactory::generate().unwrap())
            .collect();

        // then: at least two distinct codes appear (collision of all 32
        // would require an astronomically unlikely RNG run)
        assert!(codes.iter().any(|c| c != &codes[0]));
    }
}
