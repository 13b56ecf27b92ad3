use rand::Rng;
use types::GameError;

/// No I, O, 0 or 1, so codes survive being read aloud or copied by hand.
const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub const ROOM_CODE_LENGTH: usize = 6;
pub const ROOM_CODE_ATTEMPTS: usize = 10;

pub fn generate_room_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ROOM_CODE_LENGTH)
        .map(|_| ROOM_CODE_ALPHABET[rng.gen_range(0..ROOM_CODE_ALPHABET.len())] as char)
        .collect()
}

/// Draws codes until `is_taken` says one is free, giving up after `attempts`.
pub fn unique_room_code<R, F>(rng: &mut R, is_taken: F, attempts: usize) -> Result<String, GameError>
where
    R: Rng + ?Sized,
    F: Fn(&str) -> bool,
{
    for attempt in 1..=attempts {
        let code = generate_room_code(rng);
        if !is_taken(&code) {
            return Ok(code);
        }
        log::debug!("Room code {code} taken (attempt {attempt}/{attempts})");
    }
    Err(GameError::RoomCodeExhausted(attempts))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn codes_use_the_unambiguous_alphabet() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let code = generate_room_code(&mut rng);
            assert_eq!(code.len(), ROOM_CODE_LENGTH);
            assert!(code.bytes().all(|b| ROOM_CODE_ALPHABET.contains(&b)), "{code}");
        }
    }

    #[test]
    fn taken_codes_are_retried() {
        let mut rng = StdRng::seed_from_u64(5);
        let first = generate_room_code(&mut StdRng::seed_from_u64(5));
        let taken: HashSet<String> = [first.clone()].into_iter().collect();

        let code = unique_room_code(&mut rng, |c| taken.contains(c), ROOM_CODE_ATTEMPTS).unwrap();
        assert_ne!(code, first);
    }

    #[test]
    fn gives_up_when_everything_is_taken() {
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(
            unique_room_code(&mut rng, |_| true, 3),
            Err(GameError::RoomCodeExhausted(3))
        );
    }
}
