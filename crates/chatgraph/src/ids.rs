//! Identifier generation.

use chrono::Utc;
use rand::Rng;

/// Length of the generated part after the `G` prefix.
const GROUP_ID_LEN: usize = 11;

/// Generates a new group id: `G` followed by the current unix timestamp
/// padded out to 11 characters with random digits.
pub fn new_group_id() -> String {
    format!("G{}", now_and_random_digits(GROUP_ID_LEN))
}

fn now_and_random_digits(len: usize) -> String {
    let mut s = Utc::now().timestamp().to_string();
    let mut rng = rand::rng();
    while s.len() < len {
        s.push(char::from(b'0' + rng.random_range(0..10u8)));
    }
    s.truncate(len);
    s
}
