//! Patient id generation.
//!
//! Ids are a base-36 timestamp followed by a base-36 random component,
//! e.g. `lrx3k2a0` + `1h7f9x0q2kd3`. The timestamp keeps ids roughly
//! ordered by creation; the random part separates ids minted in the same
//! millisecond.

use log::warn;

use crate::store::RecordStore;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a new patient id.
pub fn generate_patient_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u128;
    let random = uuid::Uuid::new_v4().as_u128();
    // Fold the 122 random bits of a v4 uuid into 64.
    let folded = (random >> 64) ^ (random & u128::from(u64::MAX));

    let mut id = to_base36(millis);
    id.push_str(&to_base36(folded));
    id
}

/// Generate an id that has never been stored in `store`.
pub fn generate_unique_id(store: &RecordStore) -> String {
    unique_id_from(store, generate_patient_id)
}

/// Draw ids from `next` until one has never been stored in `store`.
fn unique_id_from(store: &RecordStore, mut next: impl FnMut() -> String) -> String {
    loop {
        let id = next();
        if !store.is_id_issued(&id) {
            return id;
        }
        warn!("event=id_collision module=form status=retry id={}", id);
    }
}

/// Render a number in lowercase base 36.
pub(crate) fn to_base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}
