//! Room code generation.
//!
//! Room codes are 10-character strings using Crockford's Base32 alphabet,
//! drawn from the OS's cryptographically secure RNG.

use rand::distributions::Uniform;
use rand::prelude::*;
use rand::rngs::OsRng;

const CROCKFORD: &[u8] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ"; // no I, L, O, U

/// Generate a room code.
pub fn generate_room_code() -> String {
    let mut rng = OsRng;
    let dist = Uniform::from(0..CROCKFORD.len());

    let mut s = String::with_capacity(10);
    for _ in 0..10 {
        s.push(CROCKFORD[dist.sample(&mut rng)] as char);
    }
    s
}
