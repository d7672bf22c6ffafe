//! # Rollout Evaluator
//!
//! Deterministic percentage-bucket membership for gradual rollouts.
//!
//! An identity hashes to a single stable bucket in `[0, 100)`; the flag is
//! enabled when `bucket < percentage`. Because the bucket never changes for
//! a given identity, raising the percentage only ever adds users — a user
//! enabled at P stays enabled at every P' > P, so ramp-ups never flap.
//!
//! The fold `acc = char + ((acc << 5) - acc)` over code points, taken with
//! 32-bit wrapping arithmetic and `abs() % 100`, is kept bit-for-bit
//! compatible with rollout decisions already persisted by deployed clients.

// =============================================================================
// BUCKET HASH
// =============================================================================

/// Hash an identity to its stable bucket in `[0, 100)`.
#[must_use]
pub fn bucket(user_id: &str) -> u8 {
    let mut acc: i32 = 0;
    for ch in user_id.chars() {
        let code = ch as i32;
        acc = code.wrapping_add(acc.wrapping_shl(5).wrapping_sub(acc));
    }
    (acc.unsigned_abs() % 100) as u8
}

/// Whether `user_id` falls inside a `percentage` rollout (0-100 inclusive).
///
/// `0` is always out, `100` is always in, regardless of identity.
#[must_use]
pub fn is_enrolled(user_id: &str, percentage: u8) -> bool {
    bucket(user_id) < percentage
}

// =============================================================================
// TESTS
// =============================================================================
