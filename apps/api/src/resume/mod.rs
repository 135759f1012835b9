// Resume normalization: turns API resume payloads into the canonical record
// the onboarding steps read from.

pub mod defaults;
pub mod handlers;
