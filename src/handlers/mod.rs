// handlers/mod.rs - Two-tier handler layout
//
// Public (no session) → Protected (session cookie resolved by middleware)

pub mod protected;
pub mod public;
