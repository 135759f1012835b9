// Theme presets and normalization.
// Everything here is pure and total: malformed input degrades to preset
// defaults instead of failing.

pub mod handlers;
pub mod normalize;
pub mod presets;
