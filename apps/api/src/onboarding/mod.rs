// Onboarding wizard pipeline.
// Steps map a normalized resume to form defaults and submitted values back
// to PATCH payloads. Validation and per-user drafts sit on top.

pub mod coerce;
pub mod drafts;
pub mod field_errors;
pub mod handlers;
pub mod steps;
pub mod validation;
