// Candidates: read-only profile queries, projections for the matching
// pipeline, and the search / compare / insight service behind the API.

pub mod handlers;
pub mod projection;
pub mod repository;
pub mod service;
