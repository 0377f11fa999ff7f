//! Groundwater crisis scoring for Indian states, cities and districts.
//!
//! [`indicators`] supplies raw hydrological and weather figures, [`crisis`]
//! turns them into severity assessments, and the remaining modules carry the
//! service plumbing shared with the API binary.

pub mod config;
pub mod crisis;
pub mod error;
pub mod indicators;
pub mod telemetry;
