//! Service Layer
//!
//! Orchestrates domain logic and reaches the shared bitmap through ports.

pub mod membership_filter;

pub use membership_filter::MembershipFilter;
