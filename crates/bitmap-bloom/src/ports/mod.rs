//! Ports Layer
//!
//! - Driving Port (inbound) - `MembershipFilterApi` for callers
//! - Driven Port (outbound) - `BitVectorStore` for the shared bitmap

pub mod inbound;
pub mod outbound;

pub use inbound::MembershipFilterApi;
pub use outbound::BitVectorStore;
