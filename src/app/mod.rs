//! Application core: port traits, the event vocabulary, and the session
//! service that drives one bring-up pass.
//!
//! Everything here talks to hardware only through the traits in
//! [`ports`], so the whole layer runs on the host against mocks.

pub mod events;
pub mod ports;
pub mod session;
