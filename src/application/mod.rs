//! Application services: page preview rendering and the public API flows
//! (subscriptions, press inquiries, bidder verification, broadcast mail,
//! chip authentication, and the CMS OAuth handshake).

pub mod auth;
pub mod broadcast;
pub mod chips;
pub mod delivery;
pub mod error;
pub mod press;
pub mod preview;
pub mod render;
pub mod stores;
pub mod subscribers;
pub mod verification;
