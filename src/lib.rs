//! Site services for the ZYBORN art auction.
//!
//! One binary hosts the CMS preview renderer (the pixel-matching HTML the
//! Decap editor shows while a page is being edited) and the small set of
//! form/verification endpoints the marketing site calls: email subscription,
//! press inquiries, operator broadcasts, bidder verification, NFC chip
//! authentication lookups, and the GitHub OAuth flow used by the CMS backend.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
