//! Driver layer for stealth browser automation.
//!
//! This crate exposes the persistent-profile session launcher and the page
//! and element helpers the posting workflow uses to drive a platform's UI.
//!
//! - [`browser::session::StealthSession`]: WebDriver session bound to one profile
//! - [`browser::page::PageSurface`]: the seam the workflow engine drives; implemented
//!   by [`browser::page::LivePage`] in production and scripted fakes in tests
//! - [`browser::resolve`]: ordered selector-candidate resolution with bounded waits
//! - [`browser::behavioral::BehavioralEngine`]: human-like pacing
//! - [`browser::stealth`]: launch arguments and JS fingerprint patches
pub mod browser;
