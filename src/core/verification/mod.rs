//! Google Site Verification API.
//!
//! Requests FILE verification tokens and asks Google to confirm them once the
//! file is reachable on the live site.

pub mod client;

pub use client::{
    SiteVerificationClient, SiteVerifier, VERIFICATION_CONTENT_PREFIX, VerificationToken,
};
