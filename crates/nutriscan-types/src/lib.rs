//! Shared API Types for NutriScan
//!
//! This crate is the SINGLE SOURCE OF TRUTH for all types crossing the
//! backend HTTP boundary and the image-host boundary.
//!
//! ## Boundaries
//!
//! ```text
//! ┌──────────────────┐  JSON   ┌──────────────────┐
//! │  nutriscan core  │ ◄─────► │  Backend API     │
//! │  (session, scan) │         │  /auth, /nutrition│
//! └──────────────────┘         └──────────────────┘
//!          │  multipart
//!          ▼
//! ┌──────────────────┐
//! │  Image host      │
//! └──────────────────┘
//! ```
//!
//! ## Rules
//!
//! 1. All wire types live here - no inline struct definitions in gateways
//! 2. Enums travel as lowercase strings
//! 3. User identifiers are opaque strings (the backend sends `uuid`)

pub mod auth;
pub mod image;
pub mod nutrition;

pub use auth::*;
pub use image::*;
pub use nutrition::*;
