// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Interactive 3D specimen viewport for anatomy learning.
//!
//! Anatomica shows one anatomical specimen at a time: it loads the
//! specimen's glTF scene (or falls back to a flat image), exposes a small
//! imperative camera API to its host, and maps pointer and touch gestures
//! to rotate, pan and dolly according to a host-owned interaction mode.
//!
//! # Key entry points
//!
//! - [`viewport::Viewport`] - the viewport controller
//! - [`camera::CameraHandle`] - zoom, rotate and reset commands for hosts
//! - [`catalog::Catalog`] - the specimens a host can select
//! - [`host::HostController`] - a reference host wiring catalog and
//!   viewport together
//! - [`options::Options`] - runtime configuration (camera, lighting, input,
//!   loader)
//!
//! # Architecture
//!
//! Asset fetching and glTF parsing run on a background
//! [`asset::AssetLoader`] thread. Every selection bumps a load generation,
//! and only a result for the latest generation is ever shown. Camera and
//! gesture state stay on the caller's thread; the viewport produces a
//! renderer-agnostic [`viewport::ViewportFrame`] each frame.

pub mod asset;
pub mod camera;
pub mod catalog;
pub mod error;
pub mod host;
pub mod input;
pub mod options;
pub mod util;
pub mod viewport;
