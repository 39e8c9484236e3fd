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
// Complexity limits (thresholds in clippy.toml)
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

//! Step-by-step simulations of standard container internals.
//!
//! Collectviz re-implements the structural behaviour of common collections
//! (growth policy, rehash threshold, chaining, red-black rotations, heap
//! sifts, segment routing) so that every change a renderer animates is a
//! real, checkable change in the structure.
//!
//! # Key entry points
//!
//! - [`containers`] - the simulated containers and the [`containers::Container`]
//!   contract a renderer consumes
//! - [`entity::AnimatedEntity`] - per-item lifecycle and interpolation state
//! - [`workbench::Workbench`] - every container side by side, driven by
//!   textual commands
//! - [`options::Options`] - layout, animation, container sizing and colours,
//!   loadable from TOML presets
//! - [`memory`] - static memory-footprint estimates
//!
//! # Architecture
//!
//! Containers own their live entities. Removing a value hands its entity to
//! the container's departure queue, where it keeps fading until `tick`
//! reclaims it; it no longer counts for size, search or iteration. Nothing
//! is drawn here: a front-end reads positions, alpha and highlight from the
//! entities after each tick.

pub mod containers;
pub mod entity;
pub mod error;
pub mod layout;
pub mod memory;
pub mod options;
pub mod util;
pub mod value;
pub mod workbench;
