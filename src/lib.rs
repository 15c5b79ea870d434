// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # OCI CLI
//!
//! A command-line client for Oracle Cloud Infrastructure compute and identity.
//!
//! ## Overview
//!
//! The tool lists, describes and launches compute instances, walks the
//! compartment hierarchy and lists images and shapes. Resources can be named
//! by OCID or by display name:
//!
//! - Literal OCIDs are used as-is, without any API call
//! - Display names are matched exactly against a full (paginated) listing
//! - When several resources share a name, the first one returned wins
//!
//! ## Architecture
//!
//! 1. **Profile**: Loaded from `~/.oci/config` and passed explicitly
//! 2. **Client**: Signs every request with the profile's API key
//! 3. **Resolver**: Turns names into OCIDs through the service traits
//! 4. **Commands**: Observe or launch, then render text or JSON
//!
//! ## Modules
//!
//! - [`config`]: OCI config file and profiles
//! - [`oci`]: API models, request signing and the HTTP client
//! - [`resolver`]: Name to OCID resolution
//! - [`compartments`]: Recursive compartment listing
//! - [`instances`]: Instance queries and launch orchestration
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```text
//! oci-cli instances create \
//!     --compartment-id dev \
//!     --image-name "Canonical-Ubuntu-24.04-aarch64-2024.10.08-0" \
//!     --shape-name VM.Standard.A1.Flex --ocpus 2 --memory-in-gbs 12 \
//!     --subnet-id ocid1.subnet.oc1.iad.aaaa... \
//!     --availability-domain Uocm:US-ASHBURN-AD-1 \
//!     --public-keys "$(cat ~/.ssh/id_ed25519.pub)"
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod compartments;
pub mod config;
pub mod error;
pub mod instances;
pub mod oci;
pub mod resolver;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use compartments::{CompartmentNode, CompartmentWalker};
pub use config::{ConfigParser, Profile};
pub use error::{OciCliError, Result};
pub use instances::{InstanceLauncher, InstanceObserver, InstanceQuery, LaunchRequest};
pub use oci::{ComputeApi, IdentityApi, OciClient};
pub use resolver::Resolver;
