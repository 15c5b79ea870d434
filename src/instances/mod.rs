//! Instance commands.
//!
//! Read-only queries live in [`observer`], launch orchestration in
//! [`launcher`].

mod launcher;
mod observer;

pub use launcher::{
    InstanceLauncher, LaunchOutcome, LaunchRequest, default_display_name, pack_ssh_keys,
    shape_config, validate_sizing,
};
pub use observer::{InstanceObserver, InstanceQuery, DEFAULT_IMAGE_LIMIT, DEFAULT_SHAPE_LIMIT};

/// Picks the compartment input for a command.
///
/// An explicit tenancy-wide request wins over any compartment input, and
/// `None` means the tenancy root.
#[must_use]
pub fn compartment_input(use_tenancy: bool, compartment: Option<&str>) -> Option<&str> {
    if use_tenancy { None } else { compartment }
}
