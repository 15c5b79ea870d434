//! Credential profile types.

use std::fmt;
use std::path::PathBuf;

/// Name of the profile used when none is requested.
pub const DEFAULT_PROFILE: &str = "DEFAULT";

/// A resolved credential profile from the OCI config file.
///
/// The profile is an explicit value handed to the API client; nothing in the
/// crate reads credentials from ambient process state.
#[derive(Clone, PartialEq, Eq)]
pub struct Profile {
    /// Profile (section) name.
    pub name: String,
    /// OCID of the API user.
    pub user: String,
    /// Fingerprint of the uploaded public key.
    pub fingerprint: String,
    /// OCID of the tenancy; also the root compartment.
    pub tenancy: String,
    /// Region identifier, e.g. `us-ashburn-1`.
    pub region: String,
    /// Path to the PEM private key.
    pub key_file: PathBuf,
    /// Passphrase of an encrypted private key.
    pub pass_phrase: Option<String>,
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("name", &self.name)
            .field("user", &self.user)
            .field("fingerprint", &self.fingerprint)
            .field("tenancy", &self.tenancy)
            .field("region", &self.region)
            .field("key_file", &self.key_file)
            .field("pass_phrase", &self.pass_phrase.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Profile {
    /// Returns the key id used in request signatures.
    #[must_use]
    pub fn key_id(&self) -> String {
        format!("{}/{}/{}", self.tenancy, self.user, self.fingerprint)
    }

    /// Returns a copy of this profile pointed at another region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }
}
