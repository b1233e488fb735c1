//! Whole-certificate rules.

pub mod aia_issuers;
pub mod basic_constraints;
pub mod ext_key_usage;
pub mod internal;
pub mod issuer_dn;
pub mod key_usage;
pub mod public_key;
pub mod public_suffix;
pub mod revocation;
pub mod subject;
pub mod subject_alt_name;
pub mod validity;
pub mod version;
pub mod wildcard;

use crate::registry::RegistryBuilder;

pub fn register(builder: &mut RegistryBuilder) {
    version::register(builder);
    validity::register(builder);
    subject::register(builder);
    subject_alt_name::register(builder);
    wildcard::register(builder);
    key_usage::register(builder);
    ext_key_usage::register(builder);
    basic_constraints::register(builder);
    internal::register(builder);
    public_suffix::register(builder);
    issuer_dn::register(builder);
    revocation::register(builder);
    aia_issuers::register(builder);
    public_key::register(builder);
}
