//! Per-extension rules, dispatched by extension OID.
//!
//! An extension OID with no check registered here is reported as unknown
//! by the registry, so every extension a conforming certificate may carry
//! needs at least one entry, even one that never reports anything.

pub mod basic_constraints;
pub mod ct;
pub mod ext_key_usage;
pub mod key_usage;
pub mod name_constraints;
pub mod non_critical;
pub mod ocsp_must_staple;
pub mod subject_alt_name;

use crate::registry::RegistryBuilder;

pub fn register(builder: &mut RegistryBuilder) {
    non_critical::register(builder);
    basic_constraints::register(builder);
    ct::register(builder);
    ext_key_usage::register(builder);
    key_usage::register(builder);
    name_constraints::register(builder);
    ocsp_must_staple::register(builder);
    subject_alt_name::register(builder);
}
