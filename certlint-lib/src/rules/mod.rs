//! Built-in compliance rules.
//!
//! Each rule module exposes a `register` function; [`register_all`] calls
//! them in a fixed order, which is also the order findings are reported in.

pub mod certificate;
pub mod extension;

use crate::registry::RegistryBuilder;

/// Register the complete rule set: certificate-level rules first, then
/// extension-level rules.
pub fn register_all(builder: &mut RegistryBuilder) {
    certificate::register(builder);
    extension::register(builder);
}
