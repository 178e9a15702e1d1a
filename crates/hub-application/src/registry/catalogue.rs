//! Compile-time component catalogue
//!
//! Provider crates contribute descriptors through a linkme distributed
//! slice. Contributing to the catalogue does not activate anything: a
//! descriptor only takes part in resolution once the composition routine
//! registers it with a [`Registry`](super::Registry).

use hub_domain::value_objects::CapabilityDescriptor;

/// Every descriptor linked into the binary
///
/// ```ignore
/// #[linkme::distributed_slice(COMPONENTS)]
/// static CLOCK: CapabilityDescriptor = CapabilityDescriptor { /* ... */ };
/// ```
#[linkme::distributed_slice]
pub static COMPONENTS: [CapabilityDescriptor] = [..];

/// Find a catalogue descriptor by name
pub fn find_in_catalogue(name: &str) -> Option<&'static CapabilityDescriptor> {
    COMPONENTS.iter().find(|descriptor| descriptor.name == name)
}

/// List every catalogue entry as `(name, description)`, sorted by name
///
/// Useful for CLI help.
pub fn list_catalogue() -> Vec<(&'static str, &'static str)> {
    let mut entries: Vec<_> = COMPONENTS
        .iter()
        .map(|descriptor| (descriptor.name, descriptor.description))
        .collect();
    entries.sort_unstable();
    entries
}
