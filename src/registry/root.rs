use log::debug;

use super::nwbfile::get_schema_for_nwbfile;
use crate::schema::{get_root_schema, SchemaError, SchemaNode};

/// Assemble the root metadata schema.
///
/// The root carries the Draft-07 dialect, the `NWBFile` section and one
/// required top-level property per entry of `sections`, in the given order.
/// A section named `NWBFile` replaces the authored one.
pub fn assemble_root_schema<I, K>(sections: I) -> Result<SchemaNode, SchemaError>
where
    I: IntoIterator<Item = (K, SchemaNode)>,
    K: Into<String>,
{
    let mut root = get_root_schema();
    root.require("NWBFile");
    root.insert_property("NWBFile", get_schema_for_nwbfile());

    for (name, section) in sections {
        let name = name.into();
        debug!("Adding metadata section '{}' (tag '{}')", name, section.tag);
        section.check_invariants()?;
        root.require(name.clone());
        root.insert_property(name, section);
    }

    root.check_invariants()?;
    Ok(root)
}
