//! Vendor-facing configuration (descriptor, regions) and the response envelope.
//!
//! `descriptor` holds the validated endpoint metadata (`VendorDescriptor`) every flow consults:
//! the OpenAPI origin, the token path, and the outbound timeout. `region` lists the published
//! data-center hosts, and `envelope` decodes the `{ success, result, code, msg, t }` wrapper the
//! vendor puts around every payload.

pub mod descriptor;
pub mod envelope;
pub mod region;

pub use descriptor::*;
pub use envelope::*;
pub use region::*;
