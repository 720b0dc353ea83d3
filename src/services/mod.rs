pub mod registry;

pub use registry::{LocationDrift, LocationResync, Managed, RegistryService};
