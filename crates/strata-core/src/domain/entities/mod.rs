pub mod filter;
pub mod layer;
pub mod registry;

pub use filter::{FilterRegistration, NoteFilter, TemplateFilter, TemplateRef};
pub use layer::{CUSTOM_LABEL, EntryKind, LayerDecl, LayerEntry};
pub use registry::{DEFAULT_EXTENSION, Layer, LayerRegistry, RegistryBuilder};
