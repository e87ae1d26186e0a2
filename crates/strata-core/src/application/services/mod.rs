//! Application services.

mod configurator;
mod layer_service;
mod resolver;

pub use configurator::{Configurator, NewLayer, Settings};
pub use layer_service::{EntryInfo, FilterInfo, LayerInfo, LayerService, TemplateInfo};
pub use resolver::{ResolvedTemplate, TemplateResolver};
