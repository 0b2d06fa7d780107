use std::sync::Arc;

use crate::{Context, ReporterRenderer};

/// Builds a renderer for one reporting session.
pub type RendererFactory = fn(Arc<Context>) -> Box<dyn ReporterRenderer>;

/// What a reporter backend plugin hands to the host's plugin registry.
#[derive(Clone, Copy)]
pub struct ReporterBackend {
    pub name: &'static str,
    pub description: &'static str,
    pub renderer: RendererFactory,
}

impl ReporterBackend {
    pub fn instantiate(&self, context: Arc<Context>) -> Box<dyn ReporterRenderer> {
        tracing::debug!(backend = self.name, "instantiating reporter renderer");
        (self.renderer)(context)
    }
}

impl std::fmt::Debug for ReporterBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReporterBackend")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
