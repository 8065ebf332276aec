use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::{Repeater, TemplateView, ViewOptions};
use crate::core::RepeatError;
use crate::host::Host;
use crate::templating::TemplateRenderer;

/// A view kind that can be attached to a container and reconfigured later.
pub trait View: Sized {
    type Host: Host;

    fn attach(
        host: Self::Host,
        options: ViewOptions,
        renderer: TemplateRenderer,
    ) -> Result<Self, RepeatError>;

    /// Merge options into an attached view.
    fn reconfigure(&mut self, options: ViewOptions);
}

impl<H: Host> View for Repeater<H> {
    type Host = H;

    fn attach(host: H, options: ViewOptions, renderer: TemplateRenderer) -> Result<Self, RepeatError> {
        Repeater::attach(host, options, renderer)
    }

    fn reconfigure(&mut self, options: ViewOptions) {
        Repeater::reconfigure(self, options);
    }
}

impl<H: Host> View for TemplateView<H> {
    type Host = H;

    fn attach(host: H, options: ViewOptions, renderer: TemplateRenderer) -> Result<Self, RepeatError> {
        TemplateView::attach(host, options, renderer)
    }

    fn reconfigure(&mut self, options: ViewOptions) {
        TemplateView::reconfigure(self, options);
    }
}

/// One view per container id, all sharing one renderer (and so one cache).
pub struct Registry<V: View> {
    renderer: TemplateRenderer,
    views: HashMap<String, V>,
}

impl<V: View> Registry<V> {
    pub fn new(renderer: TemplateRenderer) -> Self {
        Self {
            renderer,
            views: HashMap::new(),
        }
    }

    /// Attach a view to `container_id`, or merge `options` into the view
    /// already attached there. `make_host` is only called for a new view.
    pub fn attach<F>(
        &mut self,
        container_id: &str,
        make_host: F,
        options: ViewOptions,
    ) -> Result<&mut V, RepeatError>
    where
        F: FnOnce() -> V::Host,
    {
        match self.views.entry(container_id.to_string()) {
            Entry::Occupied(entry) => {
                tracing::debug!(container = container_id, "Reconfiguring attached view");
                let view = entry.into_mut();
                view.reconfigure(options);
                Ok(view)
            }
            Entry::Vacant(entry) => {
                let view = V::attach(make_host(), options, self.renderer.clone())?;
                Ok(entry.insert(view))
            }
        }
    }

    pub fn get(&self, container_id: &str) -> Option<&V> {
        self.views.get(container_id)
    }

    pub fn get_mut(&mut self, container_id: &str) -> Option<&mut V> {
        self.views.get_mut(container_id)
    }

    /// Remove a view; its item cache goes with it.
    pub fn detach(&mut self, container_id: &str) -> Option<V> {
        self.views.remove(container_id)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }
}
