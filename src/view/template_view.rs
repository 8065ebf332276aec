use serde_json::{Map, Value};

use super::properties::PropertyStore;
use super::{Affected, ViewOptions};
use crate::constants::PROCESSED_CLASS;
use crate::core::RepeatError;
use crate::expr::{Helpers, Scope, ScopeVars};
use crate::host::Host;
use crate::templating::TemplateRenderer;

const SYNCED: &[&str] = &["templateId"];

type UpdateFn<H> = dyn FnMut(Affected<'_>, &TemplateView<H>);

/// Renders one template against the whole state into a container.
///
/// The template comes from the `template` property, else from the template
/// registered under `templateId`, else from the content the container had
/// when the view was attached.
pub struct TemplateView<H: Host> {
    host: H,
    renderer: TemplateRenderer,
    helpers: Helpers,
    props: PropertyStore,
    initial_content: String,
    on_update: Option<Box<UpdateFn<H>>>,
}

impl<H: Host> TemplateView<H> {
    /// Attach to a container. Fails with [`RepeatError::MissingState`] when no
    /// state is given.
    pub fn attach(
        mut host: H,
        options: ViewOptions,
        renderer: TemplateRenderer,
    ) -> Result<Self, RepeatError> {
        let (properties, helpers) = options.into_properties();
        if properties.get("state").is_none_or(Value::is_null) {
            return Err(RepeatError::MissingState);
        }
        let initial_content = host.inner_html();
        let props = PropertyStore::seed(&mut host, SYNCED, Map::new(), properties);

        Ok(Self {
            host,
            renderer,
            helpers: helpers.unwrap_or_default(),
            props,
            initial_content,
            on_update: None,
        })
    }

    /// Render and write the container if the markup changed.
    pub fn render(&mut self) -> Result<&mut Self, RepeatError> {
        let state = self.state()?;
        let template = self.template()?;

        self.host.add_container_class(PROCESSED_CLASS);
        let vars = ScopeVars::new();
        let markup = self.renderer.render(&template, &Scope::new(&state, &vars, &self.helpers));

        if markup == self.host.inner_html() {
            tracing::debug!("Markup unchanged, container left as is");
        } else {
            self.host.set_inner_html(&markup);
            self.notify();
        }
        Ok(self)
    }

    pub fn set(&mut self, key: &str, value: Value) -> &mut Self {
        self.props.set(&mut self.host, key, Some(value));
        self
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.props.get(&self.host, key)
    }

    /// Register the callback run after each container write.
    pub fn on_update<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnMut(Affected<'_>, &Self) + 'static,
    {
        self.on_update = Some(Box::new(callback));
        self
    }

    /// Optionally replace the `template` property, then return the active template.
    pub fn tpl(&mut self, set: Option<&str>) -> Result<String, RepeatError> {
        if let Some(template) = set.filter(|t| !t.is_empty()) {
            self.set("template", Value::String(template.to_string()));
        }
        self.template()
    }

    /// The active template: `template`, then `templateId`, then the initial content.
    pub fn template(&self) -> Result<String, RepeatError> {
        if let Some(Value::String(template)) = self.get("template")
            && !template.is_empty()
        {
            return Ok(template);
        }
        if let Some(Value::String(id)) = self.get("templateId")
            && !id.is_empty()
        {
            return self.host.resolve_template(&id).ok_or(RepeatError::TemplateNotFound {
                id,
            });
        }
        Ok(self.initial_content.clone())
    }

    pub fn helpers_mut(&mut self) -> &mut Helpers {
        &mut self.helpers
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Give back the host, dropping the view.
    pub fn detach(self) -> H {
        self.host
    }

    /// Apply options to an attached view without rendering.
    pub fn reconfigure(&mut self, options: ViewOptions) {
        let (properties, helpers) = options.into_properties();
        for (key, value) in properties {
            self.props.set(&mut self.host, &key, Some(value));
        }
        if let Some(helpers) = helpers {
            self.helpers = helpers;
        }
    }

    fn state(&self) -> Result<Value, RepeatError> {
        self.get("state").filter(|state| !state.is_null()).ok_or(RepeatError::MissingState)
    }

    fn notify(&mut self) {
        if let Some(mut callback) = self.on_update.take() {
            callback(Affected::Container, self);
            if self.on_update.is_none() {
                self.on_update = Some(callback);
            }
        }
    }
}
