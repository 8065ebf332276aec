//! `repeatkit render`: render one template against a whole state.

use anyhow::{Result, bail};
use clap::Args;

use super::CliConfig;
use super::common::{StateArgs, TemplateArgs, container};
use crate::config::RepeatConfig;
use crate::host::Host;
use crate::templating::TemplateRenderer;
use crate::view::{TemplateView, ViewOptions};

#[derive(Args, Debug)]
pub struct RenderCommand {
    #[command(flatten)]
    state: StateArgs,

    #[command(flatten)]
    template: TemplateArgs,
}

impl RenderCommand {
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let config = cli.load_config().await?;
        let markup = self.run(&config).await?;
        println!("{markup}");
        Ok(())
    }

    /// Render and return the container content.
    pub async fn run(&self, config: &RepeatConfig) -> Result<String> {
        let state = self.state.load().await?;
        let mut options = ViewOptions::new()
            .with_state(state)
            .with_helpers(self.template.helpers(config));
        match (self.template.text(config).await?, &self.template.template_id) {
            (Some(text), _) => options = options.with_template(text),
            (None, Some(id)) => options = options.with_template_id(id.clone()),
            (None, None) => bail!("No template given: use --template, --template-file or --template-id"),
        }

        let mut view = TemplateView::attach(container(config), options, TemplateRenderer::default())?;
        view.render()?;
        Ok(view.host().inner_html())
    }
}
