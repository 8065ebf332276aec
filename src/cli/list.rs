//! `repeatkit list`: render a JSON array in list mode.
//!
//! With `--next` the same view is re-rendered against each later state in
//! turn, so the output shows the container after every step. `--trace`
//! prints the container operations each step needed, which makes the keyed
//! reconciliation visible:
//!
//! ```text
//! $ repeatkit list --json '[{"id":1},{"id":2}]' --next later.json \
//!       --track-by id --template '<li>{{ id }}</li>' --trace
//! replace all: #0 #1
//! <li>1</li><li>2</li>
//! add class repeat-exit to #0
//! replace #1 with #2
//! insert #3 after #2
//! remove #0
//! <li>2</li><li>3</li>
//! ```

use anyhow::{Result, bail};
use clap::Args;
use serde_json::Value;
use std::cmp::Ordering;
use std::path::PathBuf;

use super::CliConfig;
use super::common::{StateArgs, TemplateArgs, container, read_json_file};
use crate::codec;
use crate::config::RepeatConfig;
use crate::constants::INDEX_BINDING;
use crate::expr::{Scope, ScopeVars, is_truthy};
use crate::host::{Anchor, Host, HostOp, MemoryHost};
use crate::templating::TemplateRenderer;
use crate::view::Repeater;

#[derive(Args, Debug)]
pub struct ListCommand {
    #[command(flatten)]
    state: StateArgs,

    #[command(flatten)]
    template: TemplateArgs,

    /// Wrap each element as <TAG>{{$self}}</TAG> when no template is given
    #[arg(long, value_name = "TAG")]
    tag: Option<String>,

    /// Expression computing each element's key
    #[arg(long, value_name = "EXPR")]
    track_by: Option<String>,

    /// Items per page (0 shows everything)
    #[arg(short, long)]
    limit: Option<u64>,

    /// Page to show, clamped to the available pages
    #[arg(short, long)]
    page: Option<i64>,

    /// Keep only elements for which this expression is truthy
    #[arg(long, value_name = "EXPR")]
    filter: Option<String>,

    /// Order elements by the value of this expression
    #[arg(long, value_name = "EXPR")]
    sort_by: Option<String>,

    /// Reverse the --sort-by order
    #[arg(long, requires = "sort_by")]
    desc: bool,

    /// Milliseconds the enter class stays on inserted items
    #[arg(long, value_name = "MS")]
    transition_enter: Option<u64>,

    /// Milliseconds removed items keep the exit class before the commit
    #[arg(long, value_name = "MS")]
    transition_exit: Option<u64>,

    /// Later state files, rendered in order after the first state
    #[arg(long = "next", value_name = "FILE")]
    next: Vec<PathBuf>,

    /// Print the container operations of every step
    #[arg(long)]
    trace: bool,

    /// Print cache statistics after the last step
    #[arg(long)]
    stats: bool,
}

impl ListCommand {
    pub async fn execute(self, cli: &CliConfig) -> Result<()> {
        let config = cli.load_config().await?;
        for line in self.run(&config).await? {
            println!("{line}");
        }
        Ok(())
    }

    /// Run every step and return the output lines.
    pub async fn run(&self, config: &RepeatConfig) -> Result<Vec<String>> {
        let renderer = TemplateRenderer::default();
        let helpers = self.template.helpers(config);
        let mut options = config.list_options().with_state(self.state.load().await?);

        let template = self.template.text(config).await?;
        if let Some(text) = template.clone() {
            options = options.with_template(text);
        }
        if let Some(id) = &self.template.template_id {
            options = options.with_template_id(id.clone());
        }
        if let Some(tag) = &self.tag {
            options = options.with_tag(tag.clone());
        }
        if template.is_none() && options.template_id.is_none() && options.tag.is_none() {
            bail!("No template given: use --template, --template-file, --template-id or --tag");
        }
        if let Some(track_by) = &self.track_by {
            options = options.with_track_by(track_by.clone());
        }
        if let Some(limit) = self.limit {
            options = options.with_limit(limit);
        }
        if self.transition_enter.is_some() || self.transition_exit.is_some() {
            options = options.with_transitions(
                self.transition_enter.or(config.transition_enter).unwrap_or(0),
                self.transition_exit.or(config.transition_exit).unwrap_or(0),
            );
        }

        let mut repeater =
            Repeater::attach(container(config), options.with_helpers(helpers.clone()), renderer.clone())?;
        repeater.host_mut().take_ops();

        if let Some(expression) = self.filter.clone() {
            let evaluator = renderer.evaluator().clone();
            let helpers = helpers.clone();
            repeater.filter(move |item, index| {
                let mut vars = ScopeVars::new();
                vars.insert(INDEX_BINDING.to_string(), Value::from(index));
                is_truthy(evaluator.evaluate(&expression, &Scope::new(item, &vars, &helpers)).as_ref())
            });
        }
        if let Some(expression) = self.sort_by.clone() {
            let evaluator = renderer.evaluator().clone();
            let helpers = helpers.clone();
            let descending = self.desc;
            repeater.sort(move |a, b| {
                let vars = ScopeVars::new();
                let left = evaluator.evaluate(&expression, &Scope::new(a, &vars, &helpers));
                let right = evaluator.evaluate(&expression, &Scope::new(b, &vars, &helpers));
                let ordering = compare_values(left.as_ref(), right.as_ref());
                if descending { ordering.reverse() } else { ordering }
            });
        }
        if let Some(page) = self.page {
            repeater.set_page(page)?;
        }

        let mut lines = Vec::new();
        repeater.render(false)?;
        settle(&mut repeater).await;
        self.report(&mut repeater, &mut lines);

        for path in &self.next {
            let state = read_json_file(path).await?;
            tracing::debug!(path = %path.display(), "Rendering next state");
            repeater.set("state", state).render(false)?;
            settle(&mut repeater).await;
            self.report(&mut repeater, &mut lines);
        }

        if self.stats {
            let stats = repeater.stats();
            lines.push(format!(
                "items cached: {}, committed: {}, render hits: {}, misses: {}, hit rate: {:.1}%",
                stats.cached_items,
                stats.committed_items,
                stats.render_hits,
                stats.render_misses,
                renderer.cache().hit_rate()
            ));
        }
        Ok(lines)
    }

    fn report(&self, repeater: &mut Repeater<MemoryHost>, lines: &mut Vec<String>) {
        let ops = repeater.host_mut().take_ops();
        if self.trace {
            lines.extend(ops.iter().filter_map(describe));
        }
        lines.push(repeater.host().inner_html());
    }
}

/// Wait out every pending commit and enter transition.
async fn settle(repeater: &mut Repeater<MemoryHost>) {
    while let Some(deadline) = repeater.next_deadline() {
        tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        repeater.poll(std::time::Instant::now());
    }
}

/// Order for `--sort-by` keys: absent first, then numbers, strings, and
/// anything else by its JSON text.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => codec::canonical(Some(x)).cmp(&codec::canonical(Some(y))),
    }
}

fn describe(op: &HostOp) -> Option<String> {
    let line = match op {
        HostOp::ReplaceItems(nodes) => {
            let nodes: Vec<String> = nodes.iter().map(ToString::to_string).collect();
            format!("replace all: {}", nodes.join(" "))
        }
        HostOp::Insert {
            node,
            anchor: Anchor::After(anchor),
        } => format!("insert {node} after {anchor}"),
        HostOp::Insert {
            node,
            anchor: Anchor::Prepend,
        } => format!("insert {node} at start"),
        HostOp::Replace {
            old,
            new,
        } => format!("replace {old} with {new}"),
        HostOp::Detach(node) => format!("remove {node}"),
        HostOp::ItemClass {
            node,
            class,
            enabled: true,
        } => format!("add class {class} to {node}"),
        HostOp::ItemClass {
            node,
            class,
            enabled: false,
        } => format!("remove class {class} from {node}"),
        HostOp::SetAttribute { .. } | HostOp::SetInnerHtml
        | HostOp::AddContainerClass(_) => return None,
    };
    Some(line)
}
