//! List-mode view.
//!
//! A [`Repeater`] renders its template once per element of an array state.
//! Each element becomes an item with a key and a content hash; items whose
//! key and hash are unchanged keep their node across renders, everything else
//! goes through [`reconcile`](crate::reconcile::reconcile).
//!
//! # Commits and transitions
//!
//! A render computes its whole result at once. Items about to be removed get
//! the exit class straight away; if there are any and `transitionExit` is
//! positive, the commit waits until that many milliseconds have passed so the
//! exit can play. Otherwise it is applied immediately. Inserted items get the
//! enter class at commit time, removed again `transitionEnter` milliseconds
//! later.
//!
//! The view owns no timers. The embedding event loop asks for
//! [`Repeater::next_deadline`] and calls [`Repeater::poll`] when it passes;
//! [`Repeater::flush`] applies everything at once. A render always flushes a
//! pending commit first, so at most one commit is ever pending and commits run
//! in request order.

use serde_json::{Map, Value, json};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use super::properties::PropertyStore;
use super::{Affected, ViewOptions, ViewStats};
use crate::codec;
use crate::constants::{ENTER_CLASS, EXIT_CLASS, INDEX_BINDING, INDEX_KEY_PREFIX};
use crate::core::RepeatError;
use crate::expr::{Helpers, Scope, ScopeVars};
use crate::host::{Host, ItemNode, NodeId};
use crate::reconcile::{ItemKey, Plan, Slot, reconcile};
use crate::templating::{TemplateRenderer, escape_html};

const SYNCED: &[&str] =
    &["transitionExit", "transitionEnter", "limit", "page", "tag", "trackBy", "templateId"];

/// Keeps list elements for which it returns true; receives the element and
/// its index in the state.
pub type FilterFn = dyn Fn(&Value, usize) -> bool;

/// Orders list elements; ties keep state order.
pub type SortFn = dyn Fn(&Value, &Value) -> Ordering;

type UpdateFn<H> = dyn FnMut(Affected<'_>, &Repeater<H>);

#[derive(Debug, Clone)]
struct CachedItem {
    hash: u64,
    node: NodeId,
    markup: String,
}

#[derive(Debug)]
struct Commit {
    plan: Plan,
    markup: HashMap<NodeId, String>,
}

/// Renders an array state as a sequence of keyed items.
pub struct Repeater<H: Host> {
    host: H,
    renderer: TemplateRenderer,
    helpers: Helpers,
    props: PropertyStore,
    initial_content: String,
    filter: Option<Box<FilterFn>>,
    sort: Option<Box<SortFn>>,
    /// State indices of the filtered and sorted list.
    filtered: Vec<usize>,
    refilter: bool,
    /// Key to item cache; lives as long as the view.
    items: HashMap<ItemKey, CachedItem>,
    committed: Vec<Slot>,
    pending: Option<(Commit, Instant)>,
    enter_timers: Vec<(Instant, Vec<NodeId>)>,
    next_node: u64,
    on_update: Option<Box<UpdateFn<H>>>,
}

impl<H: Host> Repeater<H> {
    /// Attach to a container. Fails with [`RepeatError::MissingState`] when no
    /// state is given. Nothing is rendered until [`Repeater::render`].
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
        let props = PropertyStore::seed(&mut host, SYNCED, defaults(), properties);

        Ok(Self {
            host,
            renderer,
            helpers: helpers.unwrap_or_default(),
            props,
            initial_content,
            filter: None,
            sort: None,
            filtered: Vec::new(),
            refilter: true,
            items: HashMap::new(),
            committed: Vec::new(),
            pending: None,
            enter_timers: Vec::new(),
            next_node: 0,
            on_update: None,
        })
    }

    /// Keep only elements matching `predicate`; resets to the first page.
    pub fn filter<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&Value, usize) -> bool + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self.set_property("page", json!(0));
        self.refilter = true;
        self
    }

    /// Order elements with `compare`; equal elements keep state order.
    pub fn sort<F>(&mut self, compare: F) -> &mut Self
    where
        F: Fn(&Value, &Value) -> Ordering + 'static,
    {
        self.sort = Some(Box::new(compare));
        self.refilter = true;
        self
    }

    /// Drop the filter and sort and go back to the first page.
    pub fn reset(&mut self) -> &mut Self {
        self.filter = None;
        self.sort = None;
        self.set_property("page", json!(0));
        self.refilter = true;
        self
    }

    pub fn next_page(&mut self) -> Result<&mut Self, RepeatError> {
        let page = self.page();
        self.set_page(page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> Result<&mut Self, RepeatError> {
        let page = self.page();
        self.set_page(page.saturating_sub(1))
    }

    /// Go to `page`, clamped to the pages of the filtered list.
    ///
    /// Without a `limit` there is a single page 0; an empty list also clamps
    /// to 0. Does not render.
    pub fn set_page(&mut self, page: i64) -> Result<&mut Self, RepeatError> {
        let limit = self.limit();
        let count = self.length()?;
        let page = if limit == 0 || count == 0 {
            0
        } else {
            let last = i64::try_from((count - 1) / limit).unwrap_or(i64::MAX);
            page.clamp(0, last)
        };
        self.set_property("page", json!(page));
        Ok(self)
    }

    /// Length of the filtered list.
    pub fn length(&mut self) -> Result<usize, RepeatError> {
        let state = self.state()?;
        let list = as_list(&state)?;
        if self.refilter {
            self.recompute(list);
        }
        Ok(self.filtered.len())
    }

    pub fn page(&self) -> i64 {
        self.get("page").and_then(|page| page.as_i64()).unwrap_or(0)
    }

    /// Render the current page and commit it, now or after the exit transition.
    ///
    /// `force_reset` re-renders every item and rewrites the whole container.
    pub fn render(&mut self, force_reset: bool) -> Result<&mut Self, RepeatError> {
        self.flush_commit();

        let state = self.state()?;
        let list = as_list(&state)?;
        if self.refilter {
            self.recompute(list);
        }

        let template = self.template();
        let track_by = self.string_property("trackBy");
        let window = self.window();
        tracing::debug!(
            items = self.filtered.len(),
            start = window.start,
            end = window.end,
            force_reset,
            "Rendering list"
        );

        let mut entries = Vec::with_capacity(window.len());
        for position in window {
            let source = self.filtered[position];
            let key = match &track_by {
                Some(expression) => {
                    let vars = position_vars(position);
                    let scope = Scope::new(&list[source], &vars, &self.helpers);
                    codec::display(self.renderer.evaluator().evaluate(expression, &scope).as_ref())
                }
                None => format!("{INDEX_KEY_PREFIX}{source}"),
            };
            entries.push((key, position, source));
        }
        let entries = keep_last_per_key(entries, |(key, _, _)| key.as_str());

        let mut candidates = Vec::with_capacity(entries.len());
        let mut markup = HashMap::with_capacity(entries.len());
        for (key, position, source) in entries {
            let vars = position_vars(position);
            let scope = Scope::new(&list[source], &vars, &self.helpers);
            let hash = self.renderer.content_hash(&template, &scope);

            let reusable = self
                .items
                .get(&key)
                .filter(|cached| cached.hash == hash && !force_reset)
                .map(|cached| (cached.node, cached.markup.clone()));
            let (node, text) = match reusable {
                Some(reused) => reused,
                None => {
                    let text = self.renderer.render(&template, &scope);
                    let node = NodeId(self.next_node);
                    self.next_node += 1;
                    self.items.insert(
                        key.clone(),
                        CachedItem {
                            hash,
                            node,
                            markup: text.clone(),
                        },
                    );
                    (node, text)
                }
            };

            markup.insert(node, text);
            candidates.push(Slot {
                key,
                node,
                hash,
                position,
            });
        }

        let plan = reconcile(&self.committed, &candidates, force_reset);

        for node in &plan.removed {
            self.host.set_item_class(*node, EXIT_CLASS, true);
        }

        let commit = Commit {
            plan,
            markup,
        };
        let exit = self.millis("transitionExit");
        if !commit.plan.removed.is_empty() && !exit.is_zero() {
            tracing::debug!(
                removed = commit.plan.removed.len(),
                delay_ms = exit.as_millis() as u64,
                "Deferring commit for exit transition"
            );
            self.pending = Some((commit, Instant::now() + exit));
        } else {
            self.apply(commit);
        }
        Ok(self)
    }

    /// Recompute the filtered list from the current state, then render.
    pub fn refresh(&mut self) -> Result<&mut Self, RepeatError> {
        self.refilter = true;
        self.render(false)
    }

    /// Set a property. Setting `state` invalidates the filtered list.
    pub fn set(&mut self, key: &str, value: Value) -> &mut Self {
        self.set_property(key, value);
        if key == "state" {
            self.refilter = true;
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.props.get(&self.host, key)
    }

    /// Register the callback run after each commit with the inserted items.
    pub fn on_update<F>(&mut self, callback: F) -> &mut Self
    where
        F: FnMut(Affected<'_>, &Self) + 'static,
    {
        self.on_update = Some(Box::new(callback));
        self
    }

    /// Optionally replace the `template` property, then return the active template.
    pub fn tpl(&mut self, set: Option<&str>) -> String {
        if let Some(template) = set.filter(|t| !t.is_empty()) {
            self.set("template", Value::String(template.to_string()));
        }
        self.template()
    }

    /// The active template: the one registered under `templateId`, then a
    /// `tag` wrapper around `{{$self}}`, then `template`, then the initial
    /// container content.
    pub fn template(&self) -> String {
        if let Some(id) = self.string_property("templateId") {
            if let Some(template) = self.host.resolve_template(&id) {
                return template;
            }
            tracing::debug!(template_id = %id, "Template id did not resolve, falling back");
        }
        if let Some(tag) = self.string_property("tag") {
            let tag = escape_html(&tag);
            return format!("<{tag}>{{{{$self}}}}</{tag}>");
        }
        self.string_property("template").unwrap_or_else(|| self.initial_content.clone())
    }

    /// Apply a pending commit whose deadline has passed and end enter
    /// transitions that are due.
    pub fn poll(&mut self, now: Instant) {
        if self.pending.as_ref().is_some_and(|(_, due)| *due <= now) {
            self.flush_commit();
        }

        let (due, waiting): (Vec<_>, Vec<_>) =
            self.enter_timers.drain(..).partition(|(deadline, _)| *deadline <= now);
        self.enter_timers = waiting;
        for (_, nodes) in due {
            for node in nodes {
                self.host.set_item_class(node, ENTER_CLASS, false);
            }
        }
    }

    /// The earliest instant at which [`Repeater::poll`] has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending
            .iter()
            .map(|(_, due)| *due)
            .chain(self.enter_timers.iter().map(|(deadline, _)| *deadline))
            .min()
    }

    /// Apply the pending commit and end every enter transition now.
    pub fn flush(&mut self) -> &mut Self {
        self.flush_commit();
        for (_, nodes) in std::mem::take(&mut self.enter_timers) {
            for node in nodes {
                self.host.set_item_class(node, ENTER_CLASS, false);
            }
        }
        self
    }

    /// Keys of the committed items, in container order.
    pub fn committed_keys(&self) -> Vec<&str> {
        self.committed.iter().map(|slot| slot.key.as_str()).collect()
    }

    pub fn stats(&self) -> ViewStats {
        let (render_hits, render_misses) = self.renderer.cache().stats();
        ViewStats {
            cached_items: self.items.len(),
            committed_items: self.committed.len(),
            pending_commit: self.pending.is_some(),
            render_hits,
            render_misses,
        }
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

    /// Give back the host, dropping the view and its item cache.
    pub fn detach(mut self) -> H {
        self.flush();
        self.host
    }

    /// Apply options to an attached view without rendering.
    pub fn reconfigure(&mut self, options: ViewOptions) {
        let (properties, helpers) = options.into_properties();
        for (key, value) in properties {
            self.set(&key, value);
        }
        if let Some(helpers) = helpers {
            self.helpers = helpers;
        }
    }

    fn state(&self) -> Result<Value, RepeatError> {
        self.get("state").filter(|state| !state.is_null()).ok_or(RepeatError::MissingState)
    }

    fn set_property(&mut self, key: &str, value: Value) {
        self.props.set(&mut self.host, key, Some(value));
    }

    /// A property as non-empty text.
    fn string_property(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::Null => None,
            Value::String(text) if text.is_empty() => None,
            value => Some(codec::display(Some(&value))),
        }
    }

    fn limit(&self) -> usize {
        self.get("limit")
            .and_then(|limit| limit.as_u64())
            .and_then(|limit| usize::try_from(limit).ok())
            .unwrap_or(0)
    }

    fn millis(&self, key: &str) -> Duration {
        Duration::from_millis(self.get(key).and_then(|ms| ms.as_u64()).unwrap_or(0))
    }

    fn recompute(&mut self, list: &[Value]) {
        let mut indices: Vec<usize> = (0..list.len())
            .filter(|&i| self.filter.as_ref().is_none_or(|keep| keep(&list[i], i)))
            .collect();
        if let Some(compare) = &self.sort {
            indices.sort_by(|&a, &b| compare(&list[a], &list[b]).then(a.cmp(&b)));
        }
        tracing::debug!(total = list.len(), kept = indices.len(), "Recomputed filtered list");
        self.filtered = indices;
        self.refilter = false;
    }

    /// Positions of the current page within the filtered list.
    fn window(&self) -> std::ops::Range<usize> {
        let len = self.filtered.len();
        let limit = self.limit();
        if limit == 0 {
            return 0..len;
        }
        let page = usize::try_from(self.page().max(0)).unwrap_or(0);
        let start = page.saturating_mul(limit).min(len);
        let end = start.saturating_add(limit).min(len);
        start..end
    }

    fn flush_commit(&mut self) {
        if let Some((commit, _)) = self.pending.take() {
            tracing::debug!("Applying pending commit");
            self.apply(commit);
        }
    }

    fn apply(&mut self, commit: Commit) {
        let Commit {
            plan,
            markup,
        } = commit;
        let item = |node: NodeId| ItemNode {
            id: node,
            markup: markup.get(&node).cloned().unwrap_or_default(),
        };

        if plan.full_replace {
            let items: Vec<ItemNode> = plan.sequence.iter().map(|slot| item(slot.node)).collect();
            self.host.replace_items(&items);
        } else {
            for replacement in &plan.replaced {
                self.host.replace_item(replacement.old, &item(replacement.new));
            }
            for insertion in &plan.inserted {
                self.host.insert_item(&item(insertion.node), insertion.anchor);
            }
            for node in &plan.removed {
                self.host.detach_item(*node);
            }
        }

        let inserted = plan.inserted_nodes();
        let enter = self.millis("transitionEnter");
        if !enter.is_zero() && !inserted.is_empty() {
            for node in &inserted {
                self.host.set_item_class(*node, ENTER_CLASS, true);
            }
            self.enter_timers.push((Instant::now() + enter, inserted.clone()));
        }

        tracing::debug!(
            full_replace = plan.full_replace,
            inserted = plan.inserted.len(),
            replaced = plan.replaced.len(),
            removed = plan.removed.len(),
            retained = plan.retained.len(),
            "Committed list"
        );
        self.committed = plan.sequence;
        self.notify(&inserted);
    }

    fn notify(&mut self, inserted: &[NodeId]) {
        if let Some(mut callback) = self.on_update.take() {
            callback(Affected::Items(inserted), self);
            if self.on_update.is_none() {
                self.on_update = Some(callback);
            }
        }
    }
}

fn defaults() -> Map<String, Value> {
    let mut defaults = Map::new();
    for key in ["transitionExit", "transitionEnter", "limit", "page"] {
        defaults.insert(key.to_string(), json!(0));
    }
    defaults
}

fn as_list(state: &Value) -> Result<&[Value], RepeatError> {
    state.as_array().map(Vec::as_slice).ok_or_else(|| RepeatError::state_not_list(state))
}

fn position_vars(position: usize) -> ScopeVars {
    let mut vars = ScopeVars::new();
    vars.insert(INDEX_BINDING.to_string(), Value::from(position));
    vars
}

/// Drop earlier occurrences of duplicate keys.
fn keep_last_per_key<T, F>(entries: Vec<T>, key: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let last: HashMap<&str, usize> =
        entries.iter().enumerate().map(|(i, entry)| (key(entry), i)).collect();
    let keep: Vec<bool> =
        entries.iter().enumerate().map(|(i, entry)| last[key(entry)] == i).collect();
    if keep.iter().all(|k| *k) {
        return entries;
    }

    entries
        .into_iter()
        .zip(keep)
        .filter_map(|(entry, keep)| {
            if !keep {
                tracing::debug!(key = %key(&entry), "Duplicate item key, keeping the later element");
            }
            keep.then_some(entry)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostOp, MemoryHost};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn repeater(options: ViewOptions) -> Repeater<MemoryHost> {
        Repeater::attach(MemoryHost::new(), options, TemplateRenderer::default()).unwrap()
    }

    #[test]
    fn test_self_and_index_per_item() {
        let mut view = repeater(
            ViewOptions::new().with_state(json!([10, 20])).with_template("{{$self}}-{{$index}}"),
        );
        view.render(false).unwrap();
        assert_eq!(view.host().inner_html(), "10-020-1");
        assert_eq!(view.committed_keys(), vec!["$index=0", "$index=1"]);
    }

    #[test]
    fn test_attach_requires_state() {
        let mut host = MemoryHost::new();
        let attached = Repeater::attach(
            &mut host,
            ViewOptions::new().with_tag("li").with_limit(5),
            TemplateRenderer::default(),
        );
        assert!(matches!(attached, Err(RepeatError::MissingState)));
        drop(attached);
        assert!(host.ops().is_empty());
        assert_eq!(host.attribute("data-limit"), None);

        let attached = Repeater::attach(
            &mut host,
            ViewOptions::new().with_state(Value::Null).with_tag("li"),
            TemplateRenderer::default(),
        );
        assert!(matches!(attached, Err(RepeatError::MissingState)));
        drop(attached);
        assert!(host.ops().is_empty());
    }

    #[test]
    fn test_non_list_state_is_rejected_at_render() {
        let mut view = repeater(ViewOptions::new().with_state(json!({ "a": 1 })).with_tag("li"));
        assert!(matches!(view.render(false), Err(RepeatError::StateNotList { .. })));
    }

    #[test]
    fn test_unchanged_items_are_not_touched() {
        let mut view = repeater(
            ViewOptions::new().with_state(json!(["a", "b", "c"])).with_tag("li"),
        );
        view.render(false).unwrap();
        view.host_mut().take_ops();

        view.render(false).unwrap();
        assert!(view.host().ops().is_empty());
        assert_eq!(view.stats().cached_items, 3);
    }

    #[test]
    fn test_track_by_keys_survive_reordering_of_state() {
        let mut view = repeater(
            ViewOptions::new()
                .with_state(json!([{ "id": 1, "t": "a" }, { "id": 2, "t": "b" }]))
                .with_template("<li>{{ t }}</li>")
                .with_track_by("id"),
        );
        view.render(false).unwrap();
        let first: Vec<NodeId> = view.host().item_ids();

        view.set("state", json!([{ "id": 1, "t": "a" }, { "id": 3, "t": "c" }, { "id": 2, "t": "b" }]));
        view.render(false).unwrap();
        assert_eq!(view.committed_keys(), vec!["1", "3", "2"]);
        assert_eq!(view.host().inner_html(), "<li>a</li><li>c</li><li>b</li>");
        assert_eq!(view.host().item_ids()[0], first[0]);
    }

    #[test]
    fn test_filter_sort_and_reset() {
        let mut view = repeater(ViewOptions::new().with_state(json!([3, 1, 2, 1])).with_tag("i"));
        view.filter(|value, _| value.as_i64() != Some(2)).sort(|a, b| {
            a.as_i64().cmp(&b.as_i64())
        });
        view.render(false).unwrap();
        assert_eq!(view.host().inner_html(), "<i>1</i><i>1</i><i>3</i>");
        assert_eq!(view.committed_keys(), vec!["$index=1", "$index=3", "$index=0"]);

        view.reset().render(false).unwrap();
        assert_eq!(view.host().inner_html(), "<i>3</i><i>1</i><i>2</i><i>1</i>");
        assert_eq!(view.length().unwrap(), 4);
    }

    #[test]
    fn test_pagination() {
        let mut view = repeater(
            ViewOptions::new().with_state(json!([1, 2, 3, 4, 5])).with_tag("b").with_limit(2),
        );
        view.render(false).unwrap();
        assert_eq!(view.host().inner_html(), "<b>1</b><b>2</b>");

        view.next_page().unwrap().render(false).unwrap();
        assert_eq!(view.host().inner_html(), "<b>3</b><b>4</b>");

        view.set_page(99).unwrap();
        assert_eq!(view.page(), 2);
        view.set_page(-4).unwrap();
        assert_eq!(view.page(), 0);
        view.prev_page().unwrap();
        assert_eq!(view.page(), 0);
        assert_eq!(view.host().attribute("data-page").as_deref(), Some("0"));

        view.filter(|_, _| false);
        view.set_page(3).unwrap();
        assert_eq!(view.page(), 0);
    }

    #[test]
    fn test_set_page_without_limit_is_zero() {
        let mut view = repeater(ViewOptions::new().with_state(json!([1, 2, 3])).with_tag("b"));
        view.set_page(2).unwrap();
        assert_eq!(view.page(), 0);
    }

    #[test]
    fn test_exit_transition_defers_commit() {
        let mut view = repeater(
            ViewOptions::new()
                .with_state(json!(["a", "b"]))
                .with_template("<li>{{$self}}</li>")
                .with_track_by("$self")
                .with_transitions(0, 200),
        );
        view.render(false).unwrap();

        view.set("state", json!(["a"])).render(false).unwrap();
        assert!(view.stats().pending_commit);
        assert_eq!(
            view.host().inner_html(),
            r#"<li>a</li><li class="repeat-exit">b</li>"#
        );
        let deadline = view.next_deadline().unwrap();

        view.poll(deadline - Duration::from_millis(1));
        assert!(view.stats().pending_commit);
        view.poll(deadline);
        assert!(!view.stats().pending_commit);
        assert_eq!(view.host().inner_html(), "<li>a</li>");
    }

    #[test]
    fn test_new_render_flushes_pending_commit() {
        let mut view = repeater(
            ViewOptions::new()
                .with_state(json!(["a", "b", "c"]))
                .with_tag("li")
                .with_track_by("$self")
                .with_transitions(0, 500),
        );
        view.render(false).unwrap();

        view.set("state", json!(["a", "c"])).render(false).unwrap();
        assert!(view.stats().pending_commit);

        view.set("state", json!(["a", "c", "d"])).render(false).unwrap();
        assert!(!view.stats().pending_commit);
        assert_eq!(view.committed_keys(), vec!["a", "c", "d"]);
        assert_eq!(view.host().inner_html(), "<li>a</li><li>c</li><li>d</li>");
    }

    #[test]
    fn test_enter_class_is_removed_after_transition() {
        let mut view = repeater(
            ViewOptions::new()
                .with_state(json!(["a"]))
                .with_tag("li")
                .with_track_by("$self")
                .with_transitions(100, 0),
        );
        view.render(false).unwrap();
        assert_eq!(view.host().inner_html(), r#"<li class="repeat-enter">a</li>"#);

        view.flush();
        assert_eq!(view.host().inner_html(), r#"<li class="">a</li>"#);
        assert!(view.next_deadline().is_none());
    }

    #[test]
    fn test_update_callback_receives_inserted_nodes() {
        let mut view = repeater(
            ViewOptions::new().with_state(json!(["a"])).with_tag("li").with_track_by("$self"),
        );
        let seen: Rc<RefCell<Vec<usize>>> = Rc::default();
        let sink = Rc::clone(&seen);
        view.on_update(move |affected, view| {
            if let Affected::Items(nodes) = affected {
                sink.borrow_mut().push(nodes.len());
            }
            assert!(view.stats().committed_items > 0);
        });

        view.render(false).unwrap();
        view.set("state", json!(["a", "b", "c"])).render(false).unwrap();
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_forced_render_rewrites_container() {
        let mut view = repeater(ViewOptions::new().with_state(json!([1, 2])).with_tag("li"));
        view.render(false).unwrap();
        view.host_mut().take_ops();

        view.render(true).unwrap();
        let ops = view.host_mut().take_ops();
        assert!(matches!(ops.as_slice(), [HostOp::ReplaceItems(ids)] if ids.len() == 2));
        assert_eq!(view.host().inner_html(), "<li>1</li><li>2</li>");
    }

    #[test]
    fn test_duplicate_keys_keep_later_element() {
        let mut view = repeater(
            ViewOptions::new()
                .with_state(json!([{ "k": 1, "v": "first" }, { "k": 1, "v": "second" }]))
                .with_template("<p>{{ v }}</p>")
                .with_track_by("k"),
        );
        view.render(false).unwrap();
        assert_eq!(view.host().inner_html(), "<p>second</p>");
    }

    #[test]
    fn test_template_resolution_order() {
        let host = MemoryHost::new()
            .with_content("<em>{{$self}}</em>")
            .with_template("row", "<tr>{{$self}}</tr>");
        let mut view =
            Repeater::attach(host, ViewOptions::new().with_state(json!([])), TemplateRenderer::default())
                .unwrap();
        assert_eq!(view.template(), "<em>{{$self}}</em>");

        view.tpl(Some("<p>{{$self}}</p>"));
        assert_eq!(view.template(), "<p>{{$self}}</p>");

        view.set("tag", json!("li"));
        assert_eq!(view.template(), "<li>{{$self}}</li>");

        view.set("templateId", json!("missing"));
        assert_eq!(view.template(), "<li>{{$self}}</li>");

        view.set("templateId", json!("row"));
        assert_eq!(view.template(), "<tr>{{$self}}</tr>");
    }

    #[test]
    fn test_keep_last_per_key() {
        let kept = keep_last_per_key(vec![("a", 0), ("b", 1), ("a", 2)], |entry| entry.0);
        assert_eq!(kept, vec![("b", 1), ("a", 2)]);
    }

    #[test]
    fn test_out_of_order_duplicate_keeps_its_markup() {
        let mut view = repeater(
            ViewOptions::new()
                .with_state(json!(["x", "y", "k0", "z"]))
                .with_template("<i>{{$self}}</i>")
                .with_track_by("$self"),
        );
        view.render(false).unwrap();

        view.set("state", json!(["z", "k0", "k0"])).render(false).unwrap();
        assert_eq!(view.committed_keys(), vec!["z", "k0"]);
        assert_eq!(view.host().inner_html(), "<i>z</i><i>k0</i>");

        view.set("state", json!(["k3", "k0", "k0", "k2", "k1", "k1"])).render(false).unwrap();
        assert_eq!(view.committed_keys(), vec!["k3", "k0", "k2", "k1"]);
        assert_eq!(view.host().inner_html(), "<i>k3</i><i>k0</i><i>k2</i><i>k1</i>");
    }
}
