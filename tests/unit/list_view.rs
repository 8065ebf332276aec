//! The list view driven through a scripted session.

use repeatkit::host::{Host, HostOp, MemoryHost, NodeId};
use repeatkit::templating::TemplateRenderer;
use repeatkit::test_utils::{StateFixture, TemplateFixture};
use repeatkit::view::{Affected, Repeater, ViewOptions};
use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

fn todo_list() -> Repeater<MemoryHost> {
    Repeater::attach(
        MemoryHost::new(),
        ViewOptions::new()
            .with_state(StateFixture::todos().value)
            .with_template(TemplateFixture::TODO_ROW)
            .with_track_by("id"),
        TemplateRenderer::default(),
    )
    .unwrap()
}

#[test]
fn test_todo_session() {
    let mut list = todo_list();
    let inserted: Rc<RefCell<Vec<Vec<NodeId>>>> = Rc::default();
    let seen = Rc::clone(&inserted);
    list.on_update(move |affected, _| {
        if let Affected::Items(nodes) = affected {
            seen.borrow_mut().push(nodes.to_vec());
        }
    });

    list.render(false).unwrap();
    assert_eq!(
        list.host().inner_html(),
        concat!(
            r#"<li data-class='{"done": done}' class="done">write</li>"#,
            r#"<li data-class='{"done": done}'>test</li>"#,
            r#"<li data-class='{"done": done}'>ship</li>"#,
        )
    );
    assert_eq!(list.committed_keys(), vec!["1", "2", "3"]);

    // append: existing items keep their nodes
    let before = list.host().item_ids();
    let mut todos = StateFixture::todos().value;
    todos.as_array_mut().unwrap().push(json!({ "id": 4, "title": "rest", "done": false }));
    list.host_mut().take_ops();
    list.set("state", todos).render(false).unwrap();

    let after = list.host().item_ids();
    assert_eq!(&after[..3], &before[..]);
    assert_eq!(
        list.host().ops(),
        &[HostOp::Insert {
            node: after[3],
            anchor: repeatkit::host::Anchor::After(before[2]),
        }]
    );
    assert_eq!(*inserted.borrow(), vec![before.clone(), vec![after[3]]]);

    // unchanged render touches nothing and reports no insertions
    list.host_mut().take_ops();
    list.render(false).unwrap();
    assert!(list.host().ops().is_empty());
    assert_eq!(inserted.borrow().last(), Some(&Vec::new()));
}

#[test]
fn test_properties_mirror_to_attributes() {
    let host = MemoryHost::new().with_attribute("data-limit", "1").with_attribute("data-tag", "li");
    let mut list = Repeater::attach(
        host,
        ViewOptions::new().with_state(StateFixture::numbers(3).value),
        TemplateRenderer::default(),
    )
    .unwrap();

    assert_eq!(list.get("limit"), Some(json!(1)));
    list.render(false).unwrap();
    assert_eq!(list.host().inner_html(), "<li>1</li>");

    list.next_page().unwrap().render(false).unwrap();
    assert_eq!(list.host().inner_html(), "<li>2</li>");
    assert_eq!(list.host().attribute("data-page").as_deref(), Some("1"));

    list.set("limit", json!(0)).render(false).unwrap();
    assert_eq!(list.host().inner_html(), "<li>1</li><li>2</li><li>3</li>");
    assert_eq!(list.host().attribute("data-limit").as_deref(), Some("0"));
}

#[test]
fn test_filter_sort_and_paging_together() {
    let mut list = Repeater::attach(
        MemoryHost::new(),
        ViewOptions::new().with_state(StateFixture::numbers(10).value).with_tag("i").with_limit(2),
        TemplateRenderer::default(),
    )
    .unwrap();

    list.set_page(3).unwrap();
    list.filter(|value, _| value.as_u64().is_some_and(|n| n % 3 == 0))
        .sort(|a, b| b.as_u64().cmp(&a.as_u64()));
    assert_eq!(list.page(), 0);
    assert_eq!(list.length().unwrap(), 3);

    list.render(false).unwrap();
    assert_eq!(list.host().inner_html(), "<i>9</i><i>6</i>");
    list.next_page().unwrap().render(false).unwrap();
    assert_eq!(list.host().inner_html(), "<i>3</i>");
    list.next_page().unwrap().render(false).unwrap();
    assert_eq!(list.page(), 1);

    list.reset().render(false).unwrap();
    assert_eq!(list.host().inner_html(), "<i>1</i><i>2</i>");
}

#[test]
fn test_transitions_run_on_the_callers_clock() {
    let mut list = Repeater::attach(
        MemoryHost::new(),
        ViewOptions::new()
            .with_state(json!(["a", "b"]))
            .with_tag("li")
            .with_transitions(30, 50),
        TemplateRenderer::default(),
    )
    .unwrap();

    list.render(false).unwrap();
    assert!(list.host().inner_html().contains("repeat-enter"));
    let enter_due = list.next_deadline().unwrap();
    list.poll(enter_due);
    assert!(!list.host().inner_html().contains("repeat-enter"));
    assert_eq!(list.next_deadline(), None);

    list.set("state", json!(["a"])).render(false).unwrap();
    assert!(list.stats().pending_commit);
    assert!(list.host().inner_html().contains("repeat-exit"));

    let exit_due = list.next_deadline().unwrap();
    list.poll(exit_due - Duration::from_millis(1));
    assert!(list.stats().pending_commit);
    list.poll(exit_due.max(Instant::now()));
    assert!(!list.stats().pending_commit);
    // the retained item still carries the emptied class attribute
    assert_eq!(list.host().inner_html(), r#"<li class="">a</li>"#);
}
