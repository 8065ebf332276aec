//! One view per container.

use repeatkit::core::RepeatError;
use repeatkit::host::{Host, MemoryHost};
use repeatkit::templating::TemplateRenderer;
use repeatkit::view::{Registry, Repeater, TemplateView, ViewOptions};
use serde_json::json;

#[test]
fn test_registry_keeps_views_apart() {
    let mut lists: Registry<Repeater<MemoryHost>> = Registry::new(TemplateRenderer::default());
    lists
        .attach("left", MemoryHost::new, ViewOptions::new().with_state(json!([1, 2])).with_tag("li"))
        .unwrap()
        .render(false)
        .unwrap();
    lists
        .attach("right", MemoryHost::new, ViewOptions::new().with_state(json!(["x"])).with_tag("b"))
        .unwrap()
        .render(false)
        .unwrap();

    assert_eq!(lists.len(), 2);
    assert_eq!(lists.get("left").unwrap().host().inner_html(), "<li>1</li><li>2</li>");
    assert_eq!(lists.get("right").unwrap().host().inner_html(), "<b>x</b>");

    let host = lists.detach("left").unwrap().detach();
    assert_eq!(host.inner_html(), "<li>1</li><li>2</li>");
    assert!(lists.get("left").is_none());
    assert_eq!(lists.len(), 1);
}

#[test]
fn test_reattach_reconfigures_in_place() {
    let mut views: Registry<TemplateView<MemoryHost>> = Registry::new(TemplateRenderer::default());
    views
        .attach(
            "title",
            MemoryHost::new,
            ViewOptions::new().with_state(json!({ "t": "a" })).with_template("<h1>{{ t }}</h1>"),
        )
        .unwrap()
        .render()
        .unwrap();

    views
        .attach("title", MemoryHost::new, ViewOptions::new().with_state(json!({ "t": "b" })))
        .unwrap()
        .render()
        .unwrap();
    assert_eq!(views.get("title").unwrap().host().inner_html(), "<h1>b</h1>");

    let missing = views.attach("other", MemoryHost::new, ViewOptions::new());
    assert!(matches!(missing, Err(RepeatError::MissingState)));
    assert_eq!(views.len(), 1);
}
