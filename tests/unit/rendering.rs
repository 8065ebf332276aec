//! Template rendering through the public API.

use repeatkit::expr::{Helpers, Scope, ScopeVars};
use repeatkit::host::{Host, MemoryHost};
use repeatkit::templating::TemplateRenderer;
use repeatkit::test_utils::{StateFixture, TemplateFixture, init_test_logging};
use repeatkit::view::{TemplateView, ViewOptions};
use serde_json::{Value, json};

fn render(template: &str, state: &Value) -> String {
    let renderer = TemplateRenderer::default();
    let vars = ScopeVars::new();
    let helpers = Helpers::builtin();
    renderer.render(template, &Scope::new(state, &vars, &helpers))
}

#[test]
fn test_profile_card() {
    init_test_logging(None);
    let out = render(TemplateFixture::PROFILE, &StateFixture::profile().value);
    assert_eq!(
        out,
        concat!(
            r#"<h1>Ada</h1>"#,
            r#"<em data-if="user.admin">admin</em>"#,
            r#"<p data-show="visits > 5" class="hide">regular</p>"#,
            r#"<ul data-each="tags"><li>0:math</li><li>1:engines</li></ul>"#,
        )
    );
}

#[test]
fn test_each_over_object_binds_keys() {
    let state = json!({ "sizes": { "s": 1, "m": 2 } });
    assert_eq!(
        render(r#"<dl data-each="sizes"><dt>{{ $index }}={{ $item }}</dt></dl>"#, &state),
        r#"<dl data-each="sizes"><dt>s=1</dt><dt>m=2</dt></dl>"#
    );
}

#[test]
fn test_class_map_keeps_declared_order() {
    let state = json!({ "a": true, "b": true });
    assert_eq!(
        render(r#"<p data-class='{"zeta": a, "alpha": b}'></p>"#, &state),
        r#"<p data-class='{"zeta": a, "alpha": b}' class="zeta alpha"></p>"#
    );
}

#[test]
fn test_expressions_cannot_escape_the_scope() {
    let state = json!({ "n": 1 });
    assert_eq!(render("[{{ constructor }}][{{ process.env }}][{{ n.toString() }}]", &state), "[][][]");
}

#[test]
fn test_custom_helper_in_single_view() {
    let helpers = Helpers::new().with("twice", |args| {
        let n = args.first().cloned().flatten()?.as_f64()?;
        Some(json!(n * 2.0))
    });
    let mut view = TemplateView::attach(
        MemoryHost::new(),
        ViewOptions::new()
            .with_state(json!({ "n": 21 }))
            .with_template("{{ twice(n) }}")
            .with_helpers(helpers),
        TemplateRenderer::default(),
    )
    .unwrap();
    view.render().unwrap();
    assert_eq!(view.host().inner_html(), "42");
}

#[test]
fn test_single_view_falls_back_to_initial_content() {
    let host = MemoryHost::new().with_content("<p>{{ greeting }}</p>");
    let mut view = TemplateView::attach(
        host,
        ViewOptions::new().with_state(json!({ "greeting": "hello" })),
        TemplateRenderer::default(),
    )
    .unwrap();
    view.render().unwrap();
    assert_eq!(view.host().inner_html(), "<p>hello</p>");

    // the initial content stays the template
    view.set("state", json!({ "greeting": "again" })).render().unwrap();
    assert_eq!(view.host().inner_html(), "<p>again</p>");
}
