use predicates::prelude::*;
use repeatkit::test_utils::{StateFixture, TemplateFixture};

use crate::common::TestProject;

/// Render a card using every directive from files on disk
#[test]
fn test_render_from_files() {
    let project = TestProject::new().unwrap();
    let state = StateFixture::profile().write_to(project.path()).unwrap();
    let template = project.write("card.html", TemplateFixture::PROFILE).unwrap();

    project
        .command()
        .arg("render")
        .arg("--state")
        .arg(&state)
        .arg("--template-file")
        .arg(&template)
        .assert()
        .success()
        .stdout(predicate::str::contains("<h1>Ada</h1>"))
        .stdout(predicate::str::contains(">admin</em>"))
        .stdout(predicate::str::contains(r#"class="hide">regular</p>"#))
        .stdout(predicate::str::contains("<li>0:math</li><li>1:engines</li>"));
}

/// Inline JSON, escaping and built-in helpers
#[test]
fn test_render_inline_state() {
    let project = TestProject::new().unwrap();
    project
        .command()
        .args([
            "render",
            "--json",
            r#"{"name": "<ada>"}"#,
            "--template",
            r#"<b>{{ name }}</b><i>{{ default(title, "n/a") }}</i><u>{{ upper(name) }}</u>"#,
        ])
        .assert()
        .success()
        .stdout("<b>&lt;ada&gt;</b><i>n/a</i><u>&lt;ADA&gt;</u>\n");
}

#[test]
fn test_render_without_helpers() {
    let project = TestProject::new().unwrap();
    project
        .command()
        .args(["render", "--json", r#"{"name": "ada"}"#, "--template", "[{{ upper(name) }}]"])
        .arg("--no-helpers")
        .assert()
        .success()
        .stdout("[]\n");
}

#[test]
fn test_render_state_from_stdin() {
    let project = TestProject::new().unwrap();
    project
        .command()
        .args(["render", "--template", "{{ n + 1 }}"])
        .write_stdin(r#"{"n": 2}"#)
        .assert()
        .success()
        .stdout("3\n");
}

#[test]
fn test_render_null_state_fails() {
    let project = TestProject::new().unwrap();
    project
        .command()
        .args(["render", "--json", "null", "--template", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No state was provided"))
        .stderr(predicate::str::contains("--json"));
}

#[test]
fn test_render_invalid_json_fails() {
    let project = TestProject::new().unwrap();
    project
        .command()
        .args(["render", "--json", "{not json", "--template", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse --json state"));
}

#[test]
fn test_render_unknown_template_id() {
    let project = TestProject::new().unwrap();
    project
        .command()
        .args(["render", "--json", "{}", "--template-id", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Template not found: missing"));
}
