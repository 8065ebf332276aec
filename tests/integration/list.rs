use predicates::prelude::*;
use repeatkit::test_utils::{ConfigFixture, StateFixture};

use crate::common::TestProject;

#[test]
fn test_list_pagination() {
    let project = TestProject::new().unwrap();
    project
        .command()
        .args(["list", "--json", "[1, 2, 3, 4, 5]", "--tag", "li", "--limit", "2", "--page", "1"])
        .assert()
        .success()
        .stdout("<li>3</li><li>4</li>\n");
}

#[test]
fn test_list_page_is_clamped() {
    let project = TestProject::new().unwrap();
    project
        .command()
        .args(["list", "--json", "[1, 2, 3]", "--tag", "b", "--limit", "2", "--page", "40"])
        .assert()
        .success()
        .stdout("<b>3</b>\n");
}

#[test]
fn test_list_index_binding() {
    let project = TestProject::new().unwrap();
    project
        .command()
        .args(["list", "--json", "[10, 20]", "--template", "{{$self}}-{{$index}}"])
        .assert()
        .success()
        .stdout("10-020-1\n");
}

#[test]
fn test_list_filter_and_sort() {
    let project = TestProject::new().unwrap();
    let state = StateFixture::todos().write_to(project.path()).unwrap();
    project
        .command()
        .arg("list")
        .arg("--state")
        .arg(&state)
        .args(["--filter", "!done", "--sort-by", "title", "--template", "<i>{{ title }}</i>"])
        .assert()
        .success()
        .stdout("<i>ship</i><i>test</i>\n");
}

#[test]
fn test_list_defaults_from_config() {
    let project = TestProject::new().unwrap();
    ConfigFixture::write_to(project.path(), ConfigFixture::LIST_DEFAULTS).unwrap();
    let state = StateFixture::todos().write_to(project.path()).unwrap();

    project
        .command()
        .arg("list")
        .arg("--state")
        .arg(&state)
        .args(["--template-id", "row"])
        .assert()
        .success()
        .stdout("<li>write</li><li>test</li>\n");
}

#[test]
fn test_list_trace_shows_keyed_updates() {
    let project = TestProject::new().unwrap();
    let later = project.write("later.json", r#"[{"id": 1}, {"id": 2}, {"id": 3}]"#).unwrap();

    project
        .command()
        .args(["list", "--json", r#"[{"id": 1}, {"id": 2}]"#, "--track-by", "id"])
        .args(["--template", "<li>{{ id }}</li>", "--trace", "--next"])
        .arg(&later)
        .assert()
        .success()
        .stdout(
            "replace all: #0 #1\n\
             <li>1</li><li>2</li>\n\
             insert #2 after #1\n\
             <li>1</li><li>2</li><li>3</li>\n",
        );
}

#[test]
fn test_list_exit_transition_completes() {
    let project = TestProject::new().unwrap();
    let later = project.write("later.json", "[1]").unwrap();

    project
        .command()
        .args(["list", "--json", "[1, 2]", "--tag", "li", "--transition-exit", "20", "--next"])
        .arg(&later)
        .assert()
        .success()
        .stdout("<li>1</li><li>2</li>\n<li>1</li>\n");
}

#[test]
fn test_list_stats() {
    let project = TestProject::new().unwrap();
    project
        .command()
        .args(["list", "--json", "[1, 1, 1]", "--template", "<i>{{ $self }}</i>", "--stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("items cached: 3, committed: 3"))
        .stdout(predicate::str::contains("hit rate"));
}

#[test]
fn test_list_rejects_object_state() {
    let project = TestProject::new().unwrap();
    project
        .command()
        .args(["list", "--json", r#"{"a": 1}"#, "--tag", "li"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("List mode needs an array state, got object"))
        .stderr(predicate::str::contains("render"));
}

#[test]
fn test_list_requires_a_template_source() {
    let project = TestProject::new().unwrap();
    project
        .command()
        .args(["list", "--json", "[1]"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No template given"));
}
