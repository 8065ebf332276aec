use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_codec_encode() {
    let project = TestProject::new().unwrap();
    let cases = [
        (r#"{"page": 2}"#, "{\"page\":2}\n"),
        ("hello", "hello\n"),
        (r#""42""#, "\"42\"\n"),
        ("true", "true\n"),
    ];
    for (input, expected) in cases {
        project.command().args(["codec", "encode", input]).assert().success().stdout(expected);
    }
}

#[test]
fn test_codec_decode() {
    let project = TestProject::new().unwrap();
    project.command().args(["codec", "decode", ""]).assert().success().stdout("undefined\n");
    project.command().args(["codec", "decode", "[1,2]"]).assert().success().stdout("[1,2]\n");
    project
        .command()
        .args(["codec", "decode", "plain text"])
        .assert()
        .success()
        .stdout("\"plain text\"\n");
    project
        .command()
        .args(["codec", "decode", r#"{"a":1}"#, "--pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"a\": 1"));
}
