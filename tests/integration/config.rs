use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_explicit_config_flag() {
    let project = TestProject::new().unwrap();
    let config = project.write("conf/custom.toml", "tag = \"em\"\nlimit = 1\n").unwrap();

    project
        .command()
        .arg("--config")
        .arg(&config)
        .args(["list", "--json", "[1, 2]"])
        .assert()
        .success()
        .stdout("<em>1</em>\n");
}

#[test]
fn test_config_from_environment() {
    let project = TestProject::new().unwrap();
    let config = project.write("env.toml", "[templates]\nhello = \"hi {{ who }}\"\n").unwrap();

    project
        .command()
        .env("REPEATKIT_CONFIG", &config)
        .args(["render", "--json", r#"{"who": "there"}"#, "--template-id", "hello"])
        .assert()
        .success()
        .stdout("hi there\n");
}

#[test]
fn test_flag_overrides_config_values() {
    let project = TestProject::new().unwrap();
    project.write("repeatkit.toml", "limit = 1\ntag = \"em\"\n").unwrap();

    project
        .command()
        .args(["list", "--json", "[1, 2, 3]", "--limit", "0", "--tag", "b"])
        .assert()
        .success()
        .stdout("<b>1</b><b>2</b><b>3</b>\n");
}

#[test]
fn test_missing_config_file() {
    let project = TestProject::new().unwrap();
    project
        .command()
        .args(["--config", "absent.toml", "codec", "encode", "1"])
        .assert()
        .success();

    project
        .command()
        .args(["--config", "absent.toml", "render", "--json", "{}", "--template", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found: absent.toml"));
}

#[test]
fn test_invalid_config_file() {
    let project = TestProject::new().unwrap();
    project.write("repeatkit.toml", "limit = \"lots\"\n").unwrap();

    project
        .command()
        .args(["list", "--json", "[1]", "--tag", "li"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration in repeatkit.toml"));
}
