use assert_cmd::Command;
use predicates::prelude::*;

mod common;
use common::TestDeployment;

fn gridbench() -> Command {
    Command::cargo_bin("gridbench").unwrap()
}

#[test]
fn help_lists_every_subcommand() {
    gridbench()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("openstack"))
        .stdout(predicate::str::contains("rally"))
        .stdout(predicate::str::contains("stress"))
        .stdout(predicate::str::contains("emulate"))
        .stdout(predicate::str::contains("backup"))
        .stdout(predicate::str::contains("destroy"))
        .stdout(predicate::str::contains("info"));
}

#[test]
fn version_prints_the_package_name() {
    gridbench()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gridbench"));
}

#[test]
fn unknown_subcommand_fails_with_usage() {
    gridbench()
        .arg("teleport")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn deploy_help_documents_the_flags() {
    gridbench()
        .args(["deploy", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--conf"))
        .stdout(predicate::str::contains("--provider"))
        .stdout(predicate::str::contains("--force-deployment"))
        .stdout(predicate::str::contains("--tags"));
}

#[test]
fn deploy_without_config_fails_cleanly() {
    let project = TestDeployment::new();
    gridbench()
        .env("GRIDBENCH_HOME", project.home())
        .current_dir(project.root.path())
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid configuration"));
}

#[test]
fn deploy_provide_and_inventory_need_no_automation_tooling() {
    let project = TestDeployment::new();
    let conf = project.write_conf(
        r#"database: cockroachdb
registry:
  type: internal
static:
  resources:
    database:
      - address: db-0.example
      - address: db-1.example
    openstack:
      - address: os-0.example
  networks:
    - name: database_network
      cidr: 10.0.0.0/24
      roles: [database]
"#,
    );

    gridbench()
        .env("GRIDBENCH_HOME", project.home())
        .arg("deploy")
        .arg("--conf")
        .arg(&conf)
        .args(["--tags", "provide", "inventory"])
        .assert()
        .success();

    assert!(project.home().join("default").join("env.json").is_file());
    assert!(project.home().join("default").join("hosts").is_file());

    gridbench()
        .env("GRIDBENCH_HOME", project.home())
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("db-0.example"));
}

#[test]
fn rally_before_deploy_reports_the_missing_stage() {
    let project = TestDeployment::new();
    gridbench()
        .env("GRIDBENCH_HOME", project.home())
        .arg("rally")
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires 'openstack'"));
}

#[test]
fn info_renders_json_on_request() {
    let project = TestDeployment::new();
    gridbench()
        .env("GRIDBENCH_HOME", project.home())
        .args(["info", "--out", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cockroachdb"));
}

#[test]
fn info_with_unknown_format_is_not_fatal() {
    let project = TestDeployment::new();
    gridbench()
        .env("GRIDBENCH_HOME", project.home())
        .args(["info", "--out", "nonsense"])
        .assert()
        .success()
        .stderr(predicate::str::contains("does not support"))
        .stderr(predicate::str::contains("text, json, yaml"));
}
