//! Integration tests for `extmake build`.

use predicates::prelude::*;
use serde_json::json;

use super::common::TestEnv;

#[test]
fn build_prints_banners_and_assembles_tasks() {
  let env = TestEnv::with_tasks(&["Tasks/Deploy", "Tasks/Verify"]);
  env.write_task("Tasks/Deploy", "Deploy");
  env.write_task("Tasks/Verify", "Verify");
  env.write_file("Common/Helpers/Helpers.psm1", "function Invoke-Helper {}");
  env.write_json(
    "Tasks/Deploy/make.json",
    &json!({ "common": [{ "module": "../../Common/Helpers", "type": "ps" }] }),
  );
  env.write_json(
    "Tasks/Verify/make.json",
    &json!({ "common": [{ "module": "../../Common/Helpers", "type": "ps" }] }),
  );
  env.write_file("vss-extension.json", "{}");

  env
    .cmd("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("Building: Tasks/Deploy"))
    .stdout(predicate::str::contains("Building: Tasks/Verify"))
    .stdout(predicate::str::contains("copying task resources"))
    .stdout(predicate::str::contains("Build succeeded"))
    .stdout(predicate::str::contains("Common modules: 1"));

  assert!(env.build_path("vss-extension.json").is_file());
  assert!(env.build_path("Common/Helpers/Helpers.psm1").is_file());
  for task in ["Deploy", "Verify"] {
    assert!(env.build_path(task).join("index.js").is_file());
    assert!(env.build_path(task).join("ps_modules/Helpers/Helpers.psm1").is_file());
  }
}

#[test]
fn module_is_announced_once() {
  let env = TestEnv::with_tasks(&["A", "B"]);
  env.write_task("A", "A");
  env.write_task("B", "B");
  env.write_file("Shared/Shared.psm1", "module");
  for task in ["A", "B"] {
    env.write_json(
      &format!("{task}/make.json"),
      &json!({ "common": [{ "module": "../Shared", "type": "ps" }] }),
    );
  }

  let output = env.cmd("build").output().unwrap();
  assert!(output.status.success());
  let stdout = String::from_utf8_lossy(&output.stdout);
  assert_eq!(stdout.matches("Building module:").count(), 1);
}

#[test]
fn invalid_task_definition_fails_with_last_line_error() {
  let env = TestEnv::with_tasks(&["Broken"]);
  env.write_json("Broken/task.json", &json!({ "name": "Broken" }));

  let output = env.cmd("build").output().unwrap();
  assert!(!output.status.success());

  let stderr = String::from_utf8_lossy(&output.stderr);
  let last = stderr.lines().last().unwrap_or_default();
  assert!(last.contains("invalid manifest"), "{stderr}");
  assert!(last.contains("missing required field 'id'"), "{stderr}");
  assert!(!env.build_path("Broken").exists());
}

#[test]
fn missing_task_fails() {
  let env = TestEnv::with_tasks(&["Ghost"]);

  env
    .cmd("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("task 'Ghost' not found"));
}

#[test]
fn build_dir_override_is_honored() {
  let env = TestEnv::with_tasks(&["Task"]);
  env.write_task("Task", "Task");

  env.cmd("build").env("EXTMAKE_BUILD_DIR", "out").assert().success();

  assert!(env.root().join("out/Task/task.json").is_file());
  assert!(!env.root().join("_build").exists());
}

#[test]
fn too_old_extmake_fails_preflight() {
  let env = TestEnv::empty();
  env.write_json("make-options.json", &json!({ "tasks": [], "minVersion": "999.0.0" }));

  env
    .cmd("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("at least 999.0.0"));
  assert!(!env.root().join("_build").exists());
}

#[test]
fn missing_required_tool_fails_preflight() {
  let env = TestEnv::empty();
  env.write_json(
    "make-options.json",
    &json!({ "tasks": [], "tools": [{ "name": "extmake-missing-tool-for-tests" }] }),
  );

  env
    .cmd("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("extmake-missing-tool-for-tests is not installed"));
}

#[test]
fn verbose_flag_emits_logs() {
  let env = TestEnv::with_tasks(&["Task"]);
  env.write_task("Task", "Task");

  env
    .cmd("build")
    .arg("-v")
    .assert()
    .success()
    .stderr(predicate::str::contains("building task"));
}

#[test]
fn debug_verbosity_logs_module_links() {
  let env = TestEnv::with_tasks(&["Task"]);
  env.write_task("Task", "Task");
  env.write_file("Shared/Shared.psm1", "module");
  env.write_json(
    "Task/make.json",
    &json!({ "common": [{ "module": "../Shared", "type": "ps" }] }),
  );

  env
    .cmd("build")
    .arg("-vv")
    .assert()
    .success()
    .stderr(predicate::str::contains("common module linked"));
}
