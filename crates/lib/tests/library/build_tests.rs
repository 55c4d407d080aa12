//! Whole-project `clean` / `build` scenarios.

use extmake_lib::common::ModuleLink;
use extmake_lib::events::NoopObserver;
use extmake_lib::util::hash::hash_directory;
use extmake_lib::{BuildError, BuildEvent, Command, ErrorKind};
use serde_json::json;

use super::common::{FailingRetriever, Project, list_files};

#[test]
fn shared_module_is_built_once_for_two_tasks() {
  let project = Project::new(&["A", "B"]);
  project.task("A", "A");
  project.task("B", "B");
  project.write("Common1/Common1.psm1", "function Get-Thing {}");
  project.write("Common1/Tests/L0.ps1", "Describe {}");
  project.write_json("Common1/make.json", &json!({ "include": ["Tests"] }));
  project.write_json("A/make.json", &json!({ "common": [{ "module": "../Common1", "type": "ps" }] }));
  project.write_json("B/make.json", &json!({ "common": [{ "module": "../Common1", "type": "node" }] }));

  let mut events: Vec<BuildEvent> = Vec::new();
  let mut driver = project.driver(FailingRetriever::default());
  let report = driver.build(&mut events).unwrap();

  let build = project.build_dir();
  let shared = build.join("Common/Common1");
  assert!(build.join("A").is_dir());
  assert!(build.join("B").is_dir());
  assert_eq!(driver.registry().build_count(&shared), 1);
  assert_eq!(report.modules_built, 1);
  assert_eq!(
    events
      .iter()
      .filter(|e| matches!(e, BuildEvent::ModuleBuilding { .. }))
      .count(),
    1
  );

  // Shared output keeps the tests; only the per-task copy drops them.
  assert!(shared.join("Tests/L0.ps1").is_file());
  let a_files = list_files(&build.join("A"));
  assert!(a_files.contains(&"ps_modules/Common1/Common1.psm1".to_string()));
  assert!(!a_files.iter().any(|f| f.contains("Tests")));

  assert!(matches!(report.tasks[0].links[0], ModuleLink::Copied { .. }));
  assert_eq!(
    report.tasks[1].links,
    vec![ModuleLink::Referenced {
      module: "Common1".to_string(),
      shared: shared.clone(),
    }]
  );
  assert!(!build.join("B/node_modules").exists());
}

#[test]
fn present_external_is_never_retrieved() {
  let project = Project::new(&["C"]);
  project.task("C", "C");
  project.write_json(
    "C/make.json",
    &json!({
      "externals": {
        "files": [{ "url": "https://example.invalid/tools/tool.exe", "dest": "bin/tool.exe" }]
      }
    }),
  );

  let mut driver = project.driver(FailingRetriever::default());
  driver.clean(&mut NoopObserver).unwrap();
  project.write("_build/C/bin/tool.exe", "already here");

  let report = driver.build_task("C", &mut NoopObserver).unwrap();
  assert_eq!(report.output_dir, project.build_dir().join("C"));
  assert_eq!(driver.retriever().calls, 0);
  assert_eq!(driver.fetch_stats().skipped, 1);
  assert_eq!(
    std::fs::read_to_string(project.build_dir().join("C/bin/tool.exe")).unwrap(),
    "already here"
  );
}

#[test]
fn invalid_task_definition_aborts_before_output_exists() {
  let project = Project::new(&["Broken"]);
  project.write_json(
    "Broken/task.json",
    &json!({
      "id": "not-a-uuid",
      "name": "Broken",
      "version": { "Major": 1, "Minor": 0, "Patch": 0 }
    }),
  );

  let mut driver = project.driver(FailingRetriever::default());
  let err = driver.build(&mut NoopObserver).unwrap_err();

  assert_eq!(err.kind(), ErrorKind::Validation);
  let message = err.to_string();
  assert!(message.contains("'id' is not a valid UUID"), "{message}");
  assert!(message.contains("friendlyName"), "{message}");
  assert!(!project.build_dir().join("Broken").exists());
}

#[test]
fn external_dest_outside_output_is_rejected() {
  let project = Project::new(&["Leaky"]);
  project.task("Leaky", "Leaky");
  project.write("Leaky/tool.exe", "binary");
  project.write_json(
    "Leaky/make.json",
    &json!({ "externals": { "files": [{ "url": "tool.exe", "dest": "../../escaped.exe" }] } }),
  );

  let mut driver = project.driver(FailingRetriever::default());
  let err = driver.build(&mut NoopObserver).unwrap_err();

  assert_eq!(err.kind(), ErrorKind::Validation);
  assert_eq!(driver.retriever().calls, 0);
  assert!(!project.root().join("escaped.exe").exists());
}

#[test]
fn missing_task_source_is_reported() {
  let project = Project::new(&["Nowhere"]);

  let mut driver = project.driver(FailingRetriever::default());
  let err = driver.build(&mut NoopObserver).unwrap_err();

  assert!(matches!(err, BuildError::MissingTask { ref task, .. } if task == "Nowhere"));
  assert_eq!(err.kind(), ErrorKind::MissingTask);
  assert!(!project.build_dir().join("Nowhere").exists());
}

#[test]
fn rebuilds_are_byte_identical() {
  let project = Project::new(&["A", "B"]);
  project.task("A", "A");
  project.task("B", "B");
  project.write("A/Strings/resources.resjson/en-US/resources.resjson", "{}");
  project.write("Common1/Common1.psm1", "module");
  project.write_json("A/make.json", &json!({ "common": [{ "module": "../Common1", "type": "ps" }] }));
  project.write("vss-extension.json", "{}");
  project.write("README.md", "# readme");

  let mut driver = project.driver(FailingRetriever::default());
  driver.build(&mut NoopObserver).unwrap();
  let first = hash_directory(&project.build_dir(), &[]).unwrap();
  driver.clean(&mut NoopObserver).unwrap();
  driver.build(&mut NoopObserver).unwrap();
  let second = hash_directory(&project.build_dir(), &[]).unwrap();

  assert_eq!(first, second);
  assert_eq!(driver.registry().total_builds(), 1);
  assert_eq!(
    list_files(&project.build_dir()),
    vec![
      "A/Strings/resources.resjson/en-US/resources.resjson",
      "A/index.js",
      "A/make.json",
      "A/ps_modules/Common1/Common1.psm1",
      "A/task.json",
      "B/index.js",
      "B/task.json",
      "Common/Common1/Common1.psm1",
      "README.md",
      "vss-extension.json",
    ]
  );
}

#[test]
fn unknown_command_lists_valid_commands() {
  let err = "deploy".parse::<Command>().unwrap_err();
  assert_eq!(err.kind(), ErrorKind::InvalidCommand);
  assert!(err.to_string().contains("clean, build"));
}

#[test]
fn missing_options_file_is_reported() {
  let temp = tempfile::tempdir().unwrap();
  let err = extmake_lib::Driver::load(extmake_lib::Layout::new(temp.path()))
    .err()
    .unwrap();
  assert_eq!(err.kind(), ErrorKind::MissingFile);
}
