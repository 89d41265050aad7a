use predicates::prelude::*;

use super::common::{TestEnv, read};

#[test]
fn download_restores_uploaded_artifact() {
  let env = TestEnv::with_file_store();
  let dir = env.write_artifact("out");
  env.acache_cmd().args(["upload", "c0ffee"]).arg(&dir).assert().success();

  let dest = env.path("restored");
  std::fs::create_dir_all(&dest).unwrap();
  std::fs::write(dest.join("stale"), "old").unwrap();

  env
    .acache_cmd()
    .args(["download", "c0ffee"])
    .arg(&dest)
    .assert()
    .success()
    .stdout(predicate::str::contains("Restored"));

  assert_eq!(read(&dest.join("VERSION")), "1.2.3\n");
  assert_eq!(read(&dest.join("bin").join("tool")), "#!/bin/sh\necho tool\n");
  assert!(!dest.join("stale").exists());
}

#[test]
fn download_miss_succeeds() {
  let env = TestEnv::with_file_store();
  let dest = env.path("restored");

  env
    .acache_cmd()
    .args(["download", "deadbeef"])
    .arg(&dest)
    .assert()
    .success()
    .stdout(predicate::str::contains("not found"));

  assert!(!dest.exists());
}

#[test]
fn download_miss_json_output() {
  let env = TestEnv::with_file_store();

  env
    .acache_cmd()
    .args(["download", "deadbeef", "-o", "json"])
    .arg(env.path("restored"))
    .assert()
    .success()
    .stdout(predicate::str::contains(r#""found": false"#))
    .stdout(predicate::str::contains(r#""key": "de/ad/beef.tgz""#));
}

#[test]
fn explicit_config_flag_wins_over_environment() {
  let env = TestEnv::with_file_store();
  let dir = env.write_artifact("out");
  env.acache_cmd().args(["upload", "abab"]).arg(&dir).assert().success();

  let other = env.path("other.yaml");
  std::fs::write(&other, "archive:\n  backend: none\n").unwrap();

  env
    .acache_cmd()
    .arg("--config")
    .arg(&other)
    .args(["download", "abab", "-o", "json"])
    .arg(env.path("restored"))
    .assert()
    .success()
    .stdout(predicate::str::contains(r#""found": false"#));
}

#[test]
fn composite_reads_from_second_store() {
  let env = TestEnv::with_file_store();
  let dir = env.write_artifact("out");
  env.acache_cmd().args(["upload", "1234"]).arg(&dir).assert().success();

  env.write_config(&format!(
    "archive:\n  - backend: file\n    path: '{}'\n  - backend: file\n    path: '{}'\n",
    env.path("empty-store").display(),
    env.path("store").display()
  ));

  env
    .acache_cmd()
    .args(["download", "1234"])
    .arg(env.path("restored"))
    .assert()
    .success()
    .stdout(predicate::str::contains("Restored"));

  assert_eq!(read(&env.path("restored").join("VERSION")), "1.2.3\n");
}
