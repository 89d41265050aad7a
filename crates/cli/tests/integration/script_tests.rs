use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn upload_script_has_fragment_header() {
  let env = TestEnv::with_file_store();

  env
    .acache_cmd()
    .args(["script", "upload", "--build-id-file", "step.bid", "--result", "step.tgz"])
    .assert()
    .success()
    .stdout(predicate::str::starts_with("# upload artifact\ncd \"$WORKSPACE\"\n"))
    .stdout(predicate::str::contains("LOCAL_ARTIFACT=step.tgz"))
    .stdout(predicate::str::contains("Upload failed"));
}

#[test]
fn download_script_guards_existing_result() {
  let env = TestEnv::with_file_store();

  env
    .acache_cmd()
    .args(["script", "download", "--build-id-file", "step.bid", "--result", "step.tgz"])
    .assert()
    .success()
    .stdout(predicate::str::starts_with("if [[ ! -e step.tgz ]] ; then\n"))
    .stdout(predicate::str::contains("Download failed"))
    .stdout(predicate::str::ends_with("fi\n"));
}

#[test]
fn shell_backend_script_splices_command() {
  let env = TestEnv::empty();
  env.write_config("archive:\n  backend: shell\n  upload: 'rsync \"$LOCAL_ARTIFACT\" cache:/a/$REMOTE_ARTIFACT'\n");

  env
    .acache_cmd()
    .args(["script", "upload", "--build-id-file", "bid", "--result", "r.tgz"])
    .assert()
    .success()
    .stdout(predicate::str::contains("rsync \"$LOCAL_ARTIFACT\" cache:/a/$REMOTE_ARTIFACT"));

  env
    .acache_cmd()
    .args(["script", "download", "--build-id-file", "bid", "--result", "r.tgz"])
    .assert()
    .success()
    .stdout("");
}

#[test]
fn script_json_output() {
  let env = TestEnv::with_file_store();

  env
    .acache_cmd()
    .args(["script", "download", "--build-id-file", "bid", "--result", "r.tgz", "-o", "json"])
    .assert()
    .success()
    .stdout(predicate::str::contains(r#""script": "if [[ ! -e r.tgz ]]"#));
}
