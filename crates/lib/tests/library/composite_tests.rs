use artifact_cache_lib::{UploadOutcome, Wanted};
use tempfile::TempDir;

use super::common::{archive_from_yaml, build_id, file_archive, read_tree, write_artifact};

fn two_stores_yaml(first: &str, first_flags: &str, second: &str) -> String {
  format!(
    r#"
archive:
  - backend: file
    path: '{first}'
    flags: {first_flags}
  - backend: file
    path: '{second}'
"#
  )
}

#[test]
fn upload_fans_out_to_every_capable_store() {
  let temp = TempDir::new().unwrap();
  let src = write_artifact(temp.path(), "src");
  let a = temp.path().join("a");
  let b = temp.path().join("b");
  let yaml = two_stores_yaml(&a.display().to_string(), "[upload, download]", &b.display().to_string());
  let archive = archive_from_yaml(&yaml, Wanted::both());

  assert_eq!(archive.upload_package(&build_id("01020304"), &src).unwrap(), UploadOutcome::Uploaded);

  assert!(a.join("01").join("02").join("0304.tgz").is_file());
  assert!(b.join("01").join("02").join("0304.tgz").is_file());
}

#[test]
fn download_falls_through_to_later_member() {
  let temp = TempDir::new().unwrap();
  let src = write_artifact(temp.path(), "src");
  let a = temp.path().join("a");
  let b = temp.path().join("b");
  let id = build_id("0a0b0c0d");

  // Only the second store holds the artifact.
  file_archive(&b, Wanted::both()).upload_package(&id, &src).unwrap();

  let yaml = two_stores_yaml(&a.display().to_string(), "[upload]", &b.display().to_string());
  let archive = archive_from_yaml(&yaml, Wanted::both());
  let dest = temp.path().join("dest");

  assert!(archive.download_package(&id, &dest).unwrap());
  assert_eq!(read_tree(&dest), read_tree(&src));
}

#[test]
fn composite_misses_when_no_member_has_it() {
  let temp = TempDir::new().unwrap();
  let yaml = two_stores_yaml(
    &temp.path().join("a").display().to_string(),
    "[download]",
    &temp.path().join("b").display().to_string(),
  );
  let archive = archive_from_yaml(&yaml, Wanted::both());

  assert!(!archive.download_package(&build_id("ffff"), &temp.path().join("dest")).unwrap());
}

#[test]
fn composite_with_none_member_keeps_other_capabilities() {
  let archive = archive_from_yaml(
    "archive:\n  - backend: none\n  - backend: shell\n    download: 'true'\n",
    Wanted::both(),
  );
  assert!(!archive.can_upload());
  assert!(archive.can_download());
}
