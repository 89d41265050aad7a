use anyhow::Result;

use crate::output::print_json;

use super::parse_build_id;

pub fn cmd_shard(build_id: &str, json: bool) -> Result<()> {
  let build_id = parse_build_id(build_id)?;
  let key = build_id.shard().relative_key();

  if json {
    print_json(&serde_json::json!({ "build_id": build_id.to_hex(), "key": key }))?;
  } else {
    println!("{}", key);
  }
  Ok(())
}
