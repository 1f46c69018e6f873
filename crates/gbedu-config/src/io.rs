use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Writes through a sibling temp file and renames it over `path`, so readers
/// never see a half-written file.
pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  let tmp_path = path.with_extension("tmp");

  {
    let mut tmp_file = fs::File::create(&tmp_path)?;
    tmp_file.write_all(contents.as_bytes())?;
    tmp_file.sync_all()?;
  }

  fs::rename(&tmp_path, path)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn replaces_existing_file_and_leaves_no_temp() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gbeduflow.toml");
    fs::write(&path, "old").unwrap();

    atomic_write_str(&path, "new").unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    assert!(!path.with_extension("tmp").exists());
  }
}
