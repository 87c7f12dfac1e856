use anyhow::Context;
use std::fs;
use std::path::Path;

pub fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(path).with_context(|| format!("failed to create dir: {}", path.display()))
}

/// Moves `tmp` over `dst`, keeping the previous file around as a backup
/// until the swap succeeds. Handles Windows, where `rename` fails if the
/// destination exists.
pub fn replace_file(tmp: &Path, dst: &Path) -> anyhow::Result<()> {
    let backup = dst.with_extension("bak");

    if dst.exists() {
        let _ = fs::remove_file(&backup);
        fs::rename(dst, &backup)
            .with_context(|| format!("failed rename {} -> {}", dst.display(), backup.display()))?;
    }

    if let Err(e) = fs::rename(tmp, dst) {
        // Try to restore previous file if we had one.
        if backup.exists() {
            let _ = fs::rename(&backup, dst);
        }
        let _ = fs::remove_file(tmp);
        return Err(anyhow::Error::new(e).context(format!(
            "failed rename {} -> {}",
            tmp.display(),
            dst.display()
        )));
    }

    let _ = fs::remove_file(&backup);
    Ok(())
}

/// Serializes `value` as pretty JSON and writes it via temp-then-replace so
/// a crash mid-write never truncates the file.
pub fn write_json_atomic<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(value).context("encode JSON")?;
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write temp: {}", tmp.display()))?;
    replace_file(&tmp, path).with_context(|| format!("replace file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("data.json");
        fs::write(&dst, b"old").unwrap();

        let tmp = dir.path().join("data.json.tmp");
        fs::write(&tmp, b"new").unwrap();
        replace_file(&tmp, &dst).unwrap();

        assert_eq!(fs::read(&dst).unwrap(), b"new");
        assert!(!tmp.exists());
        assert!(!dst.with_extension("bak").exists());
    }

    #[test]
    fn write_json_atomic_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("nested/deep/data.json");
        write_json_atomic(&dst, &serde_json::json!({"ok": true})).unwrap();
        let v: serde_json::Value =
            serde_json::from_slice(&fs::read(&dst).unwrap()).unwrap();
        assert_eq!(v["ok"], true);
    }
}
