//! Output directory management and output path construction.

use std::path::{Path, PathBuf};

use chrono::Utc;
use uuid::Uuid;

/// The directory that receives every conversion output.
///
/// The directory is only ever appended to, with filenames unique per job,
/// so concurrent observers never see write conflicts.
#[derive(Debug, Clone)]
pub struct OutputWorkspace {
    root: PathBuf,
}

impl OutputWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the output directory if it does not exist yet.
    pub async fn ensure(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Build a fresh output path for a conversion of `source_name`.
    ///
    /// The display name is reduced to a safe character set, its last
    /// extension is dropped, and the base is suffixed with the current
    /// millisecond timestamp plus the first 8 hex digits of the job id, so
    /// repeated conversions of the same source never collide.
    pub fn output_path(&self, source_name: &str, job_id: Uuid, target_ext: &str) -> PathBuf {
        let safe = sanitize(source_name);
        let base = strip_extension(&safe);
        let stamp = Utc::now().timestamp_millis();
        let id = job_id.simple().to_string();
        self.root
            .join(format!("{base}_{stamp}_{}.{target_ext}", &id[..8]))
    }
}

/// Replace everything outside `[A-Za-z0-9.-]` with an underscore.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(index) => &name[..index],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize("my photo (1).png"), "my_photo__1_.png");
        assert_eq!(sanitize("ünïcode.txt"), "_n_code.txt");
        assert_eq!(sanitize("clean-name.2024.jpg"), "clean-name.2024.jpg");
    }

    #[test]
    fn strip_extension_drops_only_the_last_one() {
        assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
        assert_eq!(strip_extension("noext"), "noext");
    }

    #[test]
    fn output_paths_differ_per_job() {
        let workspace = OutputWorkspace::new("/tmp/converty");
        let name = "report.pdf";
        let a = workspace.output_path(name, Uuid::new_v4(), "txt");
        let b = workspace.output_path(name, Uuid::new_v4(), "txt");
        assert_ne!(a, b);
        assert!(a.to_string_lossy().ends_with(".txt"));
        assert!(a.to_string_lossy().contains("report_"));
    }
}
