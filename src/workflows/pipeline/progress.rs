use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

/// Append-only, human-readable record of batch completion. Operator
/// diagnostics only; resume correctness relies on the cache, never on this
/// file.
pub struct ProgressLog {
    path: PathBuf,
}

impl ProgressLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn append(&self, batch_index: usize, occupations: usize, note: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(
            file,
            "{} batch {batch_index} ({occupations} occupations): {note}",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        )?;
        file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_accumulates_lines_in_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("score_log.txt");
        let log = ProgressLog::new(&path);

        log.append(0, 10, "completed").expect("append");
        log.append(1, 10, "failed: timeout").expect("append");

        let contents = fs::read_to_string(&path).expect("read");
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("batch 0 (10 occupations): completed"));
        assert!(lines[1].contains("batch 1 (10 occupations): failed: timeout"));
    }

    #[test]
    fn append_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("output/logs/score_log.txt");
        ProgressLog::new(&path)
            .append(3, 7, "completed")
            .expect("append");
        assert!(path.exists());
    }
}
