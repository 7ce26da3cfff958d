use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::errors::{CollectorError, CollectorResult};

pub const DEFAULT_CRON: &str = "0 2 * * *";

/// A crontab line that runs the collector once per schedule tick
#[derive(Debug, Clone, PartialEq)]
pub struct CronEntry {
    pub schedule: String,
    pub work_dir: PathBuf,
    pub executable: PathBuf,
    pub log_path: PathBuf,
}

impl CronEntry {
    pub fn new(schedule: &str, work_dir: &Path, executable: &Path, log_path: &Path) -> Self {
        Self {
            schedule: schedule.trim().to_string(),
            work_dir: work_dir.to_path_buf(),
            executable: executable.to_path_buf(),
            log_path: log_path.to_path_buf(),
        }
    }

    pub fn line(&self) -> String {
        format!(
            "{} cd {} && {} run >> {} 2>&1",
            self.schedule,
            shell_quote(&self.work_dir),
            shell_quote(&self.executable),
            shell_quote(&self.log_path)
        )
    }

    /// Text identifying lines owned by this installation
    pub fn marker(&self) -> String {
        self.executable.display().to_string()
    }

    /// Five whitespace-separated fields, or a single `@` shortcut
    pub fn validate(&self) -> CollectorResult<()> {
        let fields = self.schedule.split_whitespace().count();
        if fields == 5 || (fields == 1 && self.schedule.starts_with('@')) {
            Ok(())
        } else {
            Err(CollectorError::Schedule(format!(
                "invalid cron expression: '{}'",
                self.schedule
            )))
        }
    }
}

/// Single-quote a path for `sh`; an embedded `'` becomes `'\''`
fn shell_quote(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', "'\\''"))
}

/// Read/write access to the user's crontab
#[cfg_attr(test, mockall::automock)]
pub trait Crontab {
    fn read(&self) -> CollectorResult<String>;
    fn write(&self, contents: &str) -> CollectorResult<()>;
}

/// The `crontab` command of the host
pub struct SystemCrontab;

impl Crontab for SystemCrontab {
    fn read(&self) -> CollectorResult<String> {
        let output = Command::new("crontab")
            .arg("-l")
            .output()
            .map_err(|e| CollectorError::Schedule(format!("failed to run crontab -l: {}", e)))?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.to_lowercase().contains("no crontab") {
            return Ok(String::new());
        }
        Err(CollectorError::Schedule(format!(
            "crontab -l failed: {}",
            stderr.trim()
        )))
    }

    fn write(&self, contents: &str) -> CollectorResult<()> {
        let mut child = Command::new("crontab")
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| CollectorError::Schedule(format!("failed to run crontab -: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(contents.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(CollectorError::Schedule(format!(
                "crontab - failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(())
    }
}

/// Whether `line` runs the executable at `marker`, quoted or bare.
/// The path must stand alone, so `/usr/bin/collector-backup` is not `/usr/bin/collector`.
pub fn references(line: &str, marker: &str) -> bool {
    if marker.is_empty() {
        return false;
    }
    let quoted = shell_quote(Path::new(marker));
    let is_edge = |c: Option<char>| c.map_or(true, |c| c.is_whitespace() || c == '\'');

    [marker, quoted.as_str()].iter().any(|needle| {
        line.match_indices(*needle).any(|(start, _)| {
            let before = line[..start].chars().next_back();
            let after = line[start + needle.len()..].chars().next();
            is_edge(before) && is_edge(after)
        })
    })
}

/// Existing crontab minus every line that runs `marker`
pub fn remove_entries(existing: &str, marker: &str) -> String {
    let mut kept: Vec<&str> = existing
        .lines()
        .filter(|line| !references(line, marker))
        .collect();

    while kept.last().is_some_and(|l| l.trim().is_empty()) {
        kept.pop();
    }

    if kept.is_empty() {
        String::new()
    } else {
        format!("{}\n", kept.join("\n"))
    }
}

/// Existing crontab with any previous entry replaced by `entry`
pub fn install_entry(existing: &str, entry: &CronEntry) -> String {
    let mut contents = remove_entries(existing, &entry.marker());
    contents.push_str(&entry.line());
    contents.push('\n');
    contents
}

/// Idempotent registration of the daily run
pub struct Scheduler<C: Crontab> {
    crontab: C,
}

impl<C: Crontab> Scheduler<C> {
    pub fn new(crontab: C) -> Self {
        Self { crontab }
    }

    pub fn install(&self, entry: &CronEntry) -> CollectorResult<()> {
        entry.validate()?;

        let existing = self.crontab.read()?;
        let updated = install_entry(&existing, entry);
        self.crontab.write(&updated)?;

        tracing::info!(entry = %entry.line(), "Cron entry installed");
        Ok(())
    }

    /// Returns how many lines were removed
    pub fn remove(&self, marker: &str) -> CollectorResult<usize> {
        let existing = self.crontab.read()?;
        let removed = existing.lines().filter(|l| references(l, marker)).count();

        if removed > 0 {
            self.crontab.write(&remove_entries(&existing, marker))?;
        }

        tracing::info!(removed, "Cron entries removed");
        Ok(removed)
    }
}
