//! Driving the clustering over the history of a git repository.
//!
//! Every commit is diffed against its parent. Within a block of changed lines, the n-th removed
//! line and the n-th added line form a candidate example. Consecutive candidates accumulate into
//! a [`Problem`] until one of them no longer fits, at which point the problem is flushed and a
//! new one begins. Commits are spread over worker threads, each owning its own problems, and
//! finished problems are written as JSON lines through a shared [`Sink`].

use crate::config::Config;
use crate::error::{Error, Result};
use crate::example::Example;
use crate::problem::Problem;
use crate::sample::Sample;
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::io::Write;
use std::mem;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;

/// Turns unified-diff lines into problems, one line at a time.
#[derive(Debug)]
pub struct DiffScanner {
    config: Config,
    problem: Problem,
    // removed lines of the current block, waiting for their added counterparts
    removed: VecDeque<Sample>,
    adding: bool,
    // `---`/`+++` are file headers only before the first `@@` of a file
    in_hunk: bool,
}

impl DiffScanner {
    /// Creates a scanner with an empty current problem.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            problem: Problem::new(config),
            removed: VecDeque::new(),
            adding: false,
            in_hunk: false,
        }
    }

    /// Consumes one diff line, returning a problem if the line completed one.
    ///
    /// Only non-trivial problems are returned.
    pub fn push_line(&mut self, line: &str) -> Option<Problem> {
        if line.starts_with("diff ") {
            self.removed.clear();
            self.in_hunk = false;
            return self.flush();
        }
        if line.starts_with("@@") {
            self.in_hunk = true;
        } else if !self.in_hunk && (line.starts_with("---") || line.starts_with("+++")) {
            return None;
        } else if line.starts_with('\\') {
            // "\ No newline at end of file"
            return None;
        }
        if let Some(removed) = line.strip_prefix('-') {
            if self.adding {
                self.removed.clear();
                self.adding = false;
            }
            self.removed.push_back(Sample::new(removed));
            return None;
        }
        let added = match line.strip_prefix('+') {
            Some(added) => added,
            None => {
                // context lines and hunk headers end the block
                self.removed.clear();
                self.adding = false;
                return None;
            }
        };
        self.adding = true;
        let input = self.removed.pop_front()?;
        let output = Sample::new(added);
        if !input.is_similar(&output, &self.config) {
            return self.flush();
        }
        let example = Example::from_samples(input, output, self.config);
        let flushed = if self.problem.is_similar(&example) {
            None
        } else {
            self.flush()
        };
        self.problem.add_example(example);
        flushed
    }

    /// Ends the input, returning the last problem if it is non-trivial.
    pub fn finish(mut self) -> Option<Problem> {
        self.flush()
    }

    fn flush(&mut self) -> Option<Problem> {
        let done = mem::replace(&mut self.problem, Problem::new(self.config));
        if done.is_trivial() {
            None
        } else {
            debug!("completed a problem of {} examples", done.examples().len());
            Some(done)
        }
    }
}

/// Collects the non-trivial problems of a whole diff.
pub fn scan_diff<'a>(lines: impl IntoIterator<Item = &'a str>, config: Config) -> Vec<Problem> {
    let mut scanner = DiffScanner::new(config);
    let mut problems: Vec<Problem> = lines
        .into_iter()
        .filter_map(|line| scanner.push_line(line))
        .collect();
    problems.extend(scanner.finish());
    problems
}

/// A git working copy, accessed through the `git` command.
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
}

impl Repository {
    /// Refers to the repository at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The repository location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.path)
            .args(args)
            .output()?;
        if !output.status.success() {
            return Err(Error::Git {
                args: args.join(" "),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Hashes of all commits reachable from any ref.
    pub fn commits(&self) -> Result<Vec<String>> {
        Ok(self
            .git(&["log", "--all", "--format=%H"])?
            .lines()
            .map(str::to_string)
            .collect())
    }

    /// The diff between `commit`'s first parent and `commit`.
    ///
    /// Returns `None` for a root commit.
    pub fn diff(&self, commit: &str) -> Result<Option<String>> {
        let parents = self.git(&["rev-list", "--parents", "-n", "1", commit])?;
        if parents.split_whitespace().count() < 2 {
            return Ok(None);
        }
        let parent = format!("{}~", commit);
        self.git(&["diff", &parent, commit]).map(Some)
    }
}

/// A shared, line-oriented JSON writer for finished problems.
#[derive(Debug)]
pub struct Sink<W> {
    inner: Mutex<SinkInner<W>>,
}

#[derive(Debug)]
struct SinkInner<W> {
    writer: W,
    written: usize,
}

impl<W: Write> Sink<W> {
    /// Wraps `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(SinkInner { writer, written: 0 }),
        }
    }

    /// Writes `problem` as one JSON line. Trivial problems are skipped.
    pub fn write(&self, problem: &Problem) -> Result<()> {
        if problem.is_trivial() {
            return Ok(());
        }
        let line = serde_json::to_string(&problem.to_record())?;
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(inner.writer, "{}", line)?;
        inner.written += 1;
        Ok(())
    }

    /// Number of problems written so far.
    pub fn written(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).written
    }

    /// Flushes and returns the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        let mut inner = self.inner.into_inner().unwrap_or_else(|e| e.into_inner());
        inner.writer.flush()?;
        Ok(inner.writer)
    }
}

/// Counters reported by [`extract_repository`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Commits whose diff was scanned.
    pub commits: usize,
    /// Commits that could not be diffed (root commits and git failures).
    pub skipped: usize,
    /// Problems written to the sink.
    pub problems: usize,
}

impl Summary {
    fn merge(self, other: Self) -> Self {
        Self {
            commits: self.commits + other.commits,
            skipped: self.skipped + other.skipped,
            problems: self.problems + other.problems,
        }
    }
}

/// Scans every commit of `repo` on `jobs` worker threads, writing problems to `sink`.
///
/// A commit that git fails to diff is logged and skipped; a failure to write to the sink aborts
/// the extraction.
pub fn extract_repository<W>(
    repo: &Repository,
    config: Config,
    jobs: usize,
    sink: &Sink<W>,
) -> Result<Summary>
where
    W: Write + Send,
{
    let commits = repo.commits()?;
    let jobs = jobs.clamp(1, commits.len().max(1));
    info!(
        "scanning {} commits of {} on {} threads",
        commits.len(),
        repo.path().display(),
        jobs
    );
    let next = AtomicUsize::new(0);
    let (commits, next) = (&commits, &next);
    let results: Vec<Result<Summary>> = thread::scope(|s| {
        let workers: Vec<_> = (0..jobs)
            .map(|_| s.spawn(move || scan_commits(repo, commits, next, config, sink)))
            .collect();
        workers
            .into_iter()
            .map(|w| w.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    });
    let summary = results
        .into_iter()
        .try_fold(Summary::default(), |acc, r| r.map(|s| acc.merge(s)))?;
    info!(
        "wrote {} problems from {} commits ({} skipped)",
        summary.problems, summary.commits, summary.skipped
    );
    Ok(summary)
}

fn scan_commits<W: Write>(
    repo: &Repository,
    commits: &[String],
    next: &AtomicUsize,
    config: Config,
    sink: &Sink<W>,
) -> Result<Summary> {
    let mut summary = Summary::default();
    loop {
        let i = next.fetch_add(1, Ordering::Relaxed);
        let commit = match commits.get(i) {
            Some(commit) => commit,
            None => return Ok(summary),
        };
        let diff = match repo.diff(commit) {
            Ok(Some(diff)) => diff,
            Ok(None) => {
                debug!("skipping root commit {}", commit);
                summary.skipped += 1;
                continue;
            }
            Err(e) => {
                warn!("skipping commit {}: {}", commit, e);
                summary.skipped += 1;
                continue;
            }
        };
        for problem in scan_diff(diff.lines(), config) {
            sink.write(&problem)?;
            summary.problems += 1;
        }
        summary.commits += 1;
        if (i + 1) % 100 == 0 {
            info!("{} / {} commits", i + 1, commits.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::ProblemRecord;
    use pretty_assertions::assert_eq;

    const DIFF: &str = "\
diff --git a/src/check.ts b/src/check.ts
index 1111111..2222222 100644
--- a/src/check.ts
+++ b/src/check.ts
@@ -1,6 +1,6 @@
-    isVariableValid=true
+    isThisVariableValid=true
-    isSomethingValid=true
+    isThisSomethingValid=true
-    isOtherValid = true
+    isThisOtherValid = true
     unchanged();
-    return completelyDifferent(thing, other)
+    x
-    lonely removal
";

    fn inputs(problem: &Problem) -> Vec<&str> {
        problem
            .examples()
            .iter()
            .map(|e| e.input().text().trim())
            .collect()
    }

    #[test]
    fn scans_runs_of_similar_edits() {
        let problems = scan_diff(DIFF.lines(), Config::default());
        assert_eq!(problems.len(), 1);
        assert_eq!(
            inputs(&problems[0]),
            vec![
                "isVariableValid=true",
                "isSomethingValid=true",
                "isOtherValid = true"
            ]
        );
        assert_eq!(problems[0].synthesizable_from_first(), &[true, true, true]);
    }

    #[test]
    fn file_header_flushes() {
        let lines = [
            "-isValid",
            "+isntValid",
            "diff --git a/x b/x",
            "-isReady",
            "+isntReady",
        ];
        let problems = scan_diff(lines, Config::default());
        assert!(problems.is_empty());
    }

    #[test]
    fn dissimilar_example_starts_new_problem() {
        let lines = [
            "-call(alpha, beta, gamma, delta, epsilon, eta)",
            "+call(alpha, beta, gamma, delta, epsilon, eta, zeta)",
            "-call(one, two, three, four, five, six)",
            "+call(one, two, three, four, five, six, zeta)",
            "-x = y",
            "+x = z",
            "-p = q",
            "+p = r",
        ];
        let problems = scan_diff(lines, Config::default());
        assert_eq!(problems.len(), 2);
        assert_eq!(
            inputs(&problems[0]),
            vec![
                "call(alpha, beta, gamma, delta, epsilon, eta)",
                "call(one, two, three, four, five, six)"
            ]
        );
        assert_eq!(inputs(&problems[1]), vec!["x = y", "p = q"]);
    }

    #[test]
    fn content_lines_that_look_like_file_headers() {
        let lines = [
            "diff --git a/q.sql b/q.sql",
            "--- a/q.sql",
            "+++ b/q.sql",
            "@@ -1,2 +1,2 @@",
            "--- select(a)",
            "--- select(b)",
            "+-- select(a, c)",
            "+-- select(b, c)",
            "diff --git a/count.c b/count.c",
            "--- a/count.c",
            "+++ b/count.c",
            "@@ -1,2 +1,3 @@",
            "-++count;",
            "-++index;",
            "\\ No newline at end of file",
            "+++count_total;",
            "+++index_total;",
        ];
        let problems = scan_diff(lines, Config::default());
        assert_eq!(problems.len(), 2);
        assert_eq!(inputs(&problems[0]), vec!["-- select(a)", "-- select(b)"]);
        assert_eq!(inputs(&problems[1]), vec!["++count;", "++index;"]);
        assert_eq!(problems[1].synthesizable_from_first(), &[true, true]);
    }

    #[test]
    fn pairs_removal_and_addition_blocks() {
        let lines = [
            "-a = foo(b)",
            "-x = foo(y)",
            "+a = foo(b, c)",
            "+x = foo(y, c)",
            "+z = foo(w, c)",
        ];
        let problems = scan_diff(lines, Config::default());
        assert_eq!(problems.len(), 1);
        assert_eq!(inputs(&problems[0]), vec!["a = foo(b)", "x = foo(y)"]);
    }

    #[test]
    fn added_line_without_removal_is_ignored() {
        let mut scanner = DiffScanner::new(Config::default());
        assert!(scanner.push_line("+isThisValid").is_none());
        assert!(scanner.push_line("-isValid").is_none());
        assert!(scanner.push_line(" context").is_none());
        assert!(scanner.push_line("+isThisValid").is_none());
        assert!(scanner.finish().is_none());
    }

    #[test]
    fn sink_writes_json_lines() {
        let sink = Sink::new(Vec::new());
        let config = Config::default();
        let mut trivial = Problem::new(config);
        trivial.add_example(Example::new("isValid", "isntValid", config));
        sink.write(&trivial).unwrap();
        for problem in scan_diff(DIFF.lines(), config) {
            sink.write(&problem).unwrap();
        }
        assert_eq!(sink.written(), 1);
        let bytes = sink.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let records: Vec<ProblemRecord> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].examples[0].input.text, "isVariableValid=true");
        assert_eq!(records[0].examples[2].output.text, "isThisOtherValid = true");
    }

    #[test]
    fn missing_repository_is_an_error() {
        let repo = Repository::new("/nonexistent/pbemine/repository");
        assert!(repo.commits().is_err());
    }

    fn git(dir: &Path, args: &[&str]) -> bool {
        Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(["-c", "user.name=test", "-c", "user.email=test@example.com"])
            .args(args)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[test]
    fn extracts_from_repository() {
        let dir = tempfile::tempdir().unwrap();
        if !git(dir.path(), &["init", "-q"]) {
            // git is not available
            return;
        }
        let file = dir.path().join("check.ts");
        std::fs::write(
            &file,
            "isVariableValid=true\nisSomethingValid=true\nisOtherValid=true\n",
        )
        .unwrap();
        assert!(git(dir.path(), &["add", "."]));
        assert!(git(dir.path(), &["commit", "-q", "-m", "first"]));
        std::fs::write(
            &file,
            "isThisVariableValid=true\nisThisSomethingValid=true\nisThisOtherValid=true\n",
        )
        .unwrap();
        assert!(git(dir.path(), &["commit", "-q", "-a", "-m", "second"]));

        let repo = Repository::new(dir.path());
        let sink = Sink::new(Vec::new());
        let summary = extract_repository(&repo, Config::default(), 4, &sink).unwrap();
        assert_eq!(
            summary,
            Summary {
                commits: 1,
                skipped: 1,
                problems: 1,
            }
        );
        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        let record: ProblemRecord = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(record.examples.len(), 3);
        assert_eq!(record.examples[1].input.text, "isSomethingValid=true");
        assert_eq!(record.synthesizable_from_first, vec![true, true, true]);
    }
}
