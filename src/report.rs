//! Per-step HTML export of solver snapshots.
//!
//! [`HtmlReportObserver`] writes one `step_<k>.html` file per state
//! transition into a dedicated directory (recreated on construction). Each
//! page renders the grid as a table with row/column index headers; covered
//! cells, selected and prepared zeros, and the current alternating path are
//! highlighted with cell styles. Write failures are logged and swallowed -
//! instrumentation must never change the solve.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::observer::{StepObserver, StepSnapshot};

/// Observer rendering every step as an HTML table on disk.
#[derive(Debug)]
pub struct HtmlReportObserver {
    dir: PathBuf,
    next_step: usize,
}

impl HtmlReportObserver {
    /// Create the report directory (wiping any previous run's contents) and
    /// an observer writing into it.
    pub fn create(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, next_step: 0 })
    }

    /// Directory the step files are written into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of steps written so far.
    pub fn steps_written(&self) -> usize {
        self.next_step
    }

    fn render(step: &StepSnapshot<'_>, index: usize) -> String {
        let mut page = String::new();
        page.push_str(
            "<!DOCTYPE html>\n<html>\n<head>\n<style>\n\
             table {\n  font-family: arial, sans-serif;\n  border-collapse: collapse;\n  width: 100%;\n}\n\
             td, th {\n  border: 1px solid #dddddd;\n  text-align: left;\n  padding: 8px;\n}\n\
             td.covered {\n  background-color: #ffdddd;\n}\n\
             td.selected {\n  outline: 2px solid #00aa00;\n}\n\
             td.prepared {\n  outline: 2px solid #0000cc;\n}\n\
             td.path {\n  background-color: #ffccff;\n}\n\
             </style>\n</head>\n<body>\n",
        );

        let _ = writeln!(page, "<h2>Solve step {index}</h2>");
        let _ = writeln!(page, "<p>phase: {:?}</p>", step.phase);

        page.push_str("<table>\n<tr>\n<th>&nbsp;</th>\n");
        for j in 0..step.n {
            let _ = writeln!(page, "<th>{j}</th>");
        }
        page.push_str("</tr>\n");

        for i in 0..step.n {
            let _ = writeln!(page, "<tr>\n<th>{i}</th>");
            for j in 0..step.n {
                let classes = Self::cell_classes(step, i, j);
                if classes.is_empty() {
                    let _ = writeln!(page, "<td>{}</td>", step.value(i, j));
                } else {
                    let _ = writeln!(
                        page,
                        "<td class=\"{}\">{}</td>",
                        classes.join(" "),
                        step.value(i, j)
                    );
                }
            }
            page.push_str("</tr>\n");
        }

        page.push_str("</table>\n</body>\n</html>\n");
        page
    }

    fn cell_classes(step: &StepSnapshot<'_>, i: usize, j: usize) -> Vec<&'static str> {
        let mut classes = Vec::new();
        if step.covered_rows[i] || step.covered_cols[j] {
            classes.push("covered");
        }
        if step.selected_in_row[i] == Some(j) {
            classes.push("selected");
        }
        if step.prepared_in_row[i] == Some(j) {
            classes.push("prepared");
        }
        if let Some(path) = step.path {
            let cell = (i, j);
            if path.prepared().contains(&cell) || path.selected().contains(&cell) {
                classes.push("path");
            }
        }
        classes
    }
}

impl StepObserver for HtmlReportObserver {
    fn on_step(&mut self, step: &StepSnapshot<'_>) {
        let page = Self::render(step, self.next_step);
        let file = self.dir.join(format!("step_{}.html", self.next_step));
        if let Err(error) = fs::write(&file, page) {
            warn!(error = %error, file = %file.display(), "step_report_write_failed");
        }
        self.next_step += 1;
    }
}
