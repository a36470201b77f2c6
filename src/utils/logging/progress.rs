//! Progress reporting for the pipeline stages
//!
//! Uses indicatif. A bar created with `visible == false` is hidden and every
//! update on it is a no-op, so callers never branch on the setting.

use indicatif::{ProgressBar, ProgressStyle};

/// Default style for the main progress bar
pub const DEFAULT_MAIN_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}";

/// Create a main progress bar with the standard style
///
/// Falls back to the indicatif default style if the template does not parse.
#[must_use]
pub fn create_main_progress_bar(length: u64, description: Option<&str>, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(length);
    if let Ok(style) = ProgressStyle::default_bar().template(DEFAULT_MAIN_TEMPLATE) {
        pb.set_style(style.progress_chars("#>-"));
    }
    if let Some(desc) = description {
        pb.set_message(desc.to_string());
    }
    pb
}

/// Progress over a fixed list of named stages
#[derive(Debug)]
pub struct StageProgress {
    bar: ProgressBar,
    current: Option<&'static str>,
}

impl StageProgress {
    /// Create a tracker for `stages` steps
    #[must_use]
    pub fn new(stages: u64, visible: bool) -> Self {
        Self {
            bar: create_main_progress_bar(stages, Some("starting"), visible),
            current: None,
        }
    }

    /// Mark the previous stage done and start `name`
    pub fn stage(&mut self, name: &'static str) {
        if self.current.replace(name).is_some() {
            self.bar.inc(1);
        }
        self.bar.set_message(name);
        log::debug!("Stage: {name}");
    }

    /// Complete the last stage
    pub fn finish(self) {
        if self.current.is_some() {
            self.bar.inc(1);
        }
        self.bar.finish_with_message("done");
    }

    /// Number of completed stages
    #[must_use]
    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}
