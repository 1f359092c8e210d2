use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Arc, Mutex};
use tracing::warn;
use tsmeta::engine::progress::{Progress, ProgressCallback};

/// Bridges workflow progress events onto an indicatif bar on stderr.
#[derive(Clone)]
pub struct CliProgressHandler {
    pb: Arc<Mutex<ProgressBar>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        Self {
            pb: Arc::new(Mutex::new(ProgressBar::hidden())),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let pb_clone = self.pb.clone();

        Box::new(move |progress: Progress| {
            let Ok(mut pb_guard) = pb_clone.lock() else {
                warn!("Progress bar mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::BatchStart { total_files } => {
                    let bar = ProgressBar::new(total_files).with_style(Self::bar_style());
                    bar.set_draw_target(ProgressDrawTarget::stderr());
                    *pb_guard = bar;
                }
                Progress::FileStart { path } => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    pb_guard.set_message(name);
                }
                Progress::FileDone => {
                    pb_guard.inc(1);
                }
                Progress::BatchFinish => {
                    pb_guard.finish_and_clear();
                }
            }
        })
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template("[{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }
}
