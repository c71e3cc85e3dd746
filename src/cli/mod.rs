pub mod edit;
pub mod export;
pub mod generate;
pub mod init;
pub mod status;

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Cyan braille spinner used while waiting on a collaborator
pub(crate) fn spinner(message: impl Into<String>) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
    );
    pb.set_message(message.into());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
