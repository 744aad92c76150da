use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};

/// Creates a progress bar on stderr, or `None` when there is nothing to show
/// or stderr is not an interactive terminal.
pub fn progress_bar(len: u64, msg: String) -> Option<ProgressBar> {
    if len == 0 || !std::io::stderr().is_terminal() {
        return None;
    }

    let bar = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise} / {eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
        .ok()?
        .progress_chars("##-");

    bar.set_style(style);
    bar.set_message(msg);

    Some(bar)
}
