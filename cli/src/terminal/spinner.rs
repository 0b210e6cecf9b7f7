use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use colored::*;
use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;

const TICK: Duration = Duration::from_millis(100);
const TIP_DURATION: Duration = Duration::from_secs(4);
pub const SCAN_TIPS: &[&str] = &[
    "Large fabrics can take several minutes to scan",
    "Run with --debug to see the tool output",
    "Use --skip-scan to reuse the last scan",
];
pub const LINK_TIPS: &[&str] = &["Save the dump once and replay it with --file"];

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&[
            "▁▁▁▁▁",
            "▁▂▂▂▁",
            "▁▄▂▄▁",
            "▂▄▆▄▂",
            "▄▆█▆▄",
            "▂▄▆▄▂",
            "▁▄▂▄▁",
            "▁▂▂▂▁",
        ])
}

/// Animates `span` until `running` is cleared. The message shows the elapsed time
/// and, for long runs, rotates through usage tips.
pub fn start_scan_spinner(
    span: Span,
    running: Arc<AtomicBool>,
    message: String,
    tips: &'static [&'static str],
) -> JoinHandle<()> {
    span.pb_set_style(&spinner_style());
    span.pb_set_message(&message);

    thread::spawn(move || {
        let start = Instant::now();
        let mut tip_index = 0;
        let mut next_tip = start + TIP_DURATION;
        let mut tip: Option<&str> = None;

        while running.load(Ordering::Relaxed) {
            thread::sleep(TICK);

            if !tips.is_empty() && Instant::now() >= next_tip {
                tip = Some(tips[tip_index % tips.len()]);
                tip_index += 1;
                next_tip = Instant::now() + TIP_DURATION;
            }

            let elapsed = format!("{}s", start.elapsed().as_secs()).bright_black();
            let line = match tip {
                Some(tip) => format!("{message} {elapsed}  {}", tip.italic().white()),
                None => format!("{message} {elapsed}"),
            };
            span.pb_set_message(&line);
        }
    })
}

