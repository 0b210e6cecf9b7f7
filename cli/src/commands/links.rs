use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

use chrono::Local;
use colored::*;
use ibpdc_common::dump::DumpSource;
use ibpdc_common::hosts::HostsConfig;
use ibpdc_common::{config::Config, success, warn};
use ibpdc_core::check::{LinkCheckService, LinkReport};
use ibpdc_core::report::{GroupSummary, LinkStatistics, OutputPaths};
use ibpdc_core::system::{DumpFile, IbLinkInfo};
use tracing::info_span;

use crate::commands::LinksArgs;
use crate::mprint;
use crate::terminal::{colors, format, print, spinner};

type Detail = (String, ColoredString);

pub fn links(args: &LinksArgs, cfg: &Config) -> anyhow::Result<()> {
    let config = load_config(args)?;

    let source: Box<dyn DumpSource> = match &args.file {
        Some(path) => Box::new(DumpFile::new(path)),
        None => Box::new(IbLinkInfo::new(args.ca())),
    };
    let service = LinkCheckService::new(source, config, args.groups.clone());
    let label = service.source_label();

    let start_time = Instant::now();
    let report = if args.file.is_some() {
        service.perform_check()?
    } else {
        run_with_spinner(&service, &label)?
    };

    let paths = OutputPaths::new(&args.output, Some(&label), &Local::now().naive_local(), &args.groups);
    let written = report.write_outputs(&paths, !args.no_down_report, args.show_excluded)?;

    check_ends(&report, start_time.elapsed(), cfg);
    for path in written {
        success!("Saved {}", path.display().to_string().color(colors::PRIMARY));
    }
    Ok(())
}

fn load_config(args: &LinksArgs) -> anyhow::Result<Option<HostsConfig>> {
    let Some(path) = &args.config else {
        if !args.groups.is_empty() {
            warn!("--groups has no effect without --config, checking every port");
        }
        return Ok(None);
    };

    let config = HostsConfig::load(path)?;
    let unknown = config.unknown_groups(&args.groups);
    if !unknown.is_empty() {
        anyhow::bail!(
            "unknown group(s) {} (available: {})",
            unknown.join(", "),
            config.group_names().join(", ")
        );
    }
    Ok(Some(config))
}

fn run_with_spinner(service: &LinkCheckService, label: &str) -> anyhow::Result<LinkReport> {
    let span = info_span!("links", indicatif.pb_show = true);
    let guard = span.enter();

    let running: Arc<AtomicBool> = Arc::new(AtomicBool::new(true));
    let message = format!("Reading links with {}", label.color(colors::PRIMARY));
    let spinner_handle = spinner::start_scan_spinner(span.clone(), running.clone(), message, spinner::LINK_TIPS);

    let report = service.perform_check();

    running.store(false, Ordering::Relaxed);
    let _ = spinner_handle.join();
    drop(guard);

    report
}

fn check_ends(report: &LinkReport, total_time: Duration, cfg: &Config) {
    if report.parsed == 0 {
        print::header("no switch ports found", cfg.quiet);
        print::no_results();
        return;
    }

    if cfg.quiet > 0 {
        mprint!();
    }

    print::header("link status", cfg.quiet);
    print_totals(report, cfg);
    print_groups(&report.statistics, cfg);
    print_summary(&report.statistics, total_time, cfg);
}

fn print_totals(report: &LinkReport, cfg: &Config) {
    if cfg.quiet > 0 {
        return;
    }

    let stats = &report.statistics;
    print::GLOBAL_KEY_WIDTH.set(14);
    print::aligned_line("Ports parsed", report.parsed.to_string());
    print::aligned_line("Ports checked", stats.total.to_string());
    print::aligned_line("Excluded", report.excluded.len().to_string());
    print::aligned_line("Link up", stats.up.to_string().color(colors::LINK_UP));
    let down = match stats.down_percentage() {
        Some(share) => format!("{} ({})", stats.down, format::percentage(share)).color(colors::LINK_DOWN),
        None => stats.down.to_string().color(colors::TEXT_DEFAULT),
    };
    print::aligned_line("Down", down);
}

fn print_groups(stats: &LinkStatistics, cfg: &Config) {
    if stats.groups.is_empty() || cfg.quiet > 1 {
        return;
    }

    mprint!();
    for (idx, group) in stats.groups.iter().enumerate() {
        print_group_tree(group, idx);
        if idx + 1 != stats.groups.len() {
            mprint!();
        }
    }
}

fn print_group_tree(group: &GroupSummary, idx: usize) {
    let annotation = group.range.as_ref().map(format::range_annotation);
    print::tree_head(idx, &group.name, annotation);

    let mut details: Vec<Detail> = vec![(
        "Links".to_string(),
        format::link_counts(group.total, group.up, group.down),
    )];
    details.extend(group.down_ports.iter().map(format::down_ports_to_detail));
    print::as_tree_one_level(details);
}

fn print_summary(stats: &LinkStatistics, total_time: Duration, cfg: &Config) {
    let down: ColoredString = if stats.down > 0 {
        format!("{} down links", stats.down).bold().red()
    } else {
        "no down links".to_string().bold().green()
    };
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: &ColoredString =
        &format!("Check Complete: {down} in {} ports, {total_time}", stats.total).color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(output);
        }
        _ => {
            mprint!();
            success!("{}", output)
        }
    }
}
