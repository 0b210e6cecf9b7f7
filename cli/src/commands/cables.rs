use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Instant;

use anyhow::Context;
use chrono::Local;
use colored::*;
use ibpdc_common::{config::Config, info, success, warn};
use ibpdc_core::cable::{CableRecord, SerialProblem};
use ibpdc_core::check::{CableOutputPaths, CableReport, analyze_cables};
use ibpdc_core::nodes::{HostLookup, NodeDescriptionCache};
use ibpdc_core::system::{IbDiagnet, SmpQuery, data_file_size};
use is_root::is_root;
use tracing::info_span;

use crate::commands::CablesArgs;
use crate::mprint;
use crate::terminal::{colors, format, print, spinner};

type Detail = (String, ColoredString);

const RECORD_COLUMNS: [(&str, usize); 9] = [
    ("No.", 4),
    ("NodeGuid", 18),
    ("PortGuid", 18),
    ("Port", 4),
    ("Source", 8),
    ("Vendor", 10),
    ("OUI", 8),
    ("PN", 18),
    ("SN", 16),
];

pub fn cables(args: &CablesArgs, cfg: &Config) -> anyhow::Result<()> {
    let data_file = resolve_data_file(args, cfg)?;

    if args.enable_host_info {
        SmpQuery::ensure_available()?;
    }

    let text = fs::read_to_string(&data_file)
        .with_context(|| format!("cannot read {}", data_file.display()))?;
    let report = analyze_cables(&text)?;

    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("cannot create {}", args.output_dir.display()))?;
    let generated_at = Local::now().naive_local();
    let paths = CableOutputPaths::new(&args.output_dir, &generated_at);

    let mut cache = args
        .enable_host_info
        .then(|| NodeDescriptionCache::new(SmpQuery::new(&args.interface)));
    if cache.is_some() {
        info!("Resolving node descriptions with smpquery, this may take a while");
    }
    let hosts = cache.as_mut().map(|cache| cache as &mut dyn HostLookup);
    let written = report.write_outputs(&paths, &generated_at, hosts)?;

    analysis_ends(&report, cfg);
    print_written(&written, cfg);
    if let Some(cache) = &cache {
        print_host_info(cache, cfg);
    }
    Ok(())
}

/// Path of the database to analyze, scanning the fabric first unless a file was
/// given or the scan is skipped.
fn resolve_data_file(args: &CablesArgs, cfg: &Config) -> anyhow::Result<PathBuf> {
    if let Some(file) = &args.file {
        let size = data_file_size(file)?;
        info!("Using {} ({})", file.display(), format::file_size(size));
        return Ok(file.clone());
    }

    let mut scanner = IbDiagnet::new(&args.interface, &args.data_dir);
    scanner.verbose = cfg.debug;

    if args.skip_scan {
        let file = scanner.data_file();
        let size = data_file_size(&file).context("no previous scan found, run without --skip-scan")?;
        info!("Reusing {} ({})", file.display(), format::file_size(size));
        return Ok(file);
    }

    match scanner.version()? {
        Some(version) => info!("Found {}", version),
        None => warn!("Could not determine the ibdiagnet version"),
    }
    if !is_root() {
        warn!("Not running as root, ibdiagnet may fail to access the fabric");
    }

    let size = scan_with_spinner(&scanner)?;
    success!("Scan finished, {} written", format::file_size(size));
    Ok(scanner.data_file())
}

fn scan_with_spinner(scanner: &IbDiagnet) -> anyhow::Result<u64> {
    if scanner.verbose {
        return scanner.scan();
    }

    let span = info_span!("ibdiagnet", indicatif.pb_show = true);
    let guard = span.enter();

    let running: Arc<AtomicBool> = Arc::new(AtomicBool::new(true));
    let message = format!("Scanning fabric via {}", scanner.interface.color(colors::PRIMARY));
    let spinner_handle = spinner::start_scan_spinner(span.clone(), running.clone(), message, spinner::SCAN_TIPS);

    let start_time = Instant::now();
    let result = scanner.scan();

    running.store(false, Ordering::Relaxed);
    let _ = spinner_handle.join();
    drop(guard);

    info!("ibdiagnet ran for {:.1}s", start_time.elapsed().as_secs_f64());
    result
}

fn analysis_ends(report: &CableReport, cfg: &Config) {
    if cfg.quiet > 0 {
        mprint!();
    }

    print::header("part numbers", cfg.quiet);
    print_distribution(report, cfg);

    print::header("serial numbers", cfg.quiet);
    print_serial_summary(report, cfg);

    if !report.analysis.is_clean() {
        print::header("problems", cfg.quiet);
        print_problems(report, cfg);
    }
}

fn print_distribution(report: &CableReport, cfg: &Config) {
    if cfg.quiet > 1 {
        return;
    }

    let rows = report.distribution.rows();
    let widths = [24, 8, 10];
    print::table_row(&header_cells(&["PN", "Count", "Percentage"], &widths));
    print::thin_separator();
    for visible in format::visible_rows(rows.len(), format::PN_TABLE_LIMIT) {
        match visible {
            Some(idx) => {
                let row = &rows[idx];
                let last = idx + 1 == rows.len();
                let pn = if last { row[0].bold() } else { row[0].color(colors::PRIMARY) };
                print::table_row(&[
                    (pn.to_string(), widths[0]),
                    (row[1].clone(), widths[1]),
                    (row[2].clone(), widths[2]),
                ]);
            }
            None => print::table_row(&[("...".bright_black().to_string(), widths[0])]),
        }
    }
}

fn print_serial_summary(report: &CableReport, cfg: &Config) {
    let analysis = &report.analysis;

    if cfg.quiet == 0 {
        if !report.inventory.missing_columns.is_empty() {
            warn!("Missing columns: {}", report.inventory.missing_columns.join(", "));
        }
        print::GLOBAL_KEY_WIDTH.set(20);
        print::aligned_line("Records", analysis.total_records.to_string());
        print::aligned_line("With serial", analysis.valid_records.to_string());
        print::aligned_line("Unique serials", analysis.unique_serials.to_string());
        print::aligned_line(&format::dual_port_label(), analysis.dual_port_records.to_string());
        print::aligned_line("Single port", analysis.single_port_records.to_string());
    }

    let verdict: ColoredString = if analysis.is_clean() {
        "no duplicate or incomplete serial numbers".bold().green()
    } else {
        format!(
            "{} duplicate, {} incomplete serial numbers",
            analysis.duplicates.len(),
            analysis.incomplete.len()
        )
        .bold()
        .red()
    };

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&verdict.to_string());
        }
        _ => {
            if analysis.is_clean() {
                success!("{}", verdict);
            } else {
                warn!("{}", verdict);
            }
        }
    }
}

fn print_problems(report: &CableReport, cfg: &Config) {
    if cfg.quiet > 1 {
        return;
    }

    let analysis = &report.analysis;
    let problems = analysis.duplicates.iter().map(|problem| ("duplicate", problem));
    let problems = problems.chain(analysis.incomplete.iter().map(|problem| ("incomplete", problem)));
    for (idx, (kind, problem)) in problems.enumerate() {
        print_problem_tree(idx, kind, problem);
    }

    if cfg.quiet > 0 {
        return;
    }
    mprint!();
    print_records(&analysis.problem_records(&report.inventory.records));
}

fn print_problem_tree(idx: usize, kind: &str, problem: &SerialProblem) {
    let annotation = format!("({kind})").color(colors::LINK_DOWN);
    print::tree_head(idx, &problem.sn, Some(annotation));
    let details: Vec<Detail> = vec![
        ("PN".to_string(), problem.pn.color(colors::PRIMARY)),
        ("Vendor".to_string(), problem.vendor.normal()),
        (
            "Ports".to_string(),
            format!("{} found, {} expected", problem.actual, problem.expected).normal(),
        ),
    ];
    print::as_tree_one_level(details);
}

fn print_records(records: &[&CableRecord]) {
    let names: Vec<&str> = RECORD_COLUMNS.iter().map(|(name, _)| *name).collect();
    let widths: Vec<usize> = RECORD_COLUMNS.iter().map(|(_, width)| *width).collect();
    print::table_row(&header_cells(&names, &widths));
    print::thin_separator();

    for (idx, record) in records.iter().enumerate() {
        let cells = [
            (idx + 1).to_string(),
            format::short_guid(&record.node_guid).color(colors::GUID).to_string(),
            format::short_guid(&record.port_guid).color(colors::GUID).to_string(),
            record.port_num.clone(),
            record.source.clone(),
            record.vendor.clone(),
            record.oui.clone(),
            record.pn.clone(),
            record.sn.bold().to_string(),
        ];
        let row: Vec<(String, usize)> = cells.into_iter().zip(widths.iter().copied()).collect();
        print::table_row(&row);
    }
}

fn header_cells(names: &[&str], widths: &[usize]) -> Vec<(String, usize)> {
    names
        .iter()
        .zip(widths)
        .map(|(name, width)| (name.color(colors::ACCENT).bold().to_string(), *width))
        .collect()
}

fn print_written(written: &[PathBuf], cfg: &Config) {
    if cfg.quiet > 1 {
        return;
    }

    mprint!();
    for path in written {
        let size = file_len(path).map(format::file_size).unwrap_or_default();
        success!(
            "Saved {} {}",
            path.display().to_string().color(colors::PRIMARY),
            size.bright_black()
        );
    }
}

fn file_len(path: &Path) -> Option<u64> {
    fs::metadata(path).ok().map(|metadata| metadata.len())
}

fn print_host_info<R>(cache: &NodeDescriptionCache<R>, cfg: &Config)
where
    R: ibpdc_common::nodes::NodeDescriptionRepository,
{
    if cfg.quiet > 0 {
        return;
    }

    mprint!();
    print::GLOBAL_KEY_WIDTH.set(18);
    print::aligned_line("GUIDs queried", cache.queried().to_string());
    print::aligned_line("Resolved", cache.resolved().to_string());
    let rate = cache
        .success_rate()
        .map(format::percentage)
        .unwrap_or_else(|| "n/a".to_string());
    print::aligned_line("Success rate", rate);
}
