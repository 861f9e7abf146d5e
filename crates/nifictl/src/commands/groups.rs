//! Process group command handlers.

use std::fmt::Write as _;
use std::path::Path;

use futures_util::StreamExt;
use tabled::Tabled;
use tracing::debug;

use nifictl_core::analysis;
use nifictl_core::model::{ProcessGroupAnalysis, ProcessorTransferInfo, QueueConnectionInfo};
use nifictl_core::{
    Controller, CoreError, FieldPolicy, PollInterval, ProcessGroup, ProcessorStatus, StatusSnapshot,
    TickFailurePolicy,
};

use crate::cli::{GlobalOpts, GroupsArgs, GroupsCommand, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProcessorStatusRow {
    #[tabled(rename = "Processor")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "In")]
    flow_files_in: u64,
    #[tabled(rename = "Out")]
    flow_files_out: u64,
    #[tabled(rename = "Tasks")]
    tasks: u64,
    #[tabled(rename = "Threads")]
    threads: u32,
}

impl ProcessorStatusRow {
    fn new(p: &ProcessorStatus, color: bool) -> Self {
        Self {
            name: output::opt(p.name.as_deref()),
            status: output::paint_run_status(p.run_status.as_deref().unwrap_or("-"), color),
            flow_files_in: p.flow_files_in.unwrap_or(0),
            flow_files_out: p.flow_files_out.unwrap_or(0),
            tasks: p.task_count.unwrap_or(0),
            threads: p.active_thread_count.unwrap_or(0),
        }
    }
}

#[derive(Tabled)]
struct QueueRow {
    #[tabled(rename = "Connection")]
    id: String,
    #[tabled(rename = "From")]
    source: String,
    #[tabled(rename = "To")]
    destination: String,
    #[tabled(rename = "Queued")]
    count: u64,
    #[tabled(rename = "Size")]
    size: String,
}

impl From<&QueueConnectionInfo> for QueueRow {
    fn from(q: &QueueConnectionInfo) -> Self {
        Self {
            id: output::opt(q.connection_id.as_deref()),
            source: output::opt(q.source_name.as_deref()),
            destination: output::opt(q.destination_name.as_deref()),
            count: q.queued_count,
            size: output::opt(q.queued_size.as_deref()),
        }
    }
}

#[derive(Tabled)]
struct TransferRow {
    #[tabled(rename = "Processor")]
    name: String,
    #[tabled(rename = "In")]
    input: String,
    #[tabled(rename = "Out")]
    output: String,
    #[tabled(rename = "Processing time")]
    time: String,
    #[tabled(rename = "Avg task (ms)")]
    average_ms: String,
}

impl From<&ProcessorTransferInfo> for TransferRow {
    fn from(t: &ProcessorTransferInfo) -> Self {
        Self {
            name: output::opt(t.processor_name.as_deref()),
            input: format!("{} ({})", t.input.flow_file_count, t.input.formatted_size),
            output: format!("{} ({})", t.output.flow_file_count, t.output.formatted_size),
            time: t.timing.formatted_processing_time.clone(),
            average_ms: format!("{:.2}", t.timing.average_task_duration_ms),
        }
    }
}

// ── Detail views ────────────────────────────────────────────────────

fn group_detail(g: &ProcessGroup) -> String {
    output::detail_block(&[
        ("ID", g.id.clone()),
        ("Name", output::opt(g.name.as_deref())),
        ("Parent", output::opt(g.parent_group_id.as_deref())),
        ("Running", g.running_count.to_string()),
        ("Stopped", g.stopped_count.to_string()),
        ("Invalid", g.invalid_count.to_string()),
        ("Disabled", g.disabled_count.to_string()),
        (
            "Revision",
            g.revision.map(|r| r.to_string()).unwrap_or_default(),
        ),
    ])
}

fn snapshot_detail(s: &StatusSnapshot, color: bool) -> String {
    let t = &s.totals;
    let mut out = output::detail_block(&[
        ("ID", s.id.clone()),
        ("Name", output::opt(s.name.as_deref())),
        (
            "Refreshed",
            output::opt(s.stats_last_refreshed.as_deref()),
        ),
        (
            "Queued",
            format!(
                "{} flow files / {} bytes",
                t.flow_files_queued.unwrap_or(0),
                t.bytes_queued.unwrap_or(0)
            ),
        ),
        (
            "Active threads",
            t.active_thread_count.unwrap_or(0).to_string(),
        ),
    ]);
    if !s.processors.is_empty() {
        let rows: Vec<_> = s
            .processors
            .iter()
            .map(|p| ProcessorStatusRow::new(p, color))
            .collect();
        let _ = write!(out, "\n\n{}", output::render_table(&rows));
    }
    out
}

fn analysis_detail(a: &ProcessGroupAnalysis, color: bool) -> String {
    let mut out = output::detail_block(&[
        ("ID", a.process_group_id.clone()),
        ("Name", output::opt(a.process_group_name.as_deref())),
        (
            "Total transfer",
            format!(
                "{} flow files ({})",
                a.group_total_transfer.flow_file_count, a.group_total_transfer.formatted_size
            ),
        ),
    ]);

    let heading = |title: &str| output::dim(title, color);

    if a.queue_connections.is_empty() {
        let _ = write!(out, "\n\n{}", heading("No queued connections"));
    } else {
        let rows: Vec<QueueRow> = a.queue_connections.iter().map(QueueRow::from).collect();
        let _ = write!(
            out,
            "\n\n{}\n{}",
            heading("Queued connections"),
            output::render_table(&rows)
        );
    }

    for (title, list) in [
        ("Stopped processors", &a.stopped_processors),
        ("Not running", &a.not_running_processors),
    ] {
        if list.is_empty() {
            continue;
        }
        let _ = write!(out, "\n\n{}", heading(title));
        for p in list {
            let _ = write!(
                out,
                "\n  {}  {}",
                output::opt(p.processor_name.as_deref()),
                output::paint_run_status(p.run_status.as_deref().unwrap_or("-"), color)
            );
        }
    }

    if !a.processor_transfers.is_empty() {
        let rows: Vec<TransferRow> = a.processor_transfers.iter().map(TransferRow::from).collect();
        let _ = write!(
            out,
            "\n\n{}\n{}",
            heading("Processor transfers"),
            output::render_table(&rows)
        );
    }
    out
}

/// One line per tick for `watch`.
fn watch_line(s: &StatusSnapshot, color: bool) -> String {
    let t = &s.totals;
    let running = s
        .processors
        .iter()
        .filter(|p| p.run_status.as_deref().is_some_and(|r| r.eq_ignore_ascii_case("running")))
        .count();
    format!(
        "{} {} queued={} in={} out={} running={}/{} threads={}",
        output::dim(&s.fetched_at.format("%H:%M:%S").to_string(), color),
        s.name.as_deref().unwrap_or(&s.id),
        t.flow_files_queued.unwrap_or(0),
        t.flow_files_in.unwrap_or(0),
        t.flow_files_out.unwrap_or(0),
        running,
        s.processors.len(),
        t.active_thread_count.unwrap_or(0),
    )
}

fn print_analysis(analysis: &ProcessGroupAnalysis, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        analysis,
        |a| analysis_detail(a, color),
        |a| a.process_group_id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────────

/// Analyze a saved `/flow/process-groups/{id}/status` response.
pub fn analyze_file(path: &Path, strict: bool, global: &GlobalOpts) -> Result<(), CliError> {
    let body = std::fs::read_to_string(path)?;
    let policy = if strict {
        FieldPolicy::RejectUnknown
    } else {
        FieldPolicy::IgnoreUnknown
    };
    let result = analysis::analyze_json(&body, policy)?;
    analysis::log_summary(&result);
    print_analysis(&result, global)
}

pub async fn handle(
    controller: &Controller,
    args: GroupsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let print_group = |group: &ProcessGroup| -> Result<(), CliError> {
        let out = output::render_single(&global.output, group, group_detail, |g| g.id.clone())?;
        output::print_output(&out, global.quiet);
        Ok(())
    };

    match args.command {
        GroupsCommand::Get { id } => {
            let group = util::resubmit_once(|| controller.control().get_process_group(&id)).await?;
            print_group(&group)
        }

        GroupsCommand::Start { id } => {
            let group = util::resubmit_once(|| controller.control().start(&id)).await?;
            if !global.quiet {
                eprintln!("Process group {id} scheduled to run");
            }
            print_group(&group)
        }

        GroupsCommand::Stop { id } => {
            if !util::confirm(&format!("Stop every component in process group '{id}'?"), global.yes)? {
                return Ok(());
            }
            let group = util::resubmit_once(|| controller.control().stop(&id)).await?;
            if !global.quiet {
                eprintln!("Process group {id} stopped");
            }
            print_group(&group)
        }

        GroupsCommand::Status { id } => {
            let snapshot = util::resubmit_once(|| controller.status().get_snapshot(&id)).await?;
            let out = output::render_single(
                &global.output,
                &snapshot,
                |s| snapshot_detail(s, color),
                |s| s.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GroupsCommand::Watch {
            id,
            interval,
            skip_failed,
            count,
        } => {
            let interval = PollInterval::from_secs(interval)?;
            let policy = if skip_failed {
                TickFailurePolicy::Skip
            } else {
                TickFailurePolicy::Terminate
            };
            watch(controller, &id, interval, policy, count, global).await
        }

        GroupsCommand::Analyze { id, .. } => {
            let Some(id) = id else {
                return Err(CliError::Validation {
                    field: "id".into(),
                    reason: "a process group id or --from-file is required".into(),
                });
            };
            let result = util::resubmit_once(|| controller.analyze_process_group(&id)).await?;
            print_analysis(&result, global)
        }
    }
}

async fn watch(
    controller: &Controller,
    id: &str,
    interval: PollInterval,
    policy: TickFailurePolicy,
    limit: Option<usize>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let mut stream = controller.watch(id, interval, policy);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut seen = 0usize;
    // Set after a token refresh reopened the stream, cleared by the next snapshot.
    let mut reopened = false;
    loop {
        let next = tokio::select! {
            biased;
            _ = &mut ctrl_c => {
                stream.cancel();
                break;
            }
            item = stream.next() => item,
        };

        let snapshot = match next {
            Some(Ok(snapshot)) => {
                reopened = false;
                snapshot
            }
            Some(Err(CoreError::TokenRefreshed)) if !reopened => {
                debug!(process_group = %id, "access token refreshed, reopening status stream");
                reopened = true;
                stream = controller.watch(id, interval, policy);
                continue;
            }
            Some(Err(e)) => return Err(e.into()),
            None => break,
        };

        let line = match global.output {
            OutputFormat::Table | OutputFormat::Plain => watch_line(&snapshot, color),
            // One document per tick so the output can be piped line by line
            OutputFormat::Json | OutputFormat::JsonCompact => {
                output::render_json(&snapshot, true)?
            }
            OutputFormat::Yaml => format!("---\n{}", output::render_yaml(&snapshot)?),
        };
        output::print_output(&line, global.quiet);

        seen += 1;
        if limit.is_some_and(|n| seen >= n) {
            stream.cancel();
            break;
        }
    }
    Ok(())
}
