//! Processor command handlers.

use nifictl_core::{Controller, Processor, ProcessorStatus};

use crate::cli::{GlobalOpts, ProcessorsArgs, ProcessorsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

fn processor_detail(p: &Processor, color: bool) -> String {
    output::detail_block(&[
        ("ID", p.id.clone()),
        ("Name", output::opt(p.name.as_deref())),
        ("Type", output::opt(p.processor_type.as_deref())),
        (
            "State",
            output::paint_run_status(p.state.as_deref().unwrap_or("-"), color),
        ),
        ("Group", output::opt(p.parent_group_id.as_deref())),
    ])
}

fn status_detail(s: &ProcessorStatus, color: bool) -> String {
    let n = |v: Option<u64>| v.unwrap_or(0).to_string();
    output::detail_block(&[
        ("ID", output::opt(s.id.as_deref())),
        ("Name", output::opt(s.name.as_deref())),
        ("Type", output::opt(s.processor_type.as_deref())),
        (
            "Status",
            output::paint_run_status(s.run_status.as_deref().unwrap_or("-"), color),
        ),
        ("Flow files in", n(s.flow_files_in)),
        ("Bytes in", n(s.bytes_in)),
        ("Flow files out", n(s.flow_files_out)),
        ("Bytes out", n(s.bytes_out)),
        ("Tasks", n(s.task_count)),
        (
            "Active threads",
            s.active_thread_count.unwrap_or(0).to_string(),
        ),
    ])
}

pub async fn handle(
    controller: &Controller,
    args: ProcessorsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    match args.command {
        ProcessorsCommand::Get { id } => {
            let processor = util::resubmit_once(|| controller.control().get_processor(&id)).await?;
            let out = output::render_single(
                &global.output,
                &processor,
                |p| processor_detail(p, color),
                |p| p.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProcessorsCommand::Status {
            group_id,
            processor_id,
        } => {
            let status = util::resubmit_once(|| {
                controller
                    .status()
                    .processor_status(&group_id, &processor_id)
            })
            .await?;
            let out = output::render_single(
                &global.output,
                &status,
                |s| status_detail(s, color),
                |s| s.id.clone().unwrap_or_default(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
