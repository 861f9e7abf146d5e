//! Resource catalog command handlers.

use tabled::Tabled;

use nifictl_core::{Controller, Resource, ResourceKind};

use crate::cli::{GlobalOpts, ResourcesArgs, ResourcesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Identifier")]
    identifier: String,
}

impl From<&Resource> for ResourceRow {
    fn from(r: &Resource) -> Self {
        Self {
            kind: r.kind.to_string(),
            id: output::opt(r.id.as_deref()),
            name: r.name.clone(),
            identifier: r.identifier.clone(),
        }
    }
}

fn detail(r: &Resource) -> String {
    output::detail_block(&[
        ("Name", r.name.clone()),
        ("Kind", r.kind.to_string()),
        ("ID", output::opt(r.id.as_deref())),
        ("Parent", output::opt(r.parent_group_id.as_deref())),
        ("Identifier", r.identifier.clone()),
    ])
}

fn print_list(resources: &[Resource], global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_list(
        &global.output,
        resources,
        |r| ResourceRow::from(r),
        |r| r.identifier.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn print_one(
    found: Option<Resource>,
    kind: &str,
    identifier: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let resource = found.ok_or_else(|| CliError::NotFound {
        resource_type: kind.into(),
        identifier: identifier.into(),
        list_command: "resources list".into(),
    })?;
    let out = output::render_single(&global.output, &resource, detail, |r| {
        r.identifier.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    controller: &Controller,
    args: ResourcesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let catalog = controller.catalog();
    match args.command {
        ResourcesCommand::List { kind } => {
            let snapshot = util::resubmit_once(|| catalog.fetch_all()).await?;
            let resources: Vec<Resource> = match kind {
                Some(kind) => snapshot.by_kind(kind).cloned().collect(),
                None => snapshot.into_resources(),
            };
            print_list(&resources, global)
        }

        ResourcesCommand::Get { id } => {
            let found = util::resubmit_once(|| catalog.resolve_by_id(&id)).await?;
            print_one(found, "Resource", &id, global)
        }

        ResourcesCommand::Find { name, kind } => {
            let found = match kind {
                Some(ResourceKind::ProcessGroup) => {
                    util::resubmit_once(|| catalog.find_process_group_by_name(&name)).await?
                }
                Some(ResourceKind::Processor) => {
                    util::resubmit_once(|| catalog.find_processor_by_name(&name)).await?
                }
                Some(kind @ ResourceKind::Other) => {
                    let snapshot = util::resubmit_once(|| catalog.fetch_all()).await?;
                    snapshot.find_by_name_and_kind(&name, kind).cloned()
                }
                None => util::resubmit_once(|| catalog.resolve_by_name(&name)).await?,
            };
            print_one(found, "Resource named", &name, global)
        }

        ResourcesCommand::Children { group_id } => {
            let children = util::resubmit_once(|| catalog.children_of(&group_id)).await?;
            print_list(&children, global)
        }

        ResourcesCommand::Discover => {
            let groups = catalog.discover_process_groups().await?;
            print_list(&groups, global)
        }
    }
}
