use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use courthub::{
    Hub, HubConfig,
    workflows::{ReconcileReport, reconcile},
};
use serde::Serialize;

use crate::examples::ExampleGroup;
use crate::output::{OutputManager, TableDisplay};

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Repair counters",
    commands: &[
        "courthub reconcile --dry-run            # Report drifted ratings and comment counts",
        "courthub reconcile                      # Rewrite drifted values from the source rows",
        "courthub --output json reconcile        # Machine-readable report",
    ],
}];

#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// Only report drift, do not write anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
#[serde(transparent)]
struct DriftTable(ReconcileReport);

impl TableDisplay for DriftTable {
    fn to_table(&self, output: &OutputManager) -> Table {
        let mut table = output.create_table();
        output.add_table_header(&mut table, &["Collection", "Id", "Field", "Stored", "Actual"]);
        for drift in &self.0.drift {
            table.add_row(vec![
                Cell::new(drift.collection),
                Cell::new(&drift.id),
                Cell::new(drift.field),
                Cell::new(drift.stored),
                Cell::new(drift.actual),
            ]);
        }
        table
    }
}

pub async fn handle_reconcile(args: ReconcileArgs, config: HubConfig, output: &OutputManager) -> Result<()> {
    let hub = Hub::connect(&config).await?;
    let report = reconcile(hub.store(), args.dry_run).await?;

    output.info(&format!(
        "Checked {} equipment items and {} posts",
        report.equipment_checked, report.posts_checked
    ));

    if report.drift.is_empty() {
        if output.is_json() {
            output.display(&DriftTable(report))?;
        } else {
            output.success("All counters match their source rows");
        }
        return Ok(());
    }

    let drifted = report.drift.len();
    let applied = report.applied;
    output.display(&DriftTable(report))?;
    if applied {
        output.success(&format!("Repaired {drifted} drifted values"));
    } else {
        output.warning(&format!("{drifted} drifted values found (dry run, nothing written)"));
    }
    Ok(())
}
