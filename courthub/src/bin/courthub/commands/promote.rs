use anyhow::Result;
use clap::Args;
use courthub::{Hub, HubConfig, workflows::accounts};

use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Grant admin rights",
    commands: &["courthub promote coach@club.test        # Make an existing account an admin"],
}];

#[derive(Args, Debug)]
pub struct PromoteArgs {
    /// Email of the account to promote
    pub email: String,
}

pub async fn handle_promote(args: PromoteArgs, config: HubConfig, output: &OutputManager) -> Result<()> {
    let hub = Hub::connect(&config).await?;
    let profile = accounts::promote(hub.store(), &args.email).await?;

    if output.is_json() {
        if !output.options.quiet {
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        return Ok(());
    }

    output.success(&format!("{} is now an admin", profile.email));
    output.key_value("Id", &profile.id);
    output.key_value("Name", &profile.name);
    Ok(())
}
