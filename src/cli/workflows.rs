//! Workflow catalog command
//!
//! Lists the workflow names that can be used as a secret scope.

use anyhow::Result;

use super::output::{self, truncate};
use crate::client::ApiClient;
use crate::secrets::WorkflowCatalog;

/// Handle `wfsecrets workflows`
pub async fn handle_workflows_command(client: &ApiClient, output: &str) -> Result<()> {
    let catalog = WorkflowCatalog::load(client).await;

    if output == "table" {
        print_catalog_table(&catalog);
    } else {
        output::print_output(&catalog.names(), output)?;
    }
    Ok(())
}

fn print_catalog_table(catalog: &WorkflowCatalog) {
    if catalog.is_empty() {
        println!("No workflows found; only the global scope is available");
        return;
    }

    output::print_table_header(&[("Workflow", 50)]);
    for name in catalog.names() {
        println!("{}", truncate(name, 50));
    }
    println!();
}
