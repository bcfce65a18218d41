//! Statement-script persistence.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

/// Render statements as a newline-joined script, each statement
/// terminated with `;`. Statement text is the bit-exact contract for any
/// consumer parsing the file.
pub fn render_script(statements: &[String]) -> String {
    let mut script = String::new();
    for statement in statements {
        script.push_str(statement);
        script.push_str(";\n");
    }
    script
}

/// Write the statement script to a file.
pub fn save_script(statements: &[String], path: &Path) -> Result<()> {
    std::fs::write(path, render_script(statements))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), statements = statements.len(), "Saved graph script");
    Ok(())
}
