//! Workspace commands
//!
//! Usage:
//!   schemx workspace init <DIR>
//!   schemx workspace scan <DIR>

use clap::{Args, Subcommand};
use schemx_store::{LibraryScanner, ScanEvent, Workspace};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct WorkspaceArgs {
    #[command(subcommand)]
    pub command: WorkspaceCommand,
}

#[derive(Debug, Subcommand)]
pub enum WorkspaceCommand {
    /// Create a workspace (or validate an existing one)
    Init(DirArgs),
    /// Index the workspace library
    Scan(DirArgs),
}

#[derive(Debug, Args)]
pub struct DirArgs {
    /// Workspace directory
    pub dir: PathBuf,
}

/// Execute workspace command
pub fn execute(args: WorkspaceArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        WorkspaceCommand::Init(args) => execute_init(args),
        WorkspaceCommand::Scan(args) => execute_scan(args),
    }
}

fn execute_init(args: DirArgs) -> Result<(), Box<dyn std::error::Error>> {
    let workspace = Workspace::init(&args.dir)?;
    println!("✓ Workspace ready at {}", workspace.root().display());
    println!("  projects: {}", workspace.projects_dir().display());
    println!("  library:  {}", workspace.library_dir().display());
    workspace.close()?;
    Ok(())
}

fn execute_scan(args: DirArgs) -> Result<(), Box<dyn std::error::Error>> {
    let workspace = Workspace::open(&args.dir)?;
    let events = LibraryScanner::start(workspace.library_dir()).wait();
    workspace.close()?;

    match events.into_iter().last() {
        Some(ScanEvent::Finished { entries, skipped }) => {
            for entry in &entries {
                println!(
                    "{:<10} {:<24} {}",
                    entry.kind,
                    entry.name.as_deref().unwrap_or("-"),
                    entry.path.display()
                );
            }
            println!("✓ {} element(s), {} skipped", entries.len(), skipped);
            Ok(())
        }
        Some(ScanEvent::Failed(message)) => Err(message.into()),
        _ => Err("library scan did not finish".into()),
    }
}
