//! Project commands
//!
//! Usage:
//!   schemx project create <FILE> --name <NAME>
//!   schemx project info <FILE> [--recover <MODE>]
//!   schemx project netclass add <FILE> <NAME> [--recover <MODE>]

use clap::{Args, Subcommand, ValueEnum};
use schemx_core::model::NetClass;
use schemx_core::Command;
use schemx_core_types::EntityId;
use schemx_store::{FixedRecovery, Project, RecoveryChoice};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProjectCommand {
    /// Create a new project file
    Create(CreateArgs),
    /// Print a summary of a project
    Info(OpenArgs),
    /// Net class operations
    Netclass(NetclassArgs),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Path of the new *.scx file
    pub file: PathBuf,

    /// Project name
    #[arg(long)]
    pub name: String,
}

/// Answer given when the project has a stale lock
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Recover {
    Restore,
    Ignore,
    Cancel,
}

impl From<Recover> for RecoveryChoice {
    fn from(recover: Recover) -> Self {
        match recover {
            Recover::Restore => RecoveryChoice::Restore,
            Recover::Ignore => RecoveryChoice::Ignore,
            Recover::Cancel => RecoveryChoice::Cancel,
        }
    }
}

#[derive(Debug, Args)]
pub struct OpenArgs {
    /// Project file
    pub file: PathBuf,

    /// What to do if the project was not closed cleanly
    #[arg(long, value_enum, default_value = "cancel")]
    pub recover: Recover,
}

#[derive(Debug, Args)]
pub struct NetclassArgs {
    #[command(subcommand)]
    pub command: NetclassCommand,
}

#[derive(Debug, Subcommand)]
pub enum NetclassCommand {
    /// Add a net class and save the project
    Add(NetclassAddArgs),
}

#[derive(Debug, Args)]
pub struct NetclassAddArgs {
    #[command(flatten)]
    pub project: OpenArgs,

    /// Name of the new net class
    pub name: String,
}

/// Execute project command
pub fn execute(args: ProjectArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        ProjectCommand::Create(args) => execute_create(args),
        ProjectCommand::Info(args) => execute_info(args),
        ProjectCommand::Netclass(args) => match args.command {
            NetclassCommand::Add(args) => execute_netclass_add(args),
        },
    }
}

fn open(args: &OpenArgs) -> Result<Project, Box<dyn std::error::Error>> {
    let mut prompt = FixedRecovery(args.recover.into());
    Ok(Project::open(&args.file, &mut prompt)?)
}

fn execute_create(args: CreateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let project = Project::create(&args.file, &args.name)?;
    println!("✓ Created project \"{}\" ({})", project.name(), project.meta().id);
    project.close()?;
    Ok(())
}

fn execute_info(args: OpenArgs) -> Result<(), Box<dyn std::error::Error>> {
    // dropped rather than closed: closing would discard crash backups
    let project = open(&args)?;
    let graph = project.graph();

    println!("Project:   {}", project.name());
    println!("Id:        {}", project.meta().id);
    println!("Created:   {}", project.meta().created.to_rfc3339());
    println!("Library:   {} component(s)", graph.library_components().count());
    println!(
        "Circuit:   {} net class(es), {} net signal(s), {} component instance(s)",
        graph.net_classes().count(),
        graph.net_signals().count(),
        graph.component_instances().count()
    );
    for class in graph.net_classes() {
        println!("  netclass {}", class.name);
    }
    for schematic in graph.schematics() {
        println!(
            "  schematic {} ({} item(s))",
            schematic.name,
            schematic.item_count()
        );
    }
    Ok(())
}

fn execute_netclass_add(args: NetclassAddArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut project = open(&args.project)?;
    let id = EntityId::new();
    project
        .document_mut()
        .execute(Command::add_net_class(NetClass::new(id, args.name.as_str())))?;
    project.save()?;
    println!("✓ Added net class \"{}\" ({})", args.name, id);
    project.close()?;
    Ok(())
}
