use std::path::PathBuf;

use anyhow::{bail, ensure, Context};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use sync_operator::assignment::OperationDraft;
use sync_operator::config::PlannerConfig;
use sync_operator::models::{
    Category, CategoryFilter, Channel, OperationId, PlanViewMode, SlotLocation, Spindle,
    SpindleFilter,
};
use sync_operator::persistence::FileStore;
use sync_operator::plan::{slot_title, PlanView, ProgramTable, SetupSheet};
use sync_operator::Planner;

#[derive(Debug, Parser)]
#[command(
    name = "sync-operator",
    version,
    about = "Slot planner for two-channel CNC lathes"
)]
struct Cli {
    /// Config file (defaults to the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding the stored plan
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the plan in the current view mode
    Show,
    /// List the slots of a channel
    Slots(ChannelArg),
    /// List catalog operations under the current filters
    Library {
        /// Ignore the filters
        #[arg(long)]
        all: bool,
    },
    /// Create an operation
    Add(AddArgs),
    /// Edit an operation
    Edit(EditArgs),
    /// Delete an operation and empty every slot using it
    Delete { id: String },
    /// Put an operation into a slot
    Place {
        slot: usize,
        id: String,
        #[command(flatten)]
        channel: ChannelArg,
    },
    /// Move a slot entry to another position
    Move {
        from: usize,
        to: usize,
        #[command(flatten)]
        channel: ChannelArg,
    },
    /// Empty a slot
    Clear {
        slot: usize,
        #[command(flatten)]
        channel: ChannelArg,
    },
    /// Append an empty slot
    Grow(ChannelArg),
    /// Switch the channel being edited
    Channel { channel: Channel },
    /// Switch the plan view
    View { mode: ViewMode },
    /// Set library filters
    Filter {
        /// Category name, or "Alle"
        #[arg(long)]
        category: Option<CategoryFilter>,
        /// SP3, SP4 or ALL
        #[arg(long)]
        spindle: Option<SpindleFilter>,
    },
    /// Collapse or expand the library panel
    Collapse,
    /// Write a dated JSON export
    Export {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Replace the plan with a JSON export
    Import { path: PathBuf },
    /// Start over from the demo plan
    Reset,
}

#[derive(Debug, Args, Clone)]
struct ChannelArg {
    /// Channel (defaults to the current one)
    #[arg(long, short = 'k')]
    channel: Option<Channel>,
}

#[derive(Debug, Args, Clone)]
struct AddArgs {
    #[arg(long)]
    code: String,
    #[arg(long)]
    title: String,
    #[arg(long, default_value = "SP4")]
    spindle: Spindle,
    #[arg(long, default_value = "Außen")]
    category: Category,
    #[arg(long)]
    doppelhalter: bool,
    #[arg(long, default_value = "")]
    tool_no: String,
    #[arg(long, default_value = "")]
    tool_name: String,
    /// Also place the new operation into this slot
    #[arg(long)]
    slot: Option<usize>,
    #[command(flatten)]
    channel: ChannelArg,
}

#[derive(Debug, Args, Clone)]
struct EditArgs {
    id: String,
    #[arg(long)]
    code: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    spindle: Option<Spindle>,
    #[arg(long)]
    category: Option<Category>,
    #[arg(long)]
    doppelhalter: Option<bool>,
    #[arg(long)]
    tool_no: Option<String>,
    #[arg(long)]
    tool_name: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ViewMode {
    Plan,
    Setup,
}

impl From<ViewMode> for PlanViewMode {
    fn from(mode: ViewMode) -> Self {
        match mode {
            ViewMode::Plan => PlanViewMode::ProgramTable,
            ViewMode::Setup => PlanViewMode::SetupSheet,
        }
    }
}

/// 1-based slot number to list index.
fn slot_index(slot: usize) -> anyhow::Result<usize> {
    ensure!(slot >= 1, "slot numbers start at 1");
    Ok(slot - 1)
}

fn resolve_channel(planner: &Planner, arg: &ChannelArg) -> Channel {
    arg.channel.unwrap_or(planner.state().view.current_channel)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = Cli::parse().run() {
        eprintln!("sync-operator error: {err:#}");
        std::process::exit(1);
    }
}

impl Cli {
    fn run(self) -> anyhow::Result<()> {
        let config = PlannerConfig::load_or_default(self.config.as_deref())
            .context("failed to load config")?;
        let data_dir = config.resolve_data_dir(self.data_dir.as_deref())?;
        info!(data_dir = %data_dir.display(), "opening plan store");

        let store = FileStore::new(&data_dir);
        let mut planner = Planner::open(
            Box::new(store),
            config.storage_key.as_str(),
            config.seed_demo_data,
        );

        match self.command.unwrap_or(Command::Show) {
            Command::Show => print_plan(&planner),
            Command::Slots(arg) => {
                let channel = resolve_channel(&planner, &arg);
                print_slots(&planner, channel);
            }
            Command::Library { all } => print_library(&planner, all),
            Command::Add(args) => {
                let target = match args.slot {
                    Some(slot) => Some(SlotLocation::new(
                        resolve_channel(&planner, &args.channel),
                        slot_index(slot)?,
                    )),
                    None => None,
                };
                let draft = OperationDraft::new(args.code, args.title)
                    .with_spindle(args.spindle)
                    .with_category(args.category)
                    .with_doppelhalter(args.doppelhalter)
                    .with_tool(args.tool_no, args.tool_name);
                let id = planner.upsert_operation(draft, target)?;
                println!("created {id}");
            }
            Command::Edit(args) => {
                let id = OperationId::new(args.id);
                let Some(op) = planner.state().operation(&id) else {
                    bail!("unknown operation: {id}");
                };
                let mut draft = OperationDraft::from_operation(op);
                if let Some(code) = args.code {
                    draft.code = code;
                }
                if let Some(title) = args.title {
                    draft.title = title;
                }
                if let Some(spindle) = args.spindle {
                    draft.spindle = spindle;
                }
                if let Some(category) = args.category {
                    draft.category = category;
                }
                if let Some(doppelhalter) = args.doppelhalter {
                    draft.doppelhalter = doppelhalter;
                }
                if let Some(tool_no) = args.tool_no {
                    draft.tool_no = tool_no;
                }
                if let Some(tool_name) = args.tool_name {
                    draft.tool_name = tool_name;
                }
                planner.upsert_operation(draft, None)?;
                println!("updated {id}");
            }
            Command::Delete { id } => {
                let id = OperationId::new(id);
                if planner.delete_operation(&id).is_none() {
                    bail!("unknown operation: {id}");
                }
                println!("deleted {id}");
            }
            Command::Place { slot, id, channel } => {
                let id = OperationId::new(id);
                ensure!(
                    planner.state().library.contains(&id),
                    "unknown operation: {id}"
                );
                let channel = resolve_channel(&planner, &channel);
                planner.place(channel, slot_index(slot)?, id);
                print_slots(&planner, channel);
            }
            Command::Move { from, to, channel } => {
                let channel = resolve_channel(&planner, &channel);
                if !planner.move_slot(channel, slot_index(from)?, slot_index(to)?) {
                    println!("nothing to move");
                }
                print_slots(&planner, channel);
            }
            Command::Clear { slot, channel } => {
                let channel = resolve_channel(&planner, &channel);
                planner.clear_slot(channel, slot_index(slot)?);
                print_slots(&planner, channel);
            }
            Command::Grow(arg) => {
                let channel = resolve_channel(&planner, &arg);
                let len = planner.grow(channel);
                println!("channel {channel}: {len} slots");
            }
            Command::Channel { channel } => {
                planner.set_channel(channel);
                println!("editing channel {channel} ({})", channel.revolver());
            }
            Command::View { mode } => {
                planner.set_view_mode(mode.into());
                print_plan(&planner);
            }
            Command::Filter { category, spindle } => {
                if let Some(category) = category {
                    planner.set_category_filter(category);
                }
                if let Some(spindle) = spindle {
                    planner.set_spindle_filter(spindle);
                }
                print_library(&planner, false);
            }
            Command::Collapse => {
                let collapsed = planner.toggle_library_collapsed();
                println!("library {}", if collapsed { "collapsed" } else { "expanded" });
            }
            Command::Export { dir } => {
                let dir = dir.unwrap_or_else(|| config.resolve_export_dir(&data_dir));
                let path = planner.export_to(&dir, Utc::now())?;
                println!("exported to {}", path.display());
            }
            Command::Import { path } => {
                let issues = planner
                    .import_file(&path)
                    .with_context(|| format!("failed to import {}", path.display()))?;
                for issue in &issues {
                    println!("note: {}", issue.message);
                }
                println!("imported {} operations", planner.state().library.len());
            }
            Command::Reset => {
                planner.reset();
                println!("plan reset");
            }
        }
        Ok(())
    }
}

fn print_plan(planner: &Planner) {
    match planner.plan_view() {
        PlanView::ProgramTable(table) => print_program_table(&table),
        PlanView::SetupSheet(sheet) => print_setup_sheet(&sheet),
    }
}

fn print_program_table(table: &ProgramTable) {
    println!("{}", PlanViewMode::ProgramTable.title());
    println!(
        "{:>3}  {:<32}{:<32}{:<32}{:<32}",
        "Nr", "K1 SP4", "K1 SP3", "K2 SP3", "K2 SP4"
    );
    for row in &table.rows {
        let [a, b, c, d] = row.cells().map(|cell| cell.map(|c| c.to_string()).unwrap_or_default());
        println!("{:>3}  {a:<32}{b:<32}{c:<32}{d:<32}", row.row_number);
    }
}

fn print_setup_sheet(sheet: &SetupSheet) {
    println!("{}", PlanViewMode::SetupSheet.title());
    println!(
        "{:<8}{:<36}{:<8}{:<36}",
        "T-Nr", "Revolver oben (K1)", "T-Nr", "Revolver unten (K2)"
    );
    for row in &sheet.rows {
        println!(
            "{:<8}{:<36}{:<8}{:<36}",
            row.tool_no_for(Channel::One).unwrap_or(""),
            row.oben,
            row.tool_no_for(Channel::Two).unwrap_or(""),
            row.unten,
        );
    }
}

fn print_slots(planner: &Planner, channel: Channel) {
    let state = planner.state();
    println!(
        "Kanal {channel} ({}, {})",
        channel.revolver(),
        channel.program_file()
    );
    for index in 0..state.slots.get(channel).len() {
        let row = index + 1;
        match state.operation_at(channel, index) {
            Some(op) => println!("{row:>3}  {:<12}{}", op.id, slot_title(op, channel, row)),
            None => println!("{row:>3}  -"),
        }
    }
}

fn print_library(planner: &Planner, all: bool) {
    let state = planner.state();
    if state.view.library_collapsed && !all {
        println!("library collapsed");
        return;
    }
    let ops: Vec<_> = if all {
        state.library.iter().collect()
    } else {
        planner.filtered_library()
    };
    println!(
        "{} / {} ({} of {})",
        state.view.active_category.label(),
        state.view.spindle_filter,
        ops.len(),
        state.library.len()
    );
    for op in ops {
        println!(
            "{:<12}{:<5}{:<10}{}{}",
            op.id,
            op.spindle,
            op.category,
            op.label(),
            if op.doppelhalter { "  [DH]" } else { "" }
        );
    }
}
