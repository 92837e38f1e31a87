use std::io;
use std::process::exit;
use std::sync::Arc;
use clap::Parser;
use colored::Colorize;
use tokio::signal;
use tracing::{error, info};
use crate::channels::domain::Channels;
use crate::cli::domain::{Cli, Command};
use crate::cli::logic::{describe_outcome, resolve_admin_state, PromptDecision};
use crate::context::domain::AppContext;
use crate::control::domain::AdminState;
use crate::control::logic::apply_admin_state;
use crate::dataset::domain::PortRecord;
use crate::dataset::logic::{collect_tick, port_records};
use crate::poll::logic::start_poll;
use crate::report::logic::{catalyst_inventory, meraki_inventory, render_report};
use crate::scheduler::domain::start_timer;
use crate::storage::domain::CsvLog;
use crate::storage::logic::{drain_store, persist_batch, start_store};
use crate::system::domain::{init_tracing, System};

mod access;
mod channels;
mod cli;
mod config;
mod connectors;
mod context;
mod control;
mod dataset;
mod poe;
mod poll;
mod report;
mod scheduler;
mod storage;
mod system;
mod topology;


#[tokio::main(flavor = "current_thread")]
async fn main() {

    let cli = Cli::parse();

    let system = match System::new() {
        Ok(system) => Arc::new(system),
        Err(e) => {
            eprintln!("Error: configuración inválida: {e}");
            exit(1);
        }
    };

    init_tracing(&system);
    system.log_platforms();

    let app_context = match AppContext::new(system) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error: no se pudieron crear los clientes: {e}");
            exit(1);
        }
    };

    match cli.command {
        Command::Collect { output, once } => run_collect(app_context, CsvLog::new(output), once).await,
        Command::Snapshot { output } => run_snapshot(&app_context, CsvLog::new(output)).await,
        Command::Port { state, snapshot, yes } => run_port(&app_context, state, yes, CsvLog::new(snapshot)).await,
        Command::Report => run_report(&app_context).await,
    }
}


async fn run_collect(app_context: AppContext, log: CsvLog, once: bool) {

    if once {
        let records = collect_tick(&app_context).await;
        persist_batch(&log, &records);
        return;
    }

    let channels = Channels::new();

    start_timer(channels.timer_to_poll,
                channels.timer_from_poll);

    let poll = start_poll(channels.poll_to_timer,
                          channels.poll_to_store,
                          channels.poll_from_timer,
                          app_context);

    let store = start_store(channels.store_from_poll,
                            log);

    if let Err(e) = signal::ctrl_c().await {
        error!("Error: no se pudo escuchar Ctrl-C: {e}");
    }
    drain_store(poll, store).await;
    info!("Info: recolección detenida");
}


async fn run_snapshot(app_context: &AppContext, log: CsvLog) {
    let records = collect_tick(app_context).await;
    let rows = port_records(&records);
    if rows.is_empty() {
        println!("{}", "Error. No data to update.".red());
        return;
    }
    match log.append(&rows) {
        Ok(count) => println!("{} ports written to {}", count, log.path().display()),
        Err(e) => error!("Error: no se pudo escribir el snapshot. {e}"),
    }
}


async fn run_port(app_context: &AppContext, state: Option<AdminState>, assume_yes: bool, log: CsvLog) {

    let decision = resolve_admin_state(state, assume_yes, &mut io::stdin().lock(), &mut io::stdout());
    let state = match decision {
        Ok(PromptDecision::Apply(state)) => state,
        Ok(PromptDecision::NoAction) => {
            println!("{}", "No action will be taken".bright_yellow());
            return;
        }
        Ok(PromptDecision::Aborted) => {
            println!("{}", "\nAborted!\n".bright_yellow());
            return;
        }
        Ok(PromptDecision::NotUnderstood) => {
            println!("I did not understand that. No action taken.");
            return;
        }
        Err(e) => {
            error!("Error: no se pudo leer la respuesta: {e}");
            return;
        }
    };

    let rows: Vec<PortRecord> = match log.read_all() {
        Ok(rows) => rows,
        Err(e) => {
            error!("Error: no se pudo leer el snapshot. {e}");
            return;
        }
    };
    if rows.is_empty() {
        println!("{} is empty, run `snapshot` first", log.path().display());
        return;
    }

    println!("{}", format!("\nPosting {} to Catalyst Center and Meraki...\n", state.as_str()).bright_yellow());

    let results = apply_admin_state(&rows,
                                    state,
                                    app_context.catalyst.as_deref(),
                                    app_context.meraki.as_deref()).await;

    for (target, outcome) in &results {
        println!("{}", describe_outcome(target, state, outcome));
    }
}


async fn run_report(app_context: &AppContext) {
    if let Some(catalyst) = app_context.catalyst.as_deref() {
        match catalyst_inventory(catalyst).await {
            Ok(rows) => println!("{}", render_report("Catalyst Center managed switches", &rows)),
            Err(e) => error!("Error: inventario de Catalyst Center fallido: {e}"),
        }
    }

    if let (Some(meraki), Some(settings)) = (app_context.meraki.as_deref(), app_context.system.meraki.as_ref()) {
        match meraki_inventory(meraki, &settings.organization).await {
            Ok(rows) => println!("{}", render_report("Meraki managed switches", &rows)),
            Err(e) => error!("Error: inventario de Meraki fallido: {e}"),
        }
    }
}
