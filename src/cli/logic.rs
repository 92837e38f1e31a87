//! Diálogo interactivo y salida de consola del control de puertos.


use std::io::{self, BufRead, Write};
use colored::Colorize;
use crate::control::domain::{AdminState, ControlOutcome, PortTarget, RowOutcome};
use crate::dataset::domain::Platform;


/// Resultado del diálogo interactivo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptDecision {
    Apply(AdminState),
    NoAction,
    Aborted,
    NotUnderstood,
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Yes,
    No,
    Other,
}


/// Lee una respuesta y/n. Una línea vacía vale "no".
fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<Answer> {
    write!(output, "{}", question)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(match line.trim().to_lowercase().as_str() {
        "" | "n" | "no" => Answer::No,
        "y" | "yes" => Answer::Yes,
        _ => Answer::Other,
    })
}


/// Pregunta si se apagan los APs (con doble confirmación) o, si no, si se encienden.
pub fn prompt_admin_state<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<PromptDecision> {
    writeln!(output, "{}", "*".repeat(60))?;
    writeln!(output, "*{:^58}*", "Welcome to the power saver script!")?;
    writeln!(output, "{}", "*".repeat(60))?;

    match ask(input, output, "\nDo you want to shut down the access points and save some watts (y/n)[n]?: ")? {
        Answer::Yes => confirm_shutdown(input, output),
        Answer::No => {
            match ask(input, output, "\nDo you want to turn on the access points (y/n)[n]?: ")? {
                Answer::Yes => Ok(PromptDecision::Apply(AdminState::Up)),
                Answer::No => Ok(PromptDecision::NoAction),
                Answer::Other => Ok(PromptDecision::NotUnderstood),
            }
        }
        Answer::Other => Ok(PromptDecision::NotUnderstood),
    }
}


fn confirm_shutdown<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<PromptDecision> {
    match ask(input, output, "\n...double checking: You REALLY want to shut down the access points? (y/n)[n]: ")? {
        Answer::Yes => Ok(PromptDecision::Apply(AdminState::Down)),
        Answer::No => Ok(PromptDecision::Aborted),
        Answer::Other => Ok(PromptDecision::NotUnderstood),
    }
}


/// Decide el estado a aplicar a partir de los argumentos de `port`.
///
/// Sin estado se usa el diálogo completo. Un `down` explícito pide la
/// confirmación final salvo que venga `--yes`; `up` nunca pregunta.
pub fn resolve_admin_state<R: BufRead, W: Write>(state: Option<AdminState>,
                                                 assume_yes: bool,
                                                 input: &mut R,
                                                 output: &mut W) -> io::Result<PromptDecision> {
    match state {
        None => prompt_admin_state(input, output),
        Some(AdminState::Down) if !assume_yes => confirm_shutdown(input, output),
        Some(state) => Ok(PromptDecision::Apply(state)),
    }
}


fn platform_label(platform: Platform) -> &'static str {
    match platform {
        Platform::Catalyst => "Catalyst",
        Platform::Meraki => "Meraki",
    }
}


/// Línea de consola para el resultado de una fila.
pub fn describe_outcome(target: &PortTarget, state: AdminState, outcome: &RowOutcome) -> String {
    let subject = format!("{} - Port {} with id {}",
                          platform_label(target.platform), target.port_name, target.port_id);
    match outcome {
        RowOutcome::Applied(ControlOutcome::Changed) => {
            format!("{} is updated to {}", subject, state.as_str()).green().to_string()
        }
        RowOutcome::Applied(ControlOutcome::AlreadyInState) => {
            format!("{}: no action, the port is already {}", subject, state.as_str()).yellow().to_string()
        }
        RowOutcome::Skipped(reason) => format!("{}: skipped ({})", subject, reason).yellow().to_string(),
        RowOutcome::Failed(reason) => format!("{}: failed ({})", subject, reason).red().to_string(),
    }
}
