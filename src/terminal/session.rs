use std::io::{self, BufRead, Write};

use log::warn;

use super::display::{DisplayError, render};
use crate::feedback::compute_feedback;
use crate::fen;
use crate::game_logic::{GameController, Transition};
use crate::square::Square;

/// Clears the screen and moves cursor to top-left.
#[inline]
fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    write!(w, "\x1B[2J\x1B[H")
}

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command<'a> {
    Click(Square),
    Load(&'a str),
    Fen,
    Reset,
    Refresh,
    Quit,
    Usage(&'static str),
    Unknown(&'a str),
}

fn parse_command(line: &str) -> Option<Command<'_>> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    let command = match head {
        "" => return None,
        "load" if rest.is_empty() => Command::Usage("Usage: load <fen> | load startpos"),
        "load" if rest == "startpos" => Command::Load(fen::STARTING_FEN),
        "load" => Command::Load(rest),
        "fen" => Command::Fen,
        "r" => Command::Reset,
        "p" => Command::Refresh,
        "q" => Command::Quit,
        other => match other.parse::<Square>() {
            Ok(square) => Command::Click(square),
            Err(_) => Command::Unknown(other),
        },
    };
    Some(command)
}

/// Runs an interactive terminal game on stdin and stdout.
///
/// Each square typed is one click; the board is redrawn with the
/// resulting feedback after every command.
pub fn run_interactive_terminal() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    if let Err(e) = run_session(stdin.lock(), &mut stdout) {
        eprintln!("Terminal session failed: {e}");
    }
}

/// Drives a session from any line source to any writer.
pub fn run_session(input: impl BufRead, out: &mut impl Write) -> Result<(), DisplayError> {
    let mut controller = GameController::new();

    clear_screen(out)?;
    draw_interface(out, &controller)?;
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        let Some(command) = parse_command(&line) else {
            write!(out, "> ")?;
            out.flush()?;
            continue;
        };

        let message = match command {
            Command::Click(square) => describe(controller.select(square)),
            Command::Load(record) => match fen::import(record) {
                Ok(state) => {
                    let config = *controller.config();
                    controller = GameController::from_state_with_config(state, config);
                    "Position loaded from FEN".to_string()
                }
                Err(e) => {
                    warn!("rejected position record: {e}");
                    format!("Invalid FEN: {e}")
                }
            },
            Command::Fen => fen::export(controller.state()),
            Command::Reset => {
                controller.reset();
                "Reset to initial position".to_string()
            }
            Command::Refresh => String::new(),
            Command::Quit => break,
            Command::Usage(usage) => usage.to_string(),
            Command::Unknown(token) => format!("Unknown command '{token}'"),
        };

        clear_screen(out)?;
        draw_interface(out, &controller)?;
        if !message.is_empty() {
            writeln!(out)?;
            writeln!(out, "{message}")?;
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    Ok(())
}

fn describe(result: Result<Transition, crate::MoveError>) -> String {
    match result {
        Ok(Transition::Selected { from }) => format!("Selected {from}"),
        Ok(Transition::Deselected { reason }) => format!("Deselected: {reason}"),
        Ok(Transition::Ignored { reason }) => format!("Ignored: {reason}"),
        Ok(Transition::Played { mv, status }) => format!("Played {mv} ({status})"),
        Err(e) => e.to_string(),
    }
}

/// Draws the complete interface: help text, turn or result, and the board.
fn draw_interface(out: &mut impl Write, controller: &GameController) -> Result<(), DisplayError> {
    writeln!(out, "Click Chess")?;
    writeln!(out)?;
    writeln!(
        out,
        "Commands: <square> | load <fen> | fen | r (reset) | p (refresh) | q (quit)"
    )?;
    writeln!(out)?;

    let state = controller.state();
    match controller.game_over() {
        Some(reason) => writeln!(out, "Game over: {reason}")?,
        None => writeln!(
            out,
            "Move {}, {} to play ({})",
            state.fullmove_number(),
            state.side_to_move(),
            controller.status()
        )?,
    }
    writeln!(out)?;

    render(out, state.board(), &compute_feedback(controller))
}
