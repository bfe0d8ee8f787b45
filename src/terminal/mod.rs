//! Terminal front end: a text board renderer, a scripted click source and
//! an interactive session on stdin.

mod display;
mod script;
mod session;

pub use display::{DisplayError, TerminalDisplay, render};
pub use script::{ParseError, ScriptedInput};
pub use session::{run_interactive_terminal, run_session};
