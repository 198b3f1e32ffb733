// Terminal loop: redraw from the published state, quit on q / Esc / Ctrl+C.

use crate::view;
use crate::worker::PollState;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// How long to wait for input before redrawing.
const UI_TICK: Duration = Duration::from_millis(250);

/// Take over the terminal until the user quits or `stop` is set, then
/// restore it. Blocking; run it off the async runtime.
pub fn run(state: Arc<PollState>, stop: Arc<AtomicBool>) -> io::Result<()> {
    let mut terminal = ratatui::try_init()?;
    let result = event_loop(&mut terminal, &state, &stop);
    ratatui::restore();
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    state: &PollState,
    stop: &AtomicBool,
) -> io::Result<()> {
    while !stop.load(Ordering::Relaxed) {
        let snapshot = state.load();
        terminal.draw(|frame| view::render(frame, &snapshot))?;

        if event::poll(UI_TICK)?
            && let Event::Key(key) = event::read()?
            && is_quit(&key)
        {
            break;
        }
    }
    Ok(())
}

pub fn is_quit(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
