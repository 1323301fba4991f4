use ratatui::Frame;

use hexle::game::Game;

use crate::{ui::summary::render_summary, App};

/// A UI Screen boundary: responsible for rendering one phase of the game
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Round in progress - board, keyboard and countdown
pub struct PlayScreen;

impl Screen for PlayScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Final stats once every round has ended
pub struct SummaryScreen;

impl Screen for SummaryScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_summary(&app.game, f);
    }
}

/// Helper to construct the appropriate screen for the current game phase
pub fn current_screen(game: &Game) -> Box<dyn Screen> {
    if game.is_over() {
        Box::new(SummaryScreen)
    } else {
        Box::new(PlayScreen)
    }
}
