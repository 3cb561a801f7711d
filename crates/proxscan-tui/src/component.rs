//! Component trait — the interface every console panel implements.
//!
//! - Components own their animation state and render themselves.
//! - Components receive `AppState` (read-only) for data they don't own.
//! - Components produce `Vec<Action>`; the App dispatches them.

use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{layout::Rect, Frame};

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;

pub trait Component {
    fn id(&self) -> ComponentId;

    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    /// Mouse events that landed inside this component's last drawn area.
    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    /// Called once per frame, before drawing.
    fn tick(&mut self, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    /// Receive an action dispatched by the App.
    fn on_action(&mut self, _action: &Action, _state: &AppState) -> Vec<Action> {
        Vec::new()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState);

    /// Rows this component wants in the console layout; 0 means "the rest".
    fn height(&self) -> u16 {
        1
    }
}
