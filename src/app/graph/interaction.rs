use eframe::egui::{CursorIcon, PointerButton, Response, Ui};

use super::super::ViewModel;
use super::super::render_utils::CanvasTransform;
use crate::chart::ViewCommand;

impl ViewModel {
    /// Topmost bubble under the pointer, if hovering is currently allowed.
    pub(in crate::app) fn hovered_index(
        &self,
        ui: &Ui,
        transform: CanvasTransform,
        response: &Response,
    ) -> Option<usize> {
        if !response.hovered() || !self.chart.tooltip_enabled() {
            return None;
        }

        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        self.chart.bubble_at(transform.to_canvas(pointer))
    }

    pub(in crate::app) fn handle_bubble_click(&mut self, ui: &Ui, response: &Response) {
        let Some(index) = self.hovered else {
            return;
        };

        ui.ctx().set_cursor_icon(CursorIcon::PointingHand);
        if response.clicked_by(PointerButton::Primary) {
            let id = self.chart.node_set().nodes[index].id.clone();
            self.apply_command(ViewCommand::Select(id));
        }
    }
}
