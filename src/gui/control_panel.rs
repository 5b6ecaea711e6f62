//! Control Panel Widget
//! Left side panel with the name picker and the download actions.

use egui::{Color32, RichText, ScrollArea};

const NAME_ROW_HEIGHT: f32 = 20.0;

/// Severity of the status line under the buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// Left side control panel with name selection and download controls.
pub struct ControlPanel {
    pub all_names: Vec<String>,
    pub selected: Vec<String>,
    pub search: String,
    pub status: String,
    pub status_kind: StatusKind,
    pub exports_enabled: bool,
    pub is_fetching: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            all_names: Vec::new(),
            selected: Vec::new(),
            search: String::new(),
            status: "Ready".to_string(),
            status_kind: StatusKind::Info,
            exports_enabled: false,
            is_fetching: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the selectable names and preselect the defaults that exist.
    pub fn update_names(&mut self, names: Vec<String>, defaults: &[String]) {
        self.selected = defaults
            .iter()
            .filter(|d| names.iter().any(|n| n == *d))
            .cloned()
            .collect();
        self.all_names = names;
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.selected.iter().any(|s| s == name)
    }

    /// Add or remove `name`; returns whether it is now selected.
    pub fn toggle(&mut self, name: &str) -> bool {
        if let Some(pos) = self.selected.iter().position(|s| s == name) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(name.to_string());
            true
        }
    }

    /// Names matching the search box (case-insensitive substring).
    pub fn filtered_names(&self) -> Vec<&str> {
        let needle = self.search.trim().to_lowercase();
        self.all_names
            .iter()
            .filter(|n| needle.is_empty() || n.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // ===== Selection Section =====
        ui.label(RichText::new("Choose Names").size(14.0).strong());
        ui.add_space(5.0);

        let mut removed: Option<String> = None;
        ui.horizontal_wrapped(|ui| {
            for name in &self.selected {
                let chip = egui::Button::new(RichText::new(format!("{name}  ✖")).size(12.0))
                    .fill(Color32::from_rgb(255, 75, 75))
                    .rounding(4.0);
                if ui.add(chip).on_hover_text("Remove").clicked() {
                    removed = Some(name.clone());
                }
            }
        });
        if let Some(name) = removed {
            self.toggle(&name);
            action = ControlPanelAction::SelectionChanged;
        }

        ui.horizontal(|ui| {
            if ui.small_button("Clear All").clicked() && !self.selected.is_empty() {
                self.selected.clear();
                action = ControlPanelAction::SelectionChanged;
            }
        });

        ui.add_space(5.0);
        ui.add(egui::TextEdit::singleline(&mut self.search).hint_text("Search names..."));
        ui.add_space(5.0);

        let visible: Vec<String> = self
            .filtered_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let mut toggled: Option<String> = None;

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .max_height(260.0)
                    .auto_shrink([false, true])
                    .show_rows(ui, NAME_ROW_HEIGHT, visible.len(), |ui, row_range| {
                        for name in &visible[row_range] {
                            if ui
                                .selectable_label(self.is_selected(name), name)
                                .clicked()
                            {
                                toggled = Some(name.clone());
                            }
                        }
                    });
            });

        if let Some(name) = toggled {
            self.toggle(&name);
            action = ControlPanelAction::SelectionChanged;
        }

        ui.label(
            RichText::new(format!(
                "{} of {} names shown",
                visible.len(),
                self.all_names.len()
            ))
            .size(11.0)
            .color(Color32::GRAY),
        );

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Download Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.exports_enabled, |ui| {
                let button = egui::Button::new(RichText::new("Download CSV").size(15.0))
                    .min_size(egui::vec2(200.0, 32.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::DownloadCsv;
                }

                ui.add_space(6.0);

                let label = if self.is_fetching {
                    "Fetching..."
                } else {
                    "Download All Name Data"
                };
                ui.add_enabled_ui(!self.is_fetching, |ui| {
                    let button = egui::Button::new(RichText::new(label).size(15.0))
                        .min_size(egui::vec2(200.0, 32.0));
                    if ui.add(button).clicked() {
                        action = ControlPanelAction::DownloadAll;
                    }
                });

                ui.add_space(6.0);

                let png_button = egui::Button::new(RichText::new("Save Chart PNG").size(13.0))
                    .min_size(egui::vec2(150.0, 28.0));
                if ui.add(png_button).clicked() {
                    action = ControlPanelAction::SaveChartPng;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Status =====
        ui.horizontal(|ui| {
            if self.is_fetching {
                ui.spinner();
            }
            let status_color = match self.status_kind {
                StatusKind::Error => Color32::from_rgb(220, 53, 69),
                StatusKind::Success => Color32::from_rgb(40, 167, 69),
                StatusKind::Info => Color32::GRAY,
            };
            ui.label(RichText::new(&self.status).size(11.0).color(status_color));
        });

        action
    }

    /// Set status line
    pub fn set_status(&mut self, kind: StatusKind, status: &str) {
        self.status_kind = kind;
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    SelectionChanged,
    DownloadCsv,
    DownloadAll,
    SaveChartPng,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> ControlPanel {
        let mut panel = ControlPanel::new();
        panel.update_names(
            vec!["Alberta".into(), "Gertrude".into(), "Harry".into(), "Mary".into()],
            &["Harry".into(), "Zelda".into(), "Gertrude".into()],
        );
        panel
    }

    #[test]
    fn test_defaults_limited_to_known_names() {
        assert_eq!(panel().selected, vec!["Harry", "Gertrude"]);
    }

    #[test]
    fn test_toggle_adds_and_removes() {
        let mut panel = panel();
        assert!(panel.toggle("Mary"));
        assert_eq!(panel.selected, vec!["Harry", "Gertrude", "Mary"]);
        assert!(!panel.toggle("Harry"));
        assert_eq!(panel.selected, vec!["Gertrude", "Mary"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let mut panel = panel();
        panel.search = " ar".into();
        assert_eq!(panel.filtered_names(), vec!["Harry", "Mary"]);
        panel.search.clear();
        assert_eq!(panel.filtered_names().len(), 4);
    }
}
