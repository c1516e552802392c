use std::collections::BTreeMap;

use crate::db::models::{DailyVisitCount, IdentityField, IdentityFieldUpdate, NewProgram, ProgramEntry};

/// Transient confirmation shown after a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    ProfileSaved,
    ProgramsSaved,
    ProgramsCleared,
    StructureImageUploaded,
}

/// Everything that can change the dashboard page.
#[derive(Debug, Clone)]
pub enum DashboardEvent {
    IdentityLoaded(Vec<IdentityField>),
    ProgramsLoaded(Vec<ProgramEntry>),
    VisitsLoaded(Vec<DailyVisitCount>),
    EditToggled,
    FieldEdited { name: String, value: String },
    ProgramsSelected(Vec<NewProgram>),
    ProfileSaved(Vec<IdentityField>),
    ProgramsSaved(Vec<ProgramEntry>),
    ProgramsCleared,
    StructureImageUploaded(IdentityField),
    NoticeDismissed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    pub edit_mode: bool,
    pub identity_fields: Vec<IdentityField>,
    pub programs: Vec<ProgramEntry>,
    pub visits: Vec<DailyVisitCount>,
    pub staged_edits: BTreeMap<String, String>,
    pub staged_program_selection: Vec<NewProgram>,
    pub notice: Option<Notice>,
}

impl DashboardState {
    pub fn apply(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::IdentityLoaded(fields) => self.identity_fields = fields,
            DashboardEvent::ProgramsLoaded(programs) => self.programs = programs,
            DashboardEvent::VisitsLoaded(visits) => self.visits = visits,
            // Leaving edit mode keeps staged input; re-entering shows it again.
            DashboardEvent::EditToggled => self.edit_mode = !self.edit_mode,
            DashboardEvent::FieldEdited { name, value } => {
                if value.is_empty() {
                    self.staged_edits.remove(&name);
                } else {
                    self.staged_edits.insert(name, value);
                }
            }
            DashboardEvent::ProgramsSelected(selection) => self.staged_program_selection = selection,
            DashboardEvent::ProfileSaved(updated) => {
                for field in updated {
                    match self.identity_fields.iter_mut().find(|f| f.name == field.name) {
                        Some(existing) => *existing = field,
                        None => self.identity_fields.push(field),
                    }
                }
                self.notice = Some(Notice::ProfileSaved);
            }
            DashboardEvent::ProgramsSaved(inserted) => {
                self.programs.extend(inserted);
                self.notice = Some(Notice::ProgramsSaved);
            }
            DashboardEvent::ProgramsCleared => {
                self.programs.clear();
                self.notice = Some(Notice::ProgramsCleared);
            }
            DashboardEvent::StructureImageUploaded(field) => {
                match self.identity_fields.iter_mut().find(|f| f.name == field.name) {
                    Some(existing) => *existing = field,
                    None => self.identity_fields.push(field),
                }
                self.notice = Some(Notice::StructureImageUploaded);
            }
            DashboardEvent::NoticeDismissed => self.notice = None,
        }
    }

    /// Value an input shows: the staged edit if there is one, else the fetched value.
    pub fn display_value(&self, name: &str) -> Option<&str> {
        self.staged_edits.get(name).map(String::as_str).or_else(|| {
            self.identity_fields
                .iter()
                .find(|f| f.name == name)
                .map(|f| f.value.as_str())
        })
    }
}

/// Builds the profile save payload: one entry per fetched field, carrying the
/// staged value when present and the fetched value otherwise.
pub fn resolve_profile(
    fields: &[IdentityField],
    staged: &BTreeMap<String, String>,
) -> Vec<IdentityFieldUpdate> {
    fields
        .iter()
        .map(|field| IdentityFieldUpdate {
            name: field.name.clone(),
            value: staged.get(&field.name).unwrap_or(&field.value).clone(),
        })
        .collect()
}
