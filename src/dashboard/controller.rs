use tracing::{error, info};

use super::catalog::ProgramDirectory;
use super::client::AdminApi;
use super::state::{DashboardEvent, DashboardState, resolve_profile};
use super::DashboardError;
use crate::db::models::UploadedFile;
use crate::db::services::DEFAULT_VISIT_WINDOW_DAYS;

/// Errors from the independent page-load fetches. A failed fetch leaves its
/// part of the state untouched.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub identity: Option<DashboardError>,
    pub programs: Option<DashboardError>,
    pub visits: Option<DashboardError>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.identity.is_none() && self.programs.is_none() && self.visits.is_none()
    }
}

pub struct DashboardController<A> {
    api: A,
    directory: ProgramDirectory,
    state: DashboardState,
}

impl<A: AdminApi> DashboardController<A> {
    pub fn new(api: A, directory: ProgramDirectory) -> Self {
        Self {
            api,
            directory,
            state: DashboardState::default(),
        }
    }

    /// Uses the program list shipped with the crate.
    pub fn with_builtin_directory(api: A) -> Result<Self, DashboardError> {
        Ok(Self::new(api, ProgramDirectory::builtin()?))
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Fetches profile fields, programs and visit counts concurrently and
    /// applies whichever succeed.
    pub async fn load(&mut self) -> LoadReport {
        let (identity, programs, visits) = tokio::join!(
            self.api.list_identity(),
            self.api.list_programs(),
            self.api.recent_visits(DEFAULT_VISIT_WINDOW_DAYS),
        );

        let mut report = LoadReport::default();
        match identity {
            Ok(fields) => self.state.apply(DashboardEvent::IdentityLoaded(fields)),
            Err(e) => {
                error!(error = %e, "Failed to load identity fields.");
                report.identity = Some(e);
            }
        }
        match programs {
            Ok(programs) => self.state.apply(DashboardEvent::ProgramsLoaded(programs)),
            Err(e) => {
                error!(error = %e, "Failed to load programs.");
                report.programs = Some(e);
            }
        }
        match visits {
            Ok(visits) => self.state.apply(DashboardEvent::VisitsLoaded(visits)),
            Err(e) => {
                error!(error = %e, "Failed to load visit counts.");
                report.visits = Some(e);
            }
        }
        report
    }

    pub fn toggle_edit(&mut self) {
        self.state.apply(DashboardEvent::EditToggled);
    }

    pub fn stage_field_edit(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.state.apply(DashboardEvent::FieldEdited {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Sends every fetched field back, staged values taking precedence.
    pub async fn commit_profile(&mut self) -> Result<(), DashboardError> {
        let updates = resolve_profile(&self.state.identity_fields, &self.state.staged_edits);
        let updated = self
            .api
            .update_identity(&updates)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to save profile."))?;
        info!(count = updated.len(), "Profile saved.");
        self.state.apply(DashboardEvent::ProfileSaved(updated));
        Ok(())
    }

    /// Replaces the staged selection. On an unknown id nothing changes.
    pub fn select_programs(&mut self, ids: &[u32]) -> Result<(), DashboardError> {
        let selection = self.directory.resolve(ids)?;
        self.state.apply(DashboardEvent::ProgramsSelected(selection));
        Ok(())
    }

    /// Appends the staged selection to the catalog. The catalog is not
    /// cleared first; call [`Self::clear_programs`] beforehand for a replace.
    pub async fn commit_programs(&mut self) -> Result<(), DashboardError> {
        let inserted = self
            .api
            .add_programs(&self.state.staged_program_selection)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to save programs."))?;
        self.state.apply(DashboardEvent::ProgramsSaved(inserted));
        Ok(())
    }

    pub async fn clear_programs(&mut self) -> Result<(), DashboardError> {
        self.api
            .clear_programs()
            .await
            .inspect_err(|e| error!(error = %e, "Failed to clear programs."))?;
        self.state.apply(DashboardEvent::ProgramsCleared);
        Ok(())
    }

    pub async fn commit_upload(&mut self, file: UploadedFile) -> Result<(), DashboardError> {
        let field = self
            .api
            .upload_structure_image(file)
            .await
            .inspect_err(|e| error!(error = %e, "Failed to upload structure image."))?;
        self.state.apply(DashboardEvent::StructureImageUploaded(field));
        Ok(())
    }

    pub fn dismiss_notice(&mut self) {
        self.state.apply(DashboardEvent::NoticeDismissed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{HttpAdminApi, Notice};
    use crate::db::models::{DailyVisitCount, IdentityField, IdentityFieldUpdate, NewProgram, ProgramEntry};
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::Mutex;

    /// In-memory backend with switchable failures.
    #[derive(Default)]
    struct FakeApi {
        fields: Mutex<Vec<IdentityField>>,
        programs: Mutex<Vec<ProgramEntry>>,
        sent_updates: Mutex<Vec<Vec<IdentityFieldUpdate>>>,
        fail_identity: bool,
        fail_writes: bool,
    }

    impl FakeApi {
        fn with_fields(fields: &[(&str, &str)]) -> Self {
            let fields = fields
                .iter()
                .map(|(name, value)| IdentityField {
                    id: format!("id-{name}"),
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect();
            Self {
                fields: Mutex::new(fields),
                ..Default::default()
            }
        }

        fn failure() -> DashboardError {
            DashboardError::Status {
                status: 500,
                message: "Database error".to_string(),
            }
        }
    }

    #[async_trait]
    impl AdminApi for FakeApi {
        async fn list_identity(&self) -> Result<Vec<IdentityField>, DashboardError> {
            if self.fail_identity {
                return Err(Self::failure());
            }
            Ok(self.fields.lock().unwrap().clone())
        }

        async fn update_identity(
            &self,
            updates: &[IdentityFieldUpdate],
        ) -> Result<Vec<IdentityField>, DashboardError> {
            if self.fail_writes {
                return Err(Self::failure());
            }
            self.sent_updates.lock().unwrap().push(updates.to_vec());
            let mut fields = self.fields.lock().unwrap();
            let mut updated = Vec::new();
            for update in updates {
                let field = fields.iter_mut().find(|f| f.name == update.name).unwrap();
                field.value = update.value.clone();
                updated.push(field.clone());
            }
            Ok(updated)
        }

        async fn list_programs(&self) -> Result<Vec<ProgramEntry>, DashboardError> {
            Ok(self.programs.lock().unwrap().clone())
        }

        async fn add_programs(&self, programs: &[NewProgram]) -> Result<Vec<ProgramEntry>, DashboardError> {
            if self.fail_writes {
                return Err(Self::failure());
            }
            let mut stored = self.programs.lock().unwrap();
            let inserted: Vec<ProgramEntry> = programs
                .iter()
                .map(|p| ProgramEntry {
                    id: format!("p{}", stored.len()),
                    nama: p.nama.clone(),
                    link: p.link.clone(),
                    visi: p.visi.clone(),
                    misi: p.misi.clone(),
                })
                .collect();
            stored.extend(inserted.iter().cloned());
            Ok(inserted)
        }

        async fn clear_programs(&self) -> Result<(), DashboardError> {
            self.programs.lock().unwrap().clear();
            Ok(())
        }

        async fn upload_structure_image(&self, file: UploadedFile) -> Result<IdentityField, DashboardError> {
            Ok(IdentityField {
                id: "id-struktur".to_string(),
                name: "Struktur Organisasi".to_string(),
                value: format!("/uploads/img/{}", file.file_name),
            })
        }

        async fn recent_visits(&self, _days: u64) -> Result<Vec<DailyVisitCount>, DashboardError> {
            Ok(vec![DailyVisitCount {
                date: "2025-03-01".to_string(),
                count: 7,
            }])
        }
    }

    fn controller(api: FakeApi) -> DashboardController<FakeApi> {
        DashboardController::with_builtin_directory(api).unwrap()
    }

    #[tokio::test]
    async fn test_load_tolerates_a_failed_fetch() {
        let api = FakeApi {
            fail_identity: true,
            ..FakeApi::with_fields(&[("Email", "old@x.com")])
        };
        api.programs.lock().unwrap().push(ProgramEntry {
            id: "p0".to_string(),
            nama: "Ilmu Hukum".to_string(),
            link: "/prodi/ilmu-hukum".to_string(),
            visi: String::new(),
            misi: String::new(),
        });
        let mut dashboard = controller(api);

        let report = dashboard.load().await;
        assert!(!report.is_complete());
        assert!(report.identity.is_some());
        assert!(report.programs.is_none());
        assert!(dashboard.state().identity_fields.is_empty());
        assert_eq!(dashboard.state().programs.len(), 1);
        assert_eq!(dashboard.state().visits[0].count, 7);
    }

    #[tokio::test]
    async fn test_commit_profile_sends_merged_fields() {
        let mut dashboard = controller(FakeApi::with_fields(&[
            ("Email", "old@x.com"),
            ("Banyak Dosen", "40"),
        ]));
        assert!(dashboard.load().await.is_complete());

        dashboard.toggle_edit();
        dashboard.stage_field_edit("Email", "new@x.com");
        dashboard.commit_profile().await.unwrap();

        let sent = dashboard.api.sent_updates.lock().unwrap().clone();
        assert_eq!(
            sent,
            vec![vec![
                IdentityFieldUpdate { name: "Email".into(), value: "new@x.com".into() },
                IdentityFieldUpdate { name: "Banyak Dosen".into(), value: "40".into() },
            ]]
        );
        assert_eq!(dashboard.state().display_value("Email"), Some("new@x.com"));
        assert_eq!(dashboard.state().notice, Some(Notice::ProfileSaved));
    }

    #[tokio::test]
    async fn test_failed_commit_leaves_state_unchanged() {
        let api = FakeApi {
            fail_writes: true,
            ..FakeApi::with_fields(&[("Email", "old@x.com")])
        };
        let mut dashboard = controller(api);
        dashboard.load().await;
        dashboard.stage_field_edit("Email", "new@x.com");
        let before = dashboard.state().clone();

        assert!(dashboard.commit_profile().await.is_err());
        assert!(dashboard.commit_programs().await.is_err());
        assert_eq!(dashboard.state(), &before);
    }

    #[tokio::test]
    async fn test_program_selection_and_commit() {
        let mut dashboard = controller(FakeApi::default());
        dashboard.select_programs(&[1, 2]).unwrap();

        assert!(matches!(
            dashboard.select_programs(&[3, 404]),
            Err(DashboardError::UnknownProgram(404))
        ));
        assert_eq!(dashboard.state().staged_program_selection.len(), 2);

        dashboard.commit_programs().await.unwrap();
        dashboard.commit_programs().await.unwrap();
        assert_eq!(dashboard.api.programs.lock().unwrap().len(), 4);
        assert_eq!(dashboard.state().notice, Some(Notice::ProgramsSaved));

        dashboard.clear_programs().await.unwrap();
        assert!(dashboard.state().programs.is_empty());
        assert!(dashboard.api.programs.lock().unwrap().is_empty());
        assert_eq!(dashboard.state().notice, Some(Notice::ProgramsCleared));
    }

    #[tokio::test]
    async fn test_upload_updates_structure_field() {
        let mut dashboard = controller(FakeApi::with_fields(&[("Struktur Organisasi", "")]));
        dashboard.load().await;

        let file = UploadedFile {
            file_name: "bagan.png".to_string(),
            bytes: Bytes::from_static(b"png"),
        };
        dashboard.commit_upload(file).await.unwrap();

        assert_eq!(
            dashboard.state().display_value("Struktur Organisasi"),
            Some("/uploads/img/bagan.png")
        );
        assert_eq!(dashboard.state().notice, Some(Notice::StructureImageUploaded));
        dashboard.dismiss_notice();
        assert_eq!(dashboard.state().notice, None);
    }

    #[tokio::test]
    async fn test_against_running_server() {
        let tmp = tempfile::tempdir().unwrap();
        let (app, _db) = crate::web::test_support::test_app(tmp.path()).await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let mut dashboard =
            DashboardController::with_builtin_directory(HttpAdminApi::new(format!("http://{addr}"))).unwrap();
        assert!(dashboard.load().await.is_complete());

        dashboard.stage_field_edit("Email", "new@x.com");
        dashboard.commit_profile().await.unwrap();
        dashboard.select_programs(&[1]).unwrap();
        dashboard.commit_programs().await.unwrap();
        dashboard
            .commit_upload(UploadedFile {
                file_name: "bagan.png".to_string(),
                bytes: Bytes::from_static(b"png"),
            })
            .await
            .unwrap();

        let mut fresh =
            DashboardController::with_builtin_directory(HttpAdminApi::new(format!("http://{addr}/"))).unwrap();
        assert!(fresh.load().await.is_complete());
        assert_eq!(fresh.state().display_value("Email"), Some("new@x.com"));
        assert_eq!(
            fresh.state().display_value("Struktur Organisasi"),
            Some("/uploads/img/bagan.png")
        );
        assert_eq!(fresh.state().programs.len(), 1);
        assert_eq!(fresh.state().programs[0].nama, "Ilmu Hukum");
        assert!(tmp.path().join("bagan.png").exists());
    }

    #[tokio::test]
    async fn test_empty_profile_commit_is_refused_by_server() {
        let tmp = tempfile::tempdir().unwrap();
        let (app, _db) = crate::web::test_support::test_app(tmp.path()).await;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        // Nothing fetched and nothing staged.
        let mut dashboard =
            DashboardController::with_builtin_directory(HttpAdminApi::new(format!("http://{addr}"))).unwrap();
        let err = dashboard.commit_profile().await.unwrap_err();
        assert!(matches!(err, DashboardError::Status { status: 400, .. }));
        assert_ne!(dashboard.state().notice, Some(Notice::ProfileSaved));
    }
}
