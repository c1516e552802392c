use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::BTreeMap;

use super::DashboardError;
use crate::db::models::NewProgram;

const BUILTIN_PROGRAMS: &str = include_str!("../../data/prodi.json");

static BUILTIN_DIRECTORY: Lazy<Result<ProgramDirectory, String>> =
    Lazy::new(|| ProgramDirectory::from_json(BUILTIN_PROGRAMS).map_err(|e| e.to_string()));

/// A study program the dashboard can offer for selection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgramReference {
    pub id: u32,
    pub name: String,
    #[serde(rename = "Link")]
    pub link: String,
}

/// Reference list of known programs, keyed by id.
#[derive(Debug, Clone)]
pub struct ProgramDirectory {
    programs: BTreeMap<u32, ProgramReference>,
}

impl ProgramDirectory {
    /// Parses and validates a reference list. Ids must be unique and every
    /// entry needs a name and a link.
    pub fn from_json(raw: &str) -> Result<Self, DashboardError> {
        let entries: Vec<ProgramReference> = serde_json::from_str(raw)
            .map_err(|e| DashboardError::Catalog(format!("malformed JSON: {e}")))?;
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<ProgramReference>) -> Result<Self, DashboardError> {
        if entries.is_empty() {
            return Err(DashboardError::Catalog("no programs listed".to_string()));
        }

        let mut programs = BTreeMap::new();
        for entry in entries {
            if entry.name.trim().is_empty() || entry.link.trim().is_empty() {
                return Err(DashboardError::Catalog(format!(
                    "program {} is missing a name or link",
                    entry.id
                )));
            }
            let id = entry.id;
            if programs.insert(id, entry).is_some() {
                return Err(DashboardError::Catalog(format!("duplicate program id {id}")));
            }
        }
        Ok(Self { programs })
    }

    /// The list shipped with the crate.
    pub fn builtin() -> Result<Self, DashboardError> {
        match &*BUILTIN_DIRECTORY {
            Ok(directory) => Ok(directory.clone()),
            Err(e) => Err(DashboardError::Catalog(e.clone())),
        }
    }

    pub fn get(&self, id: u32) -> Option<&ProgramReference> {
        self.programs.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProgramReference> {
        self.programs.values()
    }

    /// Turns selected ids into catalog drafts with empty vision and mission.
    /// Fails on the first id that is not in the directory.
    pub fn resolve(&self, ids: &[u32]) -> Result<Vec<NewProgram>, DashboardError> {
        ids.iter()
            .map(|id| {
                let program = self.get(*id).ok_or(DashboardError::UnknownProgram(*id))?;
                Ok(NewProgram {
                    nama: program.name.clone(),
                    link: program.link.clone(),
                    visi: String::new(),
                    misi: String::new(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_list_is_valid() {
        let directory = ProgramDirectory::builtin().unwrap();
        assert!(directory.iter().count() > 0);
        assert_eq!(directory.get(1).unwrap().name, "Ilmu Hukum");
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let raw = r#"[
            { "id": 1, "name": "Ilmu Hukum", "Link": "/a" },
            { "id": 1, "name": "Pariwisata", "Link": "/b" }
        ]"#;
        let err = ProgramDirectory::from_json(raw).unwrap_err();
        assert!(matches!(err, DashboardError::Catalog(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn test_rejects_blank_entries() {
        let raw = r#"[{ "id": 1, "name": " ", "Link": "/a" }]"#;
        assert!(ProgramDirectory::from_json(raw).is_err());
        assert!(ProgramDirectory::from_json("[]").is_err());
        assert!(ProgramDirectory::from_json("{").is_err());
    }

    #[test]
    fn test_resolve_builds_empty_drafts() {
        let directory = ProgramDirectory::builtin().unwrap();
        let drafts = directory.resolve(&[2, 1]).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].nama, "Pariwisata");
        assert_eq!(drafts[1].link, "/prodi/ilmu-hukum");
        assert!(drafts.iter().all(|d| d.visi.is_empty() && d.misi.is_empty()));
    }

    #[test]
    fn test_resolve_unknown_id() {
        let directory = ProgramDirectory::builtin().unwrap();
        assert!(matches!(
            directory.resolve(&[1, 999]),
            Err(DashboardError::UnknownProgram(999))
        ));
    }
}
