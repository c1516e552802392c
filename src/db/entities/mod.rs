//! SeaORM entities mapping the portal's tables.

pub mod berita;
pub mod identitas;
pub mod prodi;
pub mod visit;

pub mod prelude {
    pub use super::identitas::Entity as Identitas;
    pub use super::prodi::Entity as Prodi;
    pub use super::visit::Entity as Visit;
    pub use super::berita::Entity as Berita;
}
