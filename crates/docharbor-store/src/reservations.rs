//! In-flight upload reservations.
//!
//! Validation and reservation happen under the tree write lock; blob
//! bytes are written with no lock held. The reservation keeps a second
//! racing upload from passing the same name-collision or dedup check in
//! the window between validation and commit. Every exit path of an
//! upload must release its reservations.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

/// Reservation sets for uploads in flight.
#[derive(Debug, Default)]
pub struct UploadReservations {
    /// Reserved document names keyed by `(folder_id, lowercase name)`.
    names: DashMap<(Uuid, String), ()>,
    /// Reserved checksums keyed by `(uploader_id, checksum)`.
    checksums: DashMap<(Uuid, String), ()>,
}

impl UploadReservations {
    /// Create an empty reservation table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a document name within a folder. Returns `false` if the
    /// name is already reserved by another in-flight upload.
    pub fn reserve_name(&self, folder_id: Uuid, name: &str) -> bool {
        match self.names.entry((folder_id, name.to_lowercase())) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(());
                true
            }
        }
    }

    /// Release a name reservation.
    pub fn release_name(&self, folder_id: Uuid, name: &str) {
        self.names.remove(&(folder_id, name.to_lowercase()));
    }

    /// Whether a name is reserved by an in-flight upload.
    pub fn name_reserved(&self, folder_id: Uuid, name: &str) -> bool {
        self.names.contains_key(&(folder_id, name.to_lowercase()))
    }

    /// Reserve a checksum for an uploader. Returns `false` if an
    /// in-flight upload by the same uploader carries identical content.
    pub fn reserve_checksum(&self, uploaded_by: Uuid, checksum: &str) -> bool {
        match self.checksums.entry((uploaded_by, checksum.to_string())) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(());
                true
            }
        }
    }

    /// Release a checksum reservation.
    pub fn release_checksum(&self, uploaded_by: Uuid, checksum: &str) {
        self.checksums.remove(&(uploaded_by, checksum.to_string()));
    }

    /// Whether a checksum is reserved by an in-flight upload.
    pub fn checksum_reserved(&self, uploaded_by: Uuid, checksum: &str) -> bool {
        self.checksums
            .contains_key(&(uploaded_by, checksum.to_string()))
    }
}
