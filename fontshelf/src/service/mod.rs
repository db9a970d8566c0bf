// This file is part of the product FontShelf.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Use cases over the asset directory and the catalog.

pub mod errors;

pub use errors::{ErrorKind, ServiceError};

use crate::catalog::{
    CatalogError, CatalogRepository, Font, FontRemoval, Group, RepositoryError,
};
use crate::security;
use crate::storage::{AssetError, AssetStore};
use crate::upload::{self, FONT_EXTENSION, MultipartError};
use log::{debug, error, info, warn};
use std::fs::File;

pub struct AssetService {
    assets: AssetStore,
    catalog: CatalogRepository,
}

impl AssetService {
    pub fn new(assets: AssetStore, catalog: CatalogRepository) -> Self {
        Self { assets, catalog }
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn catalog(&self) -> &CatalogRepository {
        &self.catalog
    }

    /// Stores the first file of a multipart body and records it in the catalog.
    pub fn upload(&self, content_type: Option<&str>, body: &[u8]) -> Result<Font, ServiceError> {
        let boundary = content_type
            .and_then(upload::boundary_from_content_type)
            .ok_or_else(|| decode_error(MultipartError::NoBoundary))?;
        let part = upload::extract_file_part(body, &boundary).map_err(decode_error)?;

        if !upload::is_accepted_font_name(&part.filename) {
            debug!("Rejected upload with non-font name {:?}", part.filename);
            return Err(ServiceError::validation(format!(
                "Only {} files are accepted",
                FONT_EXTENSION
            )));
        }
        if let Err(reason) = security::validate_asset_name(&part.filename) {
            warn!("Rejected upload name {:?}: {}", part.filename, reason);
            return Err(ServiceError::validation("Invalid file name"));
        }

        let staged = self
            .assets
            .stage(&part.filename, &part.content)
            .map_err(asset_error)?;
        let font = Font::new(part.filename);
        let record = font.clone();

        self.catalog
            .with_catalog_unsaved(
                move |catalog| {
                    staged.publish()?;
                    let newly_cataloged = !catalog.has_font(&record.name);
                    catalog.add_font(record);
                    Ok::<_, AssetError>(newly_cataloged)
                },
                // A binary with no catalog entry would never be listed or deleted.
                |newly_cataloged| {
                    if *newly_cataloged {
                        self.discard_unrecorded(&font.name);
                    }
                },
            )
            .map_err(|err| repository_error(err, asset_error))?;

        info!("Stored font {} ({} bytes)", font.name, part.content.len());
        Ok(font)
    }

    pub fn list_fonts(&self) -> Vec<Font> {
        self.catalog.snapshot().fonts().to_vec()
    }

    pub fn list_groups(&self) -> Vec<Group> {
        self.catalog.snapshot().groups().to_vec()
    }

    /// Removes the font, cascades into groups, then deletes the binary.
    /// A failed binary delete is logged; the catalog change stands.
    pub fn delete_font(&self, name: &str) -> Result<FontRemoval, ServiceError> {
        if name.is_empty() {
            return Err(ServiceError::validation("Font name is required"));
        }

        let removal = self
            .catalog
            .with_catalog_committed(
                |catalog| {
                    let removal = catalog.remove_font(name);
                    if removal.removed {
                        Ok(removal)
                    } else {
                        Err(ServiceError::not_found(format!("Font not found: {}", name)))
                    }
                },
                |_| match self.assets.remove(name) {
                    Ok(true) => {}
                    Ok(false) => warn!("Font {} had no stored file to remove", name),
                    Err(err) => error!("Failed to remove stored file for {}: {}", name, err),
                },
            )
            .map_err(|err| repository_error(err, |rejected| rejected))?;

        info!("Deleted font {}", name);
        if !removal.shrunk_groups.is_empty() {
            info!(
                "Font {} removed from groups: {}",
                name,
                removal.shrunk_groups.join(", ")
            );
        }
        if !removal.dropped_groups.is_empty() {
            info!(
                "Groups dropped below {} fonts after deleting {}: {}",
                crate::catalog::MIN_GROUP_FONTS,
                name,
                removal.dropped_groups.join(", ")
            );
        }
        Ok(removal)
    }

    pub fn create_group(&self, name: &str, fonts: Vec<String>) -> Result<Group, ServiceError> {
        let group = self
            .catalog
            .with_catalog(|catalog| catalog.create_group(name, fonts).cloned())
            .map_err(|err| repository_error(err, catalog_error))?;
        info!("Created group {} with {} fonts", group.name, group.fonts.len());
        Ok(group)
    }

    pub fn edit_group(
        &self,
        old_name: &str,
        new_name: Option<&str>,
        fonts: Option<Vec<String>>,
    ) -> Result<Group, ServiceError> {
        if old_name.is_empty() {
            return Err(ServiceError::validation("Group name is required"));
        }
        let group = self
            .catalog
            .with_catalog(|catalog| catalog.edit_group(old_name, new_name, fonts).cloned())
            .map_err(|err| repository_error(err, catalog_error))?;
        if group.name != old_name {
            info!("Renamed group {} to {}", old_name, group.name);
        }
        info!("Updated group {} ({} fonts)", group.name, group.fonts.len());
        Ok(group)
    }

    pub fn delete_group(&self, name: &str) -> Result<(), ServiceError> {
        if name.is_empty() {
            return Err(ServiceError::validation("Group name is required"));
        }
        self.catalog
            .with_catalog(|catalog| {
                if catalog.remove_group(name) {
                    Ok(())
                } else {
                    Err(ServiceError::not_found(format!("Group not found: {}", name)))
                }
            })
            .map_err(|err| repository_error(err, |rejected| rejected))?;
        info!("Deleted group {}", name);
        Ok(())
    }

    fn discard_unrecorded(&self, name: &str) {
        match self.assets.remove(name) {
            Ok(_) => warn!("Discarded stored file {} after catalog save failed", name),
            Err(err) => error!("Failed to discard unrecorded file {}: {}", name, err),
        }
    }

    /// Opens a stored font for streaming. Unknown or unsafe names are `NotFound`.
    pub fn open_asset(&self, name: &str) -> Result<(File, u64), ServiceError> {
        let path = self.assets.resolve(name).map_err(asset_error)?;
        let file = File::open(&path).map_err(|err| {
            debug!("Failed to open {}: {}", path.display(), err);
            ServiceError::not_found(format!("File not found: {}", name))
        })?;
        let len = file
            .metadata()
            .map_err(|err| {
                error!("Failed to stat {}: {}", path.display(), err);
                ServiceError::storage("Failed to read font file")
            })?
            .len();
        Ok((file, len))
    }
}

fn decode_error(err: MultipartError) -> ServiceError {
    debug!("Upload body rejected: {}", err);
    ServiceError::decode(format!("Invalid upload: {}", err))
}

fn asset_error(err: AssetError) -> ServiceError {
    match err {
        AssetError::InvalidName(msg) => ServiceError::validation(msg),
        AssetError::NotFound(name) => ServiceError::not_found(format!("File not found: {}", name)),
        AssetError::Io(msg) => {
            error!("Asset storage failure: {}", msg);
            ServiceError::storage("Failed to store font file")
        }
    }
}

fn catalog_error(err: CatalogError) -> ServiceError {
    let message = err.to_string();
    match err {
        CatalogError::DuplicateGroup(_) => ServiceError::conflict(message),
        CatalogError::GroupNotFound(_) => ServiceError::not_found(message),
        CatalogError::UnknownFonts(names) => ServiceError::validation(message).with_details(names),
        CatalogError::TooFewFonts { .. } | CatalogError::InvalidRequest(_) => {
            ServiceError::validation(message)
        }
    }
}

fn repository_error<E>(
    err: RepositoryError<E>,
    rejected: impl FnOnce(E) -> ServiceError,
) -> ServiceError {
    match err {
        RepositoryError::Rejected(err) => rejected(err),
        RepositoryError::Store(err) => {
            error!("Failed to persist catalog: {}", err);
            ServiceError::storage("Failed to save catalog")
        }
    }
}
