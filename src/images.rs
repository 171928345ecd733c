//! Reference-image intake: file → base64 payload with a MIME type.

use anyhow::{Context, Result};
use base64::Engine;
use std::path::Path;

use crate::error::ArchitectError;
use crate::prompt::{PromptData, ReferenceImage};

pub const MAX_REFERENCE_IMAGES: usize = 3;

/// An image file read from disk, not yet attached to a project.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Read `path`, rejecting anything whose guessed type is not `image/*`.
    pub fn read(path: &Path) -> Result<Self> {
        let mime_type = guess_mime(path);
        if !mime_type.starts_with("image/") {
            return Err(ArchitectError::UnsupportedImageType {
                path: path.display().to_string(),
                mime_type,
            }
            .into());
        }

        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read image: {:?}", path))?;
        Ok(Self { mime_type, bytes })
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

impl ReferenceImage {
    /// Raw bytes of the payload, for callers that need to re-encode it.
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(self.base64.as_bytes())
            .context("Reference image payload is not valid base64")
    }
}

fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path).first_or_octet_stream().to_string()
}

/// Attach the image files in `paths` to `data`.
///
/// Files whose guessed type is not `image/*` are skipped. If the remaining
/// images would push the project past [`MAX_REFERENCE_IMAGES`] the batch is
/// refused whole.
pub fn attach_images(data: &mut PromptData, paths: &[impl AsRef<Path>]) -> Result<Vec<u64>> {
    let mut images: Vec<&Path> = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        if guess_mime(path).starts_with("image/") {
            images.push(path);
        } else {
            tracing::warn!(path = %path.display(), "Skipping non-image file");
        }
    }

    let count = data.reference_images.len() + images.len();
    if count > MAX_REFERENCE_IMAGES {
        return Err(ArchitectError::TooManyImages {
            count,
            max: MAX_REFERENCE_IMAGES,
        }
        .into());
    }

    let files = images
        .into_iter()
        .map(ImageFile::read)
        .collect::<Result<Vec<_>>>()?;

    let mut ids = Vec::with_capacity(files.len());
    for file in files {
        let id = data.next_image_id();
        data.reference_images.push(ReferenceImage {
            id,
            base64: file.to_base64(),
            mime_type: file.mime_type,
        });
        ids.push(id);
    }
    tracing::info!(added = ids.len(), total = data.reference_images.len(), "Attached reference images");
    Ok(ids)
}

pub fn remove_image(data: &mut PromptData, id: u64) -> Result<(), ArchitectError> {
    let before = data.reference_images.len();
    data.reference_images.retain(|img| img.id != id);
    if data.reference_images.len() == before {
        return Err(ArchitectError::ImageNotFound(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn write(dir: &Path, name: &str, bytes: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn encodes_image_with_guessed_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "ref.png", PNG_HEADER);

        let mut data = PromptData::default();
        let ids = attach_images(&mut data, &[&path]).unwrap();

        assert_eq!(ids, vec![1]);
        let image = &data.reference_images[0];
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.decode().unwrap(), PNG_HEADER);
    }

    #[test]
    fn read_rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "notes.txt", b"hello");

        let err = ImageFile::read(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArchitectError>(),
            Some(ArchitectError::UnsupportedImageType { .. })
        ));
    }

    #[test]
    fn non_images_are_skipped_before_the_cap() {
        let dir = tempfile::tempdir().unwrap();
        let notes = write(dir.path(), "notes.txt", b"hello");
        let images: Vec<_> = (0..3)
            .map(|i| write(dir.path(), &format!("{i}.png"), PNG_HEADER))
            .collect();

        let mut data = PromptData::default();
        let mut batch = vec![notes.clone()];
        batch.extend(images.iter().cloned());
        let ids = attach_images(&mut data, &batch).unwrap();

        assert_eq!(ids, vec![1, 2, 3]);
        assert!(data.reference_images.iter().all(|img| img.mime_type == "image/png"));

        let mut data = PromptData::default();
        assert!(attach_images(&mut data, &[&notes]).unwrap().is_empty());
        assert!(data.reference_images.is_empty());
    }

    #[test]
    fn over_cap_batch_is_refused_whole() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<_> = (0..4)
            .map(|i| write(dir.path(), &format!("{i}.jpg"), PNG_HEADER))
            .collect();

        let mut data = PromptData::default();
        attach_images(&mut data, &paths[..2]).unwrap();
        let err = attach_images(&mut data, &paths[2..]).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ArchitectError>(),
            Some(ArchitectError::TooManyImages { count: 4, max: 3 })
        ));
        assert_eq!(data.reference_images.len(), 2);
    }

    #[test]
    fn remove_unknown_image_errors() {
        let mut data = PromptData::default();
        assert!(matches!(
            remove_image(&mut data, 9),
            Err(ArchitectError::ImageNotFound(9))
        ));
    }
}
