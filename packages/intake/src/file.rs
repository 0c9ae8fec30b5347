use bytes::Bytes;

/// A file offered to an intake slot, before any upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    name: String,
    media_type: String,
    data: Bytes,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// File name extension without the dot
    pub fn extension(&self) -> Option<&str> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .filter(|ext| !ext.is_empty())
    }

    /// Media type without parameters, lowercased (`"image/PNG; q=1"` → `"image/png"`)
    pub fn essence(&self) -> String {
        self.media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        assert_eq!(FileCandidate::new("a.tar.gz", "", Bytes::new()).extension(), Some("gz"));
        assert_eq!(FileCandidate::new("README", "", Bytes::new()).extension(), None);
        assert_eq!(FileCandidate::new("trailing.", "", Bytes::new()).extension(), None);
    }

    #[test]
    fn test_essence_strips_parameters() {
        let file = FileCandidate::new("x", "Image/PNG; charset=binary", vec![1u8, 2, 3]);
        assert_eq!(file.essence(), "image/png");
        assert_eq!(file.size(), 3);
    }
}
