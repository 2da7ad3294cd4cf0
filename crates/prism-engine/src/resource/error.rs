use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("no mesh registered under {key}")]
    UnknownMesh { key: String },

    #[error("no texture registered under {key}")]
    UnknownTexture { key: String },

    #[error("mesh {key} has no vertices")]
    EmptyMesh { key: String },

    #[error("texture {key} has zero size")]
    EmptyImage { key: String },

    #[error("failed to load texture from {}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
