use std::path::PathBuf;

/// Fatal errors abort `Project` construction; the project is never registered. Everything
/// recoverable (unresolved property, missing BOM, missing version, unresolvable plugin
/// version, illegal shorthand property) is logged via `tracing::warn!` and accumulated on
/// the `Project` instead — never modeled as an `Err`.
#[derive(Debug, thiserror::Error)]
pub enum CrateError {
    #[error("could not read POM at {path}: {source}")]
    PomUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse POM at {path}: {source}")]
    XmlParse {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("invalid POM at {path}: {details}")]
    InvalidPom { path: PathBuf, details: String },

    #[error("groupId is missing from {path} and there is no parent to inherit it from")]
    MissingGroupId { path: PathBuf },

    #[error("version is missing from {path} and there is no parent to inherit it from")]
    MissingVersion { path: PathBuf },

    #[error("GAV for {path} did not resolve to a complete coordinate: {gav_display}")]
    UnresolvedGav { path: PathBuf, gav_display: String },

    #[error("parent GAV for {path} did not resolve to a complete coordinate: {gav_display}")]
    UnresolvedParentGav { path: PathBuf, gav_display: String },
}
