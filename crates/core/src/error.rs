#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid date '{0}': expected YYYY-MM-DD or an RFC 3339 timestamp")]
    InvalidDate(String),

    #[error("Unknown project status '{0}'")]
    UnknownStatus(String),
}
