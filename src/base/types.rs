pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// Everything the triage agent needs to assess one user turn.
///
/// No prior turns are included: each assessment stands on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriageContext {
    /// The user's description of their symptoms.
    pub user_message: String,
    /// Optional photo as a `data:image/jpeg;base64,...` URL.
    pub image_data_url: Option<String>,
}
