/// Work the UI loop hands to the actions worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A typed line, exactly as entered.
    Submit(String),
    /// Resolve a link-preview placeholder.
    FetchPreview(String),
}
