// Imports
use futures::channel::oneshot;

/// An entry in a feature disambiguation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceEntry {
    /// Display title of the feature.
    pub title: String,
    /// Display title of the layer the feature belongs to.
    pub layer_title: String,
}

/// The prompt presenter collaborator of the engine.
///
/// Implementations show the prompt immediately and fulfill the returned receiver when
/// the user answers. A dropped sender counts as a dismissal.
pub trait PromptPresenter {
    /// Present a list of features and let the user pick one. Resolves to the index of
    /// the picked entry.
    fn present_feature_choice(
        &self,
        title: &str,
        entries: Vec<ChoiceEntry>,
    ) -> oneshot::Receiver<usize>;

    /// Present a free-text input for a buffer radius in meters.
    fn present_radius_input(&self, title: &str) -> oneshot::Receiver<String>;

    /// Present the list of profile names and let the user pick the active one.
    /// Resolves to the index of the picked profile.
    fn present_profile_choice(
        &self,
        title: &str,
        names: Vec<String>,
        active: usize,
    ) -> oneshot::Receiver<usize>;
}
