use crate::shared::frame::Frame;
use crate::shared::region::FaceRegion;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}

/// One label with how sure the classifier was, in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenderResult {
    pub label: Gender,
    pub confidence: f64,
}

/// Domain interface for gender classification of one detected face.
pub trait GenderClassifier: Send {
    fn classify(
        &mut self,
        frame: &Frame,
        region: &FaceRegion,
    ) -> Result<GenderResult, Box<dyn std::error::Error>>;
}
