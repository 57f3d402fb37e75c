//! Yes/no confirmation collaborator for interactive discovery.

/// Answers the questions asked during interactive discovery.
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> bool;
}

/// Accepts everything; used for non-interactive discovery.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _question: &str) -> bool {
        true
    }
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, question: &str) -> bool {
        self(question)
    }
}
