#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    BackendUnreachable,
}

impl ViewError {
    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::BackendUnreachable => {
                "Cannot reach the tracking backend. Make sure it is running, then try again."
            }
        }
    }
}
