/// The logged-in-user marker gating access to the application commands.
///
/// Plaintext by design; there is no credential check, only the presence of
/// the marker. Loaded at session start and cleared on logout rather than
/// consulted as ambient global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
}

impl Session {
    pub fn new(username: &str) -> Self {
        Self {
            username: username.trim().to_string(),
        }
    }
}
