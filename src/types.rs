#[derive(Eq, PartialEq, Clone, Copy, Hash, Debug)]
pub(crate) struct UserId(pub(crate) u64);

impl From<teloxide::types::UserId> for UserId {
    fn from(user_id: teloxide::types::UserId) -> Self {
        UserId(user_id.0)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
