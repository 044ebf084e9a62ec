/// Data models shared by the store back-ends and the API
///
/// # Models
///
/// - `user`: accounts, credentials and the todo reference set
/// - `todo`: todo items

pub mod todo;
pub mod user;
