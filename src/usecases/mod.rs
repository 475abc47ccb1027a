pub mod attachments;
pub mod conversations;
pub mod messages;
pub mod sessions;
pub mod superstars;
