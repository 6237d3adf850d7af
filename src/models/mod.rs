pub mod appointment;
pub mod condition;
pub mod dates;
pub mod enums;
pub mod patient;
pub mod recall;
pub mod user;

pub use appointment::*;
pub use condition::*;
pub use patient::*;
pub use recall::*;
pub use user::*;
