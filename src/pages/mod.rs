pub mod history;
pub mod home;
pub mod login;
pub mod prediction;
pub mod status;
