pub(crate) mod allowed_logins;
pub(crate) mod classes;
pub(crate) mod login_logs;
pub(crate) mod schools;
pub(crate) mod sessions;
pub(crate) mod students;
pub(crate) mod teachers;
pub(crate) mod templates;
pub(crate) mod users;
