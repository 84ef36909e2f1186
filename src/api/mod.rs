pub(crate) mod auth;
pub(crate) mod bulk_import;
pub(crate) mod classes;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod pagination;
pub(crate) mod router;
pub(crate) mod schools;
pub(crate) mod sessions;
pub(crate) mod students;
pub(crate) mod teachers;
pub(crate) mod templates;
pub(crate) mod users;
pub(crate) mod validation;
