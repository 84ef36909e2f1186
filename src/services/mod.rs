pub(crate) mod classes;
pub(crate) mod excel;
pub(crate) mod google_oauth;
pub(crate) mod schools;
pub(crate) mod scope;
pub(crate) mod sessions;
pub(crate) mod students;
pub(crate) mod teachers;
pub(crate) mod users;
