pub(crate) mod gameplay;
