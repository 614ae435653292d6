pub(crate) mod snippet_repository;
