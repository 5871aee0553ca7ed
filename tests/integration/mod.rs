//! Integration tests for rail-changelog

mod test_build;
mod test_extract;
mod test_forwardport;
mod test_publish;
mod test_update;
