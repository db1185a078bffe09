pub(crate) mod common;

mod scoring;
