/// Main test module that includes all sub-modules
/// Run specific tests with `cargo test <module>::<submodule>`
/// For example: `cargo test integration::pipeline_test`
pub mod utils;

pub mod integration {
    pub mod pipeline_test;
    pub mod sources_test;
}
