pub mod adapter;
pub mod config;
pub mod mutators;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod sampling;
pub mod validator;

/// Inputs are Python programs; everything else is skipped by the pipeline.
pub fn is_python_file(path: &std::path::Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("py")
}
