//! `pseudocode-lsp`: the language server over stdio.
//!
//! Run with `RUST_LOG=debug pseudocode-lsp 2>lsp.log` to capture a trace.

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    pseudocode::lsp::serve_stdio().await;
}
