use nifsign_core::{Context, OsEnv};
use nifsign_file_read_tokio::TokioFileRead;
use nifsign_http_send_reqwest::ReqwestHttpSend;

/// Create a context reading files with tokio, sending requests with reqwest
/// and reading the OS environment.
pub fn default_context() -> Context {
    Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
}
